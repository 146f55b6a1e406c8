//! Runtime tunables.
//!
//! Defaults come from the constants in `blockdrop-types`. A JSON file named by
//! `BLOCKDROP_SETTINGS` may override any subset of fields, and the individual
//! `BLOCKDROP_DAS_MS`, `BLOCKDROP_ARR_MS` and `BLOCKDROP_SEED` variables win
//! over both. Nothing here ever aborts the game: a bad source is reported on
//! stderr and skipped.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::{ARR_MS, DAS_MS, FRAME_MS, LINE_CLEAR_MS};

pub const SETTINGS_PATH_VAR: &str = "BLOCKDROP_SETTINGS";
pub const DAS_VAR: &str = "BLOCKDROP_DAS_MS";
pub const ARR_VAR: &str = "BLOCKDROP_ARR_MS";
pub const SEED_VAR: &str = "BLOCKDROP_SEED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub das_ms: u64,
    pub arr_ms: u64,
    /// Fixed piece-sequence seed; `None` seeds from the clock on every start
    pub seed: Option<u32>,
    /// Line-clear animation length for one to three lines
    pub line_clear_ms: u32,
    pub frame_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            das_ms: DAS_MS,
            arr_ms: ARR_MS,
            seed: None,
            line_clear_ms: LINE_CLEAR_MS,
            frame_ms: FRAME_MS,
        }
    }
}

impl Settings {
    /// Defaults, then the settings file, then individual env overrides.
    pub fn from_env() -> Self {
        let mut settings = match std::env::var_os(SETTINGS_PATH_VAR) {
            Some(path) => Self::load(Path::new(&path)).unwrap_or_else(|err| {
                eprintln!("[settings] {err:#}; using defaults");
                Self::default()
            }),
            None => Self::default(),
        };
        settings.apply_overrides(|name| std::env::var(name).ok());
        settings.sanitized()
    }

    /// Read a JSON settings file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(text)?;
        Ok(settings.sanitized())
    }

    /// Apply `BLOCKDROP_*` overrides found through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(das) = parse_override(&lookup, DAS_VAR) {
            self.das_ms = das;
        }
        if let Some(arr) = parse_override(&lookup, ARR_VAR) {
            self.arr_ms = arr;
        }
        if let Some(seed) = parse_override(&lookup, SEED_VAR) {
            self.seed = Some(seed);
        }
    }

    pub fn sanitized(mut self) -> Self {
        self.arr_ms = self.arr_ms.max(1);
        self.frame_ms = self.frame_ms.max(1);
        self
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    let raw = lookup(name)?;
    match parse_value(name, &raw) {
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!("[settings] {err}");
            None
        }
    }
}

fn parse_value<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| anyhow!("ignoring {name}={raw:?}: not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_match_constants() {
        let s = Settings::default();
        assert_eq!(s.das_ms, 170);
        assert_eq!(s.arr_ms, 50);
        assert_eq!(s.seed, None);
        assert_eq!(s.line_clear_ms, 600);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let s = Settings::from_json(r#"{ "das_ms": 120, "seed": 9 }"#).unwrap();
        assert_eq!(s.das_ms, 120);
        assert_eq!(s.seed, Some(9));
        assert_eq!(s.arr_ms, ARR_MS);
        assert_eq!(s.frame_ms, FRAME_MS);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Settings::from_json("{ das_ms: }").is_err());
    }

    #[test]
    fn zero_arr_is_clamped() {
        let s = Settings::from_json(r#"{ "arr_ms": 0, "frame_ms": 0 }"#).unwrap();
        assert_eq!(s.arr_ms, 1);
        assert_eq!(s.frame_ms, 1);
    }

    #[test]
    fn env_overrides_win_and_bad_values_are_skipped() {
        let vars = env(&[(DAS_VAR, "90"), (ARR_VAR, "fast"), (SEED_VAR, " 42 ")]);
        let mut s = Settings::default();
        s.apply_overrides(|name| vars.get(name).cloned());
        assert_eq!(s.das_ms, 90);
        assert_eq!(s.arr_ms, ARR_MS);
        assert_eq!(s.seed, Some(42));
    }

    #[test]
    fn settings_serialize_round_trip() {
        let s = Settings {
            seed: Some(7),
            ..Settings::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), s);
    }
}
