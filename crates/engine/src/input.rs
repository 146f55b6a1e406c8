//! Input sources feeding raw key edges to the engine.

use std::collections::VecDeque;

use crate::types::{Key, KeyEdge};

/// Delivers raw key-down / key-up edges.
///
/// The engine drains every pending edge at the start of each tick.
pub trait InputSource {
    fn poll_edge(&mut self) -> Option<KeyEdge>;
}

/// Source that never produces input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll_edge(&mut self) -> Option<KeyEdge> {
        None
    }
}

/// Queue of pre-recorded edges, for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    edges: VecDeque<KeyEdge>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edge: KeyEdge) {
        self.edges.push_back(edge);
    }

    pub fn press(&mut self, key: Key) {
        self.push(KeyEdge::Down(key));
    }

    pub fn release(&mut self, key: Key) {
        self.push(KeyEdge::Up(key));
    }

    pub fn pending(&self) -> usize {
        self.edges.len()
    }
}

impl FromIterator<KeyEdge> for ScriptedInput {
    fn from_iter<T: IntoIterator<Item = KeyEdge>>(iter: T) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll_edge(&mut self) -> Option<KeyEdge> {
        self.edges.pop_front()
    }
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn poll_edge(&mut self) -> Option<KeyEdge> {
        (**self).poll_edge()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_input_drains_in_order() {
        let mut input: ScriptedInput = [KeyEdge::Down(Key::Left), KeyEdge::Up(Key::Left)]
            .into_iter()
            .collect();
        input.press(Key::Space);
        assert_eq!(input.pending(), 3);
        assert_eq!(input.poll_edge(), Some(KeyEdge::Down(Key::Left)));
        assert_eq!(input.poll_edge(), Some(KeyEdge::Up(Key::Left)));
        assert_eq!(input.poll_edge(), Some(KeyEdge::Down(Key::Space)));
        assert_eq!(input.poll_edge(), None);
    }
}
