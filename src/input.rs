use std::collections::HashSet;

use parking_lot::RwLock;

/// Identifier for a physical keyboard key the demo reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Named(NamedKey),
    /// A number key; the number row and the numpad map to the same digit.
    Digit(u8),
}

/// Friendly names for the non-digit keys the camera rig polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Up,
    Down,
    Left,
    Right,
    Space,
}

/// Instantaneous pressed-key snapshot.
///
/// The event loop writes key transitions, the frame update polls current
/// state.  There is no event queue and no debouncing: a key that stays down
/// reads as down on every frame until its release event arrives.
#[derive(Debug, Default)]
pub struct InputState {
    keys: RwLock<HashSet<KeyCode>>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_down(&self, key: KeyCode) {
        self.keys.write().insert(key);
    }

    pub fn set_key_up(&self, key: KeyCode) {
        self.keys.write().remove(&key);
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.read().contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_key_transitions() {
        let state = InputState::new();
        assert!(!state.is_key_down(KeyCode::Named(NamedKey::Space)));
        state.set_key_down(KeyCode::Named(NamedKey::Space));
        assert!(state.is_key_down(KeyCode::Named(NamedKey::Space)));
        state.set_key_up(KeyCode::Named(NamedKey::Space));
        assert!(!state.is_key_down(KeyCode::Named(NamedKey::Space)));
    }

    #[test]
    fn held_key_reads_down_across_repeated_polls() {
        let state = InputState::new();
        state.set_key_down(KeyCode::Digit(2));
        for _ in 0..3 {
            assert!(state.is_key_down(KeyCode::Digit(2)));
        }
    }

    #[test]
    fn digits_are_distinct_keys() {
        let state = InputState::new();
        state.set_key_down(KeyCode::Digit(0));
        assert!(!state.is_key_down(KeyCode::Digit(1)));
    }
}
