use std::collections::HashSet;

/// Logical keys shared by every cabinet. Platform glue maps physical keys and
/// touch buttons onto these before they reach a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Fire,
    Pause,
    Mute,
    Restart,
    Confirm,
    Cancel,
    Backspace,
    Letter(char),
}

/// Keyboard and pointer state buffered between frames. Event handlers write
/// into it at any time; the update step reads it once per tick.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    pressed: Vec<Key>,
    pointer_x: Option<f32>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key-down. Auto-repeat of a key already held does not count as
    /// a fresh press.
    pub fn press(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.push(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Press and release within the same frame, as a tap on a touch button.
    pub fn tap(&mut self, key: Key) {
        self.press(key);
        self.release(key);
    }

    #[inline]
    pub fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    #[inline]
    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn pressed(&self) -> &[Key] {
        &self.pressed
    }

    pub fn set_pointer(&mut self, x: f32) {
        self.pointer_x = Some(x);
    }

    pub fn clear_pointer(&mut self) {
        self.pointer_x = None;
    }

    pub fn pointer_x(&self) -> Option<f32> {
        self.pointer_x
    }

    /// Drops this frame's edge presses. Held keys persist.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
        self.pointer_x = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_press_is_not_a_new_edge() {
        let mut input = InputState::new();
        input.press(Key::Fire);
        input.end_frame();
        input.press(Key::Fire);
        assert!(input.is_down(Key::Fire));
        assert!(!input.was_pressed(Key::Fire));
    }

    #[test]
    fn tap_registers_edge_without_holding() {
        let mut input = InputState::new();
        input.tap(Key::Up);
        assert!(input.was_pressed(Key::Up));
        assert!(!input.is_down(Key::Up));
        input.end_frame();
        assert!(input.pressed().is_empty());
    }
}
