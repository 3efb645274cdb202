/// Logical key state sampled once per update.
///
/// The host translates device events into [`KeyEvent`]s; the core only
/// ever sees these five logical keys.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    MoveLeft,
    MoveRight,
    Fire,
    Pause,
    Confirm,
}

impl Key {
    fn index(self) -> usize {
        match self {
            Key::MoveLeft => 0,
            Key::MoveRight => 1,
            Key::Fire => 2,
            Key::Pause => 3,
            Key::Confirm => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

/// Held/unheld flag per logical key plus "pressed since last sample"
/// latches, so a tap shorter than one frame is never lost.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: [bool; 5],
    pressed: [bool; 5],
    /// Fire must be released before it can shoot again.
    fire_armed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            fire_armed: true,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Pressed(key) => {
                // Auto-repeat presses on a held key are not new presses.
                if !self.held[key.index()] {
                    self.pressed[key.index()] = true;
                }
                self.held[key.index()] = true;
            }
            KeyEvent::Released(key) => {
                self.held[key.index()] = false;
                if key == Key::Fire {
                    self.fire_armed = true;
                }
            }
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held[key.index()]
    }

    /// Horizontal steering: `-1` left, `+1` right, left wins when both
    /// are held.
    pub fn steer(&self) -> f32 {
        if self.is_held(Key::MoveLeft) {
            -1.0
        } else if self.is_held(Key::MoveRight) {
            1.0
        } else {
            0.0
        }
    }

    /// Consume a pending press of `key`.
    pub fn take_press(&mut self, key: Key) -> bool {
        std::mem::take(&mut self.pressed[key.index()])
    }

    /// Whether a fire request is pending. Does not consume it.
    pub fn wants_fire(&self) -> bool {
        self.fire_armed && (self.pressed[Key::Fire.index()] || self.is_held(Key::Fire))
    }

    /// Record that a shot was taken; the key must be released to re-arm.
    pub fn consume_fire(&mut self) {
        self.fire_armed = false;
        self.pressed[Key::Fire.index()] = false;
    }

    /// Forget pending presses, keeping held state.
    pub fn clear_presses(&mut self) {
        self.pressed = [false; 5];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steer_prefers_left() {
        let mut input = InputState::new();
        assert_eq!(input.steer(), 0.0);
        input.apply(KeyEvent::Pressed(Key::MoveRight));
        assert_eq!(input.steer(), 1.0);
        input.apply(KeyEvent::Pressed(Key::MoveLeft));
        assert_eq!(input.steer(), -1.0);
        input.apply(KeyEvent::Released(Key::MoveLeft));
        assert_eq!(input.steer(), 1.0);
    }

    #[test]
    fn fire_requires_release_between_shots() {
        let mut input = InputState::new();
        input.apply(KeyEvent::Pressed(Key::Fire));
        assert!(input.wants_fire());
        input.consume_fire();
        assert!(!input.wants_fire());
        input.apply(KeyEvent::Pressed(Key::Fire));
        assert!(!input.wants_fire());
        input.apply(KeyEvent::Released(Key::Fire));
        input.apply(KeyEvent::Pressed(Key::Fire));
        assert!(input.wants_fire());
    }

    #[test]
    fn short_tap_is_latched() {
        let mut input = InputState::new();
        input.apply(KeyEvent::Pressed(Key::Pause));
        input.apply(KeyEvent::Released(Key::Pause));
        assert!(!input.is_held(Key::Pause));
        assert!(input.take_press(Key::Pause));
        assert!(!input.take_press(Key::Pause));
    }
}
