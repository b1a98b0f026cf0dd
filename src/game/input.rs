use winit::{
    event::ElementState,
    keyboard::{
        Key,
        NamedKey
    }
};

use super::math::Vector2I;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    /// Screen space unit step, y grows downwards.
    pub fn unit(self) -> Vector2I {
        match self {
            MoveDirection::Up => Vector2I::new(0, -1),
            MoveDirection::Down => Vector2I::new(0, 1),
            MoveDirection::Left => Vector2I::new(-1, 0),
            MoveDirection::Right => Vector2I::new(1, 0),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyCode {
    Arrow(MoveDirection),
    Escape,
    Other,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Keyboard event reduced to what the stages care about.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: KeyCode,
    pub state: KeyState,
    pub repeat: bool,
}

impl KeyInput {
    pub fn pressed(key: KeyCode) -> Self {
        Self { key, state: KeyState::Pressed, repeat: false }
    }

    pub fn released(key: KeyCode) -> Self {
        Self { key, state: KeyState::Released, repeat: false }
    }

    pub fn from_winit(logical_key: &Key, state: ElementState, repeat: bool) -> Self {
        let key = match logical_key {
            Key::Named(NamedKey::ArrowUp) => KeyCode::Arrow(MoveDirection::Up),
            Key::Named(NamedKey::ArrowDown) => KeyCode::Arrow(MoveDirection::Down),
            Key::Named(NamedKey::ArrowLeft) => KeyCode::Arrow(MoveDirection::Left),
            Key::Named(NamedKey::ArrowRight) => KeyCode::Arrow(MoveDirection::Right),
            Key::Named(NamedKey::Escape) => KeyCode::Escape,
            _ => KeyCode::Other,
        };

        let state = match state {
            ElementState::Pressed => KeyState::Pressed,
            ElementState::Released => KeyState::Released,
        };

        Self { key, state, repeat }
    }

    pub fn direction(&self) -> Option<MoveDirection> {
        match self.key {
            KeyCode::Arrow(direction) => Some(direction),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys_map_to_directions() {
        let input = KeyInput::from_winit(&Key::Named(NamedKey::ArrowLeft), ElementState::Pressed, false);
        assert_eq!(input.key, KeyCode::Arrow(MoveDirection::Left));
        assert_eq!(input.state, KeyState::Pressed);
        assert_eq!(input.direction(), Some(MoveDirection::Left));
    }

    #[test]
    fn test_other_keys_have_no_direction() {
        let input = KeyInput::from_winit(&Key::Character("w".into()), ElementState::Released, false);
        assert_eq!(input.key, KeyCode::Other);
        assert_eq!(input.state, KeyState::Released);
        assert_eq!(input.direction(), None);

        let escape = KeyInput::from_winit(&Key::Named(NamedKey::Escape), ElementState::Pressed, false);
        assert_eq!(escape.key, KeyCode::Escape);
    }

    #[test]
    fn test_repeat_flag_is_kept() {
        let input = KeyInput::from_winit(&Key::Named(NamedKey::ArrowUp), ElementState::Pressed, true);
        assert!(input.repeat);
    }

    #[test]
    fn test_opposite_directions_cancel() {
        assert_eq!(MoveDirection::Up.unit() + MoveDirection::Down.unit(), Vector2I::zero());
        assert_eq!(MoveDirection::Left.unit() + MoveDirection::Right.unit(), Vector2I::zero());
    }
}
