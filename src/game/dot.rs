use std::{collections::HashSet, path::Path};

use crate::{
    error::{RenderError, TextureError},
    rendering::{
        texture::{ColorKey, TextureHandle},
        TextureCanvas
    }
};

use super::{
    input::{KeyInput, KeyState, MoveDirection},
    math::{Rect2I, Vector2I}
};

pub const DOT_WIDTH: i32 = 20;
pub const DOT_HEIGHT: i32 = 20;
/// Pixels per frame added for every held arrow key.
pub const DOT_VELOCITY: i32 = 10;

/// Keyboard driven sprite confined to a rectangle starting at the origin.
#[derive(Debug)]
pub struct Dot {
    pub position: Vector2I,
    pub velocity: Vector2I,
    pub size: Vector2I,
    bounds: Vector2I,
    held: HashSet<MoveDirection>,
    texture: TextureHandle,
}

impl Dot {
    pub fn new(bounds: Vector2I) -> Self {
        Self::with_size(bounds, Vector2I::new(DOT_WIDTH, DOT_HEIGHT))
    }

    pub fn with_size(bounds: Vector2I, size: Vector2I) -> Self {
        Self {
            position: Vector2I::zero(),
            velocity: Vector2I::zero(),
            size,
            bounds,
            held: HashSet::new(),
            texture: TextureHandle::new(),
        }
    }

    pub fn bounds(&self) -> Vector2I {
        self.bounds
    }

    pub fn rect(&self) -> Rect2I {
        Rect2I { pos: self.position, size: self.size }
    }

    pub fn texture(&self) -> &TextureHandle {
        &self.texture
    }

    pub fn handle_key_down(&mut self, direction: MoveDirection) {
        if self.held.insert(direction) {
            self.velocity += direction.unit() * DOT_VELOCITY;
        }
    }

    pub fn handle_key_up(&mut self, direction: MoveDirection) {
        if self.held.remove(&direction) {
            self.velocity += -direction.unit() * DOT_VELOCITY;
        }
    }

    pub fn handle_key(&mut self, input: KeyInput) {
        let Some(direction) = input.direction() else {
            return;
        };
        match input.state {
            KeyState::Pressed => self.handle_key_down(direction),
            KeyState::Released => self.handle_key_up(direction),
        }
    }

    /// Moves each axis on its own. An axis whose move would leave the bounds
    /// is put back where it was, it is not snapped to the edge.
    pub fn step(&mut self) {
        self.position.x += self.velocity.x;
        if self.position.x < 0 || self.position.x + self.size.x > self.bounds.x {
            self.position.x -= self.velocity.x;
        }

        self.position.y += self.velocity.y;
        if self.position.y < 0 || self.position.y + self.size.y > self.bounds.y {
            self.position.y -= self.velocity.y;
        }

        log::trace!("Dot at {} velocity {}", self.position, self.velocity);
    }

    pub fn load_texture<C: TextureCanvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        path: &Path,
        color_key: Option<ColorKey>,
    ) -> Result<(), TextureError> {
        self.texture.load(canvas, path, color_key)
    }

    pub fn release_texture<C: TextureCanvas + ?Sized>(&mut self, canvas: &mut C) {
        self.texture.release(canvas);
    }

    pub fn render<C: TextureCanvas + ?Sized>(&self, canvas: &mut C) -> Result<(), RenderError> {
        self.texture.render(canvas, self.position.x, self.position.y)
    }
}

#[test]
fn test_dot_creation() {
    let dot = Dot::new(Vector2I::new(640, 480));
    assert_eq!(dot.position, Vector2I::zero());
    assert_eq!(dot.velocity, Vector2I::zero());
    assert_eq!(dot.size, Vector2I::new(DOT_WIDTH, DOT_HEIGHT));
    assert!(!dot.texture().is_loaded());
}

#[test]
fn test_key_down_sets_velocity_per_axis() {
    let mut dot = Dot::new(Vector2I::new(640, 480));
    dot.handle_key_down(MoveDirection::Down);
    dot.handle_key_down(MoveDirection::Left);
    assert_eq!(dot.velocity, Vector2I::new(-DOT_VELOCITY, DOT_VELOCITY));

    dot.handle_key_up(MoveDirection::Down);
    assert_eq!(dot.velocity, Vector2I::new(-DOT_VELOCITY, 0));
}

#[test]
fn test_repeated_key_down_does_not_accumulate() {
    let mut dot = Dot::new(Vector2I::new(640, 480));
    dot.handle_key_down(MoveDirection::Up);
    dot.handle_key_down(MoveDirection::Up);
    dot.handle_key_down(MoveDirection::Up);
    assert_eq!(dot.velocity, Vector2I::new(0, -DOT_VELOCITY));
}

#[test]
fn test_step_moves_by_velocity() {
    let mut dot = Dot::new(Vector2I::new(640, 480));
    dot.position = Vector2I::new(100, 100);
    dot.handle_key_down(MoveDirection::Right);
    dot.handle_key_down(MoveDirection::Down);
    dot.step();
    assert_eq!(dot.position, Vector2I::new(110, 110));
}

#[test]
fn test_step_axes_are_independent() {
    let mut dot = Dot::new(Vector2I::new(640, 480));
    dot.handle_key_down(MoveDirection::Left);
    dot.handle_key_down(MoveDirection::Down);
    dot.step();
    // x is blocked by the left edge, y still moves
    assert_eq!(dot.position, Vector2I::new(0, DOT_VELOCITY));
}
