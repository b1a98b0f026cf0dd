mod common;

use dot_stages::game::{
    dot::{Dot, DOT_HEIGHT, DOT_VELOCITY, DOT_WIDTH},
    input::{KeyCode, KeyInput, MoveDirection},
    math::{Rect2I, Vector2I}
};

use common::{test_dir, write_bmp, RecordingCanvas};

const BOUNDS: Vector2I = Vector2I { x: 640, y: 480 };

fn assert_inside(dot: &Dot) {
    let screen = Rect2I { pos: Vector2I::zero(), size: dot.bounds() };
    assert!(screen.contains_rect(&dot.rect()), "dot escaped: {}", dot.rect());
}

#[test]
fn test_holding_right_stops_at_right_edge() {
    let mut dot = Dot::new(BOUNDS);
    dot.handle_key_down(MoveDirection::Right);
    assert_eq!(dot.velocity, Vector2I::new(10, 0));

    for _ in 0..64 {
        dot.step();
        assert!(dot.position.x <= 620);
    }
    assert_eq!(dot.position, Vector2I::new(620, 0));
}

#[test]
fn test_dot_stays_inside_for_every_direction_mix() {
    let mut dot = Dot::new(BOUNDS);
    // Arbitrary but fixed press/release script covering all edges
    let script = [
        (MoveDirection::Right, true), (MoveDirection::Down, true),
        (MoveDirection::Down, false), (MoveDirection::Up, true),
        (MoveDirection::Right, false), (MoveDirection::Left, true),
        (MoveDirection::Up, false), (MoveDirection::Down, true),
        (MoveDirection::Left, false), (MoveDirection::Right, true),
    ];

    for (direction, pressed) in script {
        if pressed {
            dot.handle_key_down(direction);
        } else {
            dot.handle_key_up(direction);
        }
        for _ in 0..70 {
            dot.step();
            assert_inside(&dot);
        }
    }
    assert_eq!(dot.position, Vector2I::new(BOUNDS.x - DOT_WIDTH, BOUNDS.y - DOT_HEIGHT));
}

#[test]
fn test_opposite_keys_cancel_out() {
    let mut dot = Dot::new(BOUNDS);
    dot.handle_key_down(MoveDirection::Right);
    dot.handle_key_down(MoveDirection::Left);
    assert_eq!(dot.velocity.x, 0);

    dot.handle_key_up(MoveDirection::Left);
    assert_eq!(dot.velocity.x, DOT_VELOCITY);
}

#[test]
fn test_release_of_unpressed_key_is_ignored() {
    let mut dot = Dot::new(BOUNDS);
    dot.handle_key_up(MoveDirection::Up);
    assert_eq!(dot.velocity, Vector2I::zero());

    dot.handle_key_down(MoveDirection::Up);
    dot.handle_key_up(MoveDirection::Up);
    dot.handle_key_up(MoveDirection::Up);
    assert_eq!(dot.velocity, Vector2I::zero());
}

#[test]
fn test_overflowing_step_is_reverted_not_clamped() {
    let mut dot = Dot::new(BOUNDS);
    // 5 pixels of room left, velocity is 10
    dot.position = Vector2I::new(BOUNDS.x - DOT_WIDTH - 5, 100);
    dot.handle_key_down(MoveDirection::Right);
    dot.step();
    assert_eq!(dot.position, Vector2I::new(615, 100));
    assert_eq!(dot.velocity, Vector2I::new(DOT_VELOCITY, 0));
}

#[test]
fn test_top_edge_reverts_vertical_move_only() {
    let mut dot = Dot::new(BOUNDS);
    dot.position = Vector2I::new(300, 0);
    dot.handle_key_down(MoveDirection::Up);
    dot.handle_key_down(MoveDirection::Right);
    dot.step();
    assert_eq!(dot.position, Vector2I::new(310, 0));
}

#[test]
fn test_key_input_routing() {
    let mut dot = Dot::new(BOUNDS);
    dot.handle_key(KeyInput::pressed(KeyCode::Arrow(MoveDirection::Down)));
    dot.handle_key(KeyInput::pressed(KeyCode::Other));
    assert_eq!(dot.velocity, Vector2I::new(0, DOT_VELOCITY));

    dot.handle_key(KeyInput::released(KeyCode::Arrow(MoveDirection::Down)));
    assert_eq!(dot.velocity, Vector2I::zero());
}

#[test]
fn test_dot_renders_its_texture_at_position() {
    let dir = test_dir("dot_render");
    let path = write_bmp(&dir, "dot.bmp", 20, 20, [0xFF, 0x00, 0x00]);
    let mut canvas = RecordingCanvas::new();

    let mut dot = Dot::new(BOUNDS);
    assert!(dot.render(&mut canvas).is_err());

    dot.load_texture(&mut canvas, &path, None).unwrap();
    dot.handle_key_down(MoveDirection::Right);
    dot.step();
    dot.render(&mut canvas).unwrap();

    assert_eq!(canvas.draws.len(), 1);
    assert_eq!(canvas.draws[0].dest, Rect2I::new(10, 0, 20, 20));

    dot.release_texture(&mut canvas);
    assert!(canvas.live.is_empty());
}
