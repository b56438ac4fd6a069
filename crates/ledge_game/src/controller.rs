use ledge_core::input::{InputState, Key};
use serde::Deserialize;

use crate::animation::PlayerAnimator;
use crate::collision::{KinematicBody, Rect};

/// Keys that move left, move right and jump.
pub const LEFT_KEYS: [Key; 2] = [Key::Left, Key::A];
pub const RIGHT_KEYS: [Key; 2] = [Key::Right, Key::D];
pub const JUMP_KEYS: [Key; 3] = [Key::Space, Key::W, Key::Up];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// -1.0 (left) to 1.0 (right).
    pub move_x: f32,
    /// Edge-triggered: true only on the tick the key went down.
    pub jump_pressed: bool,
}

impl PlayerInput {
    pub fn from_input(input: &InputState) -> Self {
        Self {
            move_x: input.axis(&LEFT_KEYS, &RIGHT_KEYS),
            jump_pressed: input.any_just_pressed(&JUMP_KEYS),
        }
    }
}

/// Speeds are in pixels per tick, gravity in pixels per tick squared.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub move_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            jump_speed: 11.0,
            gravity: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub body: KinematicBody,
    pub facing_right: bool,
    pub animator: PlayerAnimator,
}

impl Player {
    pub fn spawn(rect: Rect) -> Self {
        Self {
            body: KinematicBody::new(rect),
            facing_right: true,
            animator: PlayerAnimator::new(),
        }
    }

    /// Set velocity from input. Returns true if a jump started this tick.
    pub fn apply_input(&mut self, input: PlayerInput, physics: &PhysicsConfig) -> bool {
        self.body.velocity_x = input.move_x.clamp(-1.0, 1.0) * physics.move_speed;
        if self.body.velocity_x > 0.0 {
            self.facing_right = true;
        } else if self.body.velocity_x < 0.0 {
            self.facing_right = false;
        }

        // Jump is edge-triggered and only legal from grounded state.
        if input.jump_pressed && self.body.on_ground {
            self.body.velocity_y = -physics.jump_speed;
            self.body.on_ground = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_player() -> Player {
        let mut player = Player::spawn(Rect::new(0.0, 0.0, 32.0, 48.0));
        player.body.on_ground = true;
        player
    }

    #[test]
    fn horizontal_velocity_follows_input_without_acceleration() {
        let mut player = grounded_player();
        let physics = PhysicsConfig::default();
        player.apply_input(
            PlayerInput {
                move_x: 1.0,
                jump_pressed: false,
            },
            &physics,
        );
        assert_eq!(player.body.velocity_x, 4.0);
        player.apply_input(PlayerInput::default(), &physics);
        assert_eq!(player.body.velocity_x, 0.0);
    }

    #[test]
    fn facing_tracks_last_nonzero_direction() {
        let mut player = grounded_player();
        let physics = PhysicsConfig::default();
        player.apply_input(
            PlayerInput {
                move_x: -1.0,
                jump_pressed: false,
            },
            &physics,
        );
        assert!(!player.facing_right);
        player.apply_input(PlayerInput::default(), &physics);
        assert!(!player.facing_right);
    }

    #[test]
    fn jump_only_activates_when_grounded() {
        let physics = PhysicsConfig::default();
        let jump = PlayerInput {
            move_x: 0.0,
            jump_pressed: true,
        };

        let mut player = grounded_player();
        assert!(player.apply_input(jump, &physics));
        assert_eq!(player.body.velocity_y, -11.0);
        assert!(!player.body.on_ground);

        let mut airborne = grounded_player();
        airborne.body.on_ground = false;
        airborne.body.velocity_y = 2.0;
        assert!(!airborne.apply_input(jump, &physics));
        assert_eq!(airborne.body.velocity_y, 2.0);
    }

    #[test]
    fn input_reads_either_key_binding() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_down(Key::W);
        let player_input = PlayerInput::from_input(&input);
        assert_eq!(player_input.move_x, -1.0);
        assert!(player_input.jump_pressed);

        input.end_frame();
        input.key_down(Key::Right);
        let player_input = PlayerInput::from_input(&input);
        assert_eq!(player_input.move_x, 0.0);
        assert!(!player_input.jump_pressed);
    }
}
