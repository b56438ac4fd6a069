//! Level entities other than the player.
//!
//! Platforms are static. Enemies and finish targets only animate: each keeps a
//! phase accumulator that grows by a fixed increment per tick, and everything
//! visible about them is a pure function of that phase. Resetting the phase
//! restores the spawn state exactly.

use ledge_core::time::Tick;
use serde::Deserialize;

use crate::collision::{Collider, Rect};

/// Per-tick increments and amplitudes for the periodic entities.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Added to the player's frame accumulator every tick; a frame advances at 1.0.
    pub player_frame_increment: f32,
    pub enemy_phase_increment: f32,
    pub enemy_amplitude: f32,
    pub finish_phase_increment: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            player_frame_increment: 0.25,
            enemy_phase_increment: 0.05,
            enemy_amplitude: 12.0,
            finish_phase_increment: 0.04,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub rect: Rect,
    pub is_finish: bool,
    pub width_cells: u32,
}

impl Collider for Platform {
    fn collider(&self) -> Rect {
        self.rect
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    pub phase: f32,
    pub base_y: f32,
    pub amplitude: f32,
}

impl Enemy {
    pub fn new(rect: Rect, amplitude: f32) -> Self {
        Self {
            rect,
            phase: 0.0,
            base_y: rect.y,
            amplitude,
        }
    }

    pub fn offset_y(&self) -> f32 {
        self.amplitude * self.phase.sin()
    }

    pub fn update(&mut self, motion: &MotionConfig, tick: Tick) {
        self.phase += tick.apply(motion.enemy_phase_increment);
        self.rect.y = self.base_y + self.offset_y();
    }
}

impl Collider for Enemy {
    fn collider(&self) -> Rect {
        self.rect
    }
}

/// Goal marker. The collider never moves or scales; only the drawn width pulses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinishTarget {
    pub rect: Rect,
    pub phase: f32,
}

impl FinishTarget {
    pub const MIN_SCALE: f32 = 0.04;
    pub const MAX_SCALE: f32 = 1.0;

    pub fn new(rect: Rect) -> Self {
        Self { rect, phase: 0.0 }
    }

    /// Horizontal scale for the sprite, in `[0.04, 1.0]`.
    pub fn scale(&self) -> f32 {
        (0.52 + 0.48 * (2.0 * self.phase).sin()).clamp(Self::MIN_SCALE, Self::MAX_SCALE)
    }

    pub fn update(&mut self, motion: &MotionConfig, tick: Tick) {
        self.phase += tick.apply(motion.finish_phase_increment);
    }
}

impl Collider for FinishTarget {
    fn collider(&self) -> Rect {
        self.rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemy_offset_is_bounded_by_amplitude() {
        let mut enemy = Enemy::new(Rect::new(0.0, 100.0, 32.0, 32.0), 12.0);
        let motion = MotionConfig {
            enemy_phase_increment: 0.37,
            ..MotionConfig::default()
        };
        for _ in 0..500 {
            enemy.update(&motion, Tick::FIXED);
            assert!(enemy.offset_y().abs() <= enemy.amplitude + 1e-4);
            assert!((enemy.rect.y - 100.0).abs() <= 12.0 + 1e-4);
        }
    }

    #[test]
    fn enemy_position_is_derived_from_phase_only() {
        let mut enemy = Enemy::new(Rect::new(0.0, 50.0, 32.0, 32.0), 10.0);
        let motion = MotionConfig::default();
        for _ in 0..37 {
            enemy.update(&motion, Tick::FIXED);
        }
        let expected = 50.0 + 10.0 * enemy.phase.sin();
        assert!((enemy.rect.y - expected).abs() < 1e-4);
        assert_eq!(enemy.base_y, 50.0);
    }

    #[test]
    fn enemy_collider_follows_oscillation() {
        let mut enemy = Enemy::new(Rect::new(0.0, 50.0, 32.0, 32.0), 10.0);
        let motion = MotionConfig {
            enemy_phase_increment: std::f32::consts::FRAC_PI_2,
            ..MotionConfig::default()
        };
        enemy.update(&motion, Tick::FIXED);
        assert!((enemy.collider().y - 60.0).abs() < 1e-4);
    }

    #[test]
    fn finish_scale_stays_within_range() {
        let mut target = FinishTarget::new(Rect::new(0.0, 0.0, 32.0, 32.0));
        let motion = MotionConfig {
            finish_phase_increment: 0.113,
            ..MotionConfig::default()
        };
        for _ in 0..1000 {
            target.update(&motion, Tick::FIXED);
            let s = target.scale();
            assert!(s >= FinishTarget::MIN_SCALE - 1e-5 && s <= FinishTarget::MAX_SCALE + 1e-5);
        }
    }

    #[test]
    fn finish_collider_ignores_animation() {
        let rect = Rect::new(10.0, 20.0, 32.0, 32.0);
        let mut target = FinishTarget::new(rect);
        for _ in 0..25 {
            target.update(&MotionConfig::default(), Tick::FIXED);
        }
        assert_eq!(target.collider(), rect);
        assert!(target.phase > 0.0);
    }

    #[test]
    fn platform_collider_is_its_rect() {
        let platform = Platform {
            rect: Rect::new(0.0, 64.0, 96.0, 16.0),
            is_finish: false,
            width_cells: 3,
        };
        assert_eq!(platform.collider(), platform.rect);
    }
}
