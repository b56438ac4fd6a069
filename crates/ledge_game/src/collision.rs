//! Player-vs-level collision.
//!
//! The level is a short list of axis-aligned platform rectangles, so resolution
//! is a linear scan, not a grid lookup. Movement is **axis-separated**: the body
//! moves along X and is pushed out of whatever it now overlaps, then gravity is
//! applied and the same happens along Y. Horizontal contact only corrects the
//! position; the horizontal velocity is left alone (the controller rewrites it
//! from input every tick anyway). Vertical contact zeroes the vertical velocity
//! and landing on top sets `on_ground`.
//!
//! Platforms are scanned in list order and a later overlap may override an
//! earlier correction. Levels are authored so platforms never stack in a way
//! where that matters.
//!
//! Coordinates are y-down: `y` is the top edge, `y + h` the bottom edge, and
//! positive vertical velocity means falling.

use glam::Vec2;
use ledge_core::time::Tick;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    /// Strict overlap: rectangles that only share an edge do not overlap, so a
    /// body resting exactly on a platform top is not "inside" it.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Anything that takes part in collision or overlap tests.
pub trait Collider {
    fn collider(&self) -> Rect;
}

impl Collider for Rect {
    fn collider(&self) -> Rect {
        *self
    }
}

/// Physics state the resolver reads and corrects each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicBody {
    pub rect: Rect,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub on_ground: bool,
}

impl KinematicBody {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            velocity_x: 0.0,
            velocity_y: 0.0,
            on_ground: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBounds {
    pub width: u32,
    pub height: u32,
}

impl LevelBounds {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// What a resolved tick means for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Win,
    Defeated,
}

pub fn resolve_horizontal<P: Collider>(body: &mut KinematicBody, platforms: &[P], tick: Tick) {
    body.rect.x += tick.apply(body.velocity_x);
    for platform in platforms {
        let solid = platform.collider();
        if !body.rect.overlaps(&solid) {
            continue;
        }
        if body.velocity_x > 0.0 {
            body.rect.set_right(solid.left());
        } else if body.velocity_x < 0.0 {
            body.rect.x = solid.right();
        }
    }
}

pub fn resolve_vertical<P: Collider>(
    body: &mut KinematicBody,
    platforms: &[P],
    gravity: f32,
    tick: Tick,
) {
    body.velocity_y += tick.apply(gravity);
    body.rect.y += tick.apply(body.velocity_y);
    body.on_ground = false;
    for platform in platforms {
        let solid = platform.collider();
        if !body.rect.overlaps(&solid) {
            continue;
        }
        if body.velocity_y > 0.0 {
            body.rect.set_bottom(solid.top());
            body.on_ground = true;
            body.velocity_y = 0.0;
        } else if body.velocity_y < 0.0 {
            body.rect.y = solid.bottom();
            body.velocity_y = 0.0;
        }
    }
}

pub fn overlaps_any<C: Collider>(rect: &Rect, items: &[C]) -> bool {
    items.iter().any(|item| rect.overlaps(&item.collider()))
}

/// Keep the body inside the level horizontally and above its floor. There is
/// no ceiling clamp: jumping above the top row is allowed.
pub fn clamp_to_bounds(body: &mut KinematicBody, bounds: LevelBounds) {
    let width = bounds.width as f32;
    let height = bounds.height as f32;
    if body.rect.left() < 0.0 {
        body.rect.x = 0.0;
    }
    if body.rect.right() > width {
        body.rect.set_right(width);
    }
    if body.rect.bottom() > height {
        body.rect.set_bottom(height);
    }
}

/// One full resolution step: horizontal pass, vertical pass, goal and hazard
/// overlap tests, then the bounds clamp. Touching an enemy wins over touching a
/// finish target in the same tick.
pub fn resolve_step<P, F, E>(
    body: &mut KinematicBody,
    platforms: &[P],
    finish_targets: &[F],
    enemies: &[E],
    bounds: LevelBounds,
    gravity: f32,
    tick: Tick,
) -> StepOutcome
where
    P: Collider,
    F: Collider,
    E: Collider,
{
    resolve_horizontal(body, platforms, tick);
    resolve_vertical(body, platforms, gravity, tick);

    let mut outcome = StepOutcome::Continue;
    if overlaps_any(&body.rect, finish_targets) {
        outcome = StepOutcome::Win;
    }
    if overlaps_any(&body.rect, enemies) {
        outcome = StepOutcome::Defeated;
    }

    clamp_to_bounds(body, bounds);
    outcome
}
