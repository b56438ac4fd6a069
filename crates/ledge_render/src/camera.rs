//! Follow camera over a y-down level.
//!
//! `position` is the top-left corner of the visible window in world units.
//! The camera snaps to its target every tick (no smoothing) and is clamped so
//! it never shows anything outside `[0, level_size]`.

use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    pub viewport: Vec2,
}

impl Camera2D {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport: Vec2::new(viewport_width, viewport_height),
        }
    }

    /// Center the view on `target_center`, then clamp into the level.
    pub fn follow(&mut self, target_center: Vec2, level_size: Vec2) {
        self.position = target_center - self.viewport * 0.5;
        self.clamp_to(level_size);
    }

    /// Levels smaller than the viewport pin the camera at the origin.
    pub fn clamp_to(&mut self, level_size: Vec2) {
        let max = (level_size - self.viewport).max(Vec2::ZERO);
        self.position = self.position.clamp(Vec2::ZERO, max);
    }

    pub fn world_to_view(&self, world: Vec2) -> Vec2 {
        world - self.position
    }

    /// Projection for draw data that is already camera-relative: maps the
    /// viewport rectangle (y-down) onto clip space.
    pub fn build_uniform(&self) -> CameraUniform {
        let proj = Mat4::orthographic_rh(0.0, self.viewport.x, self.viewport.y, 0.0, -1.0, 1.0);
        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}
