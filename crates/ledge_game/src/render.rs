//! Turns session state into camera-relative sprite draws.
//!
//! Everything here is plain data: the binary batches the resulting
//! [`SpriteDraw`]s into GPU buffers. Draw order is platforms, finish targets,
//! enemies, player, so the player is always on top.

use std::sync::Arc;

use glam::Vec2;

use crate::collision::Rect;
use crate::session::GameSession;
use crate::sprites::{SpriteFrame, SpriteSet};

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub texture: Arc<str>,
    /// View-space rectangle, top-left origin.
    pub dest: Rect,
    pub uv: [f32; 4],
    pub tint: [f32; 4],
}

struct DrawList {
    camera: Vec2,
    viewport: Rect,
    draws: Vec<SpriteDraw>,
}

impl DrawList {
    fn push(&mut self, frame: &SpriteFrame, world: Rect, uv: [f32; 4]) {
        let dest = Rect::new(
            world.x - self.camera.x,
            world.y - self.camera.y,
            world.w,
            world.h,
        );
        if !dest.overlaps(&self.viewport) {
            return;
        }
        self.draws.push(SpriteDraw {
            texture: frame.texture.clone(),
            dest,
            uv,
            tint: WHITE,
        });
    }
}

pub fn build_draw_list(session: &GameSession, sprites: &SpriteSet) -> Vec<SpriteDraw> {
    let camera = session.camera();
    let world = session.world();
    let mut list = DrawList {
        camera: camera.position,
        viewport: Rect::new(0.0, 0.0, camera.viewport.x, camera.viewport.y),
        draws: Vec::with_capacity(world.platforms.len() * 8 + world.enemies.len() + 8),
    };

    let cell_width = session.config().metrics.cell_width;
    for platform in &world.platforms {
        let tile = if platform.is_finish {
            &sprites.finish_platform
        } else {
            &sprites.platform
        };
        for cell in 0..platform.width_cells {
            let rect = Rect::new(
                platform.rect.x + cell as f32 * cell_width,
                platform.rect.y,
                cell_width,
                platform.rect.h,
            );
            list.push(tile, rect, tile.uv);
        }
    }

    for target in &world.finish_targets {
        let width = target.rect.w * target.scale();
        let rect = Rect::new(
            target.rect.center().x - width * 0.5,
            target.rect.y,
            width,
            target.rect.h,
        );
        list.push(&sprites.finish, rect, sprites.finish.uv);
    }

    for enemy in &world.enemies {
        list.push(&sprites.enemy, enemy.rect, sprites.enemy.uv);
    }

    let player = &world.player;
    let frame = sprites
        .player
        .frame(player.animator.state, player.animator.frame_index());
    let collider = player.body.rect;
    let size = sprites.player_size;
    // Bottom-centre of the sprite sits on bottom-centre of the collider.
    let rect = Rect::new(
        collider.center().x - size.x * 0.5,
        collider.bottom() - size.y,
        size.x,
        size.y,
    );
    let uv = if player.facing_right {
        frame.uv
    } else {
        frame.flipped_uv()
    };
    list.push(frame, rect, uv);

    list.draws
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::PlayerInput;
    use crate::level::LevelGrid;
    use crate::session::SessionConfig;
    use ledge_core::time::Tick;

    fn session(rows: &[&str]) -> GameSession {
        GameSession::new(LevelGrid::from_rows(rows), SessionConfig::default())
    }

    fn sprites() -> SpriteSet {
        SpriteSet::placeholder(Vec2::new(40.0, 56.0))
    }

    #[test]
    fn platforms_emit_one_tile_per_cell() {
        let s = session(&["P    ", "[===]"]);
        let draws = build_draw_list(&s, &sprites());
        let tiles: Vec<_> = draws
            .iter()
            .filter(|d| &*d.texture == "__platform")
            .collect();
        assert_eq!(tiles.len(), 5);
        assert_eq!(tiles[1].dest.x - tiles[0].dest.x, 32.0);
        assert_eq!(tiles[0].dest.h, 16.0);
    }

    #[test]
    fn finish_platform_uses_finish_tile_and_scaled_target() {
        let s = session(&["P      ", "[==F==]"]);
        let draws = build_draw_list(&s, &sprites());
        assert_eq!(
            draws
                .iter()
                .filter(|d| &*d.texture == "__finish_platform")
                .count(),
            7
        );
        let target = draws
            .iter()
            .find(|d| &*d.texture == "__finish")
            .expect("finish target drawn");
        let collider = s.world().finish_targets[0].rect;
        let scale = s.world().finish_targets[0].scale();
        assert!((target.dest.w - collider.w * scale).abs() < 1e-4);
        let cam = s.camera().position;
        assert!((target.dest.center().x + cam.x - collider.center().x).abs() < 1e-4);
    }

    #[test]
    fn player_is_drawn_last_anchored_bottom_centre() {
        let s = session(&["        ", " P      ", "[======]"]);
        let draws = build_draw_list(&s, &sprites());
        let player = draws.last().expect("player drawn");
        assert_eq!(&*player.texture, "__player");
        let collider = s.world().player.body.rect;
        let cam = s.camera().position;
        assert!((player.dest.center().x + cam.x - collider.center().x).abs() < 1e-4);
        assert!((player.dest.bottom() + cam.y - collider.bottom()).abs() < 1e-4);
        assert_eq!(player.dest.w, 40.0);
        assert_eq!(player.uv, [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn player_facing_left_is_mirrored() {
        let mut s = session(&["        ", "    P   ", "[======]"]);
        s.update(
            PlayerInput {
                move_x: -1.0,
                jump_pressed: false,
            },
            0,
            Tick::FIXED,
        );
        let draws = build_draw_list(&s, &sprites());
        let player = draws.last().expect("player drawn");
        assert_eq!(player.uv, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn draws_outside_viewport_are_culled() {
        let mut row0 = " P".to_string();
        row0.push_str(&" ".repeat(98));
        let mut row1 = "[=]".to_string();
        row1.push_str(&" ".repeat(90));
        row1.push_str("[=====]");
        let s = GameSession::new(
            LevelGrid::from_rows(&[row0, row1]),
            SessionConfig::default(),
        );
        let draws = build_draw_list(&s, &sprites());
        // The far platform starts at 93 * 32 px, well past a 960 px viewport.
        assert_eq!(
            draws.iter().filter(|d| &*d.texture == "__platform").count(),
            3
        );
        assert!(draws
            .iter()
            .all(|d| d.dest.right() > 0.0 && d.dest.x < 960.0));
    }
}
