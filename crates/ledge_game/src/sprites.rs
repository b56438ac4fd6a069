//! Sprite manifest loading.
//!
//! The manifest names one horizontal-strip sheet per player animation plus a
//! single image each for platform tiles, finish platform tiles, enemies and
//! the finish target. Frame UVs are derived from the strip's frame count, so
//! the manifest never lists rectangles.
//!
//! Texture keys are the resolved file paths. The placeholder set uses
//! reserved `__`-prefixed keys that map to 1x1 solid-colour textures.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;

use crate::animation::{AnimationTable, PlayerAnimation};

const SUPPORTED_VERSION: &str = "0.1";

#[derive(Debug, Deserialize, Clone)]
pub struct SpriteManifest {
    pub version: String,
    pub player: PlayerSprites,
    pub platform: SpriteImage,
    pub finish_platform: SpriteImage,
    pub enemy: SpriteImage,
    pub finish: SpriteImage,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlayerSprites {
    /// Drawn size in pixels; the sprite is usually larger than the collider.
    pub size: [f32; 2],
    pub clips: PlayerClips,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlayerClips {
    pub idle: SpriteStrip,
    pub run: SpriteStrip,
    pub jump_start: SpriteStrip,
    pub jump: SpriteStrip,
    pub jump_end: SpriteStrip,
}

impl PlayerClips {
    fn get(&self, state: PlayerAnimation) -> &SpriteStrip {
        match state {
            PlayerAnimation::Idle => &self.idle,
            PlayerAnimation::Run => &self.run,
            PlayerAnimation::JumpStart => &self.jump_start,
            PlayerAnimation::Jump => &self.jump,
            PlayerAnimation::JumpEnd => &self.jump_end,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpriteStrip {
    pub path: String,
    pub frames: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpriteImage {
    pub path: String,
}

/// One drawable region: which texture, and the `[u0, v0, u1, v1]` inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFrame {
    pub texture: Arc<str>,
    pub uv: [f32; 4],
}

impl SpriteFrame {
    pub fn whole(texture: Arc<str>) -> Self {
        Self {
            texture,
            uv: [0.0, 0.0, 1.0, 1.0],
        }
    }

    /// Same region mirrored horizontally.
    pub fn flipped_uv(&self) -> [f32; 4] {
        let [u0, v0, u1, v1] = self.uv;
        [u1, v0, u0, v1]
    }
}

/// Where the pixels behind a texture key come from.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    File { key: Arc<str>, path: PathBuf },
    Solid { key: Arc<str>, rgba: [u8; 4] },
}

impl TextureSource {
    pub fn key(&self) -> &Arc<str> {
        match self {
            TextureSource::File { key, .. } | TextureSource::Solid { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpriteSet {
    pub player: AnimationTable,
    pub player_size: Vec2,
    pub platform: SpriteFrame,
    pub finish_platform: SpriteFrame,
    pub enemy: SpriteFrame,
    pub finish: SpriteFrame,
    sources: Vec<TextureSource>,
}

impl SpriteSet {
    /// Flat-colour stand-ins, one solid texture per entity kind.
    pub fn placeholder(player_size: Vec2) -> Self {
        let solid = |key: &str, rgba: [u8; 4]| TextureSource::Solid {
            key: Arc::from(key),
            rgba,
        };
        let sources = vec![
            solid("__player", [80, 160, 255, 255]),
            solid("__platform", [110, 110, 120, 255]),
            solid("__finish_platform", [200, 170, 60, 255]),
            solid("__enemy", [220, 60, 60, 255]),
            solid("__finish", [80, 220, 120, 255]),
        ];
        let frame = |index: usize| SpriteFrame::whole(sources[index].key().clone());

        Self {
            player: AnimationTable::uniform(frame(0)),
            player_size,
            platform: frame(1),
            finish_platform: frame(2),
            enemy: frame(3),
            finish: frame(4),
            sources,
        }
    }

    /// Every texture the set draws with, deduplicated by key.
    pub fn texture_sources(&self) -> &[TextureSource] {
        &self.sources
    }
}

pub fn load_sprites_from_path(manifest_path: &Path) -> Result<SpriteSet, String> {
    let raw = fs::read_to_string(manifest_path).map_err(|e| {
        format!(
            "Failed to read sprite manifest {}: {e}",
            manifest_path.display()
        )
    })?;
    let manifest: SpriteManifest = serde_json::from_str(&raw).map_err(|e| {
        format!(
            "Failed to parse sprite manifest {}: {e}",
            manifest_path.display()
        )
    })?;
    validate_manifest(&manifest)?;
    let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    build_sprite_set(&manifest, base_dir)
}

fn validate_manifest(manifest: &SpriteManifest) -> Result<(), String> {
    if manifest.version != SUPPORTED_VERSION {
        return Err(format!(
            "Sprite manifest validation failed: unsupported version '{}'",
            manifest.version
        ));
    }
    let [w, h] = manifest.player.size;
    if !(w > 0.0 && h > 0.0) {
        return Err("Sprite manifest validation failed: player size must be > 0".to_string());
    }

    for state in PlayerAnimation::ALL {
        let strip = manifest.player.clips.get(state);
        if strip.path.is_empty() {
            return Err(format!(
                "Sprite manifest validation failed: clip '{}' has an empty path",
                state.label()
            ));
        }
        if strip.frames != state.frame_count() {
            return Err(format!(
                "Sprite manifest validation failed: clip '{}' declares {} frames, expected {}",
                state.label(),
                strip.frames,
                state.frame_count()
            ));
        }
    }

    let images = [
        ("platform", &manifest.platform),
        ("finish_platform", &manifest.finish_platform),
        ("enemy", &manifest.enemy),
        ("finish", &manifest.finish),
    ];
    for (name, image) in images {
        if image.path.is_empty() {
            return Err(format!(
                "Sprite manifest validation failed: '{name}' has an empty path"
            ));
        }
    }
    Ok(())
}

fn build_sprite_set(manifest: &SpriteManifest, base_dir: &Path) -> Result<SpriteSet, String> {
    let mut sources = Vec::new();
    let mut seen = HashSet::new();
    let mut register = |relative: &str| -> Arc<str> {
        let path = base_dir.join(relative);
        let key: Arc<str> = Arc::from(path.to_string_lossy().as_ref());
        if seen.insert(key.clone()) {
            sources.push(TextureSource::File {
                key: key.clone(),
                path,
            });
        }
        key
    };

    let clips = PlayerAnimation::ALL.map(|state| {
        let strip = manifest.player.clips.get(state);
        let texture = register(&strip.path);
        strip_frames(&texture, strip.frames)
    });
    let platform = SpriteFrame::whole(register(&manifest.platform.path));
    let finish_platform = SpriteFrame::whole(register(&manifest.finish_platform.path));
    let enemy = SpriteFrame::whole(register(&manifest.enemy.path));
    let finish = SpriteFrame::whole(register(&manifest.finish.path));

    let [w, h] = manifest.player.size;
    Ok(SpriteSet {
        player: AnimationTable::new(clips)?,
        player_size: Vec2::new(w, h),
        platform,
        finish_platform,
        enemy,
        finish,
        sources,
    })
}

/// Split a horizontal strip into `frames` equal-width regions.
fn strip_frames(texture: &Arc<str>, frames: usize) -> Vec<SpriteFrame> {
    let step = 1.0 / frames.max(1) as f32;
    (0..frames)
        .map(|i| SpriteFrame {
            texture: texture.clone(),
            uv: [i as f32 * step, 0.0, (i + 1) as f32 * step, 1.0],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "ledge_sprites_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn manifest_json(run_frames: usize) -> String {
        format!(
            r#"
            {{
              "version": "0.1",
              "player": {{
                "size": [64, 64],
                "clips": {{
                  "idle": {{ "path": "player/idle.png", "frames": 9 }},
                  "run": {{ "path": "player/run.png", "frames": {run_frames} }},
                  "jump_start": {{ "path": "player/jump_start.png", "frames": 1 }},
                  "jump": {{ "path": "player/jump.png", "frames": 7 }},
                  "jump_end": {{ "path": "player/jump_end.png", "frames": 2 }}
                }}
              }},
              "platform": {{ "path": "tiles/platform.png" }},
              "finish_platform": {{ "path": "tiles/finish.png" }},
              "enemy": {{ "path": "enemy.png" }},
              "finish": {{ "path": "tiles/finish.png" }}
            }}
            "#
        )
    }

    #[test]
    fn loads_manifest_and_slices_strips() {
        let path = temp_file_path("valid");
        fs::write(&path, manifest_json(12)).expect("write manifest");
        let set = load_sprites_from_path(&path).expect("manifest should load");

        assert_eq!(set.player_size, Vec2::new(64.0, 64.0));
        let run = set.player.clip(PlayerAnimation::Run);
        assert_eq!(run.len(), 12);
        assert!((run[1].uv[0] - 1.0 / 12.0).abs() < 1e-6);
        assert!((run[11].uv[2] - 1.0).abs() < 1e-6);
        assert!(run[0].texture.ends_with("run.png"));

        // finish.png is shared by two entries but registered once.
        assert_eq!(set.texture_sources().len(), 8);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_wrong_frame_count() {
        let path = temp_file_path("frames");
        fs::write(&path, manifest_json(10)).expect("write manifest");
        let err = load_sprites_from_path(&path).expect_err("run has 10 frames");
        assert!(err.contains("'run' declares 10 frames, expected 12"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_missing_file() {
        let path = temp_file_path("missing");
        let err = load_sprites_from_path(&path).expect_err("no manifest");
        assert!(err.starts_with("Failed to read sprite manifest"));
    }

    #[test]
    fn placeholder_uses_solid_textures() {
        let set = SpriteSet::placeholder(Vec2::new(32.0, 48.0));
        assert_eq!(set.texture_sources().len(), 5);
        assert!(set
            .texture_sources()
            .iter()
            .all(|s| matches!(s, TextureSource::Solid { .. })));
        assert_eq!(&*set.enemy.texture, "__enemy");
        assert_eq!(set.player.clip(PlayerAnimation::Idle).len(), 9);
    }

    #[test]
    fn flipped_uv_swaps_horizontal_coordinates() {
        let frame = SpriteFrame {
            texture: Arc::from("t"),
            uv: [0.25, 0.0, 0.5, 1.0],
        };
        assert_eq!(frame.flipped_uv(), [0.5, 0.0, 0.25, 1.0]);
    }
}
