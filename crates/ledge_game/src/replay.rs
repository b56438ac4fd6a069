use crate::controller::PlayerInput;
use crate::session::{GameEvent, GameSession};
use ledge_core::time::Tick;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    /// Simulated clock advance per tick, for the Lost reset timer.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub move_x: f32,
    #[serde(default)]
    pub jump_pressed: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<PlayerInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(PlayerInput {
                    move_x: frame.move_x.clamp(-1.0, 1.0),
                    jump_pressed: frame.jump_pressed,
                });
            }
        }
        out
    }

    /// Feed every tick into `session` at fixed tick scale; returns all events in order.
    pub fn play(&self, session: &mut GameSession) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for (n, input) in self.expanded_inputs().into_iter().enumerate() {
            events.extend(session.update(input, n as u64 * self.frame_ms, Tick::FIXED));
        }
        events
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.frame_ms == 0 {
        return Err("Replay validation failed: frame_ms must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_frame_ms() -> u64 {
    16
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelGrid;
    use crate::session::{Phase, SessionConfig};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "ledge_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn load(name_hint: &str, json: &str) -> ReplaySequence {
        let path = temp_file_path(name_hint);
        fs::write(&path, json).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");
        let _ = fs::remove_file(path);
        replay
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let replay = load(
            "parse",
            r#"{
              "frames": [
                { "move_x": 1.0, "repeat": 3 },
                { "jump_pressed": true, "repeat": 1 }
              ]
            }"#,
        );
        assert_eq!(replay.frame_ms, 16);
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 4);
        assert!(expanded[3].jump_pressed);
        assert_eq!(expanded[0].move_x, 1.0);
    }

    #[test]
    fn replay_rejects_empty_frames() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn builtin_level_replay_is_deterministic() {
        let replay = load(
            "deterministic",
            r#"{
              "frames": [
                { "repeat": 40 },
                { "move_x": 1.0, "repeat": 60 },
                { "move_x": 1.0, "jump_pressed": true },
                { "move_x": 1.0, "repeat": 120 },
                { "move_x": -1.0, "repeat": 45 },
                { "jump_pressed": true },
                { "repeat": 30 }
              ]
            }"#,
        );

        let mut run_a = GameSession::new(LevelGrid::builtin(), SessionConfig::default());
        let mut run_b = GameSession::new(LevelGrid::builtin(), SessionConfig::default());
        let events_a = replay.play(&mut run_a);
        let events_b = replay.play(&mut run_b);

        assert_eq!(events_a, events_b);
        assert_eq!(run_a.phase(), run_b.phase());
        assert_eq!(run_a.world(), run_b.world());
        assert_eq!(run_a.camera(), run_b.camera());
    }

    #[test]
    fn walking_into_enemy_loses_then_resets() {
        let replay = load(
            "enemy",
            r#"{
              "frame_ms": 50,
              "frames": [
                { "move_x": 1.0, "repeat": 60 },
                { "repeat": 50 }
              ]
            }"#,
        );
        let rows = ["          ", " P        ", "[====E===]"];
        let mut session = GameSession::new(LevelGrid::from_rows(&rows), SessionConfig::default());
        let events = replay.play(&mut session);

        let defeated = events
            .iter()
            .position(|e| *e == GameEvent::PlayerDefeated)
            .expect("player should hit the enemy");
        let reset = events
            .iter()
            .position(|e| *e == GameEvent::LevelReset)
            .expect("level should reset after the delay");
        assert!(reset > defeated);
        assert!(!events.contains(&GameEvent::LevelComplete));
        assert_eq!(session.phase(), Phase::Playing);
    }
}
