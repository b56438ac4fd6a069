//! Game session: owns the live level and drives one tick of gameplay.
//!
//! Per tick while playing: enemies and finish targets advance their phase,
//! input sets the player's velocity, the resolver moves the player and reports
//! win or defeat, the animator picks the player's frame, and the camera snaps
//! to the player. Won and Lost freeze the world. Lost recovers by itself after
//! `lost_reset_delay_ms` with a full rebuild from the level grid.

use ledge_core::time::Tick;
use ledge_render::Camera2D;
use serde::Deserialize;

use crate::collision::{resolve_step, LevelBounds, StepOutcome};
use crate::controller::{PhysicsConfig, Player, PlayerInput};
use crate::entities::{Enemy, FinishTarget, MotionConfig, Platform};
use crate::level::{parse_level, LevelDiagnostic, LevelGrid, LevelMetrics};

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub viewport: ViewportConfig,
    pub metrics: LevelMetrics,
    pub physics: PhysicsConfig,
    pub motion: MotionConfig,
    /// How long the Lost phase lasts before the level is rebuilt.
    pub lost_reset_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            metrics: LevelMetrics::default(),
            physics: PhysicsConfig::default(),
            motion: MotionConfig::default(),
            lost_reset_delay_ms: 2000,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err("Session config validation failed: viewport must be > 0".to_string());
        }
        self.metrics.validate()?;

        let physics = &self.physics;
        if !(physics.move_speed > 0.0 && physics.jump_speed > 0.0 && physics.gravity > 0.0) {
            return Err(
                "Session config validation failed: move_speed, jump_speed and gravity must be > 0"
                    .to_string(),
            );
        }

        let motion = &self.motion;
        let increments = [
            ("player_frame_increment", motion.player_frame_increment),
            ("enemy_phase_increment", motion.enemy_phase_increment),
            ("finish_phase_increment", motion.finish_phase_increment),
            ("enemy_amplitude", motion.enemy_amplitude),
        ];
        for (name, value) in increments {
            if value < 0.0 || !value.is_finite() {
                return Err(format!(
                    "Session config validation failed: {name} must be >= 0"
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Won,
    Lost { at_ms: u64 },
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Playing => "playing",
            Phase::Won => "won",
            Phase::Lost { .. } => "lost",
        }
    }
}

/// Things that happened during a tick, for logging and an audio backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    LevelComplete,
    PlayerDefeated,
    LevelReset,
}

/// Live entities built from one parse of the level grid.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub platforms: Vec<Platform>,
    pub finish_targets: Vec<FinishTarget>,
    pub enemies: Vec<Enemy>,
    pub player: Player,
    pub bounds: LevelBounds,
    pub diagnostics: Vec<LevelDiagnostic>,
}

impl World {
    pub fn spawn(grid: &LevelGrid, config: &SessionConfig) -> Self {
        let layout = parse_level(grid, &config.metrics);
        let spawn = layout.spawn_or_center(&config.metrics);
        Self {
            finish_targets: layout
                .finish_targets
                .iter()
                .map(|rect| FinishTarget::new(*rect))
                .collect(),
            enemies: layout
                .enemies
                .iter()
                .map(|rect| Enemy::new(*rect, config.motion.enemy_amplitude))
                .collect(),
            platforms: layout.platforms,
            player: Player::spawn(spawn),
            bounds: layout.bounds,
            diagnostics: layout.diagnostics,
        }
    }
}

pub struct GameSession {
    config: SessionConfig,
    grid: LevelGrid,
    world: World,
    camera: Camera2D,
    phase: Phase,
}

impl GameSession {
    pub fn new(grid: LevelGrid, config: SessionConfig) -> Self {
        let world = World::spawn(&grid, &config);
        let camera = Self::camera_for(&world, &config);
        log::info!(
            "Level ready: {} platforms, {} enemies, {} finish targets, {}x{} px",
            world.platforms.len(),
            world.enemies.len(),
            world.finish_targets.len(),
            world.bounds.width,
            world.bounds.height
        );
        Self {
            config,
            grid,
            world,
            camera,
            phase: Phase::Playing,
        }
    }

    fn camera_for(world: &World, config: &SessionConfig) -> Camera2D {
        let mut camera = Camera2D::new(config.viewport.width, config.viewport.height);
        camera.follow(world.player.body.rect.center(), world.bounds.size());
        camera
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn grid(&self) -> &LevelGrid {
        &self.grid
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Overlay text for the current phase.
    pub fn banner(&self) -> Option<&'static str> {
        match self.phase {
            Phase::Playing => None,
            Phase::Won => Some("Level complete!"),
            Phase::Lost { .. } => Some("Defeated! Restarting..."),
        }
    }

    /// Advance one tick. `now_ms` is a monotonic timestamp used for the
    /// Lost reset delay.
    pub fn update(&mut self, input: PlayerInput, now_ms: u64, tick: Tick) -> Vec<GameEvent> {
        let mut events = Vec::new();
        match self.phase {
            Phase::Playing => self.step_playing(input, now_ms, tick, &mut events),
            Phase::Won => {}
            Phase::Lost { at_ms } => {
                if now_ms.saturating_sub(at_ms) >= self.config.lost_reset_delay_ms {
                    self.reset();
                    events.push(GameEvent::LevelReset);
                }
            }
        }
        events
    }

    fn step_playing(
        &mut self,
        input: PlayerInput,
        now_ms: u64,
        tick: Tick,
        events: &mut Vec<GameEvent>,
    ) {
        let motion = self.config.motion;
        for enemy in &mut self.world.enemies {
            enemy.update(&motion, tick);
        }
        for target in &mut self.world.finish_targets {
            target.update(&motion, tick);
        }

        let player = &mut self.world.player;
        if player.apply_input(input, &self.config.physics) {
            log::debug!("Jump at ({:.1}, {:.1})", player.body.rect.x, player.body.rect.y);
            events.push(GameEvent::Jumped);
        }

        let outcome = resolve_step(
            &mut player.body,
            &self.world.platforms,
            &self.world.finish_targets,
            &self.world.enemies,
            self.world.bounds,
            self.config.physics.gravity,
            tick,
        );

        player.animator.update(
            player.body.on_ground,
            player.body.velocity_x,
            tick.apply(motion.player_frame_increment),
        );
        self.camera
            .follow(player.body.rect.center(), self.world.bounds.size());

        match outcome {
            StepOutcome::Continue => {}
            StepOutcome::Win => {
                log::info!("Level complete");
                self.phase = Phase::Won;
                events.push(GameEvent::LevelComplete);
            }
            StepOutcome::Defeated => {
                log::info!(
                    "Player defeated, resetting in {} ms",
                    self.config.lost_reset_delay_ms
                );
                self.phase = Phase::Lost { at_ms: now_ms };
                events.push(GameEvent::PlayerDefeated);
            }
        }
    }

    /// Full rebuild from the level grid: fresh entities, camera and phase.
    pub fn restart(&mut self) {
        self.reset();
    }

    /// Replace the level grid and rebuild.
    pub fn load_level(&mut self, grid: LevelGrid) {
        self.grid = grid;
        self.reset();
    }

    fn reset(&mut self) {
        self.world = World::spawn(&self.grid, &self.config);
        self.camera = Self::camera_for(&self.world, &self.config);
        self.phase = Phase::Playing;
        log::info!("Level reset");
    }
}
