//! Ledge -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All simulation
//! runs inside `RedrawRequested` using a **fixed-timestep** model (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- one `GameSession::update` per fixed slice
//!   3. Rebuild the sprite mesh from the session's draw list
//!   4. Upload camera uniform, issue draw calls, composite egui overlay
//!
//! Hot reload: when the config names a level file it is watched via mtime
//! polling and reloaded at frame boundaries (between fixed steps). `R` forces
//! a reload, or a plain restart when the built-in level is in use.

mod animation;
mod collision;
mod config;
mod controller;
mod entities;
mod level;
mod render;
#[cfg(test)]
mod replay;
mod session;
mod sprites;
mod watch;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use config::{load_config_from_path, GameConfig, DEFAULT_CONFIG_PATH};
use controller::PlayerInput;
use ledge_core::input::{InputState, Key};
use ledge_core::time::TimeState;
use ledge_devtools::{DebugOverlay, OverlayStats};
use ledge_render::{quad_indices, GpuContext, SpritePipeline, SpriteVertex, Texture};
use level::{load_level_from_path, parse_level, validate_level_grammar, LevelGrid, LevelMetrics};
use render::{build_draw_list, SpriteDraw};
use session::{GameEvent, GameSession};
use sprites::{load_sprites_from_path, SpriteSet, TextureSource};
use watch::FileWatcher;

/// A contiguous run of indices that share the same texture binding.
/// Draw calls are merged when consecutive quads use the same texture,
/// minimizing GPU bind-group switches during the render pass.
#[derive(Debug, Clone)]
struct DrawCall {
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
}

struct GpuSpriteTexture {
    #[allow(dead_code)] // owns the GPU texture the bind group samples
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// All mutable engine state lives here. Constructed lazily in `ApplicationHandler::resumed`
/// once the window and GPU surface are available.
///
/// Ownership is split into three conceptual groups:
///  - **Core systems** (time, input, session) -- updated every frame
///  - **Content** (level file, sprites, textures) -- loaded from disk, level is hot-reloadable
///  - **GPU resources** (vertex/index/camera buffers, draw calls) -- rebuilt every simulated frame
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    sprite_pipeline: SpritePipeline,
    debug_overlay: DebugOverlay,
    session: GameSession,

    // --- Content ----------------------------------------------------------------
    level_path: Option<PathBuf>,
    level_watcher: Option<FileWatcher>,
    strict_level_grammar: bool,
    sprites: SpriteSet,
    textures: HashMap<Arc<str>, GpuSpriteTexture>,
    paused: bool,
    single_step_requested: bool,

    // --- Per-frame GPU mesh state -----------------------------------------------
    // The sprite mesh is rebuilt on the CPU each frame, then streamed into these
    // GPU buffers. Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_calls: Vec<DrawCall>,
    sprite_count: usize,
}

impl EngineState {
    fn new(window: Arc<Window>, config: &GameConfig) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let time = TimeState::new();
        let input = InputState::new();
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);

        let metrics = config.session.metrics;
        let level_path = config.level_path.clone();
        let grid = load_level_grid(
            level_path.as_deref(),
            &metrics,
            config.strict_level_grammar,
        )?;
        let level_watcher = level_path.clone().map(FileWatcher::new);

        let sprites = match &config.sprites_path {
            Some(path) => {
                let sprites = load_sprites_from_path(path)?;
                log::info!("Sprite manifest loaded: {}", path.display());
                sprites
            }
            None => {
                log::info!("No sprite manifest configured, drawing placeholder sprites");
                SpriteSet::placeholder(Vec2::new(metrics.player_width, metrics.player_height))
            }
        };
        let textures = upload_textures(&gpu.device, &gpu.queue, &sprite_pipeline, &sprites)?;

        let session = GameSession::new(grid, config.session);

        let camera_uniform = session.camera().build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let mut state = Self {
            window,
            gpu,
            time,
            input,
            sprite_pipeline,
            debug_overlay,
            session,
            level_path,
            level_watcher,
            strict_level_grammar: config.strict_level_grammar,
            sprites,
            textures,
            paused: false,
            single_step_requested: false,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            draw_calls: Vec::new(),
            sprite_count: 0,
        };

        state.ensure_mesh_capacity(4, 6);
        state.rebuild_mesh();
        Ok(state)
    }

    fn reload_level(&mut self, reason: &str) {
        let Some(path) = self.level_path.clone() else {
            self.session.restart();
            log::info!("Level restarted ({reason})");
            return;
        };
        let metrics = self.session.config().metrics;
        match load_level_grid(Some(path.as_path()), &metrics, self.strict_level_grammar) {
            Ok(grid) => {
                self.session.load_level(grid);
                log::info!(
                    "Level reloaded ({reason}): {} ({} rows)",
                    path.display(),
                    self.session.grid().height_rows()
                );
            }
            Err(err) => {
                log::error!("Level reload failed ({reason}): {err}");
            }
        }
    }

    fn rebuild_mesh(&mut self) {
        let draws = build_draw_list(&self.session, &self.sprites);
        let (vertices, indices, draw_calls) = build_mesh(&draws);
        self.ensure_mesh_capacity(vertices.len(), indices.len());
        self.sprite_count = draws.len();
        self.draw_calls = draw_calls;

        if !vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        if !indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }
        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    fn overlay_stats(&self) -> OverlayStats {
        let world = self.session.world();
        let player = &world.player;
        OverlayStats {
            phase_label: self.session.phase().label().to_string(),
            animation_label: player.animator.state.label().to_string(),
            animation_frame: player.animator.frame_index(),
            player_position: (player.body.rect.x, player.body.rect.y),
            player_velocity: (player.body.velocity_x, player.body.velocity_y),
            on_ground: player.body.on_ground,
            platform_count: world.platforms.len() as u32,
            enemy_count: world.enemies.len() as u32,
            level_warnings: world.diagnostics.len() as u32,
            draw_calls: self.draw_calls.len() as u32,
            sprite_count: self.sprite_count as u32,
            paused: self.paused,
        }
    }
}

struct App {
    config: GameConfig,
    state: Option<EngineState>,
    startup_failed: bool,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
            startup_failed: false,
        }
    }

    fn fail_startup(&mut self, event_loop: &ActiveEventLoop, err: &str) {
        log::error!("Startup failed: {err}");
        self.startup_failed = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.startup_failed {
            return;
        }
        let platform_config = self.config.window.platform_config();
        let window = match ledge_platform::window::create_window(event_loop, &platform_config) {
            Ok(window) => window,
            Err(err) => {
                self.fail_startup(event_loop, &err);
                return;
            }
        };
        match EngineState::new(window, &self.config) {
            Ok(state) => self.state = Some(state),
            Err(err) => self.fail_startup(event_loop, &err),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    // The camera keeps its configured viewport; the projection
                    // stretches it over the new surface.
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }
            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                // Fixed-step simulation phase.
                state.time.begin_frame();
                let mut content_changed = false;

                let level_file_changed = state
                    .level_watcher
                    .as_mut()
                    .is_some_and(|watcher| watcher.should_reload());
                if level_file_changed {
                    state.reload_level("file watcher");
                    content_changed = true;
                }

                while state.time.should_step() {
                    if state.input.is_just_pressed(Key::Escape) {
                        log::info!("Escape pressed, exiting.");
                        event_loop.exit();
                        return;
                    }
                    if state.input.is_just_pressed(Key::F3) {
                        state.debug_overlay.toggle();
                    }
                    if state.input.is_just_pressed(Key::R) {
                        state.reload_level("manual trigger (R)");
                        content_changed = true;
                    }

                    let player_input = PlayerInput::from_input(&state.input);
                    // Edge-triggered keys belong to the step that read them.
                    state.input.end_frame();

                    // Skip simulation update when paused (unless single-step requested)
                    if state.paused && !state.single_step_requested {
                        break;
                    }
                    state.single_step_requested = false;

                    let now_ms = state.time.elapsed_ms();
                    let tick = state.time.tick();
                    for event in state.session.update(player_input, now_ms, tick) {
                        log_game_event(event);
                    }
                }

                if content_changed || state.time.steps_this_frame > 0 {
                    state.rebuild_mesh();
                }

                let stats = state.overlay_stats();
                let (egui_primitives, egui_textures_delta, overlay_actions) =
                    state.debug_overlay.prepare(
                        &state.window,
                        &state.time,
                        &stats,
                        state.session.banner(),
                    );

                // Handle overlay button actions
                if overlay_actions.toggle_pause {
                    state.paused = !state.paused;
                    log::info!(
                        "Simulation {}",
                        if state.paused { "PAUSED" } else { "RESUMED" }
                    );
                }
                if overlay_actions.single_step {
                    state.single_step_requested = true;
                }
                if overlay_actions.restart_level {
                    state.session.restart();
                    state.rebuild_mesh();
                }

                // Render phase reads finalized simulation state from this frame.
                let camera_uniform = state.session.camera().build_uniform();
                state.gpu.queue.write_buffer(
                    &state.camera_buffer,
                    0,
                    bytemuck::cast_slice(&[camera_uniform]),
                );

                let Some((output, view)) = state.gpu.begin_frame() else {
                    state.debug_overlay.cleanup(&egui_textures_delta);
                    return;
                };

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render Encoder"),
                        });

                {
                    let mut last_bound_texture_key: Option<&Arc<str>> = None;
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Level Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r: 0.392,
                                    g: 0.584,
                                    b: 0.929,
                                    a: 1.0,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    });
                    render_pass.set_pipeline(&state.sprite_pipeline.render_pipeline);
                    render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(state.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    for draw in &state.draw_calls {
                        let Some(texture) = state.textures.get(&draw.texture_key) else {
                            log::warn!("Skipping draw with unknown texture '{}'", draw.texture_key);
                            continue;
                        };
                        let need_rebind = match last_bound_texture_key {
                            Some(last) => **last != *draw.texture_key,
                            None => true,
                        };
                        if need_rebind {
                            render_pass.set_bind_group(1, &texture.bind_group, &[]);
                            last_bound_texture_key = Some(&draw.texture_key);
                        }
                        render_pass.draw_indexed(
                            draw.index_start..(draw.index_start + draw.index_count),
                            0,
                            0..1,
                        );
                    }
                }

                state.debug_overlay.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &egui_primitives,
                    &egui_textures_delta,
                    &screen_descriptor,
                );

                {
                    let mut egui_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("egui Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();
                    state
                        .debug_overlay
                        .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
                }

                state.debug_overlay.cleanup(&egui_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();
            }
            _ => {}
        }
    }
}

/// Read the configured level file, or the built-in level when none is set.
/// With `strict`, any grammar diagnostic other than a missing spawn is an error.
fn load_level_grid(
    path: Option<&Path>,
    metrics: &LevelMetrics,
    strict: bool,
) -> Result<LevelGrid, String> {
    let (grid, source) = match path {
        Some(path) => (load_level_from_path(path)?, path.display().to_string()),
        None => (LevelGrid::builtin(), "built-in level".to_string()),
    };
    if strict {
        validate_level_grammar(&parse_level(&grid, metrics))
            .map_err(|e| format!("{source}: {e}"))?;
    }
    log::info!(
        "Level loaded: {} ({}x{} cells)",
        source,
        grid.width_cells(),
        grid.height_rows()
    );
    Ok(grid)
}

fn upload_textures(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &SpritePipeline,
    sprites: &SpriteSet,
) -> Result<HashMap<Arc<str>, GpuSpriteTexture>, String> {
    let mut textures = HashMap::new();
    for source in sprites.texture_sources() {
        let texture = match source {
            TextureSource::File { key, path } => {
                let bytes = std::fs::read(path)
                    .map_err(|e| format!("Failed to read texture {}: {e}", path.display()))?;
                Texture::from_bytes(device, queue, &bytes, key)?
            }
            TextureSource::Solid { key, rgba } => {
                Texture::from_rgba8(device, queue, rgba, 1, 1, key)
            }
        };
        let bind_group = pipeline.create_texture_bind_group(device, &texture);
        textures.insert(
            source.key().clone(),
            GpuSpriteTexture {
                texture,
                bind_group,
            },
        );
    }
    Ok(textures)
}

fn build_mesh(draws: &[SpriteDraw]) -> (Vec<SpriteVertex>, Vec<u32>, Vec<DrawCall>) {
    let mut vertices = Vec::with_capacity(draws.len() * 4);
    let mut indices = Vec::with_capacity(draws.len() * 6);
    let mut draw_calls = Vec::with_capacity(8);
    for draw in draws {
        add_quad(&mut vertices, &mut indices, &mut draw_calls, draw);
    }
    (vertices, indices, draw_calls)
}

fn add_quad(
    vertices: &mut Vec<SpriteVertex>,
    indices: &mut Vec<u32>,
    draw_calls: &mut Vec<DrawCall>,
    draw: &SpriteDraw,
) {
    let base_index = vertices.len() as u32;
    vertices.extend_from_slice(&SpriteVertex::quad(
        draw.dest.x,
        draw.dest.y,
        draw.dest.w,
        draw.dest.h,
        draw.uv,
        draw.tint,
    ));
    let draw_start = indices.len() as u32;
    indices.extend_from_slice(&quad_indices(base_index));
    push_draw_call(draw_calls, draw.texture.clone(), draw_start, 6);
}

/// Append a draw call, merging with the previous one when the texture matches
/// and indices are contiguous. Draws arrive grouped by entity kind, so runs of
/// platform tiles collapse into a single `draw_indexed` call.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if *last.texture_key == *texture_key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key,
        index_start,
        index_count,
    });
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Level Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Level Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn log_game_event(event: GameEvent) {
    match event {
        GameEvent::Jumped => log::debug!("Event: jumped"),
        GameEvent::LevelComplete => log::debug!("Event: level complete"),
        GameEvent::PlayerDefeated => log::debug!("Event: player defeated"),
        GameEvent::LevelReset => log::debug!("Event: level reset"),
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyR => Some(Key::R),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Ledge starting...");

    let config = match load_config_from_path(Path::new(DEFAULT_CONFIG_PATH)) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
        std::process::exit(1);
    }
    if app.startup_failed {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Rect;

    fn draw(texture: &str, x: f32) -> SpriteDraw {
        SpriteDraw {
            texture: Arc::from(texture),
            dest: Rect::new(x, 0.0, 32.0, 16.0),
            uv: [0.0, 0.0, 1.0, 1.0],
            tint: [1.0; 4],
        }
    }

    #[test]
    fn consecutive_draws_with_same_texture_share_a_call() {
        let draws = [
            draw("__platform", 0.0),
            draw("__platform", 32.0),
            draw("__enemy", 64.0),
            draw("__platform", 96.0),
        ];
        let (vertices, indices, calls) = build_mesh(&draws);
        assert_eq!(vertices.len(), 16);
        assert_eq!(indices.len(), 24);
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].index_count, 12);
        assert_eq!(calls[2].index_start, 18);
        assert_eq!(&indices[6..12], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn strict_loading_rejects_bad_grammar() {
        let path = std::env::temp_dir().join(format!(
            "ledge_main_test_strict_{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "P P\n[==\n").expect("write level");
        let metrics = LevelMetrics::default();
        assert!(load_level_grid(Some(path.as_path()), &metrics, true).is_err());
        assert!(load_level_grid(Some(path.as_path()), &metrics, false).is_ok());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn builtin_level_passes_strict_loading() {
        let grid = load_level_grid(None, &LevelMetrics::default(), true)
            .expect("built-in level is well formed");
        assert!(grid.height_rows() > 0);
    }

    #[test]
    fn key_map_covers_controls() {
        assert_eq!(map_key(KeyCode::KeyA), Some(Key::A));
        assert_eq!(map_key(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(map_key(KeyCode::KeyQ), None);
    }
}
