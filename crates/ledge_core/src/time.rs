//! Frame pacing for the main loop.
//!
//! `TimeState` feeds a fixed-step accumulator from wall-clock deltas, so the
//! simulation advances in whole ticks at `fixed_dt` regardless of display rate.
//! Gameplay code never reads `real_dt`: every per-tick increment goes through a
//! [`Tick`], which is `Tick::FIXED` in the shipped loop.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Scale applied to every per-tick simulation increment (gravity, velocity
/// integration, animation accumulators, oscillation phases).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    scale: f32,
}

impl Tick {
    /// One tick at the nominal rate; increments apply unscaled.
    pub const FIXED: Tick = Tick { scale: 1.0 };

    /// Delta-time mode: scale increments by how long the step actually took
    /// relative to the nominal step length.
    pub fn from_elapsed(elapsed_secs: f64, nominal_secs: f64) -> Self {
        if nominal_secs <= 0.0 {
            return Self::FIXED;
        }
        Self {
            scale: (elapsed_secs / nominal_secs) as f32,
        }
    }

    pub fn scale(self) -> f32 {
        self.scale
    }

    pub fn apply(self, increment: f32) -> f32 {
        increment * self.scale
    }
}

impl Default for Tick {
    fn default() -> Self {
        Self::FIXED
    }
}

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    started: Instant,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            fixed_dt: 1.0 / 60.0,
            max_accumulator: 0.25,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            started: now,
            last_instant: now,
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Monotonic milliseconds since this clock was created.
    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.feed(self.real_dt);
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    fn feed(&mut self, dt: f64) {
        self.accumulator += dt;
        self.steps_this_frame = 0;
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// The tick handed to gameplay for each fixed step.
    pub fn tick(&self) -> Tick {
        Tick::FIXED
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_tick_leaves_increments_unscaled() {
        assert_eq!(Tick::FIXED.apply(0.25), 0.25);
        assert_eq!(Tick::default(), Tick::FIXED);
    }

    #[test]
    fn elapsed_tick_scales_relative_to_nominal_step() {
        let tick = Tick::from_elapsed(1.0 / 30.0, 1.0 / 60.0);
        assert!((tick.scale() - 2.0).abs() < 1e-5);
        assert!((tick.apply(0.5) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn elapsed_tick_with_bad_nominal_falls_back_to_fixed() {
        assert_eq!(Tick::from_elapsed(0.016, 0.0), Tick::FIXED);
    }

    #[test]
    fn accumulator_yields_whole_steps() {
        let mut time = TimeState::new();
        time.feed(time.fixed_dt * 2.5);
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert_eq!(time.steps_this_frame, 2);
        assert_eq!(time.fixed_step_count, 2);
    }

    #[test]
    fn elapsed_ms_is_monotonic() {
        let time = TimeState::new();
        let a = time.elapsed_ms();
        let b = time.elapsed_ms();
        assert!(b >= a);
    }
}
