//! Fixed-increment frame sequencing.
//!
//! Sprite animations here do not track durations per frame. Each simulation
//! tick adds a constant increment to an accumulator; whenever it reaches 1.0,
//! one whole unit is subtracted and the frame index moves on. An increment of
//! 0.25 therefore shows every frame for four ticks.
//!
//! What happens at the end of a sequence depends on [`Playback`]: looping
//! sequences wrap, one-shot sequences report [`FrameStep::Completed`] on the
//! tick after their last frame was reached and leave the follow-up to the caller.

/// How a sequence behaves once its last frame is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Looping,
    OneShot,
}

/// Result of one [`FrameCursor::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStep {
    /// Accumulator has not reached a whole frame yet.
    Held,
    /// The frame index moved (or wrapped, for looping sequences).
    Advanced,
    /// A one-shot sequence was already on its last frame.
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameCursor {
    pub frame_index: usize,
    pub accumulator: f32,
}

impl FrameCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.accumulator = 0.0;
    }

    pub fn advance(&mut self, increment: f32, frame_count: usize, playback: Playback) -> FrameStep {
        if frame_count == 0 {
            return FrameStep::Held;
        }

        self.accumulator += increment;
        if self.accumulator < 1.0 {
            return FrameStep::Held;
        }
        self.accumulator -= 1.0;

        match playback {
            Playback::Looping => {
                self.frame_index = (self.frame_index + 1) % frame_count;
                FrameStep::Advanced
            }
            Playback::OneShot => {
                if self.frame_index + 1 < frame_count {
                    self.frame_index += 1;
                    FrameStep::Advanced
                } else {
                    FrameStep::Completed
                }
            }
        }
    }
}
