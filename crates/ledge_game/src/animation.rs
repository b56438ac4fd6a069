//! Player animation state machine and the enum-indexed frame table it reads.
//!
//! The state is chosen once per tick after physics has run, from the ground
//! flag, last tick's ground flag and horizontal speed. The two one-shot
//! states (`JumpStart`, `JumpEnd`) play exactly once per take-off and landing;
//! the plain defaults (`Jump`, `Run`, `Idle`) never cut a one-shot short.

use ledge_core::animation::{FrameCursor, FrameStep, Playback};

use crate::sprites::SpriteFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAnimation {
    Idle,
    Run,
    JumpStart,
    Jump,
    JumpEnd,
}

impl PlayerAnimation {
    pub const ALL: [PlayerAnimation; 5] = [
        PlayerAnimation::Idle,
        PlayerAnimation::Run,
        PlayerAnimation::JumpStart,
        PlayerAnimation::Jump,
        PlayerAnimation::JumpEnd,
    ];

    pub fn frame_count(self) -> usize {
        match self {
            PlayerAnimation::Idle => 9,
            PlayerAnimation::Run => 12,
            PlayerAnimation::JumpStart => 1,
            PlayerAnimation::Jump => 7,
            PlayerAnimation::JumpEnd => 2,
        }
    }

    pub fn playback(self) -> Playback {
        match self {
            PlayerAnimation::JumpStart | PlayerAnimation::JumpEnd => Playback::OneShot,
            _ => Playback::Looping,
        }
    }

    /// State entered when a one-shot finishes.
    pub fn follow_up(self) -> PlayerAnimation {
        match self {
            PlayerAnimation::JumpStart => PlayerAnimation::Jump,
            PlayerAnimation::JumpEnd => PlayerAnimation::Idle,
            other => other,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerAnimation::Idle => 0,
            PlayerAnimation::Run => 1,
            PlayerAnimation::JumpStart => 2,
            PlayerAnimation::Jump => 3,
            PlayerAnimation::JumpEnd => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerAnimation::Idle => "idle",
            PlayerAnimation::Run => "run",
            PlayerAnimation::JumpStart => "jump_start",
            PlayerAnimation::Jump => "jump",
            PlayerAnimation::JumpEnd => "jump_end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerAnimator {
    pub state: PlayerAnimation,
    pub cursor: FrameCursor,
    pub was_on_ground: bool,
    pub jump_start_played: bool,
    pub jump_end_played: bool,
}

impl Default for PlayerAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerAnimator {
    pub fn new() -> Self {
        Self {
            state: PlayerAnimation::Idle,
            cursor: FrameCursor::new(),
            was_on_ground: true,
            jump_start_played: false,
            jump_end_played: false,
        }
    }

    pub fn frame_index(&self) -> usize {
        self.cursor.frame_index
    }

    pub fn update(&mut self, on_ground: bool, speed_x: f32, increment: f32) {
        // (state, forced): forced states are the one-shots triggered by a
        // ground contact change and always replace whatever is playing.
        let (target, forced) = if !on_ground {
            if !self.jump_start_played {
                self.jump_start_played = true;
                self.jump_end_played = false;
                (PlayerAnimation::JumpStart, true)
            } else {
                (PlayerAnimation::Jump, false)
            }
        } else {
            self.jump_start_played = false;
            if !self.was_on_ground && !self.jump_end_played {
                self.jump_end_played = true;
                (PlayerAnimation::JumpEnd, true)
            } else if speed_x != 0.0 {
                (PlayerAnimation::Run, false)
            } else {
                (PlayerAnimation::Idle, false)
            }
        };

        let one_shot_playing = self.state.playback() == Playback::OneShot;
        if forced || (!one_shot_playing && target != self.state) {
            self.enter(target);
        }

        let step = self.cursor.advance(
            increment,
            self.state.frame_count(),
            self.state.playback(),
        );
        if step == FrameStep::Completed {
            self.enter(self.state.follow_up());
        }

        self.was_on_ground = on_ground;
    }

    fn enter(&mut self, state: PlayerAnimation) {
        self.state = state;
        self.cursor.reset();
    }
}

/// Frame lists for every player state, fixed at load time.
#[derive(Debug, Clone)]
pub struct AnimationTable {
    clips: [Vec<SpriteFrame>; 5],
}

impl AnimationTable {
    /// `clips` is indexed by [`PlayerAnimation::index`].
    pub fn new(clips: [Vec<SpriteFrame>; 5]) -> Result<Self, String> {
        for state in PlayerAnimation::ALL {
            let found = clips[state.index()].len();
            if found != state.frame_count() {
                return Err(format!(
                    "Animation '{}' has {} frames, expected {}",
                    state.label(),
                    found,
                    state.frame_count()
                ));
            }
        }
        Ok(Self { clips })
    }

    /// Every frame of every state shows the same region.
    pub fn uniform(frame: SpriteFrame) -> Self {
        Self {
            clips: PlayerAnimation::ALL.map(|state| vec![frame.clone(); state.frame_count()]),
        }
    }

    pub fn clip(&self, state: PlayerAnimation) -> &[SpriteFrame] {
        &self.clips[state.index()]
    }

    /// Checked lookup; an out-of-range index falls back to frame 0.
    pub fn frame(&self, state: PlayerAnimation, index: usize) -> &SpriteFrame {
        let clip = self.clip(state);
        match clip.get(index) {
            Some(frame) => frame,
            None => {
                log::warn!(
                    "Animation '{}' frame {} out of range ({} frames), using frame 0",
                    state.label(),
                    index,
                    clip.len()
                );
                &clip[0]
            }
        }
    }
}
