//! Panda Runner - A side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, spawning, runner, run controller)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Local leaderboard of finished runs
//!
//! Rendering, audio and input devices live outside this crate. The presentation
//! layer feeds a [`sim::RunInput`] and a frame delta into [`sim::tick`] (or
//! [`sim::advance_frame`] when it has no physics engine of its own) and drains
//! [`sim::RunEvent`]s for feedback.

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Largest frame delta the simulation accepts (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;
    /// Largest viewport side a tuning file may ask for
    pub const MAX_VIEWPORT_EXTENT: f32 = 16384.0;

    /// World scroll speed with no status effect (units/s)
    pub const BASE_SPEED: f32 = 400.0;
    /// Countdown at the start of a run (seconds)
    pub const START_TIME: f32 = 30.0;
    /// Score units earned per unit of scrolled distance
    pub const SCORE_RATE: f32 = 0.05;

    /// Runner physics
    pub const GRAVITY: f32 = 1600.0;
    pub const JUMP_IMPULSE: f32 = 800.0;
    /// Fraction of upward velocity kept when jump is released early
    pub const SHORT_HOP_DAMPING: f32 = 0.5;
    pub const RUNNER_X: f32 = 200.0;
    pub const RUNNER_START_Y: f32 = VIEWPORT_HEIGHT - 150.0;
    pub const RUNNER_HALF_WIDTH: f32 = 36.0;
    pub const RUNNER_HALF_HEIGHT: f32 = 40.0;

    /// Ground segments are anchored bottom-left on this baseline
    pub const GROUND_BASELINE: f32 = VIEWPORT_HEIGHT - 40.0;
    pub const DEFAULT_SEGMENT_WIDTH: f32 = 200.0;
    /// Narrowest segment that still advances placement at far-right positions
    pub const MIN_SEGMENT_WIDTH: f32 = 1.0;
    pub const DEFAULT_SEGMENT_HEIGHT: f32 = 40.0;
    pub const GAP_CHANCE: f32 = 0.2;
    /// Gap sizes in segment widths
    pub const GAP_SIZES: [f32; 3] = [1.0, 1.5, 2.0];

    /// Entity spawning
    pub const SPAWN_INTERVAL: f32 = 1.5;
    /// Per-kind cap so the weight table total fits comfortably in a u32
    pub const MAX_SPAWN_WEIGHT: u32 = 1_000_000;
    pub const OBSTACLE_OFFSET: f32 = 120.0;
    pub const OBSTACLE_SCALE: f32 = 0.15;
    pub const PICKUP_OFFSET: f32 = 100.0;
    pub const PICKUP_SCALE: f32 = 0.12;
    pub const FLOAT_CHANCE: f32 = 0.5;
    pub const FLOAT_LIFT: f32 = 100.0;
    /// Collision half-extents at scale 1.0 (sprite size proxy)
    pub const OBSTACLE_HALF_EXTENT: f32 = 160.0;
    pub const PICKUP_HALF_EXTENT: f32 = 200.0;

    /// Animation (shared angular frequency, rad/s)
    pub const ANIM_FREQUENCY: f32 = 5.0;
    pub const PULSE_AMPLITUDE: f32 = 0.05;
    pub const BOB_AMPLITUDE: f32 = 10.0;
    pub const SWING_DEGREES: f32 = 15.0;

    /// Status effects
    pub const EFFECT_DURATION: f32 = 5.0;
    pub const FAST_MULTIPLIER: f32 = 1.2;
    pub const SLOW_MULTIPLIER: f32 = 0.8;
    pub const PIE_BONUS: f32 = 10.0;
    pub const BAMBOO_PENALTY: f32 = 5.0;
    pub const PENALTY_FLASH: f32 = 0.2;

    /// Screen shake intensities
    pub const SHAKE_PIE: f32 = 5.0;
    pub const SHAKE_BAMBOO: f32 = 20.0;
    pub const SHAKE_FALL: f32 = 20.0;

    /// Background scrolls at this fraction of world speed
    pub const PARALLAX_FACTOR: f32 = 0.2;
}

/// Timer value as shown on the HUD (ceiling, never negative)
#[inline]
pub fn display_time(time_remaining: f32) -> u32 {
    time_remaining.max(0.0).ceil() as u32
}

/// Score value as shown on the HUD (truncated)
#[inline]
pub fn display_score(score: f32) -> u64 {
    score.max(0.0).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_time_rounds_up() {
        assert_eq!(display_time(29.01), 30);
        assert_eq!(display_time(30.0), 30);
        assert_eq!(display_time(0.2), 1);
        assert_eq!(display_time(-3.0), 0);
    }

    #[test]
    fn test_display_score_truncates() {
        assert_eq!(display_score(12.99), 12);
        assert_eq!(display_score(0.0), 0);
    }
}
