//! The player character
//!
//! Position and velocity are written by the physics step; this module owns the
//! jump affordance, the horizontal pin and the timed speed effects.
//! Screen coordinates: +y is down, so "up" velocities are negative.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Timed speed effect. At most one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusEffect {
    #[default]
    None,
    Fast,
    Slow,
}

/// Color treatment the presentation layer should apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Normal,
    /// Slowed and crying
    Sad,
    /// Brief flash after hitting an obstacle
    Hurt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerState {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    /// Standing on a ground segment (set by the physics step)
    pub grounded: bool,
    pub speed_multiplier: f32,
    pub effect: StatusEffect,
    /// Seconds until `effect` wears off
    pub effect_remaining: f32,
    pub is_crying: bool,
    /// Seconds left on the hurt flash
    pub penalty_flash: f32,
    pub half_size: Vec2,
    pinned_x: f32,
    fast_multiplier: f32,
    slow_multiplier: f32,
    effect_duration: f32,
}

impl RunnerState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.runner_x, tuning.runner_start_y),
            vel: Vec2::ZERO,
            grounded: false,
            speed_multiplier: 1.0,
            effect: StatusEffect::None,
            effect_remaining: 0.0,
            is_crying: false,
            penalty_flash: 0.0,
            half_size: Vec2::new(tuning.runner_half_width, tuning.runner_half_height),
            pinned_x: tuning.runner_x,
            fast_multiplier: tuning.fast_multiplier,
            slow_multiplier: tuning.slow_multiplier,
            effect_duration: tuning.effect_duration,
        }
    }

    /// Start `effect`, replacing whatever was active and restarting the clock
    pub fn apply_effect(&mut self, effect: StatusEffect) {
        self.effect = effect;
        self.is_crying = effect == StatusEffect::Slow;
        match effect {
            StatusEffect::Fast => {
                self.speed_multiplier = self.fast_multiplier;
                self.effect_remaining = self.effect_duration;
            }
            StatusEffect::Slow => {
                self.speed_multiplier = self.slow_multiplier;
                self.effect_remaining = self.effect_duration;
            }
            StatusEffect::None => {
                self.speed_multiplier = 1.0;
                self.effect_remaining = 0.0;
            }
        }
    }

    /// Count down the active effect and the hurt flash.
    /// Returns true on the tick the effect wears off.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.penalty_flash > 0.0 {
            self.penalty_flash = (self.penalty_flash - dt).max(0.0);
        }

        if self.effect == StatusEffect::None {
            return false;
        }
        self.effect_remaining -= dt;
        if self.effect_remaining <= 0.0 {
            self.apply_effect(StatusEffect::None);
            return true;
        }
        false
    }

    /// Jump if standing on the ground. Returns whether the jump happened.
    pub fn try_jump(&mut self, impulse: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.vel.y = -impulse;
        self.grounded = false;
        true
    }

    /// Cut upward velocity once when the jump button is let go early
    pub fn on_jump_released(&mut self, damping: f32) {
        if self.vel.y < 0.0 {
            self.vel.y *= damping;
        }
    }

    /// Hold the runner at its fixed screen column
    pub fn pin(&mut self) {
        self.pos.x = self.pinned_x;
        self.vel.x = 0.0;
    }

    pub fn flash_penalty(&mut self, duration: f32) {
        self.penalty_flash = duration;
    }

    pub fn tint(&self) -> Tint {
        if self.penalty_flash > 0.0 {
            Tint::Hurt
        } else if self.is_crying {
            Tint::Sad
        } else {
            Tint::Normal
        }
    }
}
