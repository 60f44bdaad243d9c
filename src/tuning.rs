//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a run can be retuned from a
//! JSON file without recompiling. Missing fields fall back to the defaults in
//! [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::EntityKind;

/// Viewport size in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

/// Relative spawn weight per entity kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeights {
    pub bamboo: u32,
    pub pie: u32,
    pub cake: u32,
    pub onion: u32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            bamboo: 2,
            pie: 1,
            cake: 1,
            onion: 1,
        }
    }
}

impl SpawnWeights {
    /// Weighted table in a stable order
    pub fn table(&self) -> [(EntityKind, u32); 4] {
        [
            (EntityKind::Bamboo, self.bamboo),
            (EntityKind::Pie, self.pie),
            (EntityKind::Cake, self.cake),
            (EntityKind::Onion, self.onion),
        ]
    }
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub viewport: Viewport,

    // === Run ===
    pub base_speed: f32,
    pub start_time: f32,
    pub score_rate: f32,

    // === Runner ===
    pub gravity: f32,
    pub jump_impulse: f32,
    pub short_hop_damping: f32,
    pub runner_x: f32,
    pub runner_start_y: f32,
    pub runner_half_width: f32,
    pub runner_half_height: f32,

    // === Terrain ===
    pub ground_baseline: f32,
    /// Width reported by the presentation layer for the ground sprite
    /// (None = not measurable, use `default_segment_width`)
    pub measured_segment_width: Option<f32>,
    pub default_segment_width: f32,
    pub segment_height: f32,
    pub gap_chance: f32,
    pub gap_sizes: Vec<f32>,

    // === Spawning ===
    pub spawn_interval: f32,
    pub spawn_weights: SpawnWeights,
    pub obstacle_offset: f32,
    pub obstacle_scale: f32,
    pub pickup_offset: f32,
    pub pickup_scale: f32,
    pub float_chance: f32,
    pub float_lift: f32,

    // === Animation ===
    pub anim_frequency: f32,
    pub pulse_amplitude: f32,
    pub bob_amplitude: f32,
    pub swing_degrees: f32,

    // === Effects ===
    pub effect_duration: f32,
    pub fast_multiplier: f32,
    pub slow_multiplier: f32,
    pub pie_bonus: f32,
    pub bamboo_penalty: f32,
    pub penalty_flash: f32,
    pub parallax_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),

            base_speed: BASE_SPEED,
            start_time: START_TIME,
            score_rate: SCORE_RATE,

            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            short_hop_damping: SHORT_HOP_DAMPING,
            runner_x: RUNNER_X,
            runner_start_y: RUNNER_START_Y,
            runner_half_width: RUNNER_HALF_WIDTH,
            runner_half_height: RUNNER_HALF_HEIGHT,

            ground_baseline: GROUND_BASELINE,
            measured_segment_width: None,
            default_segment_width: DEFAULT_SEGMENT_WIDTH,
            segment_height: DEFAULT_SEGMENT_HEIGHT,
            gap_chance: GAP_CHANCE,
            gap_sizes: GAP_SIZES.to_vec(),

            spawn_interval: SPAWN_INTERVAL,
            spawn_weights: SpawnWeights::default(),
            obstacle_offset: OBSTACLE_OFFSET,
            obstacle_scale: OBSTACLE_SCALE,
            pickup_offset: PICKUP_OFFSET,
            pickup_scale: PICKUP_SCALE,
            float_chance: FLOAT_CHANCE,
            float_lift: FLOAT_LIFT,

            anim_frequency: ANIM_FREQUENCY,
            pulse_amplitude: PULSE_AMPLITUDE,
            bob_amplitude: BOB_AMPLITUDE,
            swing_degrees: SWING_DEGREES,

            effect_duration: EFFECT_DURATION,
            fast_multiplier: FAST_MULTIPLIER,
            slow_multiplier: SLOW_MULTIPLIER,
            pie_bonus: PIE_BONUS,
            bamboo_penalty: BAMBOO_PENALTY,
            penalty_flash: PENALTY_FLASH,
            parallax_factor: PARALLAX_FACTOR,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (partial documents are fine)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Replace values that would stall or break the simulation with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        // Run pacing: speed, score and time must keep their sign
        positive_or(&mut self.base_speed, defaults.base_speed);
        positive_or(&mut self.score_rate, defaults.score_rate);
        positive_or(&mut self.fast_multiplier, defaults.fast_multiplier);
        positive_or(&mut self.slow_multiplier, defaults.slow_multiplier);
        positive_or(&mut self.start_time, defaults.start_time);
        positive_or(&mut self.effect_duration, defaults.effect_duration);
        non_negative_or(&mut self.pie_bonus, defaults.pie_bonus);
        non_negative_or(&mut self.bamboo_penalty, defaults.bamboo_penalty);
        non_negative_or(&mut self.penalty_flash, defaults.penalty_flash);

        // Terrain
        if !is_positive(self.default_segment_width) {
            self.default_segment_width = defaults.default_segment_width;
        }
        self.default_segment_width = self
            .default_segment_width
            .clamp(MIN_SEGMENT_WIDTH, MAX_VIEWPORT_EXTENT);
        if self
            .measured_segment_width
            .is_some_and(|w| !(MIN_SEGMENT_WIDTH..=MAX_VIEWPORT_EXTENT).contains(&w))
        {
            self.measured_segment_width = None;
        }
        self.gap_sizes.retain(|g| g.is_finite() && *g >= 0.0);
        if self.gap_sizes.is_empty() {
            self.gap_sizes = defaults.gap_sizes;
        }
        self.gap_chance = unit_or(self.gap_chance, defaults.gap_chance);

        // Spawning
        self.float_chance = unit_or(self.float_chance, defaults.float_chance);
        if !is_positive(self.spawn_interval) {
            self.spawn_interval = defaults.spawn_interval;
        }
        self.spawn_interval = self.spawn_interval.max(MAX_FRAME_DT);
        let weights = &mut self.spawn_weights;
        for w in [
            &mut weights.bamboo,
            &mut weights.pie,
            &mut weights.cake,
            &mut weights.onion,
        ] {
            *w = (*w).min(MAX_SPAWN_WEIGHT);
        }
        if self.spawn_weights.table().iter().all(|(_, w)| *w == 0) {
            self.spawn_weights = defaults.spawn_weights;
        }

        if !is_positive(self.viewport.width) || !is_positive(self.viewport.height) {
            self.viewport = defaults.viewport;
        }
        self.viewport.width = self.viewport.width.min(MAX_VIEWPORT_EXTENT);
        self.viewport.height = self.viewport.height.min(MAX_VIEWPORT_EXTENT);
        self
    }

    /// Segment width used for placement and gap arithmetic
    pub fn segment_width(&self) -> f32 {
        self.measured_segment_width
            .filter(|w| *w > 0.0)
            .unwrap_or(self.default_segment_width)
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning in {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save tuning as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Failed to save tuning to {}: {}", path.display(), e);
                } else {
                    log::info!("Tuning saved to {}", path.display());
                }
            }
            Err(e) => log::warn!("Failed to encode tuning: {}", e),
        }
    }
}

fn is_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn positive_or(v: &mut f32, fallback: f32) {
    if !is_positive(*v) {
        *v = fallback;
    }
}

fn non_negative_or(v: &mut f32, fallback: f32) {
    if !(v.is_finite() && *v >= 0.0) {
        *v = fallback;
    }
}

/// Clamp a probability to [0, 1]; NaN takes the fallback
fn unit_or(p: f32, fallback: f32) -> f32 {
    if p.is_nan() { fallback } else { p.clamp(0.0, 1.0) }
}
