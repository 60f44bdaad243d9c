//! Obstacles and pickups entering from the right edge
//!
//! The spawner fires on a fixed cadence that does not follow game speed;
//! faster scrolling already spreads spawns further apart. Per-kind animation
//! is a plain [`AnimationProfile`] evaluated for the whole arena each frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::consts::{OBSTACLE_HALF_EXTENT, PICKUP_HALF_EXTENT};
use crate::tuning::{SpawnWeights, Tuning};

/// What a spawned entity is (doubles as its collision tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Obstacle: costs time on contact
    Bamboo,
    /// Pickup: adds time
    Pie,
    /// Pickup: speed boost
    Cake,
    /// Pickup: slowdown (runner cries)
    Onion,
}

impl EntityKind {
    pub fn is_obstacle(&self) -> bool {
        matches!(self, EntityKind::Bamboo)
    }

    pub fn is_pickup(&self) -> bool {
        !self.is_obstacle()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Bamboo => "bamboo",
            EntityKind::Pie => "pie",
            EntityKind::Cake => "cake",
            EntityKind::Onion => "onion",
        }
    }

    /// Collision half-extent at scale 1.0
    pub fn half_extent(&self) -> f32 {
        if self.is_obstacle() {
            OBSTACLE_HALF_EXTENT
        } else {
            PICKUP_HALF_EXTENT
        }
    }

    /// Animation used by this kind
    pub fn animation(&self) -> AnimationProfile {
        if self.is_obstacle() {
            AnimationProfile::Pulse
        } else {
            AnimationProfile::BobSwing
        }
    }
}

/// Per-kind idle animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationProfile {
    /// Scale breathes around the base scale
    Pulse,
    /// Vertical bob around the spawn height plus a rotation swing
    BobSwing,
}

/// Amplitudes shared by all animated entities
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnimationParams {
    /// Angular frequency (rad/s)
    pub frequency: f32,
    /// Relative scale amplitude for `Pulse`
    pub pulse: f32,
    /// Vertical amplitude for `BobSwing`
    pub bob: f32,
    /// Rotation amplitude for `BobSwing` (degrees)
    pub swing_degrees: f32,
}

/// An obstacle or pickup in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnedEntity {
    pub id: u32,
    pub kind: EntityKind,
    /// Center position
    pub pos: Vec2,
    /// Height the animation oscillates around
    pub base_y: f32,
    pub base_scale: f32,
    pub scale: f32,
    /// Rotation (degrees)
    pub angle: f32,
    /// Animation phase accumulator (radians)
    pub phase: f32,
    /// Spawned above ground level
    pub floating: bool,
}

impl SpawnedEntity {
    /// Collision half-size at the current scale
    pub fn half_size(&self) -> f32 {
        self.kind.half_extent() * self.scale
    }

    /// Advance the animation phase and apply the kind's profile
    pub fn animate(&mut self, dt: f32, params: &AnimationParams) {
        self.phase += dt * params.frequency;
        let wave = self.phase.sin();
        match self.kind.animation() {
            AnimationProfile::Pulse => {
                self.scale = self.base_scale * (1.0 + wave * params.pulse);
            }
            AnimationProfile::BobSwing => {
                self.pos.y = self.base_y + wave * params.bob;
                self.angle = wave * params.swing_degrees;
            }
        }
    }
}

/// Owns every live obstacle and pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySpawner {
    /// Live entities in spawn order
    pub entities: Vec<SpawnedEntity>,
    /// Time since the last spawn
    pub timer: f32,
    interval: f32,
    weights: SpawnWeights,
    spawn_x: f32,
    obstacle_y: f32,
    obstacle_scale: f32,
    pickup_y: f32,
    pickup_scale: f32,
    float_chance: f32,
    float_lift: f32,
    anim: AnimationParams,
    next_id: u32,
}

impl EntitySpawner {
    pub fn new(tuning: &Tuning) -> Self {
        let height = tuning.viewport.height;
        Self {
            entities: Vec::new(),
            timer: 0.0,
            interval: tuning.spawn_interval,
            weights: tuning.spawn_weights,
            spawn_x: tuning.viewport.width,
            obstacle_y: height - tuning.obstacle_offset,
            obstacle_scale: tuning.obstacle_scale,
            pickup_y: height - tuning.pickup_offset,
            pickup_scale: tuning.pickup_scale,
            float_chance: tuning.float_chance,
            float_lift: tuning.float_lift,
            anim: AnimationParams {
                frequency: tuning.anim_frequency,
                pulse: tuning.pulse_amplitude,
                bob: tuning.bob_amplitude,
                swing_degrees: tuning.swing_degrees,
            },
            next_id: 1,
        }
    }

    /// Cadence check: spawn one entity per elapsed interval
    pub fn update(&mut self, dt: f32, rng: &mut impl RandomSource) -> Vec<u32> {
        self.timer += dt;
        let mut spawned = Vec::new();
        while self.timer >= self.interval {
            self.timer -= self.interval;
            let kind = rng.pick_weighted(&self.weights.table());
            spawned.push(self.spawn(kind, rng));
        }
        spawned
    }

    /// Place a new entity of `kind` at the right edge of the viewport
    pub fn spawn(&mut self, kind: EntityKind, rng: &mut impl RandomSource) -> u32 {
        let (y, scale, floating) = if kind.is_obstacle() {
            (self.obstacle_y, self.obstacle_scale, false)
        } else if rng.chance(self.float_chance) {
            (self.pickup_y - self.float_lift, self.pickup_scale, true)
        } else {
            (self.pickup_y, self.pickup_scale, false)
        };

        let id = self.next_id;
        self.next_id += 1;
        self.entities.push(SpawnedEntity {
            id,
            kind,
            pos: Vec2::new(self.spawn_x, y),
            base_y: y,
            base_scale: scale,
            scale,
            angle: 0.0,
            phase: 0.0,
            floating,
        });
        log::debug!(
            "Spawned {} #{}{}",
            kind.as_str(),
            id,
            if floating { " (floating)" } else { "" }
        );
        id
    }

    /// Scroll left and drop entities past the cleanup line
    pub fn scroll(&mut self, dt: f32, scroll_speed: f32, cleanup_x: f32) {
        let dx = scroll_speed * dt;
        for entity in &mut self.entities {
            entity.pos.x -= dx;
        }
        self.entities.retain(|e| {
            let keep = e.pos.x >= cleanup_x;
            if !keep {
                log::trace!("Culled {} #{}", e.kind.as_str(), e.id);
            }
            keep
        });
    }

    /// Run every entity's animation profile
    pub fn animate(&mut self, dt: f32) {
        let params = self.anim;
        for entity in &mut self.entities {
            entity.animate(dt, &params);
        }
    }

    /// Destroy an entity. Returns it if it was still alive.
    pub fn remove(&mut self, id: u32) -> Option<SpawnedEntity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    pub fn get(&self, id: u32) -> Option<&SpawnedEntity> {
        self.entities.iter().find(|e| e.id == id)
    }
}
