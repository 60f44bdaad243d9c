//! Overlap tests and a minimal gravity/ground step
//!
//! This stands in for the physics engine when the simulation runs headless
//! (demo binary, tests). An engine-backed frontend skips it: it writes the
//! runner's position, velocity and `grounded` itself and reports contacts
//! through [`super::tick::resolve_collision`].

use glam::Vec2;

use super::runner::RunnerState;
use super::spawner::{EntitySpawner, SpawnedEntity};
use super::terrain::TerrainGenerator;

/// Axis-aligned box around a center point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    pub fn of_runner(runner: &RunnerState) -> Self {
        Self::new(runner.pos, runner.half_size)
    }

    pub fn of_entity(entity: &SpawnedEntity) -> Self {
        Self::new(entity.pos, Vec2::splat(entity.half_size()))
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }
}

/// Apply gravity and land the runner on any segment under its feet.
///
/// The runner is supported if either foot (left or right edge) is over
/// ground; it only lands when crossing the surface from above.
pub fn step_body(runner: &mut RunnerState, terrain: &TerrainGenerator, gravity: f32, dt: f32) {
    let prev_bottom = runner.pos.y + runner.half_size.y;

    runner.vel.y += gravity * dt;
    runner.pos += runner.vel * dt;

    let bottom = runner.pos.y + runner.half_size.y;
    let surface = terrain.surface_y;
    let supported = terrain.has_ground_under(runner.pos.x - runner.half_size.x)
        || terrain.has_ground_under(runner.pos.x + runner.half_size.x);

    runner.grounded = false;
    if supported && runner.vel.y >= 0.0 && prev_bottom <= surface && bottom >= surface {
        runner.pos.y = surface - runner.half_size.y;
        runner.vel.y = 0.0;
        runner.grounded = true;
    }
}

/// Ids of every entity currently touching the runner, in spawn order
pub fn overlapping_entities(runner: &RunnerState, spawner: &EntitySpawner) -> Vec<u32> {
    let body = Aabb::of_runner(runner);
    spawner
        .entities
        .iter()
        .filter(|e| body.overlaps(&Aabb::of_entity(e)))
        .map(|e| e.id)
        .collect()
}
