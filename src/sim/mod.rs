//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame delta supplied by the caller
//! - Seeded RNG only
//! - Stable iteration order (spawn order / entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rng;
pub mod runner;
pub mod spawner;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{Aabb, overlapping_entities, step_body};
pub use rng::{RandomSource, SimRng};
pub use runner::{RunnerState, StatusEffect, Tint};
pub use spawner::{AnimationParams, AnimationProfile, EntityKind, EntitySpawner, SpawnedEntity};
pub use state::{EndCause, ParallaxLayer, RunClock, RunEvent, RunPhase, RunState};
pub use terrain::{Segment, TerrainGenerator};
pub use tick::{RunInput, advance_frame, resolve_collision, tick};
