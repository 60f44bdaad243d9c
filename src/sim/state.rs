//! Run state and core simulation types
//!
//! Everything a run needs is threaded through [`RunState`]; there is no global
//! game speed or timer. Snapshots (serde) resume deterministically.

use serde::{Deserialize, Serialize};

use super::rng::SimRng;
use super::runner::{RunnerState, StatusEffect};
use super::spawner::{EntityKind, EntitySpawner};
use super::terrain::TerrainGenerator;
use crate::tuning::Tuning;
use crate::{display_score, display_time};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Title screen, waiting for the begin signal
    Start,
    /// Simulation advancing
    Active,
    /// Run over; timer and score frozen
    Ended,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    TimeUp,
    Fell,
}

/// Feedback for the presentation layer (sounds, HUD, shake)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEvent {
    Started { seed: u64 },
    Jumped,
    Collected(EntityKind),
    ObstacleHit,
    EffectStarted(StatusEffect),
    EffectExpired,
    Ended { cause: EndCause, final_score: u64 },
}

/// Countdown and distance score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunClock {
    /// Seconds left; the run ends when this reaches zero
    pub time_remaining: f32,
    /// Distance-based score, never decreases
    pub distance_score: f32,
}

impl RunClock {
    pub fn new(start_time: f32) -> Self {
        Self {
            time_remaining: start_time,
            distance_score: 0.0,
        }
    }

    /// Timer as shown on the HUD
    pub fn display_time(&self) -> u32 {
        display_time(self.time_remaining)
    }

    /// Score as shown on the HUD
    pub fn display_score(&self) -> u64 {
        display_score(self.distance_score)
    }
}

/// A looping background tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxLayer {
    pub x: f32,
    pub width: f32,
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: SimRng,
    pub tuning: Tuning,
    pub phase: RunPhase,
    pub clock: RunClock,
    pub runner: RunnerState,
    pub terrain: TerrainGenerator,
    pub spawner: EntitySpawner,
    /// Background tiles
    pub parallax: [ParallaxLayer; 2],
    /// Screen shake intensity (decays each tick)
    pub screen_shake: f32,
    /// Seconds spent Active
    pub elapsed: f32,
    /// Final score once Ended
    pub final_score: Option<u64>,
    /// Pending feedback, drained by the presentation layer
    #[serde(skip)]
    pub events: Vec<RunEvent>,
}

impl RunState {
    /// A fresh run waiting on the title screen
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let width = tuning.viewport.width;
        Self {
            seed,
            rng: SimRng::new(seed),
            phase: RunPhase::Start,
            clock: RunClock::new(tuning.start_time),
            runner: RunnerState::new(&tuning),
            terrain: TerrainGenerator::new(&tuning),
            spawner: EntitySpawner::new(&tuning),
            parallax: [
                ParallaxLayer { x: 0.0, width },
                ParallaxLayer { x: width, width },
            ],
            screen_shake: 0.0,
            elapsed: 0.0,
            final_score: None,
            events: Vec::new(),
            tuning,
        }
    }

    /// A fresh run that is already Active
    pub fn new_active(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self::new(seed, tuning);
        state.begin();
        state
    }

    /// Leave the title screen
    pub fn begin(&mut self) {
        if self.phase != RunPhase::Start {
            return;
        }
        self.phase = RunPhase::Active;
        log::info!("Run started with seed: {}", self.seed);
        self.events.push(RunEvent::Started { seed: self.seed });
    }

    /// Replace an Ended run with a brand new Active one
    pub fn restart(&mut self) {
        if self.phase != RunPhase::Ended {
            return;
        }
        let seed = self.rng.next_seed();
        let mut events = std::mem::take(&mut self.events);
        *self = Self::new_active(seed, self.tuning.clone());
        events.append(&mut self.events);
        self.events = events;
    }

    /// Freeze the run and report the truncated score
    pub fn end(&mut self, cause: EndCause) {
        if self.phase != RunPhase::Active {
            return;
        }
        let final_score = self.clock.display_score();
        self.phase = RunPhase::Ended;
        self.final_score = Some(final_score);
        if cause == EndCause::Fell {
            self.shake(crate::consts::SHAKE_FALL);
        }
        log::info!(
            "Run ended ({:?}) after {:.1}s, score {}",
            cause,
            self.elapsed,
            final_score
        );
        self.events.push(RunEvent::Ended { cause, final_score });
    }

    /// Current world scroll speed
    pub fn game_speed(&self) -> f32 {
        self.tuning.base_speed * self.runner.speed_multiplier
    }

    /// Request a screen shake of at least `intensity`
    pub fn shake(&mut self, intensity: f32) {
        self.screen_shake = self.screen_shake.max(intensity);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_active(&self) -> bool {
        self.phase == RunPhase::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_waits_on_start() {
        let state = RunState::new(1, Tuning::default());
        assert_eq!(state.phase, RunPhase::Start);
        assert_eq!(state.clock.time_remaining, 30.0);
        assert_eq!(state.clock.distance_score, 0.0);
        assert!(!state.terrain.segments.is_empty());
        assert!(state.spawner.entities.is_empty());
    }

    #[test]
    fn test_begin_only_from_start() {
        let mut state = RunState::new(1, Tuning::default());
        state.begin();
        assert_eq!(state.phase, RunPhase::Active);
        assert_eq!(state.drain_events(), vec![RunEvent::Started { seed: 1 }]);

        state.begin();
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_end_freezes_and_truncates() {
        let mut state = RunState::new_active(1, Tuning::default());
        state.clock.distance_score = 41.9;
        state.end(EndCause::TimeUp);
        assert_eq!(state.phase, RunPhase::Ended);
        assert_eq!(state.final_score, Some(41));

        // Second end is ignored
        state.end(EndCause::Fell);
        let ends = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, RunEvent::Ended { .. }))
            .count();
        assert_eq!(ends, 1);
    }

    #[test]
    fn test_restart_is_full_reinit() {
        let mut state = RunState::new_active(1, Tuning::default());
        state.clock.distance_score = 100.0;
        state.clock.time_remaining = 3.0;
        state.runner.apply_effect(StatusEffect::Slow);

        // Restart is ignored unless the run has ended
        state.restart();
        assert_eq!(state.clock.distance_score, 100.0);

        state.end(EndCause::TimeUp);
        state.restart();
        assert_eq!(state.phase, RunPhase::Active);
        assert_eq!(state.clock.distance_score, 0.0);
        assert_eq!(state.clock.time_remaining, 30.0);
        assert_eq!(state.runner.effect, StatusEffect::None);
        assert_eq!(state.final_score, None);
        assert!(matches!(
            state.drain_events().last(),
            Some(RunEvent::Started { .. })
        ));
    }

    #[test]
    fn test_game_speed_follows_multiplier() {
        let mut state = RunState::new_active(1, Tuning::default());
        assert_eq!(state.game_speed(), 400.0);
        state.runner.apply_effect(StatusEffect::Fast);
        assert!((state.game_speed() - 480.0).abs() < 1e-3);
        state.runner.apply_effect(StatusEffect::Slow);
        assert!((state.game_speed() - 320.0).abs() < 1e-3);
    }
}
