//! Per-frame run controller
//!
//! [`tick`] advances an Active run in a fixed order: scroll, terrain, spawns,
//! timer, fall check, pin, score, effects. Termination checks run after the
//! frame's movement and stop the frame, so the score never includes movement
//! from the frame that ended the run.

use super::collision::{overlapping_entities, step_body};
use super::runner::StatusEffect;
use super::spawner::EntityKind;
use super::state::{EndCause, RunEvent, RunPhase, RunState};
use crate::consts::{MAX_FRAME_DT, SHAKE_BAMBOO, SHAKE_PIE};

/// Autopilot look-ahead windows, in seconds of scrolling
const OBSTACLE_LOOKAHEAD: f32 = 0.12;
const GAP_LOOKAHEAD: f32 = 0.03;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct RunInput {
    /// Leave the title screen
    pub begin: bool,
    /// Start over after the run ended
    pub restart: bool,
    /// Jump pressed this frame
    pub jump: bool,
    /// Jump released this frame (short hop)
    pub jump_released: bool,
    /// Demo mode - the simulation jumps by itself
    pub autopilot: bool,
}

/// Advance the run by one frame of `dt` seconds
pub fn tick(state: &mut RunState, input: &RunInput, dt: f32) {
    match state.phase {
        RunPhase::Start => {
            if input.begin {
                state.begin();
            }
            return;
        }
        RunPhase::Ended => {
            if input.restart {
                state.restart();
            }
            return;
        }
        RunPhase::Active => {}
    }

    handle_jump_input(state, input);

    state.elapsed += dt;
    state.screen_shake *= 0.9;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    let speed = state.game_speed();

    // 1. Scroll and cull everything that follows the world
    state.terrain.advance(dt, speed);
    let cleanup_x = state.terrain.cleanup_x();
    state.spawner.scroll(dt, speed, cleanup_x);
    scroll_parallax(state, dt, speed);

    // 2. Terrain horizon
    state.terrain.maybe_spawn_next(&mut state.rng);

    // 3. Spawn cadence and idle animation
    state.spawner.update(dt, &mut state.rng);
    state.spawner.animate(dt);

    // 4. Countdown
    state.clock.time_remaining -= dt;
    if state.clock.time_remaining <= 0.0 {
        state.end(EndCause::TimeUp);
        return;
    }

    // 5. Fell into a gap
    if state.runner.pos.y > state.tuning.viewport.height {
        state.end(EndCause::Fell);
        return;
    }

    // 6. Counter any horizontal drift from the physics step
    state.runner.pin();

    // 7. Distance score
    state.clock.distance_score += dt * speed * state.tuning.score_rate;

    // 8. Status effect countdown
    if state.runner.tick(dt) {
        log::debug!("Status effect wore off");
        state.events.push(RunEvent::EffectExpired);
    }
}

fn handle_jump_input(state: &mut RunState, input: &RunInput) {
    let wants_jump = input.jump || (input.autopilot && autopilot_wants_jump(state));
    if wants_jump && state.runner.try_jump(state.tuning.jump_impulse) {
        state.events.push(RunEvent::Jumped);
    }
    if input.jump_released {
        state.runner.on_jump_released(state.tuning.short_hop_damping);
    }
}

/// Jump when a gap, a bamboo or a grounded onion is about to reach the runner
fn autopilot_wants_jump(state: &RunState) -> bool {
    let runner = &state.runner;
    if !runner.grounded {
        return false;
    }
    let speed = state.game_speed();
    let front = runner.pos.x + runner.half_size.x;
    let back = runner.pos.x - runner.half_size.x;

    // Stay on the edge until the back foot is about to leave it
    if state
        .terrain
        .next_gap_within(back, speed * GAP_LOOKAHEAD)
        .is_some()
    {
        return true;
    }

    let reach = speed * OBSTACLE_LOOKAHEAD;
    state.spawner.entities.iter().any(|e| {
        let hazard = match e.kind {
            EntityKind::Bamboo => true,
            EntityKind::Onion => !e.floating,
            _ => false,
        };
        let near_edge = e.pos.x - e.half_size();
        hazard && e.pos.x > runner.pos.x && near_edge - front <= reach
    })
}

fn scroll_parallax(state: &mut RunState, dt: f32, speed: f32) {
    let dx = speed * state.tuning.parallax_factor * dt;
    for layer in &mut state.parallax {
        layer.x -= dx;
        if layer.x <= -layer.width {
            layer.x += layer.width * 2.0;
        }
    }
}

/// Apply the outcome of the runner touching entity `id`.
///
/// The entity is destroyed immediately, so duplicate notifications for the
/// same entity are ignored. Returns the kind that was resolved.
pub fn resolve_collision(state: &mut RunState, id: u32) -> Option<EntityKind> {
    if !state.is_active() {
        return None;
    }
    let entity = state.spawner.remove(id)?;
    let (pie_bonus, bamboo_penalty, penalty_flash) = (
        state.tuning.pie_bonus,
        state.tuning.bamboo_penalty,
        state.tuning.penalty_flash,
    );

    if entity.kind.is_pickup() {
        state.events.push(RunEvent::Collected(entity.kind));
    }
    match entity.kind {
        EntityKind::Pie => {
            state.clock.time_remaining += pie_bonus;
            state.shake(SHAKE_PIE);
        }
        EntityKind::Cake => {
            state.runner.apply_effect(StatusEffect::Fast);
            state.events.push(RunEvent::EffectStarted(StatusEffect::Fast));
        }
        EntityKind::Onion => {
            state.runner.apply_effect(StatusEffect::Slow);
            state.events.push(RunEvent::EffectStarted(StatusEffect::Slow));
        }
        EntityKind::Bamboo => {
            state.clock.time_remaining -= bamboo_penalty;
            state.runner.flash_penalty(penalty_flash);
            state.shake(SHAKE_BAMBOO);
            state.events.push(RunEvent::ObstacleHit);
        }
    }
    log::debug!(
        "Hit {} #{} (time left {:.1})",
        entity.kind.as_str(),
        entity.id,
        state.clock.time_remaining
    );

    // An Active run never exposes an exhausted timer
    if state.clock.time_remaining <= 0.0 {
        state.end(EndCause::TimeUp);
    }
    Some(entity.kind)
}

/// One full frame for headless play: physics step, contacts, then [`tick`]
pub fn advance_frame(state: &mut RunState, input: &RunInput, dt: f32) {
    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    if state.is_active() {
        step_body(
            &mut state.runner,
            &state.terrain,
            state.tuning.gravity,
            dt,
        );
        for id in overlapping_entities(&state.runner, &state.spawner) {
            resolve_collision(state, id);
        }
    }
    tick(state, input, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::SimRng;
    use crate::tuning::Tuning;

    fn active() -> RunState {
        let mut state = RunState::new_active(12345, Tuning::default());
        state.drain_events();
        state
    }

    fn spawn(state: &mut RunState, kind: EntityKind) -> u32 {
        let mut rng = SimRng::new(0);
        state.spawner.spawn(kind, &mut rng)
    }

    #[test]
    fn test_start_waits_for_begin() {
        let mut state = RunState::new(1, Tuning::default());
        let terrain_before = state.terrain.segments.clone();

        tick(&mut state, &RunInput::default(), 0.5);
        assert_eq!(state.phase, RunPhase::Start);
        assert_eq!(state.clock.time_remaining, 30.0);
        assert_eq!(state.terrain.segments, terrain_before);

        let input = RunInput {
            begin: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.5);
        assert_eq!(state.phase, RunPhase::Active);
    }

    #[test]
    fn test_timer_and_score_advance() {
        let mut state = active();
        tick(&mut state, &RunInput::default(), 0.5);
        assert_eq!(state.clock.time_remaining, 29.5);
        // 0.5s * 400 * 0.05
        assert_eq!(state.clock.distance_score, 10.0);
        assert_eq!(state.runner.pos.x, 200.0);
    }

    #[test]
    fn test_pie_adds_ten_seconds() {
        let mut state = active();
        let id = spawn(&mut state, EntityKind::Pie);
        assert_eq!(resolve_collision(&mut state, id), Some(EntityKind::Pie));
        assert_eq!(state.clock.time_remaining, 40.0);
        assert!(state.screen_shake > 0.0);
    }

    #[test]
    fn test_duplicate_notifications_resolve_once() {
        let mut state = active();
        let id = spawn(&mut state, EntityKind::Pie);
        resolve_collision(&mut state, id);
        assert_eq!(resolve_collision(&mut state, id), None);
        resolve_collision(&mut state, id);
        assert_eq!(state.clock.time_remaining, 40.0);
        assert_eq!(
            state.drain_events(),
            vec![RunEvent::Collected(EntityKind::Pie)]
        );
    }

    #[test]
    fn test_bamboo_costs_time_and_flashes() {
        let mut state = active();
        let id = spawn(&mut state, EntityKind::Bamboo);
        resolve_collision(&mut state, id);
        assert_eq!(state.clock.time_remaining, 25.0);
        assert!(state.runner.penalty_flash > 0.0);
        assert!(state.spawner.get(id).is_none());
    }

    #[test]
    fn test_bamboo_with_little_time_left_ends_run() {
        let mut state = active();
        tick(&mut state, &RunInput::default(), 0.5);
        state.clock.time_remaining = 3.0;
        let score = state.clock.distance_score;

        let id = spawn(&mut state, EntityKind::Bamboo);
        assert_eq!(resolve_collision(&mut state, id), Some(EntityKind::Bamboo));
        assert_eq!(state.phase, RunPhase::Ended);
        assert_eq!(state.clock.distance_score, score);
        assert_eq!(
            state.drain_events(),
            vec![
                RunEvent::ObstacleHit,
                RunEvent::Ended {
                    cause: EndCause::TimeUp,
                    final_score: 10,
                },
            ]
        );
    }

    #[test]
    fn test_cake_then_onion_replaces_effect() {
        let mut state = active();
        let cake = spawn(&mut state, EntityKind::Cake);
        resolve_collision(&mut state, cake);
        assert_eq!(state.runner.effect, StatusEffect::Fast);
        assert!((state.game_speed() - 480.0).abs() < 1e-3);

        tick(&mut state, &RunInput::default(), 0.25);
        let onion = spawn(&mut state, EntityKind::Onion);
        resolve_collision(&mut state, onion);
        assert_eq!(state.runner.effect, StatusEffect::Slow);
        assert_eq!(state.runner.effect_remaining, 5.0);
        assert!(state.runner.is_crying);
    }

    #[test]
    fn test_fast_effect_wears_off_after_five_seconds() {
        let mut state = active();
        let cake = spawn(&mut state, EntityKind::Cake);
        resolve_collision(&mut state, cake);
        state.drain_events();

        for _ in 0..20 {
            tick(&mut state, &RunInput::default(), 0.25);
        }
        assert_eq!(state.runner.speed_multiplier, 1.0);
        assert_eq!(state.runner.effect, StatusEffect::None);
        let expired = state
            .drain_events()
            .iter()
            .filter(|e| **e == RunEvent::EffectExpired)
            .count();
        assert_eq!(expired, 1);
    }

    #[test]
    fn test_time_up_ends_run() {
        let mut state = active();
        state.clock.time_remaining = 0.25;
        tick(&mut state, &RunInput::default(), 0.25);
        assert_eq!(state.phase, RunPhase::Ended);
        assert!(matches!(
            state.drain_events().last(),
            Some(RunEvent::Ended {
                cause: EndCause::TimeUp,
                ..
            })
        ));
    }

    #[test]
    fn test_fall_ends_run_with_frozen_score() {
        let mut state = active();
        tick(&mut state, &RunInput::default(), 0.5);
        state.clock.distance_score = 57.8;
        state.runner.pos.y = 721.0;

        tick(&mut state, &RunInput::default(), 0.5);
        assert_eq!(state.phase, RunPhase::Ended);
        assert_eq!(state.final_score, Some(57));
        assert_eq!(state.clock.distance_score, 57.8);

        // Nothing moves after the end
        let time = state.clock.time_remaining;
        tick(&mut state, &RunInput::default(), 0.5);
        assert_eq!(state.clock.time_remaining, time);
        assert_eq!(state.clock.distance_score, 57.8);
    }

    #[test]
    fn test_collisions_ignored_after_end() {
        let mut state = active();
        let id = spawn(&mut state, EntityKind::Pie);
        state.end(EndCause::TimeUp);
        assert_eq!(resolve_collision(&mut state, id), None);
    }

    #[test]
    fn test_restart_gives_fresh_active_run() {
        let mut state = active();
        state.end(EndCause::Fell);
        let input = RunInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.1);
        assert_eq!(state.phase, RunPhase::Active);
        assert_eq!(state.clock.time_remaining, 30.0);
        assert_eq!(state.clock.distance_score, 0.0);
    }

    #[test]
    fn test_jump_and_short_hop() {
        let mut state = active();
        state.runner.grounded = true;
        let jump = RunInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, 0.01);
        assert_eq!(state.runner.vel.y, -800.0);

        let release = RunInput {
            jump_released: true,
            ..Default::default()
        };
        tick(&mut state, &release, 0.01);
        assert_eq!(state.runner.vel.y, -400.0);
        assert!(state.drain_events().contains(&RunEvent::Jumped));
    }

    #[test]
    fn test_parallax_wraps() {
        let mut state = active();
        for _ in 0..400 {
            tick(&mut state, &RunInput::default(), 0.1);
            state.clock.time_remaining = 30.0;
            for layer in &state.parallax {
                assert!(layer.x > -layer.width && layer.x <= layer.width);
            }
        }
    }

    #[test]
    fn test_headless_run_lands_then_ends() {
        let mut state = active();
        for _ in 0..60 {
            advance_frame(&mut state, &RunInput::default(), 1.0 / 60.0);
        }
        assert!(state.runner.grounded);

        let input = RunInput {
            autopilot: true,
            ..Default::default()
        };
        let mut frames = 0;
        while state.is_active() && frames < 60 * 600 {
            advance_frame(&mut state, &input, 1.0 / 60.0);
            frames += 1;
        }
        assert_eq!(state.phase, RunPhase::Ended);
        assert!(state.final_score.is_some());
    }

    #[test]
    fn test_determinism() {
        let input = RunInput {
            autopilot: true,
            ..Default::default()
        };
        let mut a = active();
        let mut b = active();
        for _ in 0..600 {
            advance_frame(&mut a, &input, 1.0 / 60.0);
            advance_frame(&mut b, &input, 1.0 / 60.0);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.clock.distance_score, b.clock.distance_score);
        assert_eq!(a.clock.time_remaining, b.clock.time_remaining);
        assert_eq!(a.terrain.segments, b.terrain.segments);
        assert_eq!(a.spawner.entities.len(), b.spawner.entities.len());
    }

    #[test]
    fn test_snapshot_resumes_identically() {
        let input = RunInput {
            autopilot: true,
            ..Default::default()
        };
        let mut state = active();
        for _ in 0..120 {
            advance_frame(&mut state, &input, 1.0 / 60.0);
        }
        let json = serde_json::to_string(&state).unwrap();
        let mut restored: RunState = serde_json::from_str(&json).unwrap();

        for _ in 0..300 {
            advance_frame(&mut state, &input, 1.0 / 60.0);
            advance_frame(&mut restored, &input, 1.0 / 60.0);
        }
        assert_eq!(state.clock.distance_score, restored.clock.distance_score);
        assert_eq!(state.terrain.segments, restored.terrain.segments);
    }
}
