//! Panda Runner entry point
//!
//! Headless demo: plays one autopiloted run at 60 Hz and logs what happens.
//!
//! Usage: `panda-runner [seed] [tuning.json]`
//! Set `RUST_LOG=debug` to see spawns, gaps and effects.

use panda_runner::HighScores;
use panda_runner::Tuning;
use panda_runner::highscores::now_ms;
use panda_runner::sim::{RunEvent, RunInput, RunState, advance_frame};

const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after ten simulated minutes
const MAX_FRAMES: u32 = 60 * 60 * 10;
const HIGH_SCORES_FILE: &str = "panda_runner_highscores.json";

fn main() {
    env_logger::init();
    log::info!("Panda Runner (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| now_ms() as u64);
    let tuning = args.next().map(Tuning::load_from).unwrap_or_default();

    let mut state = RunState::new(seed, tuning);
    let mut input = RunInput {
        begin: true,
        autopilot: true,
        ..Default::default()
    };

    let mut frames = 0;
    while frames < MAX_FRAMES {
        advance_frame(&mut state, &input, FRAME_DT);
        input.begin = false;
        frames += 1;

        for event in state.drain_events() {
            match event {
                RunEvent::Collected(kind) => {
                    log::info!(
                        "[{:>5.1}s] {} | time {} | score {}",
                        state.elapsed,
                        kind.as_str(),
                        state.clock.display_time(),
                        state.clock.display_score()
                    );
                }
                RunEvent::ObstacleHit => {
                    log::info!(
                        "[{:>5.1}s] bamboo! | time {}",
                        state.elapsed,
                        state.clock.display_time()
                    );
                }
                RunEvent::Ended { cause, final_score } => {
                    println!("Game over ({:?}) - score {}", cause, final_score);
                    record_score(final_score, state.elapsed);
                    return;
                }
                _ => {}
            }
        }
    }

    println!(
        "Stopped after {} frames - score {}",
        frames,
        state.clock.display_score()
    );
}

fn record_score(score: u64, time_survived: f32) {
    let mut scores = HighScores::load_from(HIGH_SCORES_FILE);
    if let Some(rank) = scores.add_score(score, time_survived, now_ms()) {
        println!("New high score! Rank #{}", rank);
        if let Err(e) = scores.save_to(HIGH_SCORES_FILE) {
            log::warn!("Failed to save high scores: {}", e);
        }
    }
}
