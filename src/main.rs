//! Blade Rush headless runner
//!
//! Drives the simulation with a scripted figure-eight swipe, the way the
//! tracking front end would, and prints the final state as JSON.
//!
//! Usage: `blade-rush [seed] [frames] [tuning.json]`

use std::path::Path;

use glam::Vec2;

use blade_rush::Tuning;
use blade_rush::consts::MAX_FRAME_DT;
use blade_rush::sim::{GameEvent, HandInput, Hands, SimulationEngine};

const FRAME_DT: f32 = 1.0 / 60.0;

/// Scripted hands: right hand sweeps a figure eight, left hand idles closed
fn scripted_hands(t: f32) -> Hands {
    let pos = Vec2::new(0.5 + 0.35 * (t * 2.0).sin(), 0.45 + 0.2 * (t * 4.0).sin());
    let vel = Vec2::new(0.7 * (t * 2.0).cos(), 0.8 * (t * 4.0).cos());
    Hands {
        left: HandInput::new(Vec2::new(0.2, 0.8), Vec2::ZERO, false),
        right: HandInput::new(pos, vel, true),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let frames: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 60);
    let tuning = args
        .next()
        .map(|path| Tuning::load(Path::new(&path)))
        .unwrap_or_default();

    log::info!("Running {frames} frames with seed {seed}");
    let mut engine = SimulationEngine::new(tuning, seed);
    engine.add_listener(Box::new(|event: &GameEvent| match event {
        GameEvent::Bomb(bomb) => log::info!("Bomb #{} sliced!", bomb.id),
        GameEvent::Slice { combo, .. } if *combo >= 5 => log::info!("{combo}x combo!"),
        _ => {}
    }));

    let mut t = 0.0;
    for _ in 0..frames {
        let dt = FRAME_DT.min(MAX_FRAME_DT);
        t += dt;
        engine.update(dt, &scripted_hands(t));
        if engine.state().is_game_over() {
            break;
        }
    }

    let state = engine.state();
    log::info!(
        "Finished after {:.1}s: score {}, best combo {}, {} sliced",
        state.elapsed,
        state.score,
        state.best_combo,
        state.stats.fruits_sliced
    );
    match serde_json::to_string_pretty(state) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Could not serialize final state: {err}"),
    }
}
