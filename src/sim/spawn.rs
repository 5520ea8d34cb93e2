//! Difficulty ramp and object spawning
//!
//! The spawn interval shrinks and the bomb chance grows with elapsed time,
//! both clamped. Each spawn tick drops a batch that also grows over time.

use glam::Vec2;
use rand::Rng;

use super::state::{FruitKind, GameState, ObjectKind, SimObject};
use crate::Tuning;
use crate::consts::*;

/// Largest batch multiplier; with roll < 1 a batch holds at most 3 objects
const MAX_BATCH_EXTRA: f32 = 3.0;
/// Elapsed seconds per step of batch growth
const BATCH_GROWTH_SECS: f32 = 20.0;

/// Spawn interval and bomb chance for the given elapsed time
pub fn difficulty(elapsed: f32, tuning: &Tuning) -> (f32, f32) {
    let spawn_interval = (tuning.base_spawn_interval - elapsed * tuning.difficulty_rate)
        .max(tuning.min_spawn_interval);
    let bomb_chance =
        (tuning.base_bomb_chance + elapsed * tuning.bomb_chance_rate).min(tuning.max_bomb_chance);
    (spawn_interval, bomb_chance)
}

/// Number of objects in a batch, `roll` in [0, 1)
pub fn batch_size(roll: f32, elapsed: f32) -> usize {
    let extra = MAX_BATCH_EXTRA.min(1.0 + elapsed / BATCH_GROWTH_SECS);
    1 + (roll * extra).floor() as usize
}

/// Weighted kind roll: bomb, then heart, else a uniform fruit
pub fn roll_kind<R: Rng>(rng: &mut R, bomb_chance: f32, heart_chance: f32) -> ObjectKind {
    let roll: f32 = rng.random();
    if roll < bomb_chance {
        ObjectKind::Bomb
    } else if roll < bomb_chance + heart_chance {
        ObjectKind::Heart
    } else {
        let idx = rng.random_range(0..FruitKind::ALL.len());
        ObjectKind::Fruit(FruitKind::ALL[idx])
    }
}

/// Spawn one batch into the live set, returning the new objects
pub fn spawn_batch<R: Rng>(state: &mut GameState, rng: &mut R, tuning: &Tuning) -> Vec<SimObject> {
    let count = batch_size(rng.random(), state.elapsed);
    let center_x = rng.random_range(SPAWN_X_MIN..SPAWN_X_MAX);
    let half_span = (count as f32 - 1.0) / 2.0;

    let mut spawned = Vec::with_capacity(count);
    for i in 0..count {
        let kind = roll_kind(rng, state.bomb_chance, state.heart_chance);

        // Spread the batch so simultaneous spawns don't overlap
        let offset = (i as f32 - half_span) * SPAWN_BATCH_SPACING;
        let jitter: f32 = rng.random_range(-0.03..0.03);
        let x = (center_x + offset + jitter).clamp(SPAWN_X_MIN, SPAWN_X_MAX);
        let lift: f32 = rng.random_range(0.0..0.05);
        let y = tuning.spawn_height - lift;

        // Drift toward the middle of the screen
        let drift: f32 = rng.random_range(-0.1..0.1) + (0.5 - x) * 0.1;
        let fall: f32 = rng.random_range(0.05..0.2);
        let vel = Vec2::new(drift, fall);

        let mut object = SimObject::new(
            state.next_entity_id(),
            kind,
            Vec2::new(x, y),
            vel,
            kind.radius(tuning),
        );
        object.rotation = rng.random_range(0.0..std::f32::consts::TAU);
        object.rotation_speed = rng.random_range(-0.1..0.1);

        log::debug!("Spawned {:?} #{} at ({x:.2}, {y:.2})", kind, object.id);
        state.objects.push(object.clone());
        spawned.push(object);
    }
    state.stats.objects_spawned += count as u32;
    spawned
}
