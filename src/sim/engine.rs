//! Per-frame simulation pipeline
//!
//! Each `update` call runs, in order:
//! 1. Countdown (may end the game)
//! 2. Difficulty ramp
//! 3. Spawning
//! 4. Combo decay
//! 5. Physics and removal queueing
//! 6. Hit detection against collidable objects
//! 7. Hit resolution (bomb / heart / fruit)
//! 8. Removal of queued objects
//!
//! All mutation happens inside `update`; callers only ever see whole frames.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{CollisionSystem, Hands, HitRecord};
use super::events::{EventBus, EventListener, GameEvent};
use super::spawn::{difficulty, spawn_batch};
use super::split::split_fruit;
use super::state::{GamePhase, GameState, ObjectKind, SimObject};
use crate::Tuning;
use crate::outside_screen;
use crate::platform::{Clock, SystemClock};

/// Everything that changed during one `update`
#[derive(Debug, Clone, Default)]
pub struct FrameSummary {
    /// Newly spawned objects and split pieces
    pub spawned: Vec<SimObject>,
    /// Objects evicted from the live set
    pub removed: Vec<SimObject>,
    /// Hits that were resolved this frame
    pub hits: Vec<HitRecord>,
    /// Every notification emitted, in order. Phase changes from `pause`,
    /// `resume` or `reset` are included in the next running frame.
    pub events: Vec<GameEvent>,
}

impl FrameSummary {
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty() && self.removed.is_empty() && self.hits.is_empty()
    }
}

/// Owns the session state and advances it one frame at a time
pub struct SimulationEngine<R: Rng = Pcg32> {
    tuning: Tuning,
    state: GameState,
    collision: CollisionSystem,
    rng: R,
    clock: Box<dyn Clock>,
    events: EventBus,
}

impl SimulationEngine<Pcg32> {
    /// Engine with a seeded PCG generator and the system clock
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self::with_parts(
            tuning,
            Pcg32::seed_from_u64(seed),
            Box::new(SystemClock::new()),
        )
    }
}

impl<R: Rng> SimulationEngine<R> {
    /// Engine with an injected random source and wall clock
    pub fn with_parts(tuning: Tuning, rng: R, clock: Box<dyn Clock>) -> Self {
        let tuning = tuning.sanitized();
        let state = GameState::new(&tuning);
        Self {
            tuning,
            state,
            collision: CollisionSystem::new(),
            rng,
            clock,
            events: EventBus::default(),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for scripted setups
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn objects(&self) -> &[SimObject] {
        &self.state.objects
    }

    pub fn collision(&self) -> &CollisionSystem {
        &self.collision
    }

    pub fn add_listener(&mut self, listener: Box<dyn EventListener>) {
        self.events.subscribe(listener);
    }

    /// Place an object directly into the live set, returning its id
    pub fn insert_object(
        &mut self,
        kind: ObjectKind,
        pos: glam::Vec2,
        vel: glam::Vec2,
    ) -> u32 {
        let id = self.state.next_entity_id();
        let radius = kind.radius(&self.tuning);
        self.state
            .objects
            .push(SimObject::new(id, kind, pos, vel, radius));
        id
    }

    pub fn pause(&mut self) {
        if matches!(self.state.phase, GamePhase::Ready | GamePhase::Running) {
            self.set_phase(GamePhase::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.set_phase(GamePhase::Running);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state.phase {
            GamePhase::Paused => self.resume(),
            _ => self.pause(),
        }
    }

    /// Start a fresh session: clears objects, counters, ids and cooldowns
    pub fn reset(&mut self) {
        let from = self.state.phase;
        self.state = GameState::new(&self.tuning);
        self.collision.clear();
        log::info!("Session reset ({:.1}s on the clock)", self.state.time_remaining);
        if from != GamePhase::Ready {
            self.events.emit(GameEvent::PhaseChange {
                from,
                to: GamePhase::Ready,
            });
        }
    }

    /// Advance the simulation by `dt` seconds
    pub fn update(&mut self, dt: f32, hands: &Hands) -> FrameSummary {
        match self.state.phase {
            GamePhase::Paused | GamePhase::GameOver => return FrameSummary::default(),
            GamePhase::Ready => self.set_phase(GamePhase::Running),
            GamePhase::Running => {}
        }

        // Scripted callers may have pushed objects out of order
        self.state.normalize_order();

        let dt = dt.max(0.0);
        let mut summary = FrameSummary::default();

        // Countdown
        self.state.elapsed += dt;
        self.state.time_remaining = (self.state.time_remaining - dt).min(self.tuning.max_time);
        if self.state.time_remaining <= 0.0 {
            self.state.time_remaining = 0.0;
            self.emit_time();
            self.game_over();
            summary.events = self.events.drain();
            return summary;
        }
        self.emit_time();

        // Difficulty
        let (spawn_interval, bomb_chance) = difficulty(self.state.elapsed, &self.tuning);
        self.state.spawn_interval = spawn_interval;
        self.state.bomb_chance = bomb_chance;
        self.state.heart_chance = self.tuning.heart_chance;

        // Spawning
        self.state.spawn_timer += dt;
        if self.state.spawn_timer >= self.state.spawn_interval {
            self.state.spawn_timer = 0.0;
            let spawned = spawn_batch(&mut self.state, &mut self.rng, &self.tuning);
            for object in &spawned {
                self.events.emit(GameEvent::Spawn(object.clone()));
            }
            summary.spawned.extend(spawned);
        }

        // Combo decay, before any hit can extend it
        if self.state.combo > 0 {
            self.state.combo_timer -= dt;
            if self.state.combo_timer <= 0.0 {
                log::debug!("Combo of {} expired", self.state.combo);
                self.state.combo = 0;
                self.state.combo_timer = 0.0;
            }
        }

        let pending = self.integrate(dt);

        // Hit detection
        let now = self.clock.now_secs();
        let candidates = self
            .state
            .objects
            .iter()
            .filter(|o| o.is_collidable() && !pending.contains(&o.id));
        let hits = self.collision.check_all(hands, candidates, now, &self.tuning);

        // Hit resolution
        for hit in hits {
            if self.state.is_game_over() {
                break;
            }
            let Some(index) = self.state.object_index(hit.object.id) else {
                continue;
            };
            if !self.state.objects[index].is_collidable() {
                // Cleared by an earlier bomb this frame
                log::debug!("Skipping hit on already faded object {}", hit.object.id);
                continue;
            }
            match hit.object.kind {
                ObjectKind::Bomb => self.hit_bomb(index),
                ObjectKind::Heart => self.hit_heart(index),
                ObjectKind::Fruit(_) => {
                    let pieces = self.hit_fruit(index, &hit);
                    summary.spawned.extend(pieces);
                }
            }
            summary.hits.push(hit);
        }

        summary.removed = self.remove_pending(&pending);
        summary.events = self.events.drain();
        summary
    }

    /// Move every live object; returns ids to remove this frame
    fn integrate(&mut self, dt: f32) -> HashSet<u32> {
        let gravity = self.tuning.gravity;
        let fade_duration = self.tuning.fade_duration;
        let margin = self.tuning.despawn_margin;

        let mut pending = HashSet::new();
        for object in &mut self.state.objects {
            object.vel.y += gravity * dt;
            object.pos += object.vel * dt;
            // Per call, not per second
            object.rotation += object.rotation_speed;

            if object.fading {
                object.fade_timer += dt;
                if object.fade_timer > fade_duration {
                    pending.insert(object.id);
                }
            } else if outside_screen(object.pos, margin) {
                pending.insert(object.id);
            }
        }
        pending
    }

    fn hit_bomb(&mut self, index: usize) {
        let head_start = self.tuning.bomb_clear_fade_head_start;
        self.state.objects[index].start_fade();
        let bomb = self.state.objects[index].clone();

        // Screen clear
        for (i, object) in self.state.objects.iter_mut().enumerate() {
            if i != index && object.is_collidable() {
                object.start_fade_at(head_start);
            }
        }

        self.state.time_remaining = (self.state.time_remaining - self.tuning.time_penalty).max(0.0);
        self.state.stats.bombs_hit += 1;
        log::info!(
            "Bomb #{} hit, {:.1}s left",
            bomb.id,
            self.state.time_remaining
        );

        self.events.emit(GameEvent::Bomb(bomb));
        self.emit_time();
        if self.state.time_remaining <= 0.0 {
            self.game_over();
        }
    }

    fn hit_heart(&mut self, index: usize) {
        self.state.objects[index].start_fade();
        let heart = self.state.objects[index].clone();

        self.state.time_remaining =
            (self.state.time_remaining + self.tuning.time_bonus).min(self.tuning.max_time);
        self.state.stats.hearts_collected += 1;
        log::debug!("Heart #{} collected, {:.1}s left", heart.id, self.state.time_remaining);

        self.events.emit(GameEvent::Heart(heart));
        self.emit_time();
    }

    fn hit_fruit(&mut self, index: usize, hit: &HitRecord) -> Vec<SimObject> {
        let pieces = split_fruit(&mut self.state, index, &hit.hand, &self.tuning);
        let object = self.state.objects[index].clone();

        let state = &mut self.state;
        state.combo += 1;
        state.combo_timer = self.tuning.combo_window;
        state.best_combo = state.best_combo.max(state.combo);

        let points =
            self.tuning.base_points * (u64::from(object.generation) + 1) * u64::from(state.combo.max(1));
        state.score += points;
        state.stats.fruits_sliced += 1;
        log::debug!(
            "Sliced #{} (gen {}) for {points} points, combo {}",
            object.id,
            object.generation,
            state.combo
        );

        let (score, combo) = (state.score, state.combo);
        self.events.emit(GameEvent::Slice {
            object,
            hand: hit.hand,
            side: hit.side,
            combo,
            pieces: pieces.clone(),
        });
        self.events.emit(GameEvent::Score { score, combo });
        pieces
    }

    /// Evict queued objects in one pass
    fn remove_pending(&mut self, pending: &HashSet<u32>) -> Vec<SimObject> {
        if pending.is_empty() {
            return Vec::new();
        }

        let mut removed = Vec::with_capacity(pending.len());
        self.state.objects.retain_mut(|object| {
            if pending.contains(&object.id) {
                object.active = false;
                removed.push(object.clone());
                false
            } else {
                true
            }
        });

        for object in &removed {
            if object.is_fruit() && object.generation == 0 && !object.fading {
                self.state.stats.objects_missed += 1;
                self.events.emit(GameEvent::Miss(object.clone()));
            }
            self.events.emit(GameEvent::Remove(object.clone()));
        }
        removed
    }

    fn emit_time(&mut self) {
        self.events.emit(GameEvent::TimeChange {
            time_remaining: self.state.time_remaining,
        });
    }

    fn game_over(&mut self) {
        log::info!(
            "Game over: score {}, best combo {}",
            self.state.score,
            self.state.best_combo
        );
        self.set_phase(GamePhase::GameOver);
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.state.phase;
        if from != to {
            self.state.phase = to;
            self.events.emit(GameEvent::PhaseChange { from, to });
        }
    }
}
