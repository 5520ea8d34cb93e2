//! Game state and core simulation types
//!
//! Everything the engine mutates during a frame lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Tuning;
use crate::consts::INITIAL_SLICES;

/// Current phase of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh session, starts running on the first update
    Ready,
    /// Active gameplay
    Running,
    /// Game is paused, updates are no-ops
    Paused,
    /// Countdown ran out, terminal until reset
    GameOver,
}

/// Cosmetic fruit subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FruitKind {
    Apple,
    Orange,
    Lemon,
    Watermelon,
    Pineapple,
    Strawberry,
    Grapes,
    Peach,
}

impl FruitKind {
    pub const ALL: [FruitKind; 8] = [
        FruitKind::Apple,
        FruitKind::Orange,
        FruitKind::Lemon,
        FruitKind::Watermelon,
        FruitKind::Pineapple,
        FruitKind::Strawberry,
        FruitKind::Grapes,
        FruitKind::Peach,
    ];
}

/// What a falling object is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Fruit(FruitKind),
    Bomb,
    Heart,
}

impl ObjectKind {
    /// Spawn radius for this kind
    pub fn radius(&self, tuning: &Tuning) -> f32 {
        match self {
            ObjectKind::Fruit(_) => tuning.fruit_radius,
            ObjectKind::Bomb => tuning.bomb_radius,
            ObjectKind::Heart => tuning.heart_radius,
        }
    }
}

/// A falling object (whole fruit, fruit piece, bomb or heart)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimObject {
    pub id: u32,
    pub kind: ObjectKind,
    /// Normalized screen position, y grows downward
    pub pos: Vec2,
    /// Units per second
    pub vel: Vec2,
    pub radius: f32,
    /// Cosmetic rotation (radians)
    pub rotation: f32,
    /// Radians added per update call
    pub rotation_speed: f32,
    /// False once evicted from the live set
    pub active: bool,
    /// Split depth: 0 for a fresh spawn
    pub generation: u8,
    /// Further cuts this piece allows
    pub slices_left: u8,
    /// Terminal post-hit state: still moves, no longer collides
    pub fading: bool,
    /// Seconds spent fading
    pub fade_timer: f32,
}

impl SimObject {
    pub fn new(id: u32, kind: ObjectKind, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            radius,
            rotation: 0.0,
            rotation_speed: 0.0,
            active: true,
            generation: 0,
            slices_left: INITIAL_SLICES,
            fading: false,
            fade_timer: 0.0,
        }
    }

    /// Active and not fading
    #[inline]
    pub fn is_collidable(&self) -> bool {
        self.active && !self.fading
    }

    #[inline]
    pub fn is_fruit(&self) -> bool {
        matches!(self.kind, ObjectKind::Fruit(_))
    }

    /// Enter the fading state with a fresh timer
    pub fn start_fade(&mut self) {
        self.start_fade_at(0.0);
    }

    /// Enter the fading state with the timer already advanced
    pub fn start_fade_at(&mut self, fade_timer: f32) {
        if !self.fading {
            self.fading = true;
            self.fade_timer = fade_timer;
        }
    }

    /// 1.0 when the fade starts, 0.0 when the object is about to be removed
    pub fn fade_fraction(&self, fade_duration: f32) -> f32 {
        if !self.fading {
            return 1.0;
        }
        if fade_duration <= 0.0 {
            return 0.0;
        }
        (1.0 - self.fade_timer / fade_duration).clamp(0.0, 1.0)
    }
}

/// Session counters, not used by gameplay rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub fruits_sliced: u32,
    pub bombs_hit: u32,
    pub hearts_collected: u32,
    pub objects_spawned: u32,
    /// Whole fruits that fell off screen without being cut
    pub objects_missed: u32,
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    /// Current slice streak
    pub combo: u32,
    pub best_combo: u32,
    /// Seconds left before the combo resets
    pub combo_timer: f32,
    /// Countdown, always within [0, max_time]
    pub time_remaining: f32,
    /// Seconds since session start
    pub elapsed: f32,
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub bomb_chance: f32,
    pub heart_chance: f32,
    pub stats: GameStats,
    /// Live objects, sorted by id
    pub objects: Vec<SimObject>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh session state
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::Ready,
            score: 0,
            combo: 0,
            best_combo: 0,
            combo_timer: 0.0,
            time_remaining: tuning.initial_time,
            elapsed: 0.0,
            spawn_timer: 0.0,
            spawn_interval: tuning.base_spawn_interval,
            bomb_chance: tuning.base_bomb_chance,
            heart_chance: tuning.heart_chance,
            stats: GameStats::default(),
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Index of a live object by id
    pub fn object_index(&self, id: u32) -> Option<usize> {
        self.objects.binary_search_by_key(&id, |o| o.id).ok()
    }

    pub fn object(&self, id: u32) -> Option<&SimObject> {
        self.object_index(id).map(|i| &self.objects[i])
    }

    /// Ensure objects are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.objects.sort_by_key(|o| o.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_uses_tuning() {
        let tuning = Tuning::default();
        let state = GameState::new(&tuning);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.time_remaining, tuning.initial_time);
        assert_eq!(state.spawn_interval, tuning.base_spawn_interval);
        assert!(state.objects.is_empty());
    }

    #[test]
    fn test_entity_ids_are_monotonic() {
        let mut state = GameState::new(&Tuning::default());
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_start_fade_keeps_first_timer() {
        let mut obj = SimObject::new(1, ObjectKind::Bomb, Vec2::ZERO, Vec2::ZERO, 0.05);
        assert!(obj.is_collidable());
        obj.start_fade_at(0.3);
        obj.start_fade();
        assert!(obj.fading);
        assert!(!obj.is_collidable());
        assert_eq!(obj.fade_timer, 0.3);
        assert!((obj.fade_fraction(0.6) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_object_lookup_by_id() {
        let mut state = GameState::new(&Tuning::default());
        for _ in 0..3 {
            let id = state.next_entity_id();
            state.objects.push(SimObject::new(
                id,
                ObjectKind::Heart,
                Vec2::ZERO,
                Vec2::ZERO,
                0.04,
            ));
        }
        assert_eq!(state.object_index(2), Some(1));
        assert!(state.object(7).is_none());
    }
}
