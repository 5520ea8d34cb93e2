//! Data-driven game balance
//!
//! Every number the simulation uses for difficulty, physics, scoring and hit
//! detection lives in [`Tuning`]. Values can be overridden from JSON; any field
//! left out keeps its default.

use serde::{Deserialize, Serialize};

/// Pieces never split deeper than this
pub const MAX_SPLIT_GENERATION: u8 = 2;

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Countdown ===
    /// Countdown at session start (seconds)
    pub initial_time: f32,
    /// Hard cap for the countdown (seconds)
    pub max_time: f32,
    /// Seconds removed by a bomb hit
    pub time_penalty: f32,
    /// Seconds added by a heart hit
    pub time_bonus: f32,

    // === Spawning / difficulty ===
    /// Spawn interval at elapsed = 0 (seconds)
    pub base_spawn_interval: f32,
    /// Spawn interval floor (seconds)
    pub min_spawn_interval: f32,
    /// Interval reduction per elapsed second
    pub difficulty_rate: f32,
    pub base_bomb_chance: f32,
    pub max_bomb_chance: f32,
    /// Bomb chance increase per elapsed second
    pub bomb_chance_rate: f32,
    pub heart_chance: f32,
    /// Spawn height, above the visible area (y grows downward)
    pub spawn_height: f32,

    // === Physics ===
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Objects further than this outside the screen are removed
    pub despawn_margin: f32,
    pub fruit_radius: f32,
    pub bomb_radius: f32,
    pub heart_radius: f32,

    // === Slicing ===
    /// Seconds without a slice before the combo resets
    pub combo_window: f32,
    /// Hands slower than this (units/s) never cut
    pub min_slice_speed: f32,
    /// Interaction radius around a hand
    pub hand_radius: f32,
    /// Wall-clock seconds before the same object can be hit again
    pub hit_cooldown: f32,
    /// Frame time assumed when reconstructing the previous hand position
    pub assumed_frame_dt: f32,
    /// Radius factor applied to split pieces
    pub split_shrink: f32,
    /// Deepest generation a piece can reach
    pub max_generation: u8,
    /// Seconds a hit object keeps fading before removal
    pub fade_duration: f32,
    /// Fade timer given to objects cleared by a bomb (they vanish sooner)
    pub bomb_clear_fade_head_start: f32,

    // === Scoring ===
    pub base_points: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_time: 30.0,
            max_time: 60.0,
            time_penalty: 5.0,
            time_bonus: 5.0,

            base_spawn_interval: 1.2,
            min_spawn_interval: 0.4,
            difficulty_rate: 0.01,
            base_bomb_chance: 0.08,
            max_bomb_chance: 0.25,
            bomb_chance_rate: 0.002,
            heart_chance: 0.05,
            spawn_height: -0.1,

            gravity: 0.6,
            despawn_margin: 0.2,
            fruit_radius: 0.055,
            bomb_radius: 0.05,
            heart_radius: 0.045,

            combo_window: 1.0,
            min_slice_speed: 0.5,
            hand_radius: 0.04,
            hit_cooldown: 0.3,
            assumed_frame_dt: 1.0 / 60.0,
            split_shrink: 0.7,
            max_generation: MAX_SPLIT_GENERATION,
            fade_duration: 0.6,
            bomb_clear_fade_head_start: 0.3,

            base_points: 10,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("Invalid tuning file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Could not read tuning file {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Clamp every value into a range the simulation can work with
    pub fn sanitized(mut self) -> Self {
        fn non_negative(name: &str, value: &mut f32) {
            if !(*value >= 0.0) {
                log::warn!("tuning.{name} = {value} is invalid, using 0");
                *value = 0.0;
            }
        }
        fn probability(name: &str, value: &mut f32) {
            if !(0.0..=1.0).contains(&*value) {
                let clamped = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
                log::warn!("tuning.{name} = {value} is outside [0, 1], using {clamped}");
                *value = clamped;
            }
        }

        non_negative("max_time", &mut self.max_time);
        non_negative("initial_time", &mut self.initial_time);
        non_negative("time_penalty", &mut self.time_penalty);
        non_negative("time_bonus", &mut self.time_bonus);
        non_negative("min_spawn_interval", &mut self.min_spawn_interval);
        non_negative("base_spawn_interval", &mut self.base_spawn_interval);
        non_negative("difficulty_rate", &mut self.difficulty_rate);
        non_negative("bomb_chance_rate", &mut self.bomb_chance_rate);
        non_negative("combo_window", &mut self.combo_window);
        non_negative("min_slice_speed", &mut self.min_slice_speed);
        non_negative("hand_radius", &mut self.hand_radius);
        non_negative("hit_cooldown", &mut self.hit_cooldown);
        non_negative("assumed_frame_dt", &mut self.assumed_frame_dt);
        non_negative("fade_duration", &mut self.fade_duration);
        non_negative("bomb_clear_fade_head_start", &mut self.bomb_clear_fade_head_start);
        non_negative("despawn_margin", &mut self.despawn_margin);
        probability("base_bomb_chance", &mut self.base_bomb_chance);
        probability("max_bomb_chance", &mut self.max_bomb_chance);
        probability("heart_chance", &mut self.heart_chance);
        probability("split_shrink", &mut self.split_shrink);

        if self.max_generation > MAX_SPLIT_GENERATION {
            log::warn!(
                "tuning.max_generation = {} exceeds {MAX_SPLIT_GENERATION}, clamping",
                self.max_generation
            );
            self.max_generation = MAX_SPLIT_GENERATION;
        }
        if self.initial_time > self.max_time {
            log::warn!(
                "tuning.initial_time {} exceeds max_time {}, clamping",
                self.initial_time,
                self.max_time
            );
            self.initial_time = self.max_time;
        }
        if self.min_spawn_interval > self.base_spawn_interval {
            log::warn!("tuning.min_spawn_interval exceeds base_spawn_interval, clamping");
            self.min_spawn_interval = self.base_spawn_interval;
        }
        if self.base_bomb_chance > self.max_bomb_chance {
            log::warn!("tuning.base_bomb_chance exceeds max_bomb_chance, clamping");
            self.base_bomb_chance = self.max_bomb_chance;
        }
        self
    }
}
