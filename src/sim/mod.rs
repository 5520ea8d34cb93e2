//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay free of I/O:
//! - Randomness comes from the injected generator only
//! - Wall-clock time comes from the injected clock only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or tracking dependencies

pub mod collision;
pub mod engine;
pub mod events;
pub mod spawn;
pub mod split;
pub mod state;

pub use collision::{
    CollisionSystem, HandInput, HandSide, Hands, HitRecord, check_collision,
    segment_circle_intersect,
};
pub use engine::{FrameSummary, SimulationEngine};
pub use events::{EventBus, EventListener, GameEvent};
pub use spawn::{batch_size, difficulty, roll_kind, spawn_batch};
pub use split::{split_direction, split_fruit};
pub use state::{FruitKind, GamePhase, GameState, GameStats, ObjectKind, SimObject};
