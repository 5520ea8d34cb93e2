//! Notifications for rendering, audio and UI
//!
//! The engine reports everything that happens during `update` as a
//! [`GameEvent`]. Listeners see them synchronously, in pipeline order, and the
//! same events are returned in the frame summary.

use serde::Serialize;

use super::collision::{HandInput, HandSide};
use super::state::{GamePhase, SimObject};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// New object entered the live set (spawned or split piece)
    Spawn(SimObject),
    /// Fruit was cut
    Slice {
        object: SimObject,
        hand: HandInput,
        side: HandSide,
        combo: u32,
        pieces: Vec<SimObject>,
    },
    Bomb(SimObject),
    Heart(SimObject),
    Score { score: u64, combo: u32 },
    TimeChange { time_remaining: f32 },
    /// Object left the live set
    Remove(SimObject),
    /// Whole fruit fell off screen uncut. Notification only: score, combo
    /// and countdown are unaffected.
    Miss(SimObject),
    PhaseChange { from: GamePhase, to: GamePhase },
}

/// Receives engine notifications
pub trait EventListener {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> EventListener for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Fans events out to listeners and keeps a per-frame log
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn EventListener>>,
    log: Vec<GameEvent>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("log", &self.log.len())
            .finish()
    }
}

impl EventBus {
    pub fn subscribe(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.push(listener);
    }

    pub fn emit(&mut self, event: GameEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
        self.log.push(event);
    }

    /// Take the events emitted since the last drain
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.log)
    }
}
