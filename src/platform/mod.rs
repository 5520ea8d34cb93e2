//! Platform abstraction layer
//!
//! Handles differences between live play and scripted runs for:
//! - Wall-clock time (hit cooldowns are measured in real seconds, not sim time)

pub mod time;

pub use time::{Clock, ManualClock, SystemClock};
