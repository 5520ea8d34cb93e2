//! Blade hit detection
//!
//! A hand cuts an object when it is moving fast enough and either overlaps the
//! object this frame or swept through it since the previous frame. The swept
//! test reconstructs the previous hand position from its velocity and checks
//! the travelled segment against the object's circle, so fast swipes cannot
//! tunnel through small pieces between frames.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::SimObject;
use crate::Tuning;

/// Tracked hand snapshot for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HandInput {
    pub pos: Vec2,
    /// Units per second
    pub vel: Vec2,
    /// |vel|
    pub speed: f32,
    /// Hand detected and in blade posture
    pub active: bool,
}

impl HandInput {
    pub fn new(pos: Vec2, vel: Vec2, active: bool) -> Self {
        Self {
            pos,
            vel,
            speed: vel.length(),
            active,
        }
    }

    /// No hand on this side
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Which hand produced a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    /// Order in which sides are tested against each object
    pub const ORDER: [HandSide; 2] = [HandSide::Left, HandSide::Right];
}

/// Both hands for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hands {
    pub left: HandInput,
    pub right: HandInput,
}

impl Hands {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn get(&self, side: HandSide) -> &HandInput {
        match side {
            HandSide::Left => &self.left,
            HandSide::Right => &self.right,
        }
    }
}

/// One detected cut
#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord {
    /// Object as it was when hit
    pub object: SimObject,
    pub hand: HandInput,
    pub side: HandSide,
}

/// Segment vs circle intersection
///
/// Solves `|start + t·d - center|² = radius²` for t and reports a hit if a
/// root lies in [0, 1].
pub fn segment_circle_intersect(start: Vec2, end: Vec2, center: Vec2, radius: f32) -> bool {
    let d = end - start;
    let f = start - center;

    let a = d.length_squared();
    if a < f32::EPSILON {
        // Degenerate segment
        return f.length_squared() <= radius * radius;
    }
    let b = 2.0 * f.dot(d);
    let c = f.length_squared() - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return false;
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);

    (0.0..=1.0).contains(&t1) || (0.0..=1.0).contains(&t2)
}

/// Check whether a single hand cuts an object this frame
pub fn check_collision(hand: &HandInput, object: &SimObject, tuning: &Tuning) -> bool {
    if !hand.active || hand.speed < tuning.min_slice_speed {
        return false;
    }

    let reach = tuning.hand_radius + object.radius;

    // Static overlap
    if hand.pos.distance(object.pos) < reach {
        return true;
    }

    // Swept test over one assumed frame
    let prev = hand.pos - hand.vel * tuning.assumed_frame_dt;
    segment_circle_intersect(prev, hand.pos, object.pos, reach)
}

/// Hit detection with a per-object cooldown
#[derive(Debug, Clone, Default)]
pub struct CollisionSystem {
    /// Object id -> wall-clock seconds of its last hit
    cooldowns: HashMap<u32, f64>,
}

impl CollisionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop cooldown entries older than the cooldown window
    pub fn prune(&mut self, now: f64, cooldown: f32) {
        let window = f64::from(cooldown);
        self.cooldowns.retain(|_, hit_at| now - *hit_at < window);
    }

    pub fn is_cooling_down(&self, id: u32) -> bool {
        self.cooldowns.contains_key(&id)
    }

    pub fn cooldown_count(&self) -> usize {
        self.cooldowns.len()
    }

    pub fn clear(&mut self) {
        self.cooldowns.clear();
    }

    /// Find every object cut this frame
    ///
    /// `objects` should already be limited to collidable objects. Each object
    /// is hit by at most one hand, the first in [`HandSide::ORDER`].
    pub fn check_all<'a>(
        &mut self,
        hands: &Hands,
        objects: impl IntoIterator<Item = &'a SimObject>,
        now: f64,
        tuning: &Tuning,
    ) -> Vec<HitRecord> {
        self.prune(now, tuning.hit_cooldown);

        let mut hits = Vec::new();
        for object in objects {
            if self.is_cooling_down(object.id) {
                continue;
            }
            for side in HandSide::ORDER {
                let hand = hands.get(side);
                if check_collision(hand, object, tuning) {
                    log::debug!("{side:?} hand hit object {} ({:?})", object.id, object.kind);
                    hits.push(HitRecord {
                        object: object.clone(),
                        hand: *hand,
                        side,
                    });
                    self.cooldowns.insert(object.id, now);
                    break;
                }
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{FruitKind, ObjectKind};

    fn fruit_at(id: u32, x: f32, y: f32) -> SimObject {
        SimObject::new(
            id,
            ObjectKind::Fruit(FruitKind::Apple),
            Vec2::new(x, y),
            Vec2::ZERO,
            0.05,
        )
    }

    fn fast_hand(x: f32, y: f32) -> HandInput {
        HandInput::new(Vec2::new(x, y), Vec2::new(2.0, 0.0), true)
    }

    #[test]
    fn test_segment_circle_through_center() {
        assert!(segment_circle_intersect(
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::ZERO,
            0.1
        ));
    }

    #[test]
    fn test_segment_circle_miss_negative_discriminant() {
        assert!(!segment_circle_intersect(
            Vec2::new(-1.0, 0.5),
            Vec2::new(1.0, 0.5),
            Vec2::ZERO,
            0.1
        ));
    }

    #[test]
    fn test_segment_circle_root_outside_segment() {
        // Infinite line crosses the circle, segment stops short of it
        assert!(!segment_circle_intersect(
            Vec2::new(-1.0, 0.0),
            Vec2::new(-0.5, 0.0),
            Vec2::ZERO,
            0.1
        ));
    }

    #[test]
    fn test_segment_circle_degenerate_segment() {
        let p = Vec2::new(0.05, 0.0);
        assert!(segment_circle_intersect(p, p, Vec2::ZERO, 0.1));
        let q = Vec2::new(0.5, 0.0);
        assert!(!segment_circle_intersect(q, q, Vec2::ZERO, 0.1));
    }

    #[test]
    fn test_static_overlap_hits() {
        let tuning = Tuning::default();
        let obj = fruit_at(1, 0.5, 0.5);
        assert!(check_collision(&fast_hand(0.52, 0.5), &obj, &tuning));
    }

    #[test]
    fn test_slow_hand_never_hits() {
        let tuning = Tuning::default();
        let obj = fruit_at(1, 0.5, 0.5);
        let hand = HandInput::new(Vec2::new(0.5, 0.5), Vec2::new(0.1, 0.0), true);
        assert!(!check_collision(&hand, &obj, &tuning));
    }

    #[test]
    fn test_inactive_hand_never_hits() {
        let tuning = Tuning::default();
        let obj = fruit_at(1, 0.5, 0.5);
        let hand = HandInput::new(Vec2::new(0.5, 0.5), Vec2::new(3.0, 0.0), false);
        assert!(!check_collision(&hand, &obj, &tuning));
    }

    #[test]
    fn test_swept_hit_when_hand_passed_through() {
        let tuning = Tuning::default();
        let obj = fruit_at(1, 0.5, 0.5);
        // Moved 0.2 units in 1/60 s, now well past the object
        let hand = HandInput::new(Vec2::new(0.65, 0.5), Vec2::new(12.0, 0.0), true);
        assert!(hand.pos.distance(obj.pos) > tuning.hand_radius + obj.radius);
        assert!(check_collision(&hand, &obj, &tuning));
    }

    #[test]
    fn test_swept_miss_when_moving_away() {
        let tuning = Tuning::default();
        let obj = fruit_at(1, 0.5, 0.5);
        let hand = HandInput::new(Vec2::new(0.65, 0.5), Vec2::new(-12.0, 0.0), true);
        assert!(!check_collision(&hand, &obj, &tuning));
    }

    #[test]
    fn test_first_side_wins() {
        let tuning = Tuning::default();
        let mut system = CollisionSystem::new();
        let obj = fruit_at(1, 0.5, 0.5);
        let hands = Hands {
            left: fast_hand(0.5, 0.5),
            right: fast_hand(0.5, 0.5),
        };
        let hits = system.check_all(&hands, [&obj], 0.0, &tuning);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].side, HandSide::Left);
    }

    #[test]
    fn test_cooldown_blocks_until_window_elapses() {
        let tuning = Tuning::default();
        let mut system = CollisionSystem::new();
        let obj = fruit_at(7, 0.5, 0.5);
        let hands = Hands {
            left: HandInput::absent(),
            right: fast_hand(0.5, 0.5),
        };

        assert_eq!(system.check_all(&hands, [&obj], 10.0, &tuning).len(), 1);
        assert!(system.is_cooling_down(7));
        assert!(system.check_all(&hands, [&obj], 10.1, &tuning).is_empty());
        assert!(system.check_all(&hands, [&obj], 10.29, &tuning).is_empty());

        let hits = system.check_all(&hands, [&obj], 10.31, &tuning);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].side, HandSide::Right);
    }

    #[test]
    fn test_prune_drops_stale_entries() {
        let tuning = Tuning::default();
        let mut system = CollisionSystem::new();
        let objs = [fruit_at(1, 0.2, 0.5), fruit_at(2, 0.8, 0.5)];
        let hands = Hands {
            left: fast_hand(0.2, 0.5),
            right: fast_hand(0.8, 0.5),
        };
        assert_eq!(system.check_all(&hands, &objs, 0.0, &tuning).len(), 2);
        assert_eq!(system.cooldown_count(), 2);
        system.prune(1.0, tuning.hit_cooldown);
        assert_eq!(system.cooldown_count(), 0);
    }
}
