//! Fruit splitting
//!
//! A cut fruit becomes two smaller pieces flying apart perpendicular to the
//! blade. Pieces at the deepest generation just fade out.

use glam::Vec2;

use super::collision::HandInput;
use super::state::{GameState, SimObject};
use crate::Tuning;
use crate::consts::*;
use crate::perpendicular;

/// Unit direction the pieces separate along
///
/// Perpendicular to the blade; a (near) stationary blade falls back to
/// horizontal.
pub fn split_direction(hand_vel: Vec2) -> Vec2 {
    let speed = hand_vel.length();
    if speed < SPLIT_EPSILON {
        return Vec2::X;
    }
    perpendicular(hand_vel / speed)
}

/// Separation speed for a blade moving at `hand_speed`
#[inline]
pub fn spread_speed(hand_speed: f32) -> f32 {
    (SPLIT_BASE_SPREAD + hand_speed * SPLIT_SPREAD_PER_SPEED).min(SPLIT_MAX_SPREAD)
}

/// Split the object at `index`, appending pieces to the live set
///
/// The parent always starts fading. Returns the new pieces, empty when the
/// parent was already at the deepest generation.
pub fn split_fruit(
    state: &mut GameState,
    index: usize,
    hand: &HandInput,
    tuning: &Tuning,
) -> Vec<SimObject> {
    let parent = state.objects[index].clone();
    state.objects[index].start_fade();

    if parent.generation >= tuning.max_generation {
        return Vec::new();
    }

    let dir = split_direction(hand.vel);
    let spread = spread_speed(hand.speed);
    let upward = Vec2::new(0.0, -SPLIT_UPWARD_BIAS);
    let offset = dir * parent.radius * 0.5;
    let radius = parent.radius * tuning.split_shrink;

    // (side sign, share of blade velocity carried)
    let sides = [(1.0, 0.15), (-1.0, 0.1)];
    let mut pieces = Vec::with_capacity(sides.len());
    for (sign, carry) in sides {
        let mut piece = SimObject::new(
            state.next_entity_id(),
            parent.kind,
            parent.pos + offset * sign,
            parent.vel + dir * spread * sign + hand.vel * carry + upward,
            radius,
        );
        piece.rotation = parent.rotation;
        piece.rotation_speed = parent.rotation_speed * 1.5 * sign;
        piece.generation = parent.generation + 1;
        piece.slices_left = parent.slices_left.saturating_sub(1);

        state.objects.push(piece.clone());
        pieces.push(piece);
    }

    log::debug!(
        "Split #{} (gen {}) into #{} and #{}",
        parent.id,
        parent.generation,
        pieces[0].id,
        pieces[1].id
    );
    pieces
}
