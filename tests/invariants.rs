//! Property tests for the simulation invariants

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use blade_rush::Tuning;
use blade_rush::platform::ManualClock;
use blade_rush::sim::{
    FruitKind, GameState, HandInput, Hands, ObjectKind, SimObject, SimulationEngine,
    segment_circle_intersect, split_fruit,
};

fn arb_hand() -> impl Strategy<Value = HandInput> {
    (0.0f32..1.0, 0.0f32..1.0, -4.0f32..4.0, -4.0f32..4.0, any::<bool>())
        .prop_map(|(x, y, vx, vy, active)| HandInput::new(Vec2::new(x, y), Vec2::new(vx, vy), active))
}

fn arb_frame() -> impl Strategy<Value = (f32, Hands)> {
    (0.0f32..0.05, arb_hand(), arb_hand()).prop_map(|(dt, left, right)| (dt, Hands { left, right }))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn time_and_combo_stay_in_range(
        seed in any::<u64>(),
        frames in prop::collection::vec(arb_frame(), 1..400),
    ) {
        let clock = ManualClock::new();
        let mut engine = SimulationEngine::with_parts(
            Tuning::default(),
            Pcg32::seed_from_u64(seed),
            Box::new(clock.clone()),
        );
        let max_time = engine.tuning().max_time;

        for (dt, hands) in &frames {
            clock.advance(f64::from(*dt));
            let summary = engine.update(*dt, hands);
            let state = engine.state();

            prop_assert!(state.time_remaining >= 0.0);
            prop_assert!(state.time_remaining <= max_time);
            prop_assert!(state.best_combo >= state.combo);
            prop_assert!(state.combo_timer >= 0.0);

            // Live set stays sorted, collidable or fading, within generation cap
            prop_assert!(state.objects.windows(2).all(|w| w[0].id < w[1].id));
            for object in &state.objects {
                prop_assert!(object.active);
                prop_assert!(object.generation <= 2);
            }
            for removed in &summary.removed {
                prop_assert!(!removed.active);
                prop_assert!(state.object(removed.id).is_none());
            }
        }
    }

    #[test]
    fn split_children_shrink_by_factor(
        generation in 0u8..3,
        radius in 0.01f32..0.1,
        vx in -5.0f32..5.0,
        vy in -5.0f32..5.0,
    ) {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning);
        let id = state.next_entity_id();
        let mut fruit = SimObject::new(
            id,
            ObjectKind::Fruit(FruitKind::Orange),
            Vec2::new(0.5, 0.5),
            Vec2::ZERO,
            radius,
        );
        fruit.generation = generation;
        state.objects.push(fruit);

        let hand = HandInput::new(Vec2::new(0.5, 0.5), Vec2::new(vx, vy), true);
        let pieces = split_fruit(&mut state, 0, &hand, &tuning);

        prop_assert!(state.objects[0].fading);
        if generation >= 2 {
            prop_assert!(pieces.is_empty());
        } else {
            prop_assert_eq!(pieces.len(), 2);
            for piece in &pieces {
                prop_assert_eq!(piece.generation, generation + 1);
                prop_assert!((piece.radius - radius * 0.7).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn segment_into_circle_always_hits(
        cx in -1.0f32..1.0,
        cy in -1.0f32..1.0,
        r in 0.05f32..0.5,
        angle in 0.0f32..std::f32::consts::TAU,
        extra in 0.01f32..2.0,
    ) {
        // A segment from outside the circle to its center must cross the boundary
        let center = Vec2::new(cx, cy);
        let start = center + Vec2::new(angle.cos(), angle.sin()) * (r + extra);
        prop_assert!(segment_circle_intersect(start, center, center, r));
    }
}
