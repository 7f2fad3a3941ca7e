//! Property tests for the shortest-path planner.

use proptest::prelude::*;
use stepper_indexer::{plan_move, Direction, RevolutionGeometry, Steps};

proptest! {
    #[test]
    fn round_trip_has_matching_lengths(
        a in 0_i64..3200,
        b in 0_i64..3200,
    ) {
        let geometry = RevolutionGeometry::default();
        let there = plan_move(Steps(a), Steps(b), false, &geometry);
        let back = plan_move(there.effective_target, Steps(a), false, &geometry);
        prop_assert_eq!(back.effective_target, Steps(a));
        // Only the half-turn tie goes the same way both times
        if there.step_count != 1600 && there.step_count != 0 {
            prop_assert_eq!(back.direction, there.direction.opposite());
        }
        prop_assert_eq!(back.step_count, there.step_count);
    }

    #[test]
    fn inversion_is_half_a_turn_away(
        current in 0_i64..3200,
        target in 0_i64..3200,
    ) {
        let geometry = RevolutionGeometry::default();
        let plain = plan_move(Steps(current), Steps(target), false, &geometry);
        let inverted = plan_move(Steps(current), Steps(target), true, &geometry);
        prop_assert_eq!(
            (inverted.effective_target.0 - plain.effective_target.0).rem_euclid(3200),
            1600
        );
        prop_assert_eq!(plain.step_count + inverted.step_count, 1600);
    }
}

#[test]
fn zero_delta_reports_forward() {
    let plan = plan_move(Steps(3200), Steps(0), false, &RevolutionGeometry::default());
    assert_eq!(plan.step_count, 0);
    assert_eq!(plan.direction, Direction::Forward);
}
