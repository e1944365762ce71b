use proptest::prelude::*;

use crate::allocation::{AllocationError, AllocationSet, Position};

fn position(id: &str, weight: f64, locked: bool) -> Position {
    Position {
        id: id.to_string(),
        label: format!("{} Inc.", id),
        weight,
        locked,
    }
}

/// Three-position basket used across the scenario tests:
/// A unlocked 25, B locked 20, C unlocked 55.
fn sample_set() -> AllocationSet {
    AllocationSet::new(vec![
        position("AAPL", 25.0, false),
        position("MSFT", 20.0, true),
        position("AMZN", 55.0, false),
    ])
}

fn weight_of(set: &AllocationSet, id: &str) -> f64 {
    set.positions()
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.weight)
        .unwrap()
}

// ==================== set_weight ====================

#[test]
fn test_set_weight_touches_only_the_target() {
    let mut set = sample_set();
    let status = set.set_weight("AMZN", 60.0).unwrap();

    assert_eq!(weight_of(&set, "AMZN"), 60.0);
    assert_eq!(weight_of(&set, "AAPL"), 25.0);
    assert_eq!(weight_of(&set, "MSFT"), 20.0);
    assert!(!status.is_valid);
    assert!((status.total_weight - 105.0).abs() < 1e-9);
}

#[test]
fn test_set_weight_clamps_negative_input_to_zero() {
    let mut set = sample_set();
    set.set_weight("AAPL", -15.0).unwrap();
    assert_eq!(weight_of(&set, "AAPL"), 0.0);
}

#[test]
fn test_set_weight_allows_transient_over_100() {
    let mut set = sample_set();
    let status = set.set_weight("AAPL", 250.0).unwrap();
    assert_eq!(weight_of(&set, "AAPL"), 250.0);
    assert!(!status.is_valid);
}

#[test]
fn test_set_weight_rejects_locked_and_unknown_targets() {
    let mut set = sample_set();
    assert_eq!(
        set.set_weight("MSFT", 10.0),
        Err(AllocationError::PositionLocked("MSFT".into()))
    );
    assert_eq!(
        set.set_weight("TSLA", 10.0),
        Err(AllocationError::UnknownPosition("TSLA".into()))
    );
    // Failed operations leave the list untouched
    assert_eq!(set, sample_set());
}

// ==================== distribute_remaining ====================

#[test]
fn test_distribute_remaining_splits_gap_evenly() {
    let mut set = sample_set();
    set.set_weight("AMZN", 45.0).unwrap(); // total 90, remaining 10

    let status = set.distribute_remaining().unwrap();
    assert_eq!(weight_of(&set, "AAPL"), 30.0);
    assert_eq!(weight_of(&set, "MSFT"), 20.0);
    assert_eq!(weight_of(&set, "AMZN"), 50.0);
    assert!(status.is_valid);
}

#[test]
fn test_distribute_remaining_subtracts_when_over_100() {
    let mut set = sample_set();
    set.set_weight("AMZN", 65.0).unwrap(); // total 110, remaining -10

    set.distribute_remaining().unwrap();
    assert_eq!(weight_of(&set, "AAPL"), 20.0);
    assert_eq!(weight_of(&set, "AMZN"), 60.0);
    assert!(set.status().is_valid);
}

#[test]
fn test_distribute_remaining_fails_when_all_locked() {
    let mut set = AllocationSet::new(vec![
        position("AAPL", 40.0, true),
        position("MSFT", 40.0, true),
    ]);
    let before = set.clone();
    assert_eq!(set.distribute_remaining(), Err(AllocationError::AllLocked));
    assert_eq!(set, before);
}

// ==================== reset_equal ====================

#[test]
fn test_reset_equal_overwrites_unlocked_weights() {
    let mut set = sample_set();
    let status = set.reset_equal().unwrap();

    // 100 - 20 locked = 80 across two unlocked positions
    assert_eq!(weight_of(&set, "AAPL"), 40.0);
    assert_eq!(weight_of(&set, "AMZN"), 40.0);
    assert_eq!(weight_of(&set, "MSFT"), 20.0);
    assert!(status.is_valid);
}

#[test]
fn test_reset_equal_is_idempotent() {
    let mut set = sample_set();
    set.reset_equal().unwrap();
    let once = set.clone();
    set.reset_equal().unwrap();
    assert_eq!(set, once);
}

#[test]
fn test_reset_equal_fails_when_all_locked() {
    let mut set = AllocationSet::new(vec![position("AAPL", 100.0, true)]);
    assert_eq!(set.reset_equal(), Err(AllocationError::AllLocked));
    assert_eq!(weight_of(&set, "AAPL"), 100.0);
}

// ==================== redistribute_proportional ====================

#[test]
fn test_redistribute_shrinks_others_proportionally() {
    // Dragging AMZN 55 -> 60: MSFT is locked, so AAPL absorbs the whole
    // +5 (it is 100% of the other unlocked weight).
    let mut set = sample_set();
    let status = set.redistribute_proportional("AMZN", 60.0).unwrap();

    assert_eq!(weight_of(&set, "AAPL"), 20.0);
    assert_eq!(weight_of(&set, "MSFT"), 20.0);
    assert_eq!(weight_of(&set, "AMZN"), 60.0);
    assert!(status.is_valid);
}

#[test]
fn test_redistribute_grows_others_when_target_shrinks() {
    let mut set = AllocationSet::new(vec![
        position("AAPL", 20.0, false),
        position("MSFT", 30.0, false),
        position("AMZN", 50.0, false),
    ]);
    let status = set.redistribute_proportional("AMZN", 30.0).unwrap();

    // The freed 20 goes 20/50 to AAPL and 30/50 to MSFT.
    assert!((weight_of(&set, "AAPL") - 28.0).abs() < 1e-9);
    assert!((weight_of(&set, "MSFT") - 42.0).abs() < 1e-9);
    assert!(status.is_valid);
}

#[test]
fn test_redistribute_splits_evenly_when_others_are_zero() {
    let mut set = AllocationSet::new(vec![
        position("AAPL", 0.0, false),
        position("MSFT", 0.0, false),
        position("AMZN", 100.0, false),
    ]);
    let status = set.redistribute_proportional("AMZN", 60.0).unwrap();

    // With no weight to take proportions from, the freed 40 splits evenly.
    assert_eq!(weight_of(&set, "AAPL"), 20.0);
    assert_eq!(weight_of(&set, "MSFT"), 20.0);
    assert_eq!(weight_of(&set, "AMZN"), 60.0);
    assert!(status.is_valid);
}

#[test]
fn test_redistribute_never_goes_negative_when_locks_overcommit() {
    // Locked 50 + target 60 leaves only -10 for AAPL: it floors at zero and
    // the excess stays visible in the status instead of going negative.
    let mut set = AllocationSet::new(vec![
        position("AAPL", 30.0, false),
        position("MSFT", 50.0, true),
        position("AMZN", 20.0, false),
    ]);
    let status = set.redistribute_proportional("AMZN", 60.0).unwrap();

    assert_eq!(weight_of(&set, "AAPL"), 0.0);
    assert_eq!(weight_of(&set, "MSFT"), 50.0);
    assert_eq!(weight_of(&set, "AMZN"), 60.0);
    assert!(!status.is_valid);
    assert!((status.total_weight - 110.0).abs() < 1e-9);
}

#[test]
fn test_redistribute_without_other_unlocked_positions_only_sets_weight() {
    let mut set = AllocationSet::new(vec![
        position("AAPL", 60.0, true),
        position("AMZN", 40.0, false),
    ]);
    let status = set.redistribute_proportional("AMZN", 20.0).unwrap();
    assert_eq!(weight_of(&set, "AMZN"), 20.0);
    assert_eq!(weight_of(&set, "AAPL"), 60.0);
    assert!(!status.is_valid);
}

// ==================== commit ====================

#[test]
fn test_commit_rounds_and_absorbs_residual_in_first_unlocked() {
    let set = AllocationSet::new(vec![
        position("AAPL", 33.4, false),
        position("MSFT", 33.4, false),
        position("AMZN", 33.2, false),
    ]);
    let committed = set.commit().unwrap();

    // 33 + 33 + 33 = 99, so the first unlocked position takes the +1.
    assert_eq!(committed[0].weight, 34);
    assert_eq!(committed[1].weight, 33);
    assert_eq!(committed[2].weight, 33);
    assert_eq!(committed.iter().map(|p| p.weight).sum::<i32>(), 100);
}

#[test]
fn test_commit_skips_locked_positions_when_absorbing() {
    let set = AllocationSet::new(vec![
        position("AAPL", 33.3, true),
        position("MSFT", 33.3, false),
        position("AMZN", 33.3, false),
    ]);
    let committed = set.commit().unwrap();

    assert_eq!(committed[0].weight, 33); // locked: exact rounding only
    assert_eq!(committed[1].weight, 34);
    assert_eq!(committed[2].weight, 33);
}

#[test]
fn test_commit_fails_when_all_locked_and_sum_off() {
    let set = AllocationSet::new(vec![
        position("AAPL", 49.6, true),
        position("MSFT", 49.6, true),
    ]);
    assert_eq!(set.commit(), Err(AllocationError::AllLocked));
}

#[test]
fn test_commit_succeeds_when_all_locked_but_sum_exact() {
    let set = AllocationSet::new(vec![
        position("AAPL", 60.0, true),
        position("MSFT", 40.0, true),
    ]);
    let committed = set.commit().unwrap();
    assert_eq!(committed.iter().map(|p| p.weight).sum::<i32>(), 100);
}

// ==================== lifecycle ====================

#[test]
fn test_add_remove_and_toggle_lock() {
    let mut set = sample_set();

    assert!(set.add("TSLA", "Tesla Inc."));
    assert!(!set.add("TSLA", "Tesla Inc."));
    assert_eq!(weight_of(&set, "TSLA"), 0.0);

    assert!(set.toggle_lock("TSLA").unwrap());
    assert!(!set.toggle_lock("TSLA").unwrap());
    assert_eq!(
        set.toggle_lock("NFLX"),
        Err(AllocationError::UnknownPosition("NFLX".into()))
    );

    assert!(set.remove("TSLA"));
    assert!(!set.remove("TSLA"));
    assert_eq!(set.len(), 3);
}

// ==================== properties ====================

prop_compose! {
    fn arb_positions(max_len: usize)
        (entries in prop::collection::vec((0.0f64..100.0, any::<bool>()), 1..max_len))
        -> Vec<Position>
    {
        entries
            .into_iter()
            .enumerate()
            .map(|(idx, (weight, locked))| position(&format!("SYM{}", idx), weight, locked))
            .collect()
    }
}

proptest! {
    /// Commit either yields integer weights summing to exactly 100, or the
    /// explicit all-locked failure - and the failure happens iff every
    /// position is locked and the rounded sum misses 100.
    #[test]
    fn prop_commit_sum_or_explicit_failure(positions in arb_positions(8)) {
        let set = AllocationSet::new(positions.clone());
        let rounded_sum: i32 = positions.iter().map(|p| p.weight.round() as i32).sum();
        let any_unlocked = positions.iter().any(|p| !p.locked);

        match set.commit() {
            Ok(committed) => {
                prop_assert_eq!(committed.iter().map(|p| p.weight).sum::<i32>(), 100);
                prop_assert!(any_unlocked || rounded_sum == 100);
                // Locked positions keep their exact rounding.
                for (before, after) in positions.iter().zip(&committed) {
                    if before.locked {
                        prop_assert_eq!(after.weight, before.weight.round() as i32);
                    }
                }
            }
            Err(AllocationError::AllLocked) => {
                prop_assert!(!any_unlocked && rounded_sum != 100);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// No operation ever moves a locked weight.
    #[test]
    fn prop_locked_weights_never_move(
        positions in arb_positions(8),
        target in 0usize..8,
        value in -50.0f64..150.0,
    ) {
        let target_id = format!("SYM{}", target % positions.len());
        let before = positions.clone();

        for op_index in 0..4 {
            let mut set = AllocationSet::new(before.clone());
            match op_index {
                0 => {
                    let _ = set.set_weight(&target_id, value);
                }
                1 => {
                    let _ = set.distribute_remaining();
                }
                2 => {
                    let _ = set.reset_equal();
                }
                _ => {
                    let _ = set.redistribute_proportional(&target_id, value);
                }
            }
            for (b, a) in before.iter().zip(set.positions()) {
                if b.locked {
                    prop_assert_eq!(b.weight, a.weight);
                }
            }
        }
    }

    /// distribute_remaining adds exactly remaining/unlocked_count to each
    /// unlocked position.
    #[test]
    fn prop_distribute_remaining_additivity(positions in arb_positions(8)) {
        prop_assume!(positions.iter().any(|p| !p.locked));

        let total_before: f64 = positions.iter().map(|p| p.weight).sum();
        let unlocked_count = positions.iter().filter(|p| !p.locked).count();
        let share = (100.0 - total_before) / unlocked_count as f64;

        let mut set = AllocationSet::new(positions.clone());
        set.distribute_remaining().unwrap();

        for (b, a) in positions.iter().zip(set.positions()) {
            if !b.locked {
                prop_assert!((a.weight - (b.weight + share)).abs() < 1e-9);
            }
        }
    }

    /// reset_equal makes every unlocked weight identical, and running it
    /// twice changes nothing further.
    #[test]
    fn prop_reset_equal_uniform_and_idempotent(positions in arb_positions(8)) {
        prop_assume!(positions.iter().any(|p| !p.locked));

        let locked_sum: f64 = positions.iter().filter(|p| p.locked).map(|p| p.weight).sum();
        let unlocked_count = positions.iter().filter(|p| !p.locked).count();
        let expected = (100.0 - locked_sum) / unlocked_count as f64;

        let mut set = AllocationSet::new(positions);
        set.reset_equal().unwrap();
        for p in set.positions() {
            if !p.locked {
                prop_assert!((p.weight - expected).abs() < 1e-9);
            }
        }

        let once = set.clone();
        set.reset_equal().unwrap();
        prop_assert_eq!(set, once);
    }

    /// Slider redistribution over a fully unlocked, valid set restores the
    /// invariant in the same call and never produces a negative weight.
    #[test]
    fn prop_redistribute_conserves_total(
        len in 2usize..8,
        target in 0usize..8,
        value in 0.0f64..100.0,
    ) {
        let positions: Vec<Position> = (0..len)
            .map(|idx| position(&format!("SYM{}", idx), 100.0 / len as f64, false))
            .collect();
        let target_id = format!("SYM{}", target % len);

        let mut set = AllocationSet::new(positions);
        let status = set.redistribute_proportional(&target_id, value).unwrap();

        prop_assert!((status.total_weight - 100.0).abs() <= 0.01);
        for p in set.positions() {
            prop_assert!(p.weight >= 0.0);
        }
    }
}
