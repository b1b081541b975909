//! Power ledger.
//!
//! Pure queries over a tower's constituent sets. Nothing here is
//! cached: constituents mutate independently through tower-changed
//! signals, so every firing recomputes the balance from the store.
//! Blocks missing from the store (mid-teardown) contribute zero.

use crate::blocks::BlockStore;
use crate::tower::Tower;

/// Total power produced by a tower's cores.
///
/// Zero if the tower has no cores.
#[must_use]
pub fn total_power(tower: &Tower, store: &BlockStore) -> i32 {
    tower
        .cores
        .iter()
        .filter_map(|&id| store.core(id))
        .map(|core| core.power)
        .sum()
}

/// Total power drained by a tower's targeters.
///
/// Zero if the tower has no targeters.
#[must_use]
pub fn targeter_drain(tower: &Tower, store: &BlockStore) -> i32 {
    tower
        .targeters
        .iter()
        .filter_map(|&id| store.targeter(id))
        .map(|targeter| targeter.drain)
        .sum()
}

/// Total power drained by a tower's effectors.
///
/// Zero if the tower has no effectors.
#[must_use]
pub fn effector_drain(tower: &Tower, store: &BlockStore) -> i32 {
    tower
        .effectors
        .iter()
        .filter_map(|&id| store.effector(id))
        .map(|effector| effector.drain)
        .sum()
}

/// Whether the tower produces enough power to fire.
///
/// Production equal to consumption is enough.
#[must_use]
pub fn can_fire(tower: &Tower, store: &BlockStore) -> bool {
    total_power(tower, store) >= targeter_drain(tower, store) + effector_drain(tower, store)
}
