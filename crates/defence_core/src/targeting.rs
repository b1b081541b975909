//! Targeting resolver.
//!
//! Each targeter kind resolves the live enemy set into the set it will
//! affect this firing. Strategies are pluggable behind
//! [`TargetingStrategy`]; the engine dispatches on
//! [`TargeterKind`](crate::blocks::TargeterKind) and never hard-codes a
//! strategy.
//!
//! All range tests compare squared distances against range² - no square
//! roots in the selection path. Enemies are enumerated in ascending ID
//! order, so "ties broken arbitrarily" is deterministic and
//! replay-stable.

use std::collections::BTreeSet;

use crate::blocks::{TargeterKind, TowerTargeter};
use crate::enemy::{EnemyId, EnemyQuery};
use crate::math::Vec3Fixed;

/// A strategy resolving the current target set for one firing.
pub trait TargetingStrategy {
    /// Select the enemies the targeter affects this cycle.
    ///
    /// `position` is the targeter block's world position. An empty
    /// result is the normal no-enemy-in-range outcome, not an error.
    fn select_targets(
        &self,
        position: Vec3Fixed,
        targeter: &TowerTargeter,
        enemies: &dyn EnemyQuery,
    ) -> BTreeSet<EnemyId>;
}

/// Targets the single enemy most advanced toward the shrine.
///
/// Among enemies in range, picks the one with the smallest
/// path-progress step; ties go to the first enumerated.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleTargeter;

impl TargetingStrategy for SingleTargeter {
    fn select_targets(
        &self,
        position: Vec3Fixed,
        targeter: &TowerTargeter,
        enemies: &dyn EnemyQuery,
    ) -> BTreeSet<EnemyId> {
        let in_range = enemies.enemies_in_range(position, targeter.range);

        in_range
            .into_iter()
            .filter_map(|id| enemies.path_step(id).map(|step| (id, step)))
            .min_by_key(|&(_, step)| step)
            .map(|(id, _)| id)
            .into_iter()
            .collect()
    }
}

/// Targets every enemy within range.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphereTargeter;

impl TargetingStrategy for SphereTargeter {
    fn select_targets(
        &self,
        position: Vec3Fixed,
        targeter: &TowerTargeter,
        enemies: &dyn EnemyQuery,
    ) -> BTreeSet<EnemyId> {
        enemies
            .enemies_in_range(position, targeter.range)
            .into_iter()
            .collect()
    }
}

/// Targets one enemy and arcs to nearby enemies.
///
/// The primary target is chosen like [`SingleTargeter`]; each arc then
/// jumps from the last enemy hit to the nearest untargeted enemy within
/// the chain range, until the chain length is exhausted or no enemy is
/// reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainTargeter;

impl TargetingStrategy for ChainTargeter {
    fn select_targets(
        &self,
        position: Vec3Fixed,
        targeter: &TowerTargeter,
        enemies: &dyn EnemyQuery,
    ) -> BTreeSet<EnemyId> {
        let mut targets = SingleTargeter.select_targets(position, targeter, enemies);
        let Some(&primary) = targets.iter().next() else {
            return targets;
        };

        let mut last = primary;
        while (targets.len() as u32) < targeter.chain_length {
            let Some(last_pos) = enemies.position(last) else {
                break;
            };
            let next = enemies
                .enemies_in_range(last_pos, targeter.chain_range)
                .into_iter()
                .filter(|id| !targets.contains(id))
                .filter_map(|id| enemies.position(id).map(|pos| (id, pos)))
                .min_by_key(|&(_, pos)| pos.distance_squared(last_pos));

            match next {
                Some((id, _)) => {
                    targets.insert(id);
                    last = id;
                }
                None => break,
            }
        }

        targets
    }
}

/// The strategy implementing a targeter kind.
#[must_use]
pub fn strategy_for(kind: TargeterKind) -> &'static dyn TargetingStrategy {
    match kind {
        TargeterKind::Single => &SingleTargeter,
        TargeterKind::Sphere => &SphereTargeter,
        TargeterKind::Chain => &ChainTargeter,
    }
}
