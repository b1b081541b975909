//! Effect lifecycle engine.
//!
//! One firing of a targeter diffs the freshly resolved target set
//! against the set stored from the previous cycle, applies effects
//! according to each effector's count policy, removes lasting effects
//! from enemies that fell out of range, and overwrites the stored set.
//!
//! The count and duration policies are closed enums, so a block with an
//! unrecognized policy cannot reach this engine; the catalog rejects it
//! at load time.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::blocks::{BlockId, BlockStore, EffectCount, EffectDuration, EffectorKind};
use crate::enemy::{EnemyId, EnemyQuery};
use crate::math::{fixed_serde, Fixed};
use crate::targeting::strategy_for;
use crate::tower::Tower;

/// Notification that an effector applied its effect to an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectApplication {
    /// The effector block applying the effect.
    pub effector: BlockId,
    /// Which effect was applied.
    pub kind: EffectorKind,
    /// The affected enemy.
    pub enemy: EnemyId,
    /// The firing targeter's multiplier.
    #[serde(with = "fixed_serde")]
    pub multiplier: Fixed,
}

/// Notification that an effector removed its effect from an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectRemoval {
    /// The effector block removing the effect.
    pub effector: BlockId,
    /// Which effect was removed.
    pub kind: EffectorKind,
    /// The enemy losing the effect.
    pub enemy: EnemyId,
    /// The firing targeter's multiplier.
    #[serde(with = "fixed_serde")]
    pub multiplier: Fixed,
}

/// Everything one firing produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FireReport {
    /// The resolved target set, now stored on the targeter.
    pub targets: BTreeSet<EnemyId>,
    /// Effect applications, in target-then-effector order.
    pub applied: Vec<EffectApplication>,
    /// Lasting-effect removals for enemies that left the target set.
    pub removed: Vec<EffectRemoval>,
}

/// Fire one targeter of a tower.
///
/// Resolves targets through the targeter's strategy, applies and
/// removes effects per policy, and overwrites the targeter's stored
/// previous-target set with the new one. Returns an empty report if the
/// targeter is not present in the store.
pub fn fire_targeter(
    tower: &Tower,
    targeter_id: BlockId,
    store: &mut BlockStore,
    enemies: &dyn EnemyQuery,
) -> FireReport {
    let Some(entity) = store.get(targeter_id) else {
        return FireReport::default();
    };
    let position = entity.pos.to_world();
    let Some(targeter) = entity.capability.as_targeter() else {
        return FireReport::default();
    };

    let multiplier = targeter.multiplier;
    let previous = targeter.last_targets.clone();
    let current = strategy_for(targeter.kind).select_targets(position, targeter, enemies);

    let newly_left: BTreeSet<EnemyId> = previous.difference(&current).copied().collect();

    let mut report = FireReport {
        targets: current.clone(),
        applied: Vec::new(),
        removed: Vec::new(),
    };

    for &enemy in &current {
        // Re-entry after a full cycle outside the set counts as new,
        // so a continuous effect restarts rather than being skipped.
        let is_new = !previous.contains(&enemy);
        for &effector_id in &tower.effectors {
            let Some(effector) = store.effector(effector_id) else {
                continue;
            };
            let applies = match effector.count {
                EffectCount::PerShot => true,
                EffectCount::Continuous => is_new,
            };
            if applies {
                report.applied.push(EffectApplication {
                    effector: effector_id,
                    kind: effector.kind,
                    enemy,
                    multiplier,
                });
            }
        }
    }

    for &enemy in &newly_left {
        report
            .removed
            .extend(end_effects(&tower.effectors, store, enemy, multiplier));
    }

    if let Some(targeter) = store.targeter_mut(targeter_id) {
        targeter.last_targets = current;
    }

    report
}

/// Ask every lasting effector to remove its effect from an enemy.
///
/// Instant effects already completed and permanent effects are
/// intentionally left in place, so neither produces a removal.
pub fn end_effects(
    effectors: &BTreeSet<BlockId>,
    store: &BlockStore,
    enemy: EnemyId,
    multiplier: Fixed,
) -> Vec<EffectRemoval> {
    let mut removals = Vec::new();
    for &effector_id in effectors {
        let Some(effector) = store.effector(effector_id) else {
            continue;
        };
        match effector.duration {
            EffectDuration::Lasting => removals.push(EffectRemoval {
                effector: effector_id,
                kind: effector.kind,
                enemy,
                multiplier,
            }),
            EffectDuration::Instant | EffectDuration::Permanent => {}
        }
    }
    removals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{BlockCapability, TargeterKind, TowerEffector, TowerTargeter};
    use crate::enemy::{Enemy, EnemyRoster};
    use crate::math::Vec3Fixed;
    use crate::world::BlockPos;

    struct Fixture {
        store: BlockStore,
        tower: Tower,
        targeter: BlockId,
        roster: EnemyRoster,
    }

    fn fixture(effectors: &[(EffectCount, EffectDuration)]) -> Fixture {
        let mut store = BlockStore::new();
        let mut tower = Tower::new();

        let targeter = store.insert(
            BlockPos::ZERO,
            BlockCapability::Targeter(TowerTargeter::new(
                5,
                TargeterKind::Single,
                Fixed::from_num(10),
                20,
            )),
        );
        let entity = store.get(targeter).unwrap().clone();
        tower.insert_block(&entity);

        for &(count, duration) in effectors {
            let id = store.insert(
                BlockPos::new(0, 1, 0),
                BlockCapability::Effector(TowerEffector::new(
                    3,
                    EffectorKind::Damage,
                    count,
                    duration,
                )),
            );
            let entity = store.get(id).unwrap().clone();
            tower.insert_block(&entity);
        }

        Fixture {
            store,
            tower,
            targeter,
            roster: EnemyRoster::new(),
        }
    }

    #[test]
    fn test_per_shot_applies_every_firing() {
        let mut f = fixture(&[(EffectCount::PerShot, EffectDuration::Instant)]);
        f.roster.insert(Enemy::new(Vec3Fixed::from_ints(2, 0, 0), 1));

        let first = fire_targeter(&f.tower, f.targeter, &mut f.store, &f.roster);
        let second = fire_targeter(&f.tower, f.targeter, &mut f.store, &f.roster);
        assert_eq!(first.applied.len(), 1);
        assert_eq!(second.applied.len(), 1);
    }

    #[test]
    fn test_continuous_applies_only_on_entry() {
        let mut f = fixture(&[(EffectCount::Continuous, EffectDuration::Lasting)]);
        f.roster.insert(Enemy::new(Vec3Fixed::from_ints(2, 0, 0), 1));

        let first = fire_targeter(&f.tower, f.targeter, &mut f.store, &f.roster);
        let second = fire_targeter(&f.tower, f.targeter, &mut f.store, &f.roster);
        assert_eq!(first.applied.len(), 1);
        assert!(second.applied.is_empty());
    }

    #[test]
    fn test_continuous_reapplies_after_leave_and_reenter() {
        let mut f = fixture(&[(EffectCount::Continuous, EffectDuration::Lasting)]);
        let enemy = f.roster.insert(Enemy::new(Vec3Fixed::from_ints(2, 0, 0), 1));

        fire_targeter(&f.tower, f.targeter, &mut f.store, &f.roster);

        // Enemy steps out for one full cycle...
        f.roster.get_mut(enemy).unwrap().position = Vec3Fixed::from_ints(50, 0, 0);
        let away = fire_targeter(&f.tower, f.targeter, &mut f.store, &f.roster);
        assert_eq!(away.removed.len(), 1);

        // ...and back in: treated as newly targeted again.
        f.roster.get_mut(enemy).unwrap().position = Vec3Fixed::from_ints(2, 0, 0);
        let back = fire_targeter(&f.tower, f.targeter, &mut f.store, &f.roster);
        assert_eq!(back.applied.len(), 1);
    }

    #[test]
    fn test_removal_per_duration_policy() {
        let mut f = fixture(&[
            (EffectCount::PerShot, EffectDuration::Instant),
            (EffectCount::PerShot, EffectDuration::Lasting),
            (EffectCount::Continuous, EffectDuration::Permanent),
        ]);
        let enemy = f.roster.insert(Enemy::new(Vec3Fixed::from_ints(2, 0, 0), 1));

        fire_targeter(&f.tower, f.targeter, &mut f.store, &f.roster);

        f.roster.remove(enemy);
        let report = fire_targeter(&f.tower, f.targeter, &mut f.store, &f.roster);

        // Exactly one removal: the lasting effector. Instant and
        // permanent effectors are silent.
        assert_eq!(report.removed.len(), 1);
        assert_eq!(report.removed[0].enemy, enemy);
    }

    #[test]
    fn test_stored_set_is_overwritten_not_merged() {
        let mut f = fixture(&[(EffectCount::PerShot, EffectDuration::Instant)]);
        let first = f.roster.insert(Enemy::new(Vec3Fixed::from_ints(2, 0, 0), 1));
        fire_targeter(&f.tower, f.targeter, &mut f.store, &f.roster);
        assert!(f.store.targeter(f.targeter).unwrap().last_targets.contains(&first));

        // A closer-to-shrine enemy displaces the old target entirely.
        let second = f.roster.insert(Enemy::new(Vec3Fixed::from_ints(3, 0, 0), 0));
        fire_targeter(&f.tower, f.targeter, &mut f.store, &f.roster);

        let stored = &f.store.targeter(f.targeter).unwrap().last_targets;
        assert!(stored.contains(&second));
        assert!(!stored.contains(&first));
    }

    #[test]
    fn test_multiplier_forwarded_on_events() {
        let mut f = fixture(&[(EffectCount::PerShot, EffectDuration::Lasting)]);
        let boosted = Fixed::from_num(3) / Fixed::from_num(2);
        f.store.targeter_mut(f.targeter).unwrap().multiplier = boosted;
        let enemy = f.roster.insert(Enemy::new(Vec3Fixed::from_ints(2, 0, 0), 1));

        let report = fire_targeter(&f.tower, f.targeter, &mut f.store, &f.roster);
        assert_eq!(report.applied[0].multiplier, boosted);

        f.roster.remove(enemy);
        let report = fire_targeter(&f.tower, f.targeter, &mut f.store, &f.roster);
        assert_eq!(report.removed[0].multiplier, boosted);
    }

    #[test]
    fn test_missing_targeter_is_noop() {
        let mut f = fixture(&[]);
        let report = fire_targeter(&f.tower, 999, &mut f.store, &f.roster);
        assert_eq!(report, FireReport::default());
    }
}
