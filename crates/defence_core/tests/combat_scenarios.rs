//! End-to-end combat scenarios.
//!
//! These tests drive the full pipeline - signals, timers, power gate,
//! targeting, effects, reset - the way a game round would.

use defence_core::blocks::{
    BlockCapability, EffectCount, EffectDuration, EffectorKind, TargeterKind, TowerCore,
    TowerEffector, TowerTargeter,
};
use defence_core::enemy::Enemy;
use defence_core::math::{Fixed, Vec3Fixed};
use defence_core::power;
use defence_core::simulation::DefenceSim;
use defence_core::tower::Tower;
use defence_core::world::{BlockPos, MaterialId, WorldGrid};
use defence_test_utils::fixtures::{enemy_at, standard_tower};
use defence_test_utils::proptest::prelude::*;

#[test]
fn round_fires_until_reset_then_stays_silent() {
    let mut sim = DefenceSim::new();
    sim.set_field_active(true);
    standard_tower(&mut sim);
    enemy_at(&mut sim, 3, 0, 5);
    enemy_at(&mut sim, 5, 2, 2);

    let mut fired = 0;
    for _ in 0..100 {
        fired += sim.tick().fired.len();
    }
    assert!(fired > 0);

    sim.reset_field(11);
    assert!(sim.towers().is_empty());

    for _ in 0..100 {
        let events = sim.tick();
        assert!(events.fired.is_empty());
        assert!(events.effects_applied.is_empty());
    }
}

#[test]
fn lasting_effect_follows_target_swaps() {
    let mut sim = DefenceSim::new();
    sim.set_field_active(true);

    let blocks = vec![
        sim.spawn_block(BlockPos::ZERO, BlockCapability::Core(TowerCore::new(40))),
        sim.spawn_block(
            BlockPos::new(0, 1, 0),
            BlockCapability::Targeter(TowerTargeter::new(
                5,
                TargeterKind::Single,
                Fixed::from_num(20),
                4,
            )),
        ),
        sim.spawn_block(
            BlockPos::new(0, 2, 0),
            BlockCapability::Effector(TowerEffector::new(
                5,
                EffectorKind::Ice,
                EffectCount::Continuous,
                EffectDuration::Lasting,
            )),
        ),
    ];
    sim.on_tower_created(&blocks).unwrap();

    let far = sim.spawn_enemy(Enemy::new(Vec3Fixed::from_ints(10, 0, 0), 8));
    for _ in 0..4 {
        sim.tick();
    }

    // A new enemy closer to the shrine takes over the single slot. The
    // old target gets exactly one removal; the new one gets the effect.
    let near = sim.spawn_enemy(Enemy::new(Vec3Fixed::from_ints(4, 0, 0), 1));
    let mut applied = Vec::new();
    let mut removed = Vec::new();
    for _ in 0..4 {
        let events = sim.tick();
        applied.extend(events.effects_applied);
        removed.extend(events.effects_removed);
    }

    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].enemy, far);
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].enemy, near);
}

#[test]
fn reset_rebuilds_a_playable_looking_field() {
    let mut sim = DefenceSim::new();
    sim.world_mut().set_block(BlockPos::ZERO, MaterialId::Shrine);
    standard_tower(&mut sim);

    let report = sim.reset_field(123);
    assert_eq!(report.towers_destroyed, 1);
    assert_eq!(report.blocks_destroyed, 4);

    // Shrine survives, tower voxels are gone, filler is back.
    assert_eq!(sim.world().get_block(BlockPos::ZERO), MaterialId::Shrine);
    assert_eq!(sim.world().count_material(MaterialId::TowerBlock), 0);
    assert!(sim.world().count_material(MaterialId::Plain) > 0);

    // Same seed, same field.
    let mut other = DefenceSim::new();
    other.world_mut().set_block(BlockPos::ZERO, MaterialId::Shrine);
    standard_tower(&mut other);
    other.reset_field(123);
    assert_eq!(
        sim.world().sorted_positions(),
        other.world().sorted_positions()
    );
}

proptest! {
    #[test]
    fn can_fire_matches_ledger_inequality(
        core_powers in prop::collection::vec(0i32..100, 0..4),
        targeter_drains in prop::collection::vec(0i32..100, 0..4),
        effector_drains in prop::collection::vec(0i32..100, 0..4),
    ) {
        let mut store = defence_core::blocks::BlockStore::new();
        let mut tower = Tower::new();

        for &p in &core_powers {
            let id = store.insert(BlockPos::ZERO, BlockCapability::Core(TowerCore::new(p)));
            let entity = store.get(id).unwrap().clone();
            tower.insert_block(&entity);
        }
        for &d in &targeter_drains {
            let id = store.insert(
                BlockPos::ZERO,
                BlockCapability::Targeter(TowerTargeter::new(
                    d,
                    TargeterKind::Single,
                    Fixed::from_num(10),
                    20,
                )),
            );
            let entity = store.get(id).unwrap().clone();
            tower.insert_block(&entity);
        }
        for &d in &effector_drains {
            let id = store.insert(
                BlockPos::ZERO,
                BlockCapability::Effector(TowerEffector::new(
                    d,
                    EffectorKind::Damage,
                    EffectCount::PerShot,
                    EffectDuration::Instant,
                )),
            );
            let entity = store.get(id).unwrap().clone();
            tower.insert_block(&entity);
        }

        let production: i32 = core_powers.iter().sum();
        let consumption: i32 =
            targeter_drains.iter().sum::<i32>() + effector_drains.iter().sum::<i32>();

        prop_assert_eq!(power::can_fire(&tower, &store), production >= consumption);
        prop_assert_eq!(power::total_power(&tower, &store), production);
    }

    #[test]
    fn range_test_is_inclusive_on_the_boundary(range in 1i32..50, x in 0i32..50) {
        let mut roster = defence_core::enemy::EnemyRoster::new();
        let id = roster.insert(Enemy::new(Vec3Fixed::from_ints(x, 0, 0), 1));

        use defence_core::enemy::EnemyQuery;
        let hits = roster.enemies_in_range(Vec3Fixed::ZERO, Fixed::from_num(range));
        prop_assert_eq!(hits.contains(&id), x <= range);
    }
}
