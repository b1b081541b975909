//! Test fixtures and helpers.
//!
//! Pre-built towers and enemies for consistent testing.

use defence_core::blocks::{BlockCapability, BlockId};
use defence_core::catalog::BlockCatalog;
use defence_core::enemy::{Enemy, EnemyId};
use defence_core::math::Vec3Fixed;
use defence_core::simulation::DefenceSim;
use defence_core::tower::TowerId;
use defence_core::world::BlockPos;
use fixed::types::I32F32;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Spawn a catalog block of any role into a simulation.
///
/// # Panics
///
/// Panics if the kind is not in the catalog.
pub fn spawn_catalog_block(
    sim: &mut DefenceSim,
    catalog: &BlockCatalog,
    kind: &str,
    pos: BlockPos,
) -> BlockId {
    let capability: BlockCapability = catalog
        .core(kind)
        .map(|data| data.to_capability())
        .or_else(|| catalog.targeter(kind).map(|data| data.to_capability()))
        .or_else(|| catalog.effector(kind).map(|data| data.to_capability()))
        .unwrap_or_else(|| panic!("unknown catalog kind '{kind}'"));
    sim.spawn_block(pos, capability)
}

/// Assemble a standard tower just outside the shrine ring from builtin
/// catalog kinds: two cores, one single targeter and one damage
/// effector.
///
/// Returns the tower ID and the targeter's block ID.
///
/// # Panics
///
/// Panics if tower creation fails, which indicates a broken fixture.
pub fn standard_tower(sim: &mut DefenceSim) -> (TowerId, BlockId) {
    let catalog = BlockCatalog::builtin();
    let blocks = vec![
        spawn_catalog_block(sim, &catalog, "core", BlockPos::new(8, 0, 0)),
        spawn_catalog_block(sim, &catalog, "core", BlockPos::new(9, 0, 0)),
        spawn_catalog_block(sim, &catalog, "single_targeter", BlockPos::new(8, 1, 0)),
        spawn_catalog_block(sim, &catalog, "damage_effector", BlockPos::new(8, 2, 0)),
    ];
    let targeter = blocks[2];
    let id = sim.on_tower_created(&blocks).expect("fixture tower");
    (id, targeter)
}

/// Spawn an enemy at ground level.
pub fn enemy_at(sim: &mut DefenceSim, x: i32, z: i32, step: u32) -> EnemyId {
    sim.spawn_enemy(Enemy::new(Vec3Fixed::from_ints(x, 0, z), step))
}
