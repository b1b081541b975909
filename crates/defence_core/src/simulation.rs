//! Core simulation loop.
//!
//! [`DefenceSim`] owns all combat state: the block store, the tower
//! registry, the attack timer table, the enemy roster and the voxel
//! world. Lifecycle signals (tower created/changed/destroyed, field
//! reset, shutdown) are explicit method calls, and attack cycles run
//! inside [`tick`](DefenceSim::tick) - everything is serialized on one
//! logical thread, so no two firings or transitions ever race on the
//! same tower.
//!
//! # Determinism
//!
//! - No floating-point math (fixed-point via [`Fixed`](crate::math::Fixed))
//! - No system randomness (field refills take an explicit per-run seed)
//! - Consistent iteration order (sorted IDs, ordered timer table)
//! - Same signals and ticks always produce the same [`state_hash`](DefenceSim::state_hash)

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::blocks::{BlockCapability, BlockId, BlockStore};
use crate::effects::{end_effects, fire_targeter, EffectApplication, EffectRemoval};
use crate::enemy::{Enemy, EnemyId, EnemyRoster};
use crate::error::{DefenceError, Result};
use crate::field::{clear_field, random_fill, FieldConfig};
use crate::power::can_fire;
use crate::scheduler::{AttackScheduler, TimerKey};
use crate::tower::{TowerDelta, TowerId, TowerRegistry};
use crate::world::{BlockPos, MaterialId, VoxelWorld, WorldGrid};

/// Ticks per second for the simulation.
pub const TICK_RATE: u32 = 20;

/// Duration of one tick in milliseconds.
pub const TICK_DURATION_MS: u32 = 1000 / TICK_RATE;

/// Events generated during a simulation tick.
///
/// These events can be used by the game layer to trigger effect
/// implementations, sounds, animations, etc.
#[derive(Debug, Clone, Default)]
pub struct TickEvents {
    /// Effect applications from firings this tick.
    pub effects_applied: Vec<EffectApplication>,
    /// Lasting-effect removals from firings this tick.
    pub effects_removed: Vec<EffectRemoval>,
    /// Timers whose targeter completed a firing.
    pub fired: Vec<TimerKey>,
    /// Timers skipped because their tower lacked power.
    pub power_denied: Vec<TimerKey>,
}

/// Report of a field reset.
#[derive(Debug, Clone, Default)]
pub struct FieldResetReport {
    /// Towers destroyed by the reset.
    pub towers_destroyed: usize,
    /// Block-entities destroyed with them.
    pub blocks_destroyed: usize,
    /// Lasting-effect removals issued during teardown.
    pub effects_removed: Vec<EffectRemoval>,
}

/// The core defence simulation.
///
/// Owns all mutable combat state and advances it deterministically.
/// External layers feed it lifecycle signals and read back events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenceSim {
    /// Current simulation tick.
    tick: u64,
    /// Whether firing is permitted at all.
    field_active: bool,
    /// All placed tower blocks.
    blocks: BlockStore,
    /// Tower membership.
    towers: TowerRegistry,
    /// Periodic attack timers.
    scheduler: AttackScheduler,
    /// Live enemies.
    enemies: EnemyRoster,
    /// Voxel storage for the arena.
    world: VoxelWorld,
    /// Clear/refill configuration.
    field_config: FieldConfig,
}

impl DefenceSim {
    /// Create a new simulation with an inactive field and no state.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FieldConfig::default())
    }

    /// Create a new simulation with a custom field configuration.
    #[must_use]
    pub fn with_config(field_config: FieldConfig) -> Self {
        Self {
            tick: 0,
            field_active: false,
            blocks: BlockStore::new(),
            towers: TowerRegistry::new(),
            scheduler: AttackScheduler::new(),
            enemies: EnemyRoster::new(),
            world: VoxelWorld::new(),
            field_config,
        }
    }

    /// Get the current tick number.
    #[must_use]
    pub const fn get_tick(&self) -> u64 {
        self.tick
    }

    /// Whether firing is currently permitted.
    #[must_use]
    pub const fn is_field_active(&self) -> bool {
        self.field_active
    }

    /// Toggle the field activity flag.
    pub fn set_field_active(&mut self, active: bool) {
        self.field_active = active;
    }

    /// Get a reference to the block store.
    #[must_use]
    pub fn blocks(&self) -> &BlockStore {
        &self.blocks
    }

    /// Get a mutable reference to the block store.
    pub fn blocks_mut(&mut self) -> &mut BlockStore {
        &mut self.blocks
    }

    /// Get a reference to the tower registry.
    #[must_use]
    pub fn towers(&self) -> &TowerRegistry {
        &self.towers
    }

    /// Get a reference to the enemy roster.
    #[must_use]
    pub fn enemies(&self) -> &EnemyRoster {
        &self.enemies
    }

    /// Get a mutable reference to the enemy roster.
    pub fn enemies_mut(&mut self) -> &mut EnemyRoster {
        &mut self.enemies
    }

    /// Get a reference to the voxel world.
    #[must_use]
    pub fn world(&self) -> &VoxelWorld {
        &self.world
    }

    /// Get a mutable reference to the voxel world.
    pub fn world_mut(&mut self) -> &mut VoxelWorld {
        &mut self.world
    }

    /// Number of registered attack timers.
    #[must_use]
    pub fn timer_count(&self) -> usize {
        self.scheduler.len()
    }

    /// Whether a (tower, targeter) pair has a registered timer.
    #[must_use]
    pub fn timer_registered(&self, key: TimerKey) -> bool {
        self.scheduler.contains(key)
    }

    /// Place a block-entity and mark its voxel as a tower block.
    pub fn spawn_block(&mut self, pos: BlockPos, capability: BlockCapability) -> BlockId {
        let id = self.blocks.insert(pos, capability);
        self.world.set_block(pos, MaterialId::TowerBlock);
        id
    }

    /// Handle a tower-created signal.
    ///
    /// Registers the tower and schedules a periodic attack timer for
    /// each of its targeters.
    ///
    /// # Errors
    ///
    /// Propagates registry errors; on error no timers are scheduled.
    pub fn on_tower_created(&mut self, blocks: &[BlockId]) -> Result<TowerId> {
        let id = self.towers.create(blocks, &self.blocks)?;
        if let Some(tower) = self.towers.get(id) {
            for &targeter_id in &tower.targeters {
                if let Some(targeter) = self.blocks.targeter(targeter_id) {
                    self.scheduler.schedule(
                        TimerKey::new(id, targeter_id),
                        self.tick,
                        targeter.attack_period,
                    );
                }
            }
        }
        tracing::debug!(tower = id, blocks = blocks.len(), "Tower created");
        Ok(id)
    }

    /// Handle a tower-changed signal carrying a structural delta.
    ///
    /// Added targeters get fresh timers; removed targeters have their
    /// lasting effects ended and their timers cancelled. Returns the
    /// removal notifications issued for departed targeters.
    ///
    /// # Errors
    ///
    /// Propagates registry errors; on error nothing changes.
    pub fn on_tower_changed(
        &mut self,
        id: TowerId,
        delta: &TowerDelta,
    ) -> Result<Vec<EffectRemoval>> {
        let mut removals = Vec::new();
        // End effects while the registry still knows the old membership.
        for &block in &delta.removed {
            if self
                .towers
                .get(id)
                .is_some_and(|tower| tower.targeters.contains(&block))
            {
                removals.extend(self.release_targeter(id, block));
            }
        }

        self.towers.apply_delta(id, delta, &self.blocks)?;

        for &block in &delta.added {
            if self
                .towers
                .get(id)
                .is_some_and(|tower| tower.targeters.contains(&block))
            {
                if let Some(targeter) = self.blocks.targeter(block) {
                    self.scheduler.schedule(
                        TimerKey::new(id, block),
                        self.tick,
                        targeter.attack_period,
                    );
                }
            }
        }
        Ok(removals)
    }

    /// Re-register a targeter's timer after its attack period changed.
    ///
    /// # Errors
    ///
    /// Returns [`DefenceError::TowerNotFound`] or
    /// [`DefenceError::BlockNotFound`] for stale references.
    pub fn reschedule_targeter(&mut self, id: TowerId, targeter_id: BlockId) -> Result<()> {
        let tower = self.towers.get(id).ok_or(DefenceError::TowerNotFound(id))?;
        if !tower.targeters.contains(&targeter_id) {
            return Err(DefenceError::BlockNotFound(targeter_id));
        }
        let targeter = self
            .blocks
            .targeter(targeter_id)
            .ok_or(DefenceError::BlockNotFound(targeter_id))?;

        let key = TimerKey::new(id, targeter_id);
        self.scheduler.cancel(key);
        self.scheduler.schedule(key, self.tick, targeter.attack_period);
        Ok(())
    }

    /// Handle a tower-destroyed signal.
    ///
    /// Ends lasting effects held by each targeter, cancels its timer,
    /// and removes the tower from the registry. Block-entities survive;
    /// they simply no longer form a tower.
    ///
    /// # Errors
    ///
    /// Returns [`DefenceError::TowerNotFound`] for an unknown tower.
    pub fn on_tower_destroyed(&mut self, id: TowerId) -> Result<Vec<EffectRemoval>> {
        if self.towers.get(id).is_none() {
            return Err(DefenceError::TowerNotFound(id));
        }

        let mut removals = Vec::new();
        let targeters: Vec<BlockId> = self
            .towers
            .get(id)
            .map(|tower| tower.targeters.iter().copied().collect())
            .unwrap_or_default();
        for targeter_id in targeters {
            removals.extend(self.release_targeter(id, targeter_id));
        }

        self.towers.remove(id);
        tracing::debug!(tower = id, "Tower destroyed");
        Ok(removals)
    }

    /// Perform the destroy transition for every tower and discard the
    /// registry. Called before the game shuts down.
    pub fn shutdown(&mut self) -> Vec<EffectRemoval> {
        let mut removals = Vec::new();
        for id in self.towers.sorted_ids() {
            if let Ok(mut tower_removals) = self.on_tower_destroyed(id) {
                removals.append(&mut tower_removals);
            }
        }
        self.scheduler.clear();
        removals
    }

    /// Handle a field-reset signal.
    ///
    /// Destroys every tower and its constituent block-entities, clears
    /// the registry, wipes the arena back to the baseline material
    /// (sparing the shrine) and refills it with the per-run seed.
    pub fn reset_field(&mut self, seed: u64) -> FieldResetReport {
        let mut report = FieldResetReport::default();

        for id in self.towers.sorted_ids() {
            let Some(tower) = self.towers.get(id) else {
                continue;
            };
            let constituents: Vec<BlockId> = tower.all_blocks().collect();
            let targeters: Vec<BlockId> = tower.targeters.iter().copied().collect();

            for targeter_id in targeters {
                report
                    .effects_removed
                    .extend(self.release_targeter(id, targeter_id));
            }
            for block in constituents {
                self.blocks.remove(block);
                report.blocks_destroyed += 1;
            }
            self.towers.remove(id);
            report.towers_destroyed += 1;
        }
        self.towers.clear();
        self.scheduler.clear();

        clear_field(&mut self.world, self.field_config.radius);
        random_fill(&mut self.world, &self.field_config, seed);

        tracing::debug!(
            towers = report.towers_destroyed,
            blocks = report.blocks_destroyed,
            seed,
            "Field reset complete"
        );
        report
    }

    /// Advance the simulation by one tick.
    ///
    /// Drains due attack timers in table order and runs each through
    /// the firing pipeline: activity gate, stale-reference check, power
    /// check, then targeting and effects. Returns the events generated
    /// this tick.
    pub fn tick(&mut self) -> TickEvents {
        self.tick += 1;
        let mut events = TickEvents::default();

        let due = self.scheduler.drain_due(self.tick);
        for key in due {
            if !self.field_active {
                continue;
            }

            // A timer may outlive its targeter between a removal signal
            // and the next tick; such firings are no-ops.
            let Some(tower) = self.towers.get(key.tower) else {
                continue;
            };
            if !tower.targeters.contains(&key.targeter)
                || self.blocks.targeter(key.targeter).is_none()
            {
                continue;
            }

            if !can_fire(tower, &self.blocks) {
                events.power_denied.push(key);
                continue;
            }

            let report = fire_targeter(tower, key.targeter, &mut self.blocks, &self.enemies);
            events.effects_applied.extend(report.applied);
            events.effects_removed.extend(report.removed);
            events.fired.push(key);
        }

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.tick, state_hash = hash, "Simulation state hash");
        }

        events
    }

    /// Spawn an enemy into the roster.
    pub fn spawn_enemy(&mut self, enemy: Enemy) -> EnemyId {
        self.enemies.insert(enemy)
    }

    /// Remove an enemy from the roster.
    pub fn despawn_enemy(&mut self, id: EnemyId) -> Option<Enemy> {
        self.enemies.remove(id)
    }

    /// End a targeter's lasting effects and cancel its timer.
    fn release_targeter(&mut self, tower_id: TowerId, targeter_id: BlockId) -> Vec<EffectRemoval> {
        self.scheduler.cancel(TimerKey::new(tower_id, targeter_id));

        let Some(tower) = self.towers.get(tower_id) else {
            return Vec::new();
        };
        let Some(targeter) = self.blocks.targeter(targeter_id) else {
            return Vec::new();
        };

        let mut removals = Vec::new();
        for &enemy in &targeter.last_targets {
            removals.extend(end_effects(
                &tower.effectors,
                &self.blocks,
                enemy,
                targeter.multiplier,
            ));
        }
        removals
    }

    /// Calculate a hash of the current simulation state.
    ///
    /// Two simulations fed identical signals and ticks produce
    /// identical hashes; used for replay and desync checks.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.tick.hash(&mut hasher);
        self.field_active.hash(&mut hasher);

        let block_ids = self.blocks.sorted_ids();
        block_ids.len().hash(&mut hasher);
        for id in block_ids {
            if let Some(block) = self.blocks.get(id) {
                block.hash(&mut hasher);
            }
        }

        let tower_ids = self.towers.sorted_ids();
        tower_ids.len().hash(&mut hasher);
        for id in tower_ids {
            id.hash(&mut hasher);
            if let Some(tower) = self.towers.get(id) {
                tower.hash(&mut hasher);
            }
        }

        for key in self.scheduler.keys() {
            key.hash(&mut hasher);
        }

        let enemy_ids = self.enemies.sorted_ids();
        enemy_ids.len().hash(&mut hasher);
        for id in enemy_ids {
            id.hash(&mut hasher);
            if let Some(enemy) = self.enemies.get(id) {
                enemy.hash(&mut hasher);
            }
        }

        for pos in self.world.sorted_positions() {
            pos.hash(&mut hasher);
            self.world.get_block(pos).hash(&mut hasher);
        }

        hasher.finish()
    }

    /// Serialize the simulation state for snapshots or replay sync.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| DefenceError::InvalidState(format!("Failed to serialize simulation: {e}")))
    }

    /// Deserialize simulation state from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data).map_err(|e| {
            DefenceError::InvalidState(format!("Failed to deserialize simulation: {e}"))
        })
    }
}

impl Default for DefenceSim {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{
        EffectCount, EffectDuration, EffectorKind, TargeterKind, TowerCore, TowerEffector,
        TowerTargeter,
    };
    use crate::math::{Fixed, Vec3Fixed};

    /// A tower just outside the shrine ring: `cores` power-10 cores,
    /// one single targeter (drain `drain`, range 10, period 5) and one
    /// per-shot instant damage effector (drain 5).
    fn build_tower(sim: &mut DefenceSim, cores: usize, drain: i32) -> (TowerId, BlockId) {
        let mut blocks = Vec::new();
        for i in 0..cores {
            blocks.push(sim.spawn_block(
                BlockPos::new(i as i32, 0, 7),
                BlockCapability::Core(TowerCore::new(10)),
            ));
        }
        let targeter = sim.spawn_block(
            BlockPos::new(0, 1, 7),
            BlockCapability::Targeter(TowerTargeter::new(
                drain,
                TargeterKind::Single,
                Fixed::from_num(10),
                5,
            )),
        );
        blocks.push(targeter);
        blocks.push(sim.spawn_block(
            BlockPos::new(0, 2, 7),
            BlockCapability::Effector(TowerEffector::new(
                5,
                EffectorKind::Damage,
                EffectCount::PerShot,
                EffectDuration::Instant,
            )),
        ));

        let id = sim.on_tower_created(&blocks).unwrap();
        (id, targeter)
    }

    fn run_ticks(sim: &mut DefenceSim, n: u32) -> TickEvents {
        let mut all = TickEvents::default();
        for _ in 0..n {
            let events = sim.tick();
            all.effects_applied.extend(events.effects_applied);
            all.effects_removed.extend(events.effects_removed);
            all.fired.extend(events.fired);
            all.power_denied.extend(events.power_denied);
        }
        all
    }

    #[test]
    fn test_tower_created_schedules_timers() {
        let mut sim = DefenceSim::new();
        let (id, targeter) = build_tower(&mut sim, 2, 5);
        assert!(sim.timer_registered(TimerKey::new(id, targeter)));
        assert_eq!(sim.timer_count(), 1);
    }

    #[test]
    fn test_firing_applies_effects() {
        let mut sim = DefenceSim::new();
        sim.set_field_active(true);
        build_tower(&mut sim, 2, 5);
        sim.spawn_enemy(Enemy::new(Vec3Fixed::from_ints(2, 0, 0), 3));

        let events = run_ticks(&mut sim, 5);
        assert_eq!(events.fired.len(), 1);
        assert_eq!(events.effects_applied.len(), 1);
    }

    #[test]
    fn test_inactive_field_never_fires() {
        let mut sim = DefenceSim::new();
        build_tower(&mut sim, 2, 5);
        sim.spawn_enemy(Enemy::new(Vec3Fixed::from_ints(2, 0, 0), 3));

        let events = run_ticks(&mut sim, 20);
        assert!(events.fired.is_empty());
        assert!(events.effects_applied.is_empty());
    }

    #[test]
    fn test_underpowered_tower_skips_cycle() {
        let mut sim = DefenceSim::new();
        sim.set_field_active(true);
        // Power 20 against drain 25 + 5: denied.
        let (_, targeter) = build_tower(&mut sim, 2, 25);
        sim.spawn_enemy(Enemy::new(Vec3Fixed::from_ints(2, 0, 0), 3));

        let events = run_ticks(&mut sim, 10);
        assert!(events.fired.is_empty());
        assert!(events.effects_applied.is_empty());
        assert_eq!(events.power_denied.len(), 2);
        // Target bookkeeping untouched by denied cycles
        assert!(sim.blocks().targeter(targeter).unwrap().last_targets.is_empty());
    }

    #[test]
    fn test_destroyed_tower_timer_never_fires_again() {
        let mut sim = DefenceSim::new();
        sim.set_field_active(true);
        let (id, _) = build_tower(&mut sim, 2, 5);
        sim.spawn_enemy(Enemy::new(Vec3Fixed::from_ints(2, 0, 0), 3));

        run_ticks(&mut sim, 5);
        sim.on_tower_destroyed(id).unwrap();
        assert_eq!(sim.timer_count(), 0);

        let events = run_ticks(&mut sim, 20);
        assert!(events.fired.is_empty());
    }

    #[test]
    fn test_destroy_ends_lasting_effects() {
        let mut sim = DefenceSim::new();
        sim.set_field_active(true);

        let core = sim.spawn_block(BlockPos::ZERO, BlockCapability::Core(TowerCore::new(30)));
        let targeter = sim.spawn_block(
            BlockPos::new(0, 1, 0),
            BlockCapability::Targeter(TowerTargeter::new(
                5,
                TargeterKind::Single,
                Fixed::from_num(10),
                5,
            )),
        );
        let effector = sim.spawn_block(
            BlockPos::new(0, 2, 0),
            BlockCapability::Effector(TowerEffector::new(
                5,
                EffectorKind::Stun,
                EffectCount::Continuous,
                EffectDuration::Lasting,
            )),
        );
        let id = sim.on_tower_created(&[core, targeter, effector]).unwrap();
        let enemy = sim.spawn_enemy(Enemy::new(Vec3Fixed::from_ints(2, 0, 0), 3));

        run_ticks(&mut sim, 5);
        let removals = sim.on_tower_destroyed(id).unwrap();
        assert_eq!(removals.len(), 1);
        assert_eq!(removals[0].enemy, enemy);
        assert_eq!(removals[0].effector, effector);
    }

    #[test]
    fn test_changed_delta_registers_and_releases_targeters() {
        let mut sim = DefenceSim::new();
        let (id, targeter) = build_tower(&mut sim, 3, 5);

        let extra = sim.spawn_block(
            BlockPos::new(1, 1, 0),
            BlockCapability::Targeter(TowerTargeter::new(
                5,
                TargeterKind::Sphere,
                Fixed::from_num(8),
                7,
            )),
        );
        sim.on_tower_changed(id, &TowerDelta::added(vec![extra]))
            .unwrap();
        assert_eq!(sim.timer_count(), 2);

        sim.on_tower_changed(id, &TowerDelta::removed(vec![targeter]))
            .unwrap();
        assert_eq!(sim.timer_count(), 1);
        assert!(sim.timer_registered(TimerKey::new(id, extra)));
    }

    #[test]
    fn test_reschedule_replaces_timer_period() {
        let mut sim = DefenceSim::new();
        sim.set_field_active(true);
        let (id, targeter) = build_tower(&mut sim, 2, 5);
        sim.spawn_enemy(Enemy::new(Vec3Fixed::from_ints(2, 0, 0), 3));

        // Slow the targeter down, then re-register its timer.
        sim.blocks_mut().targeter_mut(targeter).unwrap().attack_period = 50;
        sim.reschedule_targeter(id, targeter).unwrap();

        let events = run_ticks(&mut sim, 49);
        assert!(events.fired.is_empty());
        let events = sim.tick();
        assert_eq!(events.fired.len(), 1);
    }

    #[test]
    fn test_field_reset_scenario() {
        let mut sim = DefenceSim::new();
        sim.set_field_active(true);
        // 2 cores of power 10, targeter drain 15
        let (_, _) = build_tower(&mut sim, 2, 15);

        let report = sim.reset_field(42);
        assert_eq!(report.towers_destroyed, 1);
        assert!(sim.towers().is_empty());
        assert_eq!(sim.timer_count(), 0);
        assert!(sim.blocks().is_empty());

        let events = run_ticks(&mut sim, 30);
        assert!(events.fired.is_empty());
        assert!(events.power_denied.is_empty());
    }

    #[test]
    fn test_reset_preserves_shrine_and_refills() {
        let mut sim = DefenceSim::new();
        sim.world_mut().set_block(BlockPos::ZERO, MaterialId::Shrine);
        build_tower(&mut sim, 1, 5);

        sim.reset_field(7);

        assert_eq!(sim.world().get_block(BlockPos::ZERO), MaterialId::Shrine);
        assert!(sim.world().count_material(MaterialId::Plain) > 0);
        assert_eq!(sim.world().count_material(MaterialId::TowerBlock), 0);
    }

    #[test]
    fn test_shutdown_discards_all_towers() {
        let mut sim = DefenceSim::new();
        build_tower(&mut sim, 2, 5);
        build_tower(&mut sim, 1, 5);

        sim.shutdown();
        assert!(sim.towers().is_empty());
        assert_eq!(sim.timer_count(), 0);
    }

    #[test]
    fn test_deterministic_hash() {
        let build = || {
            let mut sim = DefenceSim::new();
            sim.set_field_active(true);
            build_tower(&mut sim, 2, 5);
            sim.spawn_enemy(Enemy::new(Vec3Fixed::from_ints(2, 0, 0), 3));
            run_ticks(&mut sim, 17);
            sim
        };

        let a = build();
        let b = build();
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut sim = DefenceSim::new();
        sim.set_field_active(true);
        build_tower(&mut sim, 2, 5);
        sim.spawn_enemy(Enemy::new(Vec3Fixed::from_ints(2, 0, 0), 3));
        run_ticks(&mut sim, 7);

        let bytes = sim.serialize().unwrap();
        let restored = DefenceSim::deserialize(&bytes).unwrap();

        assert_eq!(sim.get_tick(), restored.get_tick());
        assert_eq!(sim.timer_count(), restored.timer_count());
        assert_eq!(sim.state_hash(), restored.state_hash());
    }
}
