//! Enemy roster and the range-query surface used by targeting.
//!
//! Enemies are owned by the wave/pathing layer, not by the combat core.
//! The core reads two things: an enemy's world position, and how far
//! along the invasion route it has advanced. [`EnemyQuery`] captures
//! that read-only dependency; [`EnemyRoster`] is the in-process store
//! the simulation and tests run against.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::math::{Fixed, Vec3Fixed};

/// Unique identifier for enemies.
pub type EnemyId = u64;

/// An enemy advancing along the invasion route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enemy {
    /// World position.
    pub position: Vec3Fixed,
    /// Path-progress step. Monotonically assigned along the route;
    /// lower means closer to the defended shrine.
    pub step: u32,
}

impl Enemy {
    /// Create a new enemy at a position and path step.
    #[must_use]
    pub const fn new(position: Vec3Fixed, step: u32) -> Self {
        Self { position, step }
    }
}

/// Read access to the live enemy set.
pub trait EnemyQuery {
    /// All enemies within `range` of `position` (inclusive boundary),
    /// enumerated in ascending ID order.
    fn enemies_in_range(&self, position: Vec3Fixed, range: Fixed) -> Vec<EnemyId>;

    /// An enemy's path-progress step, if it is still alive.
    fn path_step(&self, enemy: EnemyId) -> Option<u32>;

    /// An enemy's world position, if it is still alive.
    fn position(&self, enemy: EnemyId) -> Option<Vec3Fixed>;
}

/// Storage for all live enemies.
///
/// Uses a `HashMap` for O(1) lookup by ID, with deterministic
/// enumeration via sorted keys for range queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnemyRoster {
    enemies: HashMap<EnemyId, Enemy>,
    next_id: EnemyId,
}

impl EnemyRoster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enemies: HashMap::new(),
            next_id: 1,
        }
    }

    /// Insert a new enemy and return its ID.
    pub fn insert(&mut self, enemy: Enemy) -> EnemyId {
        let id = self.next_id;
        self.next_id += 1;
        self.enemies.insert(id, enemy);
        id
    }

    /// Remove an enemy by ID.
    pub fn remove(&mut self, id: EnemyId) -> Option<Enemy> {
        self.enemies.remove(&id)
    }

    /// Get an enemy by ID.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    /// Get a mutable reference to an enemy by ID.
    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    /// Number of live enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Check if the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Sorted enemy IDs for deterministic iteration.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<EnemyId> {
        let mut ids: Vec<_> = self.enemies.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl EnemyQuery for EnemyRoster {
    fn enemies_in_range(&self, position: Vec3Fixed, range: Fixed) -> Vec<EnemyId> {
        let range_sq = range * range;
        self.sorted_ids()
            .into_iter()
            .filter(|id| {
                self.enemies[id].position.distance_squared(position) <= range_sq
            })
            .collect()
    }

    fn path_step(&self, enemy: EnemyId) -> Option<u32> {
        self.enemies.get(&enemy).map(|e| e.step)
    }

    fn position(&self, enemy: EnemyId) -> Option<Vec3Fixed> {
        self.enemies.get(&enemy).map(|e| e.position)
    }
}
