//! Tower aggregates and the tower registry.
//!
//! A tower is a set of connected blocks acting as one combat unit. Its
//! four constituent sets are disjoint, and the registry guarantees a
//! block-entity belongs to at most one tower at a time. Structural
//! validation (is this cluster of blocks a legal tower?) happens in the
//! building layer; the registry only receives the resulting signals.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::blocks::{BlockCapability, BlockEntity, BlockId, BlockStore};
use crate::error::{DefenceError, Result};

/// Unique identifier for towers.
pub type TowerId = u64;

/// A composite combat structure of core, targeter, effector and
/// passive blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tower {
    /// Power-producing blocks.
    pub cores: BTreeSet<BlockId>,
    /// Enemy-selecting blocks.
    pub targeters: BTreeSet<BlockId>,
    /// Effect-applying blocks.
    pub effectors: BTreeSet<BlockId>,
    /// Structural blocks with no combat role.
    pub passives: BTreeSet<BlockId>,
}

impl Tower {
    /// Create a tower with no constituents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block to the constituent set matching its capability.
    pub fn insert_block(&mut self, block: &BlockEntity) {
        match block.capability {
            BlockCapability::Core(_) => self.cores.insert(block.id),
            BlockCapability::Targeter(_) => self.targeters.insert(block.id),
            BlockCapability::Effector(_) => self.effectors.insert(block.id),
            BlockCapability::Passive => self.passives.insert(block.id),
        };
    }

    /// Remove a block from whichever constituent set holds it.
    ///
    /// Returns true if the block was a constituent.
    pub fn remove_block(&mut self, block: BlockId) -> bool {
        self.cores.remove(&block)
            || self.targeters.remove(&block)
            || self.effectors.remove(&block)
            || self.passives.remove(&block)
    }

    /// Whether the block is a constituent of this tower.
    #[must_use]
    pub fn contains(&self, block: BlockId) -> bool {
        self.cores.contains(&block)
            || self.targeters.contains(&block)
            || self.effectors.contains(&block)
            || self.passives.contains(&block)
    }

    /// All constituent blocks across the four sets.
    pub fn all_blocks(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.cores
            .iter()
            .chain(self.targeters.iter())
            .chain(self.effectors.iter())
            .chain(self.passives.iter())
            .copied()
    }

    /// Total number of constituent blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cores.len() + self.targeters.len() + self.effectors.len() + self.passives.len()
    }

    /// Whether the tower has no constituents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The block delta carried by a tower-changed signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerDelta {
    /// Blocks newly assigned to the tower.
    pub added: Vec<BlockId>,
    /// Blocks that left the tower.
    pub removed: Vec<BlockId>,
}

impl TowerDelta {
    /// A delta that only adds blocks.
    #[must_use]
    pub fn added(blocks: Vec<BlockId>) -> Self {
        Self {
            added: blocks,
            removed: Vec::new(),
        }
    }

    /// A delta that only removes blocks.
    #[must_use]
    pub fn removed(blocks: Vec<BlockId>) -> Self {
        Self {
            added: Vec::new(),
            removed: blocks,
        }
    }
}

/// Registry owning tower membership.
///
/// The registry is the single owner of which block belongs to which
/// tower; the world storage owns placement and the block store owns the
/// capability data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TowerRegistry {
    towers: HashMap<TowerId, Tower>,
    /// Reverse index from block to owning tower.
    owner: HashMap<BlockId, TowerId>,
    next_id: TowerId,
}

impl TowerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            towers: HashMap::new(),
            owner: HashMap::new(),
            next_id: 1,
        }
    }

    /// Register a new tower from its constituent blocks.
    ///
    /// # Errors
    ///
    /// Returns [`DefenceError::BlockAlreadyOwned`] if any block already
    /// belongs to another tower, or [`DefenceError::BlockNotFound`] if a
    /// block is missing from the store. On error, nothing is registered.
    pub fn create(&mut self, blocks: &[BlockId], store: &BlockStore) -> Result<TowerId> {
        for &block in blocks {
            if !store.contains(block) {
                return Err(DefenceError::BlockNotFound(block));
            }
            if let Some(&tower) = self.owner.get(&block) {
                return Err(DefenceError::BlockAlreadyOwned { block, tower });
            }
        }

        let id = self.next_id;
        self.next_id += 1;

        let mut tower = Tower::new();
        for &block in blocks {
            // Presence was checked above
            if let Some(entity) = store.get(block) {
                tower.insert_block(entity);
                self.owner.insert(block, id);
            }
        }
        self.towers.insert(id, tower);
        Ok(id)
    }

    /// Apply a structural delta to an existing tower.
    ///
    /// # Errors
    ///
    /// Returns [`DefenceError::TowerNotFound`] for an unknown tower, and
    /// the same ownership/lookup errors as [`create`](Self::create) for
    /// added blocks.
    pub fn apply_delta(
        &mut self,
        id: TowerId,
        delta: &TowerDelta,
        store: &BlockStore,
    ) -> Result<()> {
        if !self.towers.contains_key(&id) {
            return Err(DefenceError::TowerNotFound(id));
        }
        for &block in &delta.added {
            if !store.contains(block) {
                return Err(DefenceError::BlockNotFound(block));
            }
            match self.owner.get(&block) {
                Some(&tower) if tower != id => {
                    return Err(DefenceError::BlockAlreadyOwned { block, tower });
                }
                _ => {}
            }
        }

        if let Some(tower) = self.towers.get_mut(&id) {
            for &block in &delta.removed {
                if tower.remove_block(block) {
                    self.owner.remove(&block);
                }
            }
            for &block in &delta.added {
                if let Some(entity) = store.get(block) {
                    tower.insert_block(entity);
                    self.owner.insert(block, id);
                }
            }
        }
        Ok(())
    }

    /// Remove a tower, releasing ownership of its blocks.
    pub fn remove(&mut self, id: TowerId) -> Option<Tower> {
        let tower = self.towers.remove(&id)?;
        for block in tower.all_blocks() {
            self.owner.remove(&block);
        }
        Some(tower)
    }

    /// Get a tower by ID.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&Tower> {
        self.towers.get(&id)
    }

    /// The tower owning a block, if any.
    #[must_use]
    pub fn owner_of(&self, block: BlockId) -> Option<TowerId> {
        self.owner.get(&block).copied()
    }

    /// Number of registered towers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.towers.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.towers.is_empty()
    }

    /// Sorted tower IDs for deterministic iteration.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<TowerId> {
        let mut ids: Vec<_> = self.towers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Drop every tower and all ownership records.
    pub fn clear(&mut self) {
        self.towers.clear();
        self.owner.clear();
    }
}
