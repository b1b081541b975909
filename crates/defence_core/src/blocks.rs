//! Tower block capability model.
//!
//! Every placed tower block is a block-entity carrying exactly one
//! capability: producing power (core), selecting enemies (targeter),
//! applying effects (effector), or nothing at all (passive structure).
//! The capabilities are a tagged variant rather than an inheritance
//! chain; concrete stat values come from the [`catalog`](crate::catalog).

use std::collections::BTreeSet;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enemy::EnemyId;
use crate::math::{fixed_serde, Fixed};
use crate::world::BlockPos;

/// Unique identifier for block-entities.
pub type BlockId = u64;

/// How often an effector's effect lands on a targeted enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectCount {
    /// Applied once when an enemy enters the target set, then left
    /// running. Represents an ongoing state such as a burn or a slow.
    Continuous,
    /// Applied on every firing, regardless of how long the enemy has
    /// been targeted. Represents discrete hits.
    PerShot,
}

/// How an effector's effect ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectDuration {
    /// Completes immediately; nothing to remove.
    Instant,
    /// Runs until the enemy leaves the target set, at which point the
    /// effector is told to remove it.
    Lasting,
    /// Applied once and intentionally never removed.
    Permanent,
}

/// Which targeting strategy a targeter block uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargeterKind {
    /// Attacks the single enemy closest to the shrine.
    Single,
    /// Attacks every enemy within range.
    Sphere,
    /// Attacks one enemy, then arcs to nearby enemies.
    Chain,
}

/// Which gameplay effect an effector block applies.
///
/// The combat core only consumes the count/duration classification;
/// the kind identifies the effect for the systems that implement it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectorKind {
    /// Plain damage on each shot.
    Damage,
    /// Sets the enemy on fire.
    Fire,
    /// Poisons the enemy.
    Poison,
    /// Halts the enemy's movement.
    Stun,
    /// Slows the enemy's movement.
    Ice,
    /// Marks the enemy with a visual indicator.
    Visual,
}

/// Capability of a core block: fixed power production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TowerCore {
    /// Power produced by this core.
    pub power: i32,
}

impl TowerCore {
    /// Create a core with the given power output.
    #[must_use]
    pub const fn new(power: i32) -> Self {
        Self { power }
    }
}

/// Capability of a targeter block: enemy selection plus attack state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TowerTargeter {
    /// Power drained by this targeter.
    pub drain: i32,
    /// Selection strategy.
    pub kind: TargeterKind,
    /// Spatial range of the targeter.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Ticks between firings.
    pub attack_period: u32,
    /// Scalar forwarded on every effect application and removal.
    #[serde(with = "fixed_serde")]
    pub multiplier: Fixed,
    /// Arc range between chained enemies. Only read by chain targeters.
    #[serde(with = "fixed_serde")]
    pub chain_range: Fixed,
    /// Maximum enemies hit by one chain firing, primary included.
    /// Only read by chain targeters.
    pub chain_length: u32,
    /// Enemies hit by the most recent successful firing. Empty until
    /// the targeter first fires.
    pub last_targets: BTreeSet<EnemyId>,
}

impl TowerTargeter {
    /// Create a targeter with the given stats and an empty target set.
    #[must_use]
    pub fn new(drain: i32, kind: TargeterKind, range: Fixed, attack_period: u32) -> Self {
        Self {
            drain,
            kind,
            range,
            attack_period,
            multiplier: Fixed::ONE,
            chain_range: Fixed::ZERO,
            chain_length: 0,
            last_targets: BTreeSet::new(),
        }
    }

    /// Builder method to set the effect multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: Fixed) -> Self {
        self.multiplier = multiplier;
        self
    }
}

/// Capability of an effector block: an effect and its two policy tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TowerEffector {
    /// Power drained by this effector.
    pub drain: i32,
    /// Which effect this block applies.
    pub kind: EffectorKind,
    /// How often the effect is applied.
    pub count: EffectCount,
    /// How the effect ends.
    pub duration: EffectDuration,
}

impl TowerEffector {
    /// Create an effector with the given stats and policies.
    #[must_use]
    pub const fn new(
        drain: i32,
        kind: EffectorKind,
        count: EffectCount,
        duration: EffectDuration,
    ) -> Self {
        Self {
            drain,
            kind,
            count,
            duration,
        }
    }
}

/// The single capability a block-entity implements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockCapability {
    /// Power production.
    Core(TowerCore),
    /// Enemy selection.
    Targeter(TowerTargeter),
    /// Effect application.
    Effector(TowerEffector),
    /// Structural filler with no combat role.
    Passive,
}

impl BlockCapability {
    /// The core capability, if this block is a core.
    #[must_use]
    pub fn as_core(&self) -> Option<&TowerCore> {
        match self {
            Self::Core(core) => Some(core),
            _ => None,
        }
    }

    /// The targeter capability, if this block is a targeter.
    #[must_use]
    pub fn as_targeter(&self) -> Option<&TowerTargeter> {
        match self {
            Self::Targeter(targeter) => Some(targeter),
            _ => None,
        }
    }

    /// The effector capability, if this block is an effector.
    #[must_use]
    pub fn as_effector(&self) -> Option<&TowerEffector> {
        match self {
            Self::Effector(effector) => Some(effector),
            _ => None,
        }
    }
}

/// A placed tower block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockEntity {
    /// Unique identifier for this block-entity.
    pub id: BlockId,
    /// Lattice position of the block.
    pub pos: BlockPos,
    /// The capability this block implements.
    pub capability: BlockCapability,
}

/// Storage for all placed tower blocks.
///
/// Uses a `HashMap` for O(1) lookup by ID, with deterministic
/// iteration via sorted keys when processing systems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockStore {
    blocks: HashMap<BlockId, BlockEntity>,
    next_id: BlockId,
}

impl BlockStore {
    /// Create empty block storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            blocks: HashMap::new(),
            next_id: 1,
        }
    }

    /// Insert a new block-entity and return its ID.
    pub fn insert(&mut self, pos: BlockPos, capability: BlockCapability) -> BlockId {
        let id = self.next_id;
        self.next_id += 1;
        self.blocks.insert(
            id,
            BlockEntity {
                id,
                pos,
                capability,
            },
        );
        id
    }

    /// Remove a block-entity by ID.
    pub fn remove(&mut self, id: BlockId) -> Option<BlockEntity> {
        self.blocks.remove(&id)
    }

    /// Get a block-entity by ID.
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&BlockEntity> {
        self.blocks.get(&id)
    }

    /// Get a mutable reference to a block-entity by ID.
    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut BlockEntity> {
        self.blocks.get_mut(&id)
    }

    /// Check if a block-entity exists.
    #[must_use]
    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    /// Number of stored block-entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if storage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Sorted block IDs for deterministic iteration.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<BlockId> {
        let mut ids: Vec<_> = self.blocks.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// The core capability of a block, if it exists and is a core.
    #[must_use]
    pub fn core(&self, id: BlockId) -> Option<&TowerCore> {
        self.blocks.get(&id).and_then(|b| b.capability.as_core())
    }

    /// The targeter capability of a block, if it exists and is a targeter.
    #[must_use]
    pub fn targeter(&self, id: BlockId) -> Option<&TowerTargeter> {
        self.blocks.get(&id).and_then(|b| b.capability.as_targeter())
    }

    /// Mutable targeter capability of a block.
    pub fn targeter_mut(&mut self, id: BlockId) -> Option<&mut TowerTargeter> {
        match self.blocks.get_mut(&id) {
            Some(BlockEntity {
                capability: BlockCapability::Targeter(targeter),
                ..
            }) => Some(targeter),
            _ => None,
        }
    }

    /// The effector capability of a block, if it exists and is an effector.
    #[must_use]
    pub fn effector(&self, id: BlockId) -> Option<&TowerEffector> {
        self.blocks.get(&id).and_then(|b| b.capability.as_effector())
    }
}
