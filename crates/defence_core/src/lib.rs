//! # Defence Core
//!
//! Deterministic combat-and-economy simulation core for Gooey Defence.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! This separation enables:
//! - Headless balance runs
//! - Replay systems
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`blocks`] - Tower block capability model
//! - [`catalog`] - Block stat data loaded from RON
//! - [`tower`] - Tower aggregates and the registry
//! - [`power`] - The power ledger gating every firing
//! - [`targeting`] - Pluggable target selection strategies
//! - [`effects`] - The effect lifecycle engine
//! - [`scheduler`] - Periodic attack timers
//! - [`field`] - Field geometry, reset clear and refill
//! - [`simulation`] - The owning state struct and tick loop
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod blocks;
pub mod catalog;
pub mod effects;
pub mod enemy;
pub mod error;
pub mod field;
pub mod math;
pub mod power;
pub mod scheduler;
pub mod simulation;
pub mod targeting;
pub mod tower;
pub mod world;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::blocks::{
        BlockCapability, BlockId, BlockStore, EffectCount, EffectDuration, EffectorKind,
        TargeterKind, TowerCore, TowerEffector, TowerTargeter,
    };
    pub use crate::catalog::BlockCatalog;
    pub use crate::effects::{EffectApplication, EffectRemoval};
    pub use crate::enemy::{Enemy, EnemyId, EnemyQuery, EnemyRoster};
    pub use crate::error::{DefenceError, Result};
    pub use crate::field::FieldConfig;
    pub use crate::math::{Fixed, Vec3Fixed};
    pub use crate::scheduler::{AttackScheduler, TimerKey};
    pub use crate::simulation::{DefenceSim, TickEvents};
    pub use crate::tower::{Tower, TowerDelta, TowerId, TowerRegistry};
    pub use crate::world::{BlockPos, MaterialId, VoxelWorld, WorldGrid};
}
