//! Voxel world storage boundary.
//!
//! The simulation core never generates terrain chunks or streams
//! regions; it only reads and writes single voxels during field resets.
//! [`WorldGrid`] is that narrow interface, and [`VoxelWorld`] is the
//! map-backed implementation used by the simulation and its tests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::math::Vec3Fixed;

/// Integer lattice coordinate of a voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate (height, 0 = ground level).
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Create a new block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Origin of the lattice.
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// The world-space position of this voxel.
    #[must_use]
    pub fn to_world(self) -> Vec3Fixed {
        Vec3Fixed::from_ints(self.x, self.y, self.z)
    }

    /// Squared horizontal distance to another position, ignoring height.
    #[must_use]
    pub const fn horizontal_distance_squared(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dz * dz
    }
}

/// Material occupying a voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MaterialId {
    /// Empty space - the baseline material the field resets to.
    #[default]
    Air,
    /// Passive filler placed by world generation and field refills.
    Plain,
    /// The protected shrine at the field centre. Never cleared.
    Shrine,
    /// A placed tower block of any role.
    TowerBlock,
}

/// Single-voxel read/write access to the world.
///
/// Implemented by [`VoxelWorld`] in-process; an embedding engine can
/// provide its own implementation backed by real chunk storage.
pub trait WorldGrid {
    /// Read the material at a position. Unset voxels are [`MaterialId::Air`].
    fn get_block(&self, pos: BlockPos) -> MaterialId;

    /// Write the material at a position.
    fn set_block(&mut self, pos: BlockPos, material: MaterialId);
}

/// Map-backed voxel storage.
///
/// Only non-air voxels are stored. Iteration for hashing is over
/// sorted positions to keep state hashes deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoxelWorld {
    blocks: HashMap<BlockPos, MaterialId>,
}

impl VoxelWorld {
    /// Create an empty (all-air) world.
    #[must_use]
    pub fn new() -> Self {
        Self {
            blocks: HashMap::new(),
        }
    }

    /// Number of non-air voxels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the world contains no non-air voxels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Sorted positions of all non-air voxels, for deterministic iteration.
    #[must_use]
    pub fn sorted_positions(&self) -> Vec<BlockPos> {
        let mut positions: Vec<_> = self.blocks.keys().copied().collect();
        positions.sort_unstable();
        positions
    }

    /// Count voxels holding a given material.
    #[must_use]
    pub fn count_material(&self, material: MaterialId) -> usize {
        self.blocks.values().filter(|&&m| m == material).count()
    }
}

impl WorldGrid for VoxelWorld {
    fn get_block(&self, pos: BlockPos) -> MaterialId {
        self.blocks.get(&pos).copied().unwrap_or_default()
    }

    fn set_block(&mut self, pos: BlockPos, material: MaterialId) {
        if material == MaterialId::Air {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, material);
        }
    }
}
