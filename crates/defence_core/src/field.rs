//! Field lifecycle: geometry, the reset clear pass and the refill pass.
//!
//! The playfield is a circular arena: a shrine at the origin, a clear
//! ring around it, three entrances on the outer ring, and a scattering
//! of passive filler blocks between them. On reset the arena is wiped
//! back to the baseline material and refilled to the same statistical
//! density initial generation used, so a fresh round looks structurally
//! like a new field.
//!
//! Everything here is integer lattice math; the sphere and circle
//! equations run through [`isqrt`], never floating point.

use serde::{Deserialize, Serialize};

use crate::math::isqrt;
use crate::world::{BlockPos, MaterialId, WorldGrid};

/// Radius of the clear zone around the shrine, in blocks.
pub const SHRINE_RING_SIZE: i32 = 5;

/// Radius of the outer wall of the defence field, in blocks.
pub const OUTER_RING_SIZE: i32 = 60;

/// Radius of the clear zone around each entrance, in blocks.
pub const ENTRANCE_RING_SIZE: i32 = 4;

/// The centre of the field.
pub const FIELD_CENTRE: BlockPos = BlockPos::ZERO;

/// Entrance positions on the outer ring, one third of a turn apart.
/// Coordinates are the truncated lattice points of the exact angles.
pub const ENTRANCES: [BlockPos; 3] = [
    BlockPos::new(OUTER_RING_SIZE, 0, 0),
    BlockPos::new(-30, 0, 51),
    BlockPos::new(-30, 0, -51),
];

/// Number of entrances in the field.
#[must_use]
pub const fn entrance_count() -> usize {
    ENTRANCES.len()
}

/// The position of an entrance, if the index is valid.
#[must_use]
pub fn entrance_pos(id: usize) -> Option<BlockPos> {
    ENTRANCES.get(id).copied()
}

/// Squared distance from a position to the nearest entrance.
#[must_use]
pub fn distance_squared_to_nearest_entrance(pos: BlockPos) -> i64 {
    ENTRANCES
        .iter()
        .map(|entrance| pos.horizontal_distance_squared(*entrance))
        .min()
        .unwrap_or(i64::MAX)
}

/// Whether a position lies inside the clear zone of any entrance.
#[must_use]
pub fn in_range_of_entrance(pos: BlockPos) -> bool {
    let ring = i64::from(ENTRANCE_RING_SIZE);
    distance_squared_to_nearest_entrance(pos) <= ring * ring
}

/// Whether a position lies inside the clear zone around the shrine.
#[must_use]
pub fn in_shrine_ring(pos: BlockPos) -> bool {
    let ring = i64::from(SHRINE_RING_SIZE);
    pos.horizontal_distance_squared(FIELD_CENTRE) <= ring * ring
}

/// Refill configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Radius of the clear/refill passes.
    pub radius: i32,
    /// Chance, in percent, that a disc column receives a filler block.
    pub fill_density_percent: u32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            radius: OUTER_RING_SIZE,
            fill_density_percent: 8,
        }
    }
}

/// Simple deterministic RNG for field refills, seeded per reset.
struct FieldRng {
    state: u64,
}

impl FieldRng {
    const fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(0x9E37_79B9_7F4A_7C15),
        }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(0x5DEE_CE66D).wrapping_add(11);
        self.state
    }

    /// Roll a percentage chance.
    fn chance(&mut self, percent: u32) -> bool {
        self.next() % 100 < u64::from(percent)
    }
}

/// Clear the upper half-ball of `radius` around the field centre down
/// to air, preserving the shrine material.
///
/// The column width comes from the circle equation and the clear height
/// from the sphere equation; lattice points exactly on the sphere fall
/// outside the vertical bound, so a column touching the sphere surface
/// at ground level is left alone.
pub fn clear_field(world: &mut dyn WorldGrid, radius: i32) {
    let r_sq = i64::from(radius) * i64::from(radius);
    for x in -radius..=radius {
        let x_sq = i64::from(x) * i64::from(x);
        let width = isqrt(r_sq - x_sq) as i32;
        for z in -width..=width {
            let z_sq = i64::from(z) * i64::from(z);
            let rem = r_sq - x_sq - z_sq;
            let root = isqrt(rem);
            // Exact sphere-surface columns are excluded from the bound.
            let bound = if root * root == rem { root - 1 } else { root };
            let height = bound as i32;
            for y in 0..=height {
                let pos = BlockPos::new(x, y, z);
                let block = world.get_block(pos);
                if block != MaterialId::Air && block != MaterialId::Shrine {
                    world.set_block(pos, MaterialId::Air);
                }
            }
        }
    }
}

/// Scatter filler blocks at ground level across the disc of `radius`,
/// using the same density rules as initial world generation.
///
/// The RNG is seeded once per reset, not per position; determinism
/// comes from the fixed column iteration order. Shrine and entrance
/// clearings stay open, and occupied voxels are never overwritten.
pub fn random_fill(world: &mut dyn WorldGrid, config: &FieldConfig, seed: u64) {
    let mut rng = FieldRng::new(seed);
    let r_sq = i64::from(config.radius) * i64::from(config.radius);

    for x in -config.radius..=config.radius {
        let x_sq = i64::from(x) * i64::from(x);
        let width = isqrt(r_sq - x_sq) as i32;
        for z in -width..=width {
            if !rng.chance(config.fill_density_percent) {
                continue;
            }
            let pos = BlockPos::new(x, 0, z);
            if in_shrine_ring(pos) || in_range_of_entrance(pos) {
                continue;
            }
            if world.get_block(pos) == MaterialId::Air {
                world.set_block(pos, MaterialId::Plain);
            }
        }
    }
}
