use strata_blocks::types::STONE;
use strata_chunk::{Column, SECTION_SIZE};

use crate::rng::ColumnRng;

use super::ores::{MIDDLE_BAND_TOP, weighted_ore};
use super::surface::BEDROCK_DEPTH;

/// Drops 1..=3 roughly spherical ore pockets into the column's stone.
/// Placement odds fall off linearly from the centre; only stone is replaced.
pub(super) fn place_veins(column: &mut Column, rng: &mut ColumnRng) -> usize {
    let world = column.world_height();
    let size = SECTION_SIZE as i32;
    let count = 1 + rng.below(3);
    let mut replaced = 0;
    for _ in 0..count {
        let radius = 2 + rng.below(2) as i32;
        let cx = radius + rng.below((size - 2 * radius) as u32) as i32;
        let cz = radius + rng.below((size - 2 * radius) as u32) as i32;
        let lo = world.min_y + BEDROCK_DEPTH + radius;
        let hi = (world.min_y + MIDDLE_BAND_TOP + 16).min(world.max_y - radius);
        if hi < lo {
            continue;
        }
        let cy = lo + rng.below((hi - lo + 1) as u32) as i32;
        let ore = weighted_ore(cy - world.min_y, rng.next_f32());

        let r = radius as f32;
        for dy in -radius..=radius {
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    let d = ((dx * dx + dy * dy + dz * dz) as f32).sqrt();
                    if d > r || !rng.chance(1.0 - d / (r + 1.0)) {
                        continue;
                    }
                    let (x, y, z) = (cx + dx, cy + dy, cz + dz);
                    if column.get_block(x, y, z) == STONE {
                        column.set_block(x, y, z, ore);
                        replaced += 1;
                    }
                }
            }
        }
    }
    replaced
}
