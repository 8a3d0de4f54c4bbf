use strata_blocks::Biome;
use strata_blocks::types::{BEDROCK, STONE, WATER};
use strata_chunk::Column;

use crate::rng::ColumnRng;

use super::biome::{SEA_LEVEL, surface_blocks};
use super::ores::stone_or_ore;

/// Layers of the bedrock band at the world floor.
pub const BEDROCK_DEPTH: i32 = 5;

/// Fills one vertical line of a fresh column from the floor to `height`, then
/// floods up to sea level.
pub(super) fn fill_line(
    column: &mut Column,
    lx: i32,
    lz: i32,
    height: i32,
    biome: Biome,
    rng: &mut ColumnRng,
) {
    let world = column.world_height();
    let floor = world.min_y;

    let bedrock_top = (floor + BEDROCK_DEPTH - 1).min(height);
    for y in floor..=bedrock_top {
        let layer = y - floor;
        let block = if layer > 0 && rng.chance(layer as f32 / BEDROCK_DEPTH as f32) {
            STONE
        } else {
            BEDROCK
        };
        column.set_block(lx, y, lz, block);
    }

    let surface_depth = 3 + rng.below(3) as i32;
    let stone_top = height - surface_depth;
    for y in bedrock_top + 1..=stone_top {
        column.set_block(lx, y, lz, stone_or_ore(y - floor, rng.next_f32()));
    }

    let (top, under) = surface_blocks(biome);
    for y in (stone_top + 1).max(bedrock_top + 1)..=height {
        column.set_block(lx, y, lz, if y == height { top } else { under });
    }

    for y in height + 1..=SEA_LEVEL.min(world.max_y) {
        column.set_block(lx, y, lz, WATER);
    }
}
