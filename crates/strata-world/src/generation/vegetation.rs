use strata_blocks::types::{DANDELION, GRASS, POPPY, TALL_GRASS};
use strata_chunk::{Column, SECTION_SIZE};

use crate::rng::ColumnRng;

use super::biome::vegetation_chance;

pub(super) fn scatter_plants(column: &mut Column, rng: &mut ColumnRng) {
    let size = SECTION_SIZE as i32;
    let world = column.world_height();
    for lz in 0..size {
        for lx in 0..size {
            let chance = vegetation_chance(column.biome_at(lx, lz));
            if chance <= 0.0 || !rng.chance(chance) {
                continue;
            }
            let ground = column.height_at(lx, lz);
            if column.get_block(lx, ground, lz) != GRASS || !world.contains(ground + 1) {
                continue;
            }
            let plant = if rng.chance(0.8) {
                TALL_GRASS
            } else if rng.chance(0.5) {
                DANDELION
            } else {
                POPPY
            };
            column.set_block(lx, ground + 1, lz, plant);
        }
    }
}
