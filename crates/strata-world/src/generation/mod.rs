use std::sync::Arc;

use strata_chunk::{ChunkPos, Column, Generator, Neighborhood, SECTION_SIZE, WorldHeight};

use crate::gen_ctx::GenCtx;
use crate::rng::ColumnRng;
use crate::worldgen::WorldGenParams;

pub mod biome;
mod caves;
mod column_plan;
pub mod ores;
mod surface;
mod trees;
mod vegetation;
mod veins;

pub use column_plan::ColumnPlan;
pub use surface::BEDROCK_DEPTH;
pub use trees::TREE_MARGIN;

const TERRAIN_SALT: u64 = 0x7465_7272;
const POPULATE_SALT: u64 = 0x706f_7075;

/// Noise terrain with threshold biomes, ores, trees, plants, and veins.
pub struct TerrainGenerator {
    seed: i64,
    world: WorldHeight,
    ctx: GenCtx,
}

impl TerrainGenerator {
    pub fn new(seed: i64, world: WorldHeight, params: WorldGenParams) -> Self {
        Self {
            seed,
            world,
            ctx: GenCtx::new(seed, Arc::new(params)),
        }
    }

    #[inline]
    pub fn seed(&self) -> i64 {
        self.seed
    }

    #[inline]
    pub fn params(&self) -> &WorldGenParams {
        &self.ctx.params
    }

    /// Heights and biomes the terrain pass would lay down at `pos`.
    pub fn plan(&self, pos: ChunkPos) -> ColumnPlan {
        ColumnPlan::build(&self.ctx, pos, self.world)
    }
}

impl Generator for TerrainGenerator {
    fn generate(&self, column: &mut Column) {
        let pos = column.pos();
        let plan = ColumnPlan::build(&self.ctx, pos, column.world_height());
        let mut rng = ColumnRng::new(self.seed, pos, TERRAIN_SALT);
        let size = SECTION_SIZE as i32;
        for lz in 0..size {
            for lx in 0..size {
                let biome = plan.biome(lx, lz);
                column.set_biome(lx, lz, biome);
                surface::fill_line(column, lx, lz, plan.height(lx, lz), biome, &mut rng);
            }
        }
        log::trace!("terrain pass done for column {pos}");
    }

    fn populate(&self, column: &mut Column, neighbors: &Neighborhood) {
        let pos = column.pos();
        let mut rng = ColumnRng::new(self.seed, pos, POPULATE_SALT);
        let trees = trees::place_trees(column, &self.ctx.params, &mut rng);
        vegetation::scatter_plants(column, &mut rng);
        let ore = veins::place_veins(column, &mut rng);
        caves::carve_caves(column, neighbors, &mut rng);
        log::trace!("populated column {pos}: {trees} trees, {ore} vein blocks");
    }
}
