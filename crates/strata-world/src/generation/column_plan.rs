use strata_blocks::Biome;
use strata_chunk::{COLUMN_AREA, ChunkPos, SECTION_SIZE, WorldHeight};

use crate::gen_ctx::GenCtx;

use super::biome::{classify, cooled_temperature};
use super::surface::BEDROCK_DEPTH;

const SIZE: usize = SECTION_SIZE;
const TILE: usize = SIZE + 2;
/// Headroom kept above the tallest terrain for trunks and canopies.
const CANOPY_ROOM: i32 = 12;

/// Terrain heights and biomes for one column, computed before any block is
/// written. A pure function of the seed, the parameters, and the position.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnPlan {
    heights: [i32; COLUMN_AREA],
    biomes: [Biome; COLUMN_AREA],
}

impl ColumnPlan {
    #[inline]
    pub fn height(&self, lx: i32, lz: i32) -> i32 {
        self.heights[lz as usize * SIZE + lx as usize]
    }

    #[inline]
    pub fn biome(&self, lx: i32, lz: i32) -> Biome {
        self.biomes[lz as usize * SIZE + lx as usize]
    }

    pub(crate) fn build(ctx: &GenCtx, pos: ChunkPos, world: WorldHeight) -> Self {
        let (ox, oz) = pos.block_origin();
        let raw = |wx: i32, wz: i32| raw_height(ctx, wx, wz);

        let mut smoothed = [0.0_f32; COLUMN_AREA];
        if ctx.params.smooth {
            // Padded tile: the border ring comes from the neighbours' noise so
            // the box filter matches across column edges.
            let mut tile = [0.0_f32; TILE * TILE];
            for tz in 0..TILE {
                for tx in 0..TILE {
                    tile[tz * TILE + tx] = raw(ox + tx as i32 - 1, oz + tz as i32 - 1);
                }
            }
            for lz in 0..SIZE {
                for lx in 0..SIZE {
                    let mut sum = 0.0_f32;
                    for dz in 0..3 {
                        for dx in 0..3 {
                            sum += tile[(lz + dz) * TILE + lx + dx];
                        }
                    }
                    smoothed[lz * SIZE + lx] = sum / 9.0;
                }
            }
        } else {
            for lz in 0..SIZE {
                for lx in 0..SIZE {
                    smoothed[lz * SIZE + lx] = raw(ox + lx as i32, oz + lz as i32);
                }
            }
        }

        let lo = world.min_y + BEDROCK_DEPTH;
        let hi = (world.max_y - CANOPY_ROOM).max(lo).min(world.max_y);
        let mut heights = [0_i32; COLUMN_AREA];
        let mut biomes = [Biome::Ocean; COLUMN_AREA];
        for lz in 0..SIZE {
            for lx in 0..SIZE {
                let i = lz * SIZE + lx;
                let h = (smoothed[i].round() as i32).clamp(lo.min(hi), hi);
                let (wx, wz) = ((ox + lx as i32) as f32, (oz + lz as i32) as f32);
                let temperature = cooled_temperature(ctx.temperature_at(wx, wz), h);
                heights[i] = h;
                biomes[i] = classify(h, temperature, ctx.humidity_at(wx, wz));
            }
        }
        Self { heights, biomes }
    }
}

fn raw_height(ctx: &GenCtx, wx: i32, wz: i32) -> f32 {
    let p = &ctx.params;
    let t = (ctx.terrain_at(wx as f32, wz as f32) * 0.5 + 0.5).clamp(0.0, 1.0);
    p.min_height as f32 + t * (p.max_height - p.min_height) as f32
}
