use strata_blocks::BlockId;
use strata_blocks::types::{
    COAL_ORE, DIAMOND_ORE, GOLD_ORE, IRON_ORE, LAPIS_ORE, REDSTONE_ORE, STONE,
};

#[derive(Clone, Copy, Debug)]
pub struct OreChance {
    pub block: BlockId,
    pub chance: f32,
}

const fn ore(block: BlockId, chance: f32) -> OreChance {
    OreChance { block, chance }
}

/// Depth above the world floor below which the deep table applies.
pub const DEEP_BAND_TOP: i32 = 16;
/// Depth above the world floor below which the middle table applies.
pub const MIDDLE_BAND_TOP: i32 = 40;

static DEEP: &[OreChance] = &[
    ore(DIAMOND_ORE, 0.001),
    ore(REDSTONE_ORE, 0.008),
    ore(GOLD_ORE, 0.004),
    ore(IRON_ORE, 0.01),
    ore(COAL_ORE, 0.01),
    ore(LAPIS_ORE, 0.002),
];

static MIDDLE: &[OreChance] = &[
    ore(GOLD_ORE, 0.002),
    ore(IRON_ORE, 0.012),
    ore(COAL_ORE, 0.015),
    ore(LAPIS_ORE, 0.002),
    ore(REDSTONE_ORE, 0.002),
];

static SHALLOW: &[OreChance] = &[ore(IRON_ORE, 0.006), ore(COAL_ORE, 0.02)];

/// `depth` counts blocks above the world floor.
pub fn ore_table(depth: i32) -> &'static [OreChance] {
    if depth < DEEP_BAND_TOP {
        DEEP
    } else if depth <= MIDDLE_BAND_TOP {
        MIDDLE
    } else {
        SHALLOW
    }
}

/// Stone or an ore, from one uniform roll against the band's cumulative table.
pub fn stone_or_ore(depth: i32, roll: f32) -> BlockId {
    let mut acc = 0.0_f32;
    for entry in ore_table(depth) {
        acc += entry.chance;
        if roll < acc {
            return entry.block;
        }
    }
    STONE
}

/// Always an ore: the band's chances renormalised to weights.
pub fn weighted_ore(depth: i32, roll: f32) -> BlockId {
    let table = ore_table(depth);
    let total: f32 = table.iter().map(|o| o.chance).sum();
    let target = roll * total;
    let mut acc = 0.0_f32;
    for entry in table {
        acc += entry.chance;
        if target < acc {
            return entry.block;
        }
    }
    table.last().map_or(STONE, |o| o.block)
}
