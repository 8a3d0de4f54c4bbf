use strata_blocks::BlockId;
use strata_blocks::types::{AIR, DIRT, GRASS, OAK_LEAVES, OAK_LOG, SPRUCE_LEAVES, SPRUCE_LOG};
use strata_chunk::{Column, SECTION_SIZE};

use crate::rng::ColumnRng;
use crate::worldgen::WorldGenParams;

use super::biome::tree_chance;

/// Canopy radius; trunks stay this far from the column edge.
pub const TREE_MARGIN: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Species {
    Oak,
    Spruce,
}

impl Species {
    fn log(self) -> BlockId {
        match self {
            Species::Oak => OAK_LOG,
            Species::Spruce => SPRUCE_LOG,
        }
    }

    fn leaves(self) -> BlockId {
        match self {
            Species::Oak => OAK_LEAVES,
            Species::Spruce => SPRUCE_LEAVES,
        }
    }
}

/// Returns the number of trees grown.
pub(super) fn place_trees(column: &mut Column, params: &WorldGenParams, rng: &mut ColumnRng) -> usize {
    let size = SECTION_SIZE as i32;
    let span = (params.trunk_max - params.trunk_min + 1).max(1) as u32;
    let mut grown = 0;
    for lz in TREE_MARGIN..size - TREE_MARGIN {
        for lx in TREE_MARGIN..size - TREE_MARGIN {
            let biome = column.biome_at(lx, lz);
            let chance = tree_chance(biome);
            if chance <= 0.0 || !rng.chance(chance) {
                continue;
            }
            let trunk = params.trunk_min + rng.below(span) as i32;
            let species = if biome.is_cold() { Species::Spruce } else { Species::Oak };
            if grow(column, lx, lz, trunk, species) {
                grown += 1;
            }
        }
    }
    grown
}

fn grow(column: &mut Column, lx: i32, lz: i32, trunk: i32, species: Species) -> bool {
    let ground = column.height_at(lx, lz);
    if !matches!(column.get_block(lx, ground, lz), DIRT | GRASS) {
        return false;
    }
    // Spruces run one block taller under their cone.
    let trunk = if species == Species::Spruce { trunk + 1 } else { trunk };
    let top = ground + trunk;
    if top + 1 > column.world_height().max_y {
        return false;
    }
    if (ground + 1..=top).any(|y| column.get_block(lx, y, lz) != AIR) {
        return false;
    }

    column.set_block(lx, ground, lz, DIRT);
    for y in ground + 1..=top {
        column.set_block(lx, y, lz, species.log());
    }
    match species {
        Species::Oak => {
            for y in top - 2..=top + 1 {
                let radius = if y < top { 2 } else { 1 };
                leaf_layer(column, lx, y, lz, radius, species.leaves());
            }
        }
        Species::Spruce => {
            for (i, y) in (ground + 2..=top + 1).rev().enumerate() {
                let radius = ((i as i32 + 1) / 2).min(TREE_MARGIN);
                leaf_layer(column, lx, y, lz, radius, species.leaves());
            }
        }
    }
    true
}

// Leaves only fill air, so they never replace logs or terrain.
fn leaf_layer(column: &mut Column, cx: i32, y: i32, cz: i32, radius: i32, leaves: BlockId) {
    for dz in -radius..=radius {
        for dx in -radius..=radius {
            let (x, z) = (cx + dx, cz + dz);
            if column.get_block(x, y, z) == AIR {
                column.set_block(x, y, z, leaves);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_blocks::types::STONE;
    use strata_chunk::WorldHeight;

    fn ground(top: BlockId) -> Column {
        let mut c = Column::new(0, 0, WorldHeight::default());
        for z in 0..16 {
            for x in 0..16 {
                c.set_block(x, 63, z, DIRT);
                c.set_block(x, 64, z, top);
            }
        }
        c
    }

    #[test]
    fn oak_has_trunk_and_cuboid_canopy() {
        let mut c = ground(GRASS);
        assert!(grow(&mut c, 8, 8, 5, Species::Oak));
        assert_eq!(c.get_block(8, 64, 8), DIRT);
        for y in 65..=69 {
            assert_eq!(c.get_block(8, y, 8), OAK_LOG);
        }
        assert_eq!(c.get_block(8, 70, 8), OAK_LEAVES);
        assert_eq!(c.get_block(10, 67, 10), OAK_LEAVES);
        assert_eq!(c.get_block(10, 69, 10), AIR);
        assert_eq!(c.get_block(9, 69, 9), OAK_LEAVES);
        assert_eq!(c.height_at(8, 8), 70);
    }

    #[test]
    fn spruce_canopy_narrows_upward() {
        let mut c = ground(GRASS);
        assert!(grow(&mut c, 8, 8, 5, Species::Spruce));
        let top = 64 + 6;
        assert_eq!(c.get_block(8, top, 8), SPRUCE_LOG);
        assert_eq!(c.get_block(8, top + 1, 8), SPRUCE_LEAVES);
        assert_eq!(c.get_block(9, top + 1, 8), AIR);
        assert_eq!(c.get_block(9, top, 8), SPRUCE_LEAVES);
        assert_eq!(c.get_block(10, top - 3, 8), SPRUCE_LEAVES);
    }

    #[test]
    fn rejects_bad_ground_and_blocked_trunk() {
        let mut c = ground(STONE);
        assert!(!grow(&mut c, 8, 8, 5, Species::Oak));
        assert_eq!(c.get_block(8, 65, 8), AIR);

        let mut c = ground(GRASS);
        c.set_block(8, 66, 8, STONE);
        // Height map now points at the stone, which is not soil.
        assert!(!grow(&mut c, 8, 8, 5, Species::Oak));
    }

    #[test]
    fn leaves_do_not_replace_logs() {
        let mut c = ground(GRASS);
        assert!(grow(&mut c, 9, 8, 6, Species::Oak));
        // A stump next door whose canopy sweeps across the first trunk.
        assert!(grow(&mut c, 7, 8, 2, Species::Oak));
        assert_eq!(c.get_block(8, 65, 8), OAK_LEAVES);
        for y in 65..=70 {
            assert_eq!(c.get_block(9, y, 8), OAK_LOG);
        }
    }
}
