use crate::types::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockInfo {
    pub id: BlockId,
    pub name: &'static str,
}

const fn info(id: BlockId, name: &'static str) -> BlockInfo {
    BlockInfo { id, name }
}

// Sorted by id so lookups can binary search.
static BLOCKS: &[BlockInfo] = &[
    info(AIR, "air"),
    info(STONE, "stone"),
    info(GRASS, "grass"),
    info(DIRT, "dirt"),
    info(COBBLESTONE, "cobblestone"),
    info(BEDROCK, "bedrock"),
    info(WATER, "water"),
    info(SAND, "sand"),
    info(GRAVEL, "gravel"),
    info(GOLD_ORE, "gold_ore"),
    info(IRON_ORE, "iron_ore"),
    info(COAL_ORE, "coal_ore"),
    info(OAK_LOG, "oak_log"),
    info(OAK_LEAVES, "oak_leaves"),
    info(LAPIS_ORE, "lapis_ore"),
    info(TALL_GRASS, "tall_grass"),
    info(DANDELION, "dandelion"),
    info(POPPY, "poppy"),
    info(DIAMOND_ORE, "diamond_ore"),
    info(REDSTONE_ORE, "redstone_ore"),
    info(SNOW, "snow"),
    info(SPRUCE_LEAVES, "spruce_leaves"),
    info(SPRUCE_LOG, "spruce_log"),
];

#[inline]
pub fn block_info(id: BlockId) -> Option<&'static BlockInfo> {
    BLOCKS
        .binary_search_by_key(&id, |b| b.id)
        .ok()
        .map(|idx| &BLOCKS[idx])
}

/// Name of a known block, or `"unknown"` for ids outside the table.
pub fn block_name(id: BlockId) -> &'static str {
    block_info(id).map(|b| b.name).unwrap_or("unknown")
}
