/// One voxel's material. Zero is always air.
pub type BlockId = u8;

pub const AIR: BlockId = 0;
pub const STONE: BlockId = 1;
pub const GRASS: BlockId = 2;
pub const DIRT: BlockId = 3;
pub const COBBLESTONE: BlockId = 4;
pub const BEDROCK: BlockId = 7;
pub const WATER: BlockId = 9;
pub const SAND: BlockId = 12;
pub const GRAVEL: BlockId = 13;
pub const GOLD_ORE: BlockId = 14;
pub const IRON_ORE: BlockId = 15;
pub const COAL_ORE: BlockId = 16;
pub const OAK_LOG: BlockId = 17;
pub const OAK_LEAVES: BlockId = 18;
pub const LAPIS_ORE: BlockId = 21;
pub const TALL_GRASS: BlockId = 31;
pub const DANDELION: BlockId = 37;
pub const POPPY: BlockId = 38;
pub const DIAMOND_ORE: BlockId = 56;
pub const REDSTONE_ORE: BlockId = 73;
pub const SNOW: BlockId = 80;
pub const SPRUCE_LOG: BlockId = 162;
pub const SPRUCE_LEAVES: BlockId = 161;
