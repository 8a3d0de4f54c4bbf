use strata_blocks::Biome;
use strata_blocks::BlockId;
use strata_blocks::types::{DIRT, GRASS, SAND, SNOW};

pub const SEA_LEVEL: i32 = 62;
pub const MOUNTAIN_HEIGHT: i32 = 96;
/// Temperature lost per block of height above sea level.
pub const HEIGHT_COOLING: f32 = 0.005;

pub const SNOW_TEMPERATURE: f32 = 0.3;
pub const TUNDRA_MAX_TEMPERATURE: f32 = 0.2;
pub const COLD_MAX_TEMPERATURE: f32 = 0.4;
pub const TEMPERATE_MAX_TEMPERATURE: f32 = 0.7;

pub const TAIGA_MIN_HUMIDITY: f32 = 0.5;
pub const SWAMP_MIN_HUMIDITY: f32 = 0.75;
pub const FOREST_MIN_HUMIDITY: f32 = 0.45;
pub const JUNGLE_MIN_HUMIDITY: f32 = 0.6;
pub const SAVANNA_MIN_HUMIDITY: f32 = 0.3;

#[inline]
pub fn cooled_temperature(temperature: f32, height: i32) -> f32 {
    temperature - HEIGHT_COOLING * (height - SEA_LEVEL).max(0) as f32
}

/// Ordered threshold classification. `temperature` is already height-cooled.
pub fn classify(height: i32, temperature: f32, humidity: f32) -> Biome {
    if height < SEA_LEVEL {
        return Biome::Ocean;
    }
    if height > MOUNTAIN_HEIGHT {
        return if temperature < SNOW_TEMPERATURE {
            Biome::SnowyTundra
        } else {
            Biome::Mountains
        };
    }
    if temperature < TUNDRA_MAX_TEMPERATURE {
        Biome::Tundra
    } else if temperature < COLD_MAX_TEMPERATURE {
        if humidity > TAIGA_MIN_HUMIDITY {
            Biome::Taiga
        } else {
            Biome::Plains
        }
    } else if temperature < TEMPERATE_MAX_TEMPERATURE {
        if humidity > SWAMP_MIN_HUMIDITY {
            Biome::Swamp
        } else if humidity > FOREST_MIN_HUMIDITY {
            Biome::Forest
        } else {
            Biome::Plains
        }
    } else if humidity > JUNGLE_MIN_HUMIDITY {
        Biome::Jungle
    } else if humidity > SAVANNA_MIN_HUMIDITY {
        Biome::Savanna
    } else {
        Biome::Desert
    }
}

/// `(top, subsurface)` blocks of the shallow band.
pub fn surface_blocks(biome: Biome) -> (BlockId, BlockId) {
    match biome {
        Biome::Desert => (SAND, SAND),
        Biome::Tundra | Biome::SnowyTundra => (SNOW, DIRT),
        Biome::Swamp | Biome::Ocean => (DIRT, DIRT),
        _ => (GRASS, DIRT),
    }
}

pub fn tree_chance(biome: Biome) -> f32 {
    match biome {
        Biome::Jungle => 0.08,
        Biome::Forest => 0.05,
        Biome::Taiga => 0.04,
        Biome::Swamp => 0.02,
        Biome::Mountains => 0.01,
        Biome::Savanna => 0.008,
        Biome::Plains => 0.005,
        Biome::Tundra => 0.002,
        Biome::SnowyTundra => 0.001,
        Biome::Desert | Biome::Ocean => 0.0,
    }
}

pub fn vegetation_chance(biome: Biome) -> f32 {
    match biome {
        Biome::Jungle => 0.12,
        Biome::Plains => 0.1,
        Biome::Savanna => 0.08,
        Biome::Forest => 0.06,
        Biome::Swamp => 0.05,
        Biome::Taiga => 0.03,
        Biome::Mountains => 0.02,
        Biome::Desert | Biome::Ocean | Biome::Tundra | Biome::SnowyTundra => 0.0,
    }
}
