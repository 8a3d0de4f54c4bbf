use serde::{Deserialize, Serialize};

/// Biome identifiers. The discriminant is the byte stored in a column's biome grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Biome {
    Ocean = 0,
    Plains = 1,
    Desert = 2,
    Mountains = 3,
    Forest = 4,
    Taiga = 5,
    Swamp = 6,
    Tundra = 7,
    SnowyTundra = 8,
    Jungle = 9,
    Savanna = 10,
}

impl Biome {
    pub const ALL: [Biome; 11] = [
        Biome::Ocean,
        Biome::Plains,
        Biome::Desert,
        Biome::Mountains,
        Biome::Forest,
        Biome::Taiga,
        Biome::Swamp,
        Biome::Tundra,
        Biome::SnowyTundra,
        Biome::Jungle,
        Biome::Savanna,
    ];

    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Biome> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Biome::Ocean => "ocean",
            Biome::Plains => "plains",
            Biome::Desert => "desert",
            Biome::Mountains => "mountains",
            Biome::Forest => "forest",
            Biome::Taiga => "taiga",
            Biome::Swamp => "swamp",
            Biome::Tundra => "tundra",
            Biome::SnowyTundra => "snowy_tundra",
            Biome::Jungle => "jungle",
            Biome::Savanna => "savanna",
        }
    }

    /// Cold biomes grow spruce; everything else grows oak.
    #[inline]
    pub fn is_cold(self) -> bool {
        matches!(
            self,
            Biome::Taiga | Biome::Tundra | Biome::SnowyTundra | Biome::Mountains
        )
    }
}
