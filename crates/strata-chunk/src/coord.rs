use serde::{Deserialize, Serialize};

use crate::section::SECTION_SIZE;

/// Column coordinate on the horizontal chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Column containing world block (wx, wz).
    #[inline]
    pub const fn from_block(wx: i32, wz: i32) -> Self {
        Self {
            x: wx >> 4,
            z: wz >> 4,
        }
    }

    /// Column-local coordinate of a world block coordinate.
    #[inline]
    pub const fn local(w: i32) -> i32 {
        w & (SECTION_SIZE as i32 - 1)
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    #[inline]
    pub fn block_origin(self) -> (i32, i32) {
        (self.x * SECTION_SIZE as i32, self.z * SECTION_SIZE as i32)
    }
}

impl From<(i32, i32)> for ChunkPos {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl std::fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Inclusive vertical block range of the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldHeight {
    pub min_y: i32,
    pub max_y: i32,
}

impl Default for WorldHeight {
    fn default() -> Self {
        Self { min_y: 0, max_y: 255 }
    }
}

impl WorldHeight {
    pub fn new(min_y: i32, max_y: i32) -> Self {
        debug_assert!(min_y <= max_y);
        Self { min_y, max_y }
    }

    #[inline]
    pub fn contains(&self, y: i32) -> bool {
        y >= self.min_y && y <= self.max_y
    }

    #[inline]
    pub fn min_section(&self) -> i32 {
        self.min_y.div_euclid(SECTION_SIZE as i32)
    }

    #[inline]
    pub fn max_section(&self) -> i32 {
        self.max_y.div_euclid(SECTION_SIZE as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_blocks_map_to_negative_columns() {
        assert_eq!(ChunkPos::from_block(-1, -16), ChunkPos::new(-1, -1));
        assert_eq!(ChunkPos::from_block(-17, 15), ChunkPos::new(-2, 0));
        assert_eq!(ChunkPos::local(-1), 15);
        assert_eq!(ChunkPos::local(-16), 0);
        assert_eq!(ChunkPos::local(35), 3);
    }

    #[test]
    fn section_bounds_follow_height() {
        let h = WorldHeight::new(-64, 319);
        assert_eq!(h.min_section(), -4);
        assert_eq!(h.max_section(), 19);
        assert!(h.contains(-64));
        assert!(!h.contains(320));
    }
}
