use crate::column::Column;
use crate::coord::ChunkPos;

/// Two-pass column generator. Implementations must be deterministic in the
/// world seed and the column position.
pub trait Generator: Send + Sync {
    /// Terrain pass: height map, biomes, and block layers.
    fn generate(&self, column: &mut Column);

    /// Feature pass. Only called once the whole neighbourhood is generated.
    fn populate(&self, column: &mut Column, neighbors: &Neighborhood);
}

/// Snapshot of which columns around `center` were generated when it was taken.
#[derive(Clone, Debug)]
pub struct Neighborhood {
    center: ChunkPos,
    radius: i32,
    generated: Vec<bool>,
}

impl Neighborhood {
    pub fn capture(center: ChunkPos, radius: i32, mut is_generated: impl FnMut(ChunkPos) -> bool) -> Self {
        let radius = radius.max(0);
        let side = (2 * radius + 1) as usize;
        let mut generated = Vec::with_capacity(side * side);
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                generated.push(is_generated(center.offset(dx, dz)));
            }
        }
        Self {
            center,
            radius,
            generated,
        }
    }

    #[inline]
    pub fn center(&self) -> ChunkPos {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn is_generated(&self, dx: i32, dz: i32) -> bool {
        if dx.abs() > self.radius || dz.abs() > self.radius {
            return false;
        }
        let side = 2 * self.radius + 1;
        let i = ((dz + self.radius) * side + (dx + self.radius)) as usize;
        self.generated[i]
    }

    pub fn all_generated(&self) -> bool {
        self.generated.iter().all(|&g| g)
    }
}
