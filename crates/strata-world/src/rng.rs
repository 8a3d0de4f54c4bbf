use strata_chunk::ChunkPos;

fn column_seed(world_seed: i64, cx: i32, cz: i32, salt: u64) -> u64 {
    let mut seed = (world_seed as u64) ^ 0x9e37_79b9_7f4a_7c15 ^ salt.wrapping_mul(0xd6e8_feb8_6659_fd93);
    seed = seed.wrapping_add((cx as u32 as u64).wrapping_mul(0x85eb_ca6b));
    seed ^= seed >> 33;
    seed = seed.wrapping_mul(0xc2b2_ae3d_27d4_eb4f);
    seed ^= (cz as u32 as u64).wrapping_mul(0x27d4_eb2f_1656_67c5);
    seed ^= seed >> 29;
    seed = seed.wrapping_mul(0x1656_67b1_9e37_79f9);
    seed ^ (seed >> 32)
}

/// Per-column random stream (splitmix64). Seeded only from the world seed,
/// the column position, and a pass salt, so every pass replays identically.
#[derive(Clone, Debug)]
pub struct ColumnRng {
    state: u64,
}

impl ColumnRng {
    pub fn new(world_seed: i64, pos: ChunkPos, salt: u64) -> Self {
        Self {
            state: column_seed(world_seed, pos.x, pos.z, salt),
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        ((self.next_u64() >> 40) as f32) / 16_777_216.0
    }

    /// Uniform in `0..n`; zero when `n` is zero.
    #[inline]
    pub fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            (self.next_u64() % n as u64) as u32
        }
    }

    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}
