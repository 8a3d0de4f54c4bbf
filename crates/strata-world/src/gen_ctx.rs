use std::sync::Arc;

use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::worldgen::{Fractal, WorldGenParams};

/// Noise fields shared by every column of one world. Sampling takes `&self`,
/// so a single context serves all generation threads.
pub struct GenCtx {
    pub terrain: FastNoiseLite,
    pub temperature: FastNoiseLite,
    pub humidity: FastNoiseLite,
    pub params: Arc<WorldGenParams>,
}

impl GenCtx {
    pub fn new(seed: i64, params: Arc<WorldGenParams>) -> Self {
        let seed = fold_seed(seed);
        Self {
            terrain: unit_noise(seed),
            temperature: unit_noise(seed ^ 0x1203_5F31),
            humidity: unit_noise(((seed as u32) ^ 0x92E3_A1B2u32) as i32),
            params,
        }
    }

    pub fn terrain_at(&self, wx: f32, wz: f32) -> f32 {
        fractal2(&self.terrain, wx, wz, &self.params.height)
    }

    /// Temperature in `[0, 1]` before height cooling.
    pub fn temperature_at(&self, wx: f32, wz: f32) -> f32 {
        to_unit(fractal2(&self.temperature, wx, wz, &self.params.temperature))
    }

    /// Humidity in `[0, 1]`.
    pub fn humidity_at(&self, wx: f32, wz: f32) -> f32 {
        to_unit(fractal2(&self.humidity, wx, wz, &self.params.humidity))
    }
}

// Frequency 1 so the fractal's `1 / scale` is the only coordinate scaling.
fn unit_noise(seed: i32) -> FastNoiseLite {
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(1.0));
    noise
}

fn fold_seed(seed: i64) -> i32 {
    ((seed as u64) ^ ((seed as u64) >> 32)) as u32 as i32
}

#[inline]
fn to_unit(n: f32) -> f32 {
    (n * 0.5 + 0.5).clamp(0.0, 1.0)
}

/// Normalised octave sum in roughly `[-1, 1]`.
pub(crate) fn fractal2(noise: &FastNoiseLite, x: f32, z: f32, fractal: &Fractal) -> f32 {
    let mut amp = 1.0_f32;
    let mut freq = 1.0_f32 / fractal.scale.max(0.0001);
    let mut sum = 0.0_f32;
    let mut max_amp = 0.0_f32;
    for _ in 0..fractal.octaves.max(1) {
        sum += noise.get_noise_2d(x * freq, z * freq) * amp;
        max_amp += amp;
        amp *= fractal.persistence;
        freq *= fractal.lacunarity;
    }
    if max_amp > 0.0 { sum / max_amp } else { sum }
}
