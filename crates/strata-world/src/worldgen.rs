use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub climate: Climate,
    #[serde(default)]
    pub trees: Trees,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    #[serde(default = "default_min_height")]
    pub min_height: i32,
    #[serde(default = "default_max_height")]
    pub max_height: i32,
    #[serde(default = "default_wavelength")]
    pub wavelength: f32,
    #[serde(default = "d_oct")]
    pub octaves: i32,
    #[serde(default = "d_pers")]
    pub persistence: f32,
    #[serde(default = "d_lac")]
    pub lacunarity: f32,
    #[serde(default = "default_smooth")]
    pub smooth: bool,
}
fn default_min_height() -> i32 {
    40
}
fn default_max_height() -> i32 {
    110
}
fn default_wavelength() -> f32 {
    128.0
}
fn d_oct() -> i32 {
    4
}
fn d_pers() -> f32 {
    0.5
}
fn d_lac() -> f32 {
    2.0
}
fn default_smooth() -> bool {
    true
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            min_height: default_min_height(),
            max_height: default_max_height(),
            wavelength: default_wavelength(),
            octaves: d_oct(),
            persistence: d_pers(),
            lacunarity: d_lac(),
            smooth: default_smooth(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Climate {
    #[serde(default = "default_temperature_wavelength")]
    pub temperature_wavelength: f32,
    #[serde(default = "default_humidity_wavelength")]
    pub humidity_wavelength: f32,
}
fn default_temperature_wavelength() -> f32 {
    512.0
}
fn default_humidity_wavelength() -> f32 {
    384.0
}
impl Default for Climate {
    fn default() -> Self {
        Self {
            temperature_wavelength: default_temperature_wavelength(),
            humidity_wavelength: default_humidity_wavelength(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Trees {
    #[serde(default = "default_trunk_min")]
    pub trunk_min: i32,
    #[serde(default = "default_trunk_max")]
    pub trunk_max: i32,
}
fn default_trunk_min() -> i32 {
    4
}
fn default_trunk_max() -> i32 {
    6
}
impl Default for Trees {
    fn default() -> Self {
        Self {
            trunk_min: default_trunk_min(),
            trunk_max: default_trunk_max(),
        }
    }
}

/// Octave stack for hand-summed fractal noise. `scale` is the wavelength of
/// the first octave in blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct Fractal {
    pub octaves: i32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub scale: f32,
}

// Flattened params used in tight loops (snapshot of config)
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub min_height: i32,
    pub max_height: i32,
    pub smooth: bool,
    pub height: Fractal,
    pub temperature: Fractal,
    pub humidity: Fractal,
    pub trunk_min: i32,
    pub trunk_max: i32,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        let t = &cfg.terrain;
        let (min_height, max_height) = if t.min_height <= t.max_height {
            (t.min_height, t.max_height)
        } else {
            (t.max_height, t.min_height)
        };
        let trunk_min = cfg.trees.trunk_min.max(1);
        Self {
            min_height,
            max_height,
            smooth: t.smooth,
            height: Fractal {
                octaves: t.octaves,
                persistence: t.persistence,
                lacunarity: t.lacunarity,
                scale: t.wavelength,
            },
            temperature: Fractal {
                octaves: 2,
                persistence: 0.5,
                lacunarity: 2.0,
                scale: cfg.climate.temperature_wavelength,
            },
            humidity: Fractal {
                octaves: 2,
                persistence: 0.5,
                lacunarity: 2.0,
                scale: cfg.climate.humidity_wavelength,
            },
            trunk_min,
            trunk_max: cfg.trees.trunk_max.max(trunk_min),
        }
    }
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: WorldGenConfig = toml::from_str(&s)?;
    Ok(WorldGenParams::from_config(&cfg))
}
