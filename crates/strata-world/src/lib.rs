//! Worldgen parameters and the seed-deterministic terrain generator.
#![forbid(unsafe_code)]

mod gen_ctx;
pub mod generation;
mod rng;
pub mod worldgen;

pub use gen_ctx::GenCtx;
pub use generation::{ColumnPlan, TerrainGenerator};
pub use rng::ColumnRng;
pub use worldgen::{WorldGenConfig, WorldGenParams, load_params_from_path};
