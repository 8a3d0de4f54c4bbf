//! Block identifiers, block table, and biome identifiers.
#![forbid(unsafe_code)]

pub mod biome;
pub mod registry;
pub mod types;

pub use biome::Biome;
pub use registry::{BlockInfo, block_info, block_name};
pub use types::BlockId;
