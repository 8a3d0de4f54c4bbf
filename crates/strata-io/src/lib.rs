//! On-disk layout of a world directory: metadata and per-column files.
#![forbid(unsafe_code)]

mod chunk_io;
mod error;
mod meta;
pub mod paths;

pub use chunk_io::ChunkIo;
pub use error::IoError;
pub use meta::{WORLD_INFO_VERSION, WorldInfo};
