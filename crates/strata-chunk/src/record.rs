use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// On-disk shape of a section. Grids are raw bytes in `y, z, x` order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub y_index: i32,
    pub blocks: Vec<u8>,
    pub blocklight: Vec<u8>,
    pub skylight: Vec<u8>,
    pub empty: bool,
}

/// On-disk shape of a column. Only non-empty sections are present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub x: i32,
    pub z: i32,
    pub biomes: Vec<u8>,
    /// Little-endian `i32` per (x, z), `z`-major.
    pub height_map: Vec<u8>,
    pub generated: bool,
    pub populated: bool,
    pub sections: BTreeMap<i32, SectionRecord>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("{field}: expected {expected} bytes, found {actual}")]
    Length {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("section keyed {key} carries y_index {y_index}")]
    SectionKey { key: i32, y_index: i32 },
    #[error("section {0} lies outside the world height")]
    SectionOutOfRange(i32),
}
