//! Sections, columns, and the generator seam.
#![forbid(unsafe_code)]

mod column;
mod coord;
mod generator;
mod record;
mod section;

pub use column::{COLUMN_AREA, Column};
pub use coord::{ChunkPos, WorldHeight};
pub use generator::{Generator, Neighborhood};
pub use record::{ColumnRecord, RecordError, SectionRecord};
pub use section::{SECTION_SIZE, SECTION_VOLUME, Section};
