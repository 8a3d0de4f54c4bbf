use strata_blocks::BlockId;
use strata_blocks::types::AIR;

use crate::record::{RecordError, SectionRecord};

pub const SECTION_SIZE: usize = 16;
pub const SECTION_VOLUME: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;

/// A 16x16x16 block grid with its two light grids.
///
/// `all_air` (and `is_empty`, its alias) is derived from the block grid and
/// refreshed on every write; there is no setter for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    y_index: i32,
    blocks: Box<[BlockId]>,
    block_light: Box<[u8]>,
    sky_light: Box<[u8]>,
    all_air: bool,
    modified: bool,
}

#[inline]
fn idx(lx: usize, ly: usize, lz: usize) -> Option<usize> {
    if lx < SECTION_SIZE && ly < SECTION_SIZE && lz < SECTION_SIZE {
        Some((ly * SECTION_SIZE + lz) * SECTION_SIZE + lx)
    } else {
        None
    }
}

impl Section {
    pub fn new(y_index: i32) -> Self {
        Self {
            y_index,
            blocks: vec![AIR; SECTION_VOLUME].into_boxed_slice(),
            block_light: vec![0; SECTION_VOLUME].into_boxed_slice(),
            sky_light: vec![0; SECTION_VOLUME].into_boxed_slice(),
            all_air: true,
            modified: false,
        }
    }

    #[inline]
    pub fn y_index(&self) -> i32 {
        self.y_index
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        self.all_air
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.all_air
    }

    /// Written to since it was created, loaded, or last saved.
    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    #[inline]
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Out-of-range coordinates read as air.
    #[inline]
    pub fn get_block(&self, lx: usize, ly: usize, lz: usize) -> BlockId {
        idx(lx, ly, lz).map_or(AIR, |i| self.blocks[i])
    }

    pub fn set_block(&mut self, lx: usize, ly: usize, lz: usize, id: BlockId) -> bool {
        let Some(i) = idx(lx, ly, lz) else {
            return false;
        };
        self.blocks[i] = id;
        self.modified = true;
        if id != AIR {
            self.all_air = false;
        } else if !self.all_air {
            self.all_air = self.blocks.iter().all(|&b| b == AIR);
        }
        true
    }

    #[inline]
    pub fn get_block_light(&self, lx: usize, ly: usize, lz: usize) -> u8 {
        idx(lx, ly, lz).map_or(0, |i| self.block_light[i])
    }

    #[inline]
    pub fn get_sky_light(&self, lx: usize, ly: usize, lz: usize) -> u8 {
        idx(lx, ly, lz).map_or(0, |i| self.sky_light[i])
    }

    pub fn to_record(&self) -> SectionRecord {
        SectionRecord {
            y_index: self.y_index,
            blocks: self.blocks.to_vec(),
            blocklight: self.block_light.to_vec(),
            skylight: self.sky_light.to_vec(),
            empty: self.all_air,
        }
    }

    pub fn from_record(rec: SectionRecord) -> Result<Self, RecordError> {
        check_len("blocks", &rec.blocks, SECTION_VOLUME)?;
        check_len("blocklight", &rec.blocklight, SECTION_VOLUME)?;
        check_len("skylight", &rec.skylight, SECTION_VOLUME)?;
        let all_air = rec.blocks.iter().all(|&b| b == AIR);
        Ok(Self {
            y_index: rec.y_index,
            blocks: rec.blocks.into_boxed_slice(),
            block_light: rec.blocklight.into_boxed_slice(),
            sky_light: rec.skylight.into_boxed_slice(),
            all_air,
            modified: false,
        })
    }
}

pub(crate) fn check_len(field: &'static str, data: &[u8], expected: usize) -> Result<(), RecordError> {
    if data.len() == expected {
        Ok(())
    } else {
        Err(RecordError::Length {
            field,
            expected,
            actual: data.len(),
        })
    }
}
