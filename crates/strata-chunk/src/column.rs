use std::collections::BTreeMap;

use strata_blocks::types::AIR;
use strata_blocks::{Biome, BlockId};

use crate::coord::{ChunkPos, WorldHeight};
use crate::generator::{Generator, Neighborhood};
use crate::record::{ColumnRecord, RecordError};
use crate::section::{SECTION_SIZE, Section, check_len};

pub const COLUMN_AREA: usize = SECTION_SIZE * SECTION_SIZE;

/// One full-height slice of the world: a sparse stack of sections plus the
/// per-(x, z) biome and height grids.
#[derive(Clone, Debug)]
pub struct Column {
    pos: ChunkPos,
    height: WorldHeight,
    sections: BTreeMap<i32, Section>,
    biomes: [u8; COLUMN_AREA],
    height_map: [i32; COLUMN_AREA],
    generated: bool,
    populated: bool,
    modified: bool,
}

#[inline]
fn column_index(x: i32, z: i32) -> Option<usize> {
    let size = SECTION_SIZE as i32;
    if (0..size).contains(&x) && (0..size).contains(&z) {
        Some(z as usize * SECTION_SIZE + x as usize)
    } else {
        None
    }
}

impl Column {
    pub fn new(x: i32, z: i32, height: WorldHeight) -> Self {
        Self {
            pos: ChunkPos::new(x, z),
            height,
            sections: BTreeMap::new(),
            biomes: [Biome::Ocean.id(); COLUMN_AREA],
            height_map: [height.min_y; COLUMN_AREA],
            generated: false,
            populated: false,
            modified: false,
        }
    }

    #[inline]
    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    #[inline]
    pub fn world_height(&self) -> WorldHeight {
        self.height
    }

    #[inline]
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    #[inline]
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    #[inline]
    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// Called by the store once the column is safely on disk.
    #[inline]
    pub fn mark_saved(&mut self) {
        self.modified = false;
        for section in self.sections.values_mut() {
            section.mark_saved();
        }
    }

    /// Existing section at `y_index`, or a fresh all-air one inserted in its place.
    pub fn get_section(&mut self, y_index: i32) -> &mut Section {
        self.sections
            .entry(y_index)
            .or_insert_with(|| Section::new(y_index))
    }

    /// Read-only access that never materialises a section.
    #[inline]
    pub fn section(&self, y_index: i32) -> Option<&Section> {
        self.sections.get(&y_index)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        if column_index(x, z).is_none() || !self.height.contains(y) {
            return AIR;
        }
        let size = SECTION_SIZE as i32;
        match self.section(y.div_euclid(size)) {
            Some(section) => {
                section.get_block(x as usize, y.rem_euclid(size) as usize, z as usize)
            }
            None => AIR,
        }
    }

    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) -> bool {
        let Some(col) = column_index(x, z) else {
            return false;
        };
        if !self.height.contains(y) {
            return false;
        }
        let size = SECTION_SIZE as i32;
        let ly = y.rem_euclid(size) as usize;
        if !self
            .get_section(y.div_euclid(size))
            .set_block(x as usize, ly, z as usize, id)
        {
            return false;
        }
        self.modified = true;

        let top = self.height_map[col];
        if id != AIR {
            if y > top {
                self.height_map[col] = y;
            }
        } else if y == top {
            self.height_map[col] = self.scan_down(x, z, y - 1);
        }
        true
    }

    // Linear walk to the floor, O(world height) per cleared top block. Clearing
    // the surface is rare next to reads, so no per-line occupancy index is kept.
    fn scan_down(&self, x: i32, z: i32, from: i32) -> i32 {
        let mut y = from;
        while y >= self.height.min_y {
            if self.get_block(x, y, z) != AIR {
                return y;
            }
            y -= 1;
        }
        self.height.min_y
    }

    /// Y of the topmost non-air block, or `min_y` for an all-air line.
    #[inline]
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        column_index(x, z).map_or(self.height.min_y, |i| self.height_map[i])
    }

    #[inline]
    pub fn biome_at(&self, x: i32, z: i32) -> Biome {
        column_index(x, z)
            .and_then(|i| Biome::from_id(self.biomes[i]))
            .unwrap_or(Biome::Ocean)
    }

    pub fn set_biome(&mut self, x: i32, z: i32, biome: Biome) -> bool {
        match column_index(x, z) {
            Some(i) => {
                self.biomes[i] = biome.id();
                self.modified = true;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn biomes(&self) -> &[u8; COLUMN_AREA] {
        &self.biomes
    }

    #[inline]
    pub fn height_map(&self) -> &[i32; COLUMN_AREA] {
        &self.height_map
    }

    pub fn generate(&mut self, generator: &dyn Generator) -> bool {
        if self.generated {
            return false;
        }
        generator.generate(self);
        self.generated = true;
        self.modified = true;
        true
    }

    pub fn populate(&mut self, generator: &dyn Generator, neighbors: &Neighborhood) -> bool {
        if self.populated || !self.generated || !neighbors.all_generated() {
            return false;
        }
        generator.populate(self, neighbors);
        self.populated = true;
        self.modified = true;
        true
    }

    /// Extension point for a light engine. The light grids are carried and
    /// persisted but nothing maintains them yet.
    pub fn recalculate_lighting(&mut self) {}

    pub fn to_record(&self) -> ColumnRecord {
        let mut height_map = Vec::with_capacity(COLUMN_AREA * 4);
        for h in &self.height_map {
            height_map.extend_from_slice(&h.to_le_bytes());
        }
        let sections = self
            .sections
            .iter()
            .filter(|(_, s)| !s.is_empty())
            .map(|(y, s)| (*y, s.to_record()))
            .collect();
        ColumnRecord {
            x: self.pos.x,
            z: self.pos.z,
            biomes: self.biomes.to_vec(),
            height_map,
            generated: self.generated,
            populated: self.populated,
            sections,
        }
    }

    pub fn from_record(rec: ColumnRecord, height: WorldHeight) -> Result<Self, RecordError> {
        check_len("biomes", &rec.biomes, COLUMN_AREA)?;
        check_len("height_map", &rec.height_map, COLUMN_AREA * 4)?;
        let mut column = Column::new(rec.x, rec.z, height);
        column.biomes.copy_from_slice(&rec.biomes);
        for (slot, bytes) in column.height_map.iter_mut().zip(rec.height_map.chunks_exact(4)) {
            *slot = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }
        for (key, section) in rec.sections {
            if key != section.y_index {
                return Err(RecordError::SectionKey {
                    key,
                    y_index: section.y_index,
                });
            }
            if key < height.min_section() || key > height.max_section() {
                return Err(RecordError::SectionOutOfRange(key));
            }
            column.sections.insert(key, Section::from_record(section)?);
        }
        column.generated = rec.generated;
        column.populated = rec.populated;
        column.modified = false;
        Ok(column)
    }
}
