use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use strata_chunk::{ChunkPos, Column, ColumnRecord, WorldHeight};

use crate::error::IoError;
use crate::meta::{WORLD_INFO_VERSION, WorldInfo};
use crate::paths::{CHUNKS_DIR, WORLD_INFO_FILE, column_path};

const COLUMN_MAGIC: [u8; 4] = *b"STRC";
const COLUMN_VERSION: u16 = 1;

#[derive(Serialize, Deserialize)]
struct ColumnFile {
    magic: [u8; 4],
    version: u16,
    column: ColumnRecord,
}

/// Reads and writes one world directory. Every write goes through a single
/// lock and lands via a `.tmp` sibling plus rename, so readers never observe a
/// torn file.
pub struct ChunkIo {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl ChunkIo {
    /// Creates `root` and its `chunks/` directory when missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, IoError> {
        let root = root.into();
        let chunks = root.join(CHUNKS_DIR);
        fs::create_dir_all(&chunks).map_err(|e| IoError::io(&chunks, e))?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn column_file(&self, pos: ChunkPos) -> PathBuf {
        self.root.join(column_path(pos))
    }

    pub fn world_info_file(&self) -> PathBuf {
        self.root.join(WORLD_INFO_FILE)
    }

    pub fn has_column(&self, pos: ChunkPos) -> bool {
        self.column_file(pos).is_file()
    }

    /// `Ok(None)` when the column has never been saved.
    pub fn load_column(&self, pos: ChunkPos, height: WorldHeight) -> Result<Option<Column>, IoError> {
        let path = self.column_file(pos);
        let Some(bytes) = read_if_exists(&path)? else {
            return Ok(None);
        };
        let file: ColumnFile =
            bincode::deserialize(&bytes).map_err(|source| IoError::Decode {
                path: path.clone(),
                source,
            })?;
        if file.magic != COLUMN_MAGIC {
            return Err(IoError::invalid(&path, "bad column magic"));
        }
        if file.version != COLUMN_VERSION {
            return Err(IoError::invalid(
                &path,
                format!("unsupported column version {}", file.version),
            ));
        }
        let stored = ChunkPos::new(file.column.x, file.column.z);
        if stored != pos {
            return Err(IoError::invalid(&path, format!("holds column {stored}, expected {pos}")));
        }
        Column::from_record(file.column, height)
            .map(Some)
            .map_err(|e| IoError::invalid(&path, e.to_string()))
    }

    pub fn save_column(&self, column: &Column) -> Result<(), IoError> {
        let file = ColumnFile {
            magic: COLUMN_MAGIC,
            version: COLUMN_VERSION,
            column: column.to_record(),
        };
        let bytes = bincode::serialize(&file).map_err(|source| IoError::Encode { source })?;
        self.write_atomic(&self.column_file(column.pos()), &bytes)
    }

    /// `Ok(None)` for a fresh world directory.
    pub fn load_world_info(&self) -> Result<Option<WorldInfo>, IoError> {
        let path = self.world_info_file();
        let Some(bytes) = read_if_exists(&path)? else {
            return Ok(None);
        };
        let info: WorldInfo = bincode::deserialize(&bytes).map_err(|source| IoError::Decode {
            path: path.clone(),
            source,
        })?;
        if info.version != WORLD_INFO_VERSION {
            return Err(IoError::invalid(
                &path,
                format!("unsupported world version {}", info.version),
            ));
        }
        Ok(Some(info))
    }

    pub fn save_world_info(&self, info: &WorldInfo) -> Result<(), IoError> {
        let bytes = bincode::serialize(info).map_err(|source| IoError::Encode { source })?;
        self.write_atomic(&self.world_info_file(), &bytes)
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), IoError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| IoError::io(parent, e))?;
        }
        let tmp = path.with_extension("dat.tmp");
        fs::write(&tmp, bytes).map_err(|e| IoError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| IoError::io(path, e))?;
        log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, IoError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(IoError::io(path, e)),
    }
}
