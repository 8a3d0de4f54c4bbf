use std::path::{Path, PathBuf};

use strata_chunk::ChunkPos;

pub const CHUNKS_DIR: &str = "chunks";
pub const WORLD_INFO_FILE: &str = "world.dat";

/// Columns per region side.
pub const REGION_SIZE: i32 = 32;
const REGION_SHIFT: i32 = 5;

#[inline]
pub fn region_of(pos: ChunkPos) -> (i32, i32) {
    (pos.x >> REGION_SHIFT, pos.z >> REGION_SHIFT)
}

#[inline]
pub fn local_in_region(pos: ChunkPos) -> (i32, i32) {
    (pos.x & (REGION_SIZE - 1), pos.z & (REGION_SIZE - 1))
}

/// `chunks/r.<rx>.<rz>/c.<lx>.<lz>.dat`, relative to the world root.
pub fn column_path(pos: ChunkPos) -> PathBuf {
    let (rx, rz) = region_of(pos);
    let (lx, lz) = local_in_region(pos);
    Path::new(CHUNKS_DIR)
        .join(format!("r.{rx}.{rz}"))
        .join(format!("c.{lx}.{lz}.dat"))
}

/// Inverse of [`column_path`]; accepts relative or rooted paths.
pub fn pos_from_path(path: &Path) -> Option<ChunkPos> {
    let file = path.file_name()?.to_str()?;
    let region = path.parent()?.file_name()?.to_str()?;
    let (lx, lz) = parse_pair(file.strip_prefix("c.")?.strip_suffix(".dat")?)?;
    let (rx, rz) = parse_pair(region.strip_prefix("r.")?)?;
    if !(0..REGION_SIZE).contains(&lx) || !(0..REGION_SIZE).contains(&lz) {
        return None;
    }
    Some(ChunkPos::new(
        rx.checked_mul(REGION_SIZE)? + lx,
        rz.checked_mul(REGION_SIZE)? + lz,
    ))
}

fn parse_pair(s: &str) -> Option<(i32, i32)> {
    let (a, b) = s.split_once('.')?;
    Some((a.parse().ok()?, b.parse().ok()?))
}
