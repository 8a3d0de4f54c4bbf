use serde::{Deserialize, Serialize};

pub const WORLD_INFO_VERSION: u32 = 1;

/// Contents of `world.dat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldInfo {
    pub version: u32,
    pub name: String,
    pub seed: i64,
    /// Ticks since the world was created.
    pub time: u64,
    pub spawn_x: i32,
    pub spawn_y: i32,
    pub spawn_z: i32,
}

impl WorldInfo {
    pub fn new(name: impl Into<String>, seed: i64, spawn: (i32, i32, i32)) -> Self {
        Self {
            version: WORLD_INFO_VERSION,
            name: name.into(),
            seed,
            time: 0,
            spawn_x: spawn.0,
            spawn_y: spawn.1,
            spawn_z: spawn.2,
        }
    }

    #[inline]
    pub fn spawn(&self) -> (i32, i32, i32) {
        (self.spawn_x, self.spawn_y, self.spawn_z)
    }
}
