pub mod assert;
pub mod collision;
pub mod core;
pub mod player;
pub mod tilemap;
pub mod util;
pub mod world;

#[allow(unused_imports)]
pub use itertools::Itertools;
#[allow(unused_imports)]
pub use num_traits;

#[allow(unused_imports)]
pub use anyhow::{anyhow, bail, Context, Result};
#[allow(unused_imports)]
pub use tracing::{error, info, warn};

#[allow(unused_imports)]
pub use crate::{
    collision::{
        detect_collision,
        polygon::{BoundingPolygon, PolygonId, Vertex},
        Penetration,
    },
    core::config::*,
    player::Player,
    tilemap::{
        grouping::{group_colliders, Collider},
        ColliderGroupDirection, Tile, TileColumnData, TileMap, TileRowData,
    },
    util::linalg::{Vec2, Vec2i},
    world::World,
};
