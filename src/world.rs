use crate::core::prelude::*;
use crate::player::Player;
use crate::tilemap::grouping::{group_colliders, Collider};
use crate::tilemap::TileMap;

/// A loaded level: the tile grid, the static colliders merged out of it, and
/// the one dynamic actor. Collider grouping runs once here; after that the
/// grid is only consulted for rendering data.
#[derive(Debug)]
pub struct World {
    tile_map: TileMap,
    colliders: Vec<Collider>,
    player: Player,
}

impl World {
    /// Builds a world from an in-memory tile map, grouping its collidable
    /// tiles and spawning the player.
    pub fn new(mut tile_map: TileMap, player_spawn: Vec2, player_extent: Vec2) -> Result<Self> {
        let colliders = group_colliders(&mut tile_map)?;
        let player = Player::new(player_spawn, player_extent)?;
        info!(
            "world ready: {} colliders, player at {player_spawn}",
            colliders.len()
        );
        Ok(Self {
            tile_map,
            colliders,
            player,
        })
    }

    /// Loads a level from a JSON map document.
    pub fn from_json(
        json: &str,
        cell_size: Vec2,
        player_spawn: Vec2,
        player_extent: Vec2,
    ) -> Result<Self> {
        let tile_map = TileMap::from_json(json, cell_size).context("failed to load level")?;
        Self::new(tile_map, player_spawn, player_extent)
    }

    /// Advances one frame: rotates the player by `rotation_delta`, then
    /// resolves `candidate_displacement` against the static colliders.
    /// Returns the displacement actually applied.
    pub fn update(&mut self, candidate_displacement: Vec2, rotation_delta: f32) -> Result<Vec2> {
        self.player
            .apply_movement(candidate_displacement, rotation_delta, &mut self.colliders)
    }

    pub fn tile_map(&self) -> &TileMap {
        &self.tile_map
    }
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }
    pub fn player(&self) -> &Player {
        &self.player
    }
}
