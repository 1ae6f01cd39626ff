use crate::collision::detect_collision;
use crate::collision::polygon::BoundingPolygon;
use crate::core::prelude::*;
use crate::tilemap::grouping::Collider;

/// The dynamic actor. `position` and `rotation` are the single source of
/// truth; the bounding polygon's world vertices are re-derived from them
/// every frame via the transform pipeline, never mutated on their own.
#[derive(Debug)]
pub struct Player {
    position: Vec2,
    rotation: f32,
    polygon: BoundingPolygon,
}

impl Player {
    /// Spawns the player as an axis-aligned rectangle of `extent` centred on
    /// `position`, with zero rotation.
    pub fn new(position: Vec2, extent: Vec2) -> Result<Self> {
        if extent.x <= 0.0 || extent.y <= 0.0 {
            bail!("player extent must be positive, got {extent}");
        }
        let offset = position - extent / 2.0;
        let polygon = BoundingPolygon::try_new(vec![
            offset,
            Vec2 {
                x: offset.x + extent.x,
                y: offset.y,
            },
            offset + extent,
            Vec2 {
                x: offset.x,
                y: offset.y + extent.y,
            },
        ])?;
        Ok(Self {
            position,
            rotation: 0.0,
            polygon,
        })
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
    pub fn polygon(&self) -> &BoundingPolygon {
        &self.polygon
    }

    /// Converts a candidate displacement into the displacement actually
    /// permitted this frame.
    ///
    /// Tests the move with [`transform_copy`](BoundingPolygon::transform_copy)
    /// at the hypothetical position (the real position is untouched), then
    /// accumulates a penetration-resolution vector over every collider hit.
    /// Plain vector summation: simultaneous deep penetrations can over- or
    /// under-correct, which is accepted; this is not a constraint solver.
    /// Also maintains the symmetric touching relation on both polygons, every
    /// collider, every frame.
    pub fn get_allowed_movement(
        &mut self,
        candidate: Vec2,
        colliders: &mut [Collider],
    ) -> Result<Vec2> {
        let hypothetical_position = self.position + candidate;
        let hypothetical =
            self.polygon
                .transform_copy(hypothetical_position, candidate, self.rotation);

        let mut resolution = Vec2::zero();
        for collider in colliders.iter_mut() {
            match detect_collision(&hypothetical, collider.polygon.vertices())? {
                Some(penetration) => {
                    // Flip the normal if it points from the actor toward the
                    // collider; resolution must push the actor out.
                    let mut direction = penetration.direction;
                    if (self.position - collider.position).dot(direction) < 0.0 {
                        direction = -direction;
                    }
                    resolution += direction * penetration.depth;
                    self.polygon.insert_touching(collider.polygon.id());
                    collider.polygon.insert_touching(self.polygon.id());
                }
                None => {
                    self.polygon.remove_touching(collider.polygon.id());
                    collider.polygon.remove_touching(self.polygon.id());
                }
            }
        }
        Ok(candidate + resolution)
    }

    /// Runs one frame of movement: applies the rotation delta, resolves the
    /// candidate displacement against the static colliders, commits the
    /// result to the real position, and re-derives the polygon's world
    /// vertices. Returns the displacement actually applied.
    pub fn apply_movement(
        &mut self,
        candidate: Vec2,
        rotation_delta: f32,
        colliders: &mut [Collider],
    ) -> Result<Vec2> {
        self.rotation += rotation_delta;
        let allowed = self.get_allowed_movement(candidate, colliders)?;
        self.position += allowed;
        self.polygon.transform(self.position, allowed, self.rotation);
        Ok(allowed)
    }
}
