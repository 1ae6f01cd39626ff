use crate::collision::polygon::BoundingPolygon;
use crate::core::prelude::*;
use crate::tilemap::{ColliderGroupDirection, TileMap};

/// A composite static collider covering one maximal run or block of
/// same-direction tiles. Owns its bounding polygon; the source tiles stay in
/// the grid and are referenced by coordinate only.
#[derive(Debug)]
pub struct Collider {
    pub direction: ColliderGroupDirection,
    /// Grid coordinates of the merged tiles (x = column, y = row), in the
    /// order they were discovered.
    pub tile_coords: Vec<Vec2i>,
    /// World position of the bounding rectangle's centre; movement resolution
    /// uses this to orient penetration vectors.
    pub position: Vec2,
    pub polygon: BoundingPolygon,
}

impl Collider {
    pub fn contains_tile(&self, row: usize, column: usize) -> bool {
        self.tile_coords.contains(&Vec2i {
            x: column as i32,
            y: row as i32,
        })
    }
}

/// Partitions collidable tiles into maximal same-direction groups and builds
/// one axis-aligned bounding polygon per group.
///
/// The grid is scanned row-major from (0, 0), so groups are discovered in
/// scan order and a Box group always starts at the top-left-most ungrouped
/// tile of its block. Each tile ends up in at most one collider. Runs exactly
/// once, at level initialisation; static geometry is never rotated.
pub fn group_colliders(map: &mut TileMap) -> Result<Vec<Collider>> {
    let mut colliders = Vec::new();
    for row in 0..map.rows() {
        for column in 0..map.columns() {
            let tile = map
                .get_mut(row, column)
                .ok_or_else(|| anyhow!("tile map scan out of bounds at ({row}, {column})"))?;
            if !tile.has_collider
                || tile.direction == ColliderGroupDirection::None
                || tile.grouped
            {
                continue;
            }
            tile.grouped = true;
            let direction = tile.direction;

            let mut coords = vec![Vec2i {
                x: column as i32,
                y: row as i32,
            }];
            match direction {
                ColliderGroupDirection::Horizontal => {
                    walk_row(map, row, column + 1, direction, &mut coords);
                }
                ColliderGroupDirection::Vertical => {
                    walk_column(map, row + 1, column, direction, &mut coords);
                }
                ColliderGroupDirection::Box => {
                    // The first row of the block fixes its width; each column
                    // found then extends downward independently. An irregular
                    // (non-rectangular) Box region therefore yields a partial
                    // grouping, with leftover tiles seeding later groups.
                    walk_row(map, row, column + 1, direction, &mut coords);
                    let mut next_column = column;
                    while next_column < map.columns() {
                        walk_column(map, row + 1, next_column, direction, &mut coords);
                        next_column += 1;
                        let continues = map.get(row + 1, next_column).is_some_and(|tile| {
                            !tile.grouped && tile.direction == ColliderGroupDirection::Box
                        });
                        if !continues {
                            break;
                        }
                    }
                }
                ColliderGroupDirection::None => unreachable!(),
            }

            colliders.push(build_collider(map, direction, coords)?);
        }
    }
    let tile_count: usize = colliders.iter().map(|c| c.tile_coords.len()).sum();
    info!(
        "grouped {tile_count} collidable tiles into {} colliders",
        colliders.len()
    );
    Ok(colliders)
}

/// Extends a group rightward along `row` while the next tile is an ungrouped
/// match, marking each tile grouped as it goes.
fn walk_row(
    map: &mut TileMap,
    row: usize,
    start_column: usize,
    direction: ColliderGroupDirection,
    coords: &mut Vec<Vec2i>,
) {
    for column in start_column..map.columns() {
        let Some(tile) = map.get_mut(row, column) else {
            return;
        };
        if tile.grouped || tile.direction != direction {
            return;
        }
        tile.grouped = true;
        coords.push(Vec2i {
            x: column as i32,
            y: row as i32,
        });
    }
}

/// As [`walk_row`], but downward along `column`.
fn walk_column(
    map: &mut TileMap,
    start_row: usize,
    column: usize,
    direction: ColliderGroupDirection,
    coords: &mut Vec<Vec2i>,
) {
    for row in start_row..map.rows() {
        let Some(tile) = map.get_mut(row, column) else {
            return;
        };
        if tile.grouped || tile.direction != direction {
            return;
        }
        tile.grouped = true;
        coords.push(Vec2i {
            x: column as i32,
            y: row as i32,
        });
    }
}

/// Computes the axis-aligned bounding rectangle of a finished group and wraps
/// it in a polygon, spanning minimum to maximum tile extents.
fn build_collider(
    map: &TileMap,
    direction: ColliderGroupDirection,
    coords: Vec<Vec2i>,
) -> Result<Collider> {
    check_false!(coords.is_empty());
    let cell_size = map.cell_size();

    let mut min = Vec2::splat(f32::MAX);
    let mut max = Vec2::splat(f32::MIN);
    let mut min_coord = coords[0];
    let mut max_coord = coords[0];
    for &coord in &coords {
        let tile = map
            .get(coord.y as usize, coord.x as usize)
            .ok_or_else(|| anyhow!("collider group references missing tile at {coord}"))?;
        min.x = min.x.min(tile.position.x);
        min.y = min.y.min(tile.position.y);
        max.x = max.x.max(tile.position.x);
        max.y = max.y.max(tile.position.y);
        min_coord.x = min_coord.x.min(coord.x);
        min_coord.y = min_coord.y.min(coord.y);
        max_coord.x = max_coord.x.max(coord.x);
        max_coord.y = max_coord.y.max(coord.y);
    }

    let first = coords[0].as_vec2().component_wise(cell_size);
    let midpoint = min + (max - min) / 2.0;
    let (position, half_extent) = match direction {
        ColliderGroupDirection::Horizontal => (
            Vec2 {
                x: midpoint.x,
                y: first.y,
            },
            Vec2 {
                x: cell_size.x * coords.len() as f32 / 2.0,
                y: cell_size.y / 2.0,
            },
        ),
        ColliderGroupDirection::Vertical => (
            Vec2 {
                x: first.x,
                y: midpoint.y,
            },
            Vec2 {
                x: cell_size.x / 2.0,
                y: cell_size.y * coords.len() as f32 / 2.0,
            },
        ),
        ColliderGroupDirection::Box => {
            let counts = (max_coord - min_coord + Vec2i::one()).as_vec2();
            (midpoint, cell_size.component_wise(counts) / 2.0)
        }
        ColliderGroupDirection::None => bail!("collider group has no direction"),
    };

    let polygon = BoundingPolygon::try_new(vec![
        Vec2 {
            x: position.x - half_extent.x,
            y: position.y - half_extent.y,
        },
        Vec2 {
            x: position.x + half_extent.x,
            y: position.y - half_extent.y,
        },
        Vec2 {
            x: position.x + half_extent.x,
            y: position.y + half_extent.y,
        },
        Vec2 {
            x: position.x - half_extent.x,
            y: position.y + half_extent.y,
        },
    ])?;
    Ok(Collider {
        direction,
        tile_coords: coords,
        position,
        polygon,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::tests::map_from_directions;
    use ColliderGroupDirection::{Box as BoxDir, Horizontal, None as NoneDir, Vertical};

    const CELL: Vec2 = Vec2 { x: 32.0, y: 32.0 };

    #[test]
    fn single_row_horizontal_run_becomes_one_collider() {
        let mut map = map_from_directions(&[&[Horizontal, Horizontal, Horizontal]], CELL);
        let colliders = group_colliders(&mut map).unwrap();
        assert_eq!(colliders.len(), 1);
        let collider = &colliders[0];
        assert_eq!(collider.tile_coords.len(), 3);
        for column in 0..3 {
            assert!(collider.contains_tile(0, column));
        }
        // Spans all three cells: centres at x = 0, 32, 64, half a cell beyond
        // each end.
        assert_eq!(collider.position, Vec2 { x: 32.0, y: 0.0 });
        let world = collider.polygon.world_vertices().collect_vec();
        assert_eq!(world[0], Vec2 { x: -16.0, y: -16.0 });
        assert_eq!(world[2], Vec2 { x: 80.0, y: 16.0 });
    }

    #[test]
    fn horizontal_rows_group_independently() {
        let mut map = map_from_directions(
            &[
                &[Horizontal, Horizontal],
                &[Horizontal, Horizontal],
            ],
            CELL,
        );
        let colliders = group_colliders(&mut map).unwrap();
        assert_eq!(colliders.len(), 2);
        assert!(colliders[0].contains_tile(0, 0) && colliders[0].contains_tile(0, 1));
        assert!(colliders[1].contains_tile(1, 0) && colliders[1].contains_tile(1, 1));
    }

    #[test]
    fn horizontal_run_breaks_at_gap() {
        let mut map =
            map_from_directions(&[&[Horizontal, NoneDir, Horizontal, Horizontal]], CELL);
        let colliders = group_colliders(&mut map).unwrap();
        assert_eq!(colliders.len(), 2);
        assert_eq!(colliders[0].tile_coords.len(), 1);
        assert_eq!(colliders[1].tile_coords.len(), 2);
    }

    #[test]
    fn vertical_run_becomes_one_collider() {
        let mut map = map_from_directions(&[&[Vertical], &[Vertical], &[Vertical]], CELL);
        let colliders = group_colliders(&mut map).unwrap();
        assert_eq!(colliders.len(), 1);
        assert_eq!(colliders[0].tile_coords.len(), 3);
        assert_eq!(colliders[0].position, Vec2 { x: 0.0, y: 32.0 });
        let world = colliders[0].polygon.world_vertices().collect_vec();
        assert_eq!(world[0], Vec2 { x: -16.0, y: -16.0 });
        assert_eq!(world[2], Vec2 { x: 16.0, y: 80.0 });
    }

    #[test]
    fn rectangular_box_becomes_one_collider() {
        let mut map = map_from_directions(
            &[
                &[BoxDir, BoxDir, BoxDir],
                &[BoxDir, BoxDir, BoxDir],
            ],
            CELL,
        );
        let colliders = group_colliders(&mut map).unwrap();
        assert_eq!(colliders.len(), 1);
        let collider = &colliders[0];
        assert_eq!(collider.tile_coords.len(), 6);
        assert_eq!(collider.position, Vec2 { x: 32.0, y: 16.0 });
        let world = collider.polygon.world_vertices().collect_vec();
        assert_eq!(world[0], Vec2 { x: -16.0, y: -16.0 });
        assert_eq!(world[2], Vec2 { x: 80.0, y: 48.0 });
    }

    #[test]
    fn box_group_starts_at_top_left_most_tile() {
        let mut map = map_from_directions(
            &[
                &[NoneDir, BoxDir, BoxDir],
                &[NoneDir, BoxDir, BoxDir],
            ],
            CELL,
        );
        let colliders = group_colliders(&mut map).unwrap();
        assert_eq!(colliders.len(), 1);
        assert_eq!(colliders[0].tile_coords[0], Vec2i { x: 1, y: 0 });
        assert_eq!(colliders[0].tile_coords.len(), 4);
    }

    #[test]
    fn irregular_box_region_groups_partially() {
        // An L-shaped Box region: the scan seeds the group at (0, 1), whose
        // first row is a single column, so (1, 0) is left over and seeds its
        // own group later in scan order. Documented limitation, not a bug.
        let mut map = map_from_directions(
            &[
                &[NoneDir, BoxDir],
                &[BoxDir, BoxDir],
            ],
            CELL,
        );
        let colliders = group_colliders(&mut map).unwrap();
        assert_eq!(colliders.len(), 2);
        assert_eq!(colliders[0].tile_coords.len(), 2);
        assert!(colliders[0].contains_tile(0, 1) && colliders[0].contains_tile(1, 1));
        assert_eq!(colliders[1].tile_coords.len(), 1);
        assert!(colliders[1].contains_tile(1, 0));
    }

    #[test]
    fn mixed_directions_do_not_merge() {
        let mut map = map_from_directions(&[&[Horizontal, Vertical, Horizontal]], CELL);
        let colliders = group_colliders(&mut map).unwrap();
        assert_eq!(colliders.len(), 3);
    }

    #[test]
    fn every_collidable_tile_grouped_exactly_once() {
        let mut map = map_from_directions(
            &[
                &[Horizontal, Horizontal, NoneDir, Vertical],
                &[BoxDir, BoxDir, NoneDir, Vertical],
                &[BoxDir, BoxDir, NoneDir, NoneDir],
            ],
            CELL,
        );
        let colliders = group_colliders(&mut map).unwrap();
        for row in 0..map.rows() {
            for column in 0..map.columns() {
                let tile = map.get(row, column).unwrap();
                let owners = colliders
                    .iter()
                    .filter(|collider| collider.contains_tile(row, column))
                    .count();
                if tile.has_collider && tile.direction != NoneDir {
                    assert_eq!(owners, 1, "tile ({row}, {column}) in {owners} colliders");
                } else {
                    assert_eq!(owners, 0, "tile ({row}, {column}) in {owners} colliders");
                }
            }
        }
    }

    #[test]
    fn groups_discovered_in_scan_order() {
        let mut map = map_from_directions(
            &[
                &[NoneDir, Vertical],
                &[Horizontal, NoneDir],
            ],
            CELL,
        );
        let colliders = group_colliders(&mut map).unwrap();
        assert_eq!(colliders.len(), 2);
        assert_eq!(colliders[0].direction, Vertical);
        assert_eq!(colliders[1].direction, Horizontal);
    }

    #[test]
    fn tiles_without_colliders_are_ignored() {
        let mut map = map_from_directions(&[&[NoneDir, NoneDir]], CELL);
        let colliders = group_colliders(&mut map).unwrap();
        assert!(colliders.is_empty());
    }
}
