use crate::core::prelude::*;
use crate::util::range;
use std::ops::Range;

pub mod polygon;

use polygon::Vertex;

/// Result of a positive separating-axis test: the minimum-translation
/// direction and how deep the polygons interpenetrate along it.
///
/// `direction` is the edge normal that produced the smallest overlap; its
/// sign is *not* guaranteed to point away from either polygon. The caller
/// resolves sign from the relative positions of the two bodies.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Penetration {
    pub direction: Vec2,
    pub depth: f32,
}

/// Separating-axis test between two convex polygons' world vertices.
///
/// Projects both vertex sets onto the outward normal of every edge of both
/// polygons; returns `Ok(None)` as soon as any axis separates them (intervals
/// that only touch count as separated). If every axis overlaps, returns the
/// minimum-translation vector across all tested axes.
///
/// Degenerate input is rejected rather than allowed to produce NaN normals:
/// polygons with fewer than 3 vertices are an error, and zero-length edges
/// are skipped before normalisation.
pub fn detect_collision(a: &[Vertex], b: &[Vertex]) -> Result<Option<Penetration>> {
    if a.len() < 3 || b.len() < 3 {
        bail!(
            "degenerate polygon in collision test: {} vs. {} vertices",
            a.len(),
            b.len()
        );
    }

    let mut smallest_depth = f32::MAX;
    let mut direction = Vec2::zero();
    let mut tested_axes = 0;
    for vertices in [a, b] {
        for (u, v) in vertices.iter().circular_tuple_windows() {
            let edge = v.world - u.world;
            if edge.len_squared() < EPSILON * EPSILON {
                // Coincident vertices; this edge has no normal.
                continue;
            }
            let axis = edge.orthog().normed();
            let Some(depth) = range::overlap_depth_f32(&project(a, axis), &project(b, axis))
            else {
                return Ok(None);
            };
            tested_axes += 1;
            if depth < smallest_depth {
                smallest_depth = depth;
                direction = axis;
            }
        }
    }
    if tested_axes == 0 {
        bail!("degenerate polygon in collision test: all edges have zero length");
    }
    Ok(Some(Penetration {
        direction,
        depth: smallest_depth,
    }))
}

/// Projects every vertex onto `axis`, returning the covered interval.
fn project(vertices: &[Vertex], axis: Vec2) -> Range<f32> {
    let mut start = f32::MAX;
    let mut end = f32::MIN;
    for vertex in vertices {
        let projection = axis.dot(vertex.world);
        start = start.min(projection);
        end = end.max(projection);
    }
    start..end
}
