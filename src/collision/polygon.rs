use crate::core::prelude::*;
use std::collections::BTreeSet;
use std::fmt;
use std::fmt::Formatter;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_POLYGON_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique polygon identity. Allocation is a monotonic counter, so
/// ids are never reused within a session.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PolygonId(u64);

impl PolygonId {
    fn next() -> Self {
        Self(NEXT_POLYGON_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PolygonId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "poly-{}", self.0)
    }
}

/// A single polygon corner. `reference` is the accumulated translated
/// position before rotation; `world` is `reference` rotated about the current
/// pivot. Owned exclusively by its [`BoundingPolygon`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub reference: Vec2,
    pub world: Vec2,
}

/// A closed convex polygon with identity and a record of which other polygons
/// currently overlap it.
///
/// Vertices are wound clockwise in screen coordinates (y down); the SAT
/// narrow phase derives outward edge normals from that winding. Whether the
/// polygon "is colliding" is derived from the touching set, never stored.
#[derive(Debug)]
pub struct BoundingPolygon {
    id: PolygonId,
    vertices: Vec<Vertex>,
    touching: BTreeSet<PolygonId>,
}

impl BoundingPolygon {
    /// Creates a polygon from corner positions wound clockwise.
    ///
    /// Fails on fewer than 3 corners or anticlockwise winding; both are
    /// configuration errors at the call site, not recoverable here.
    pub fn try_new(corners: Vec<Vec2>) -> Result<Self> {
        if corners.len() < 3 {
            bail!(
                "bounding polygon needs at least 3 vertices, got {}",
                corners.len()
            );
        }
        let mut winding_sign_seen = false;
        for (&u, &v, &w) in corners.iter().circular_tuple_windows() {
            let cross = (v - u).cross(w - v);
            if cross < 0.0 {
                bail!("bounding polygon vertices must wind clockwise (y down)");
            }
            winding_sign_seen |= cross > 0.0;
        }
        if !winding_sign_seen {
            bail!("bounding polygon vertices are collinear");
        }
        Ok(Self {
            id: PolygonId::next(),
            vertices: corners
                .into_iter()
                .map(|corner| Vertex {
                    reference: corner,
                    world: corner,
                })
                .collect(),
            touching: BTreeSet::new(),
        })
    }

    pub fn id(&self) -> PolygonId {
        self.id
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Current world-space corner positions, in winding order; the rendering
    /// boundary reads these to draw outlines.
    pub fn world_vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.vertices.iter().map(|vertex| vertex.world)
    }

    /// Ordered outline segments, wrapping from the last vertex to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.vertices
            .iter()
            .map(|vertex| vertex.world)
            .circular_tuple_windows()
    }

    /// Moves every vertex by `translation`, then re-derives its world position
    /// by rotating about `pivot`. Stateful: translation accumulates onto the
    /// reference position frame over frame, while rotation is absolute.
    pub fn transform(&mut self, pivot: Vec2, translation: Vec2, rotation: f32) {
        for vertex in &mut self.vertices {
            *vertex = transform_one(*vertex, pivot, translation, rotation);
        }
    }

    /// The same math as [`transform`](Self::transform), but returns the new
    /// vertices without mutating the polygon. Used to test a candidate move
    /// before committing it; the results are identical to a real `transform`
    /// with the same inputs.
    #[must_use]
    pub fn transform_copy(&self, pivot: Vec2, translation: Vec2, rotation: f32) -> Vec<Vertex> {
        self.vertices
            .iter()
            .map(|&vertex| transform_one(vertex, pivot, translation, rotation))
            .collect()
    }

    pub fn touching(&self) -> &BTreeSet<PolygonId> {
        &self.touching
    }

    /// Whether any other polygon currently overlaps this one. Presentation
    /// only; movement resolution does not read this.
    pub fn is_colliding(&self) -> bool {
        !self.touching.is_empty()
    }

    pub(crate) fn insert_touching(&mut self, id: PolygonId) {
        check!(id != self.id);
        self.touching.insert(id);
    }

    pub(crate) fn remove_touching(&mut self, id: PolygonId) {
        self.touching.remove(&id);
    }
}

fn transform_one(mut vertex: Vertex, pivot: Vec2, translation: Vec2, rotation: f32) -> Vertex {
    vertex.reference += translation;
    vertex.world = (vertex.reference - pivot).rotated(rotation) + pivot;
    vertex
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

    fn unit_square() -> BoundingPolygon {
        BoundingPolygon::try_new(vec![
            Vec2::zero(),
            Vec2::right(),
            Vec2::one(),
            Vec2::down(),
        ])
        .unwrap()
    }

    #[test]
    fn polygon_ids_are_unique() {
        let a = unit_square();
        let b = unit_square();
        let c = unit_square();
        assert_ne!(a.id(), b.id());
        assert_ne!(b.id(), c.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn rejects_too_few_vertices() {
        assert!(BoundingPolygon::try_new(Vec::new()).is_err());
        assert!(BoundingPolygon::try_new(vec![Vec2::zero(), Vec2::one()]).is_err());
    }

    #[test]
    fn rejects_anticlockwise_winding() {
        assert!(BoundingPolygon::try_new(vec![
            Vec2::zero(),
            Vec2::down(),
            Vec2::one(),
            Vec2::right(),
        ])
        .is_err());
    }

    #[test]
    fn rejects_collinear_vertices() {
        assert!(BoundingPolygon::try_new(vec![
            Vec2::zero(),
            Vec2::right(),
            Vec2 { x: 2.0, y: 0.0 },
        ])
        .is_err());
    }

    #[test]
    fn identity_transform_leaves_world_unchanged() {
        let mut square = unit_square();
        let before = square.world_vertices().collect_vec();
        square.transform(Vec2 { x: 0.5, y: 0.5 }, Vec2::zero(), 0.0);
        assert_eq!(square.world_vertices().collect_vec(), before);
    }

    #[test]
    fn translation_accumulates() {
        let mut square = unit_square();
        square.transform(Vec2::zero(), Vec2 { x: 2.0, y: 0.0 }, 0.0);
        square.transform(Vec2::zero(), Vec2 { x: 1.0, y: 3.0 }, 0.0);
        assert_eq!(
            square.world_vertices().next(),
            Some(Vec2 { x: 3.0, y: 3.0 })
        );
    }

    #[test]
    fn rotation_round_trip_restores_vertices() {
        let mut square = unit_square();
        let pivot = Vec2 { x: 0.5, y: 0.5 };
        let before = square.world_vertices().collect_vec();
        // Rotation is absolute: applying the delta-composed angle, then zero
        // again, must restore the original world positions.
        square.transform(pivot, Vec2::zero(), FRAC_PI_3);
        square.transform(pivot, Vec2::zero(), FRAC_PI_3 - FRAC_PI_3);
        assert_eq!(square.world_vertices().collect_vec(), before);
    }

    #[test]
    fn rotation_about_pivot() {
        let mut square = unit_square();
        square.transform(Vec2 { x: 0.5, y: 0.5 }, Vec2::zero(), FRAC_PI_2);
        // Quarter turn clockwise about the centre maps (0, 0) to (1, 0).
        assert_eq!(square.world_vertices().next(), Some(Vec2::right()));
    }

    #[test]
    fn transform_copy_matches_transform() {
        let mut square = unit_square();
        let pivot = Vec2 { x: 2.0, y: -1.0 };
        let translation = Vec2 { x: 3.5, y: 0.25 };
        let copied = square.transform_copy(pivot, translation, FRAC_PI_3);
        square.transform(pivot, translation, FRAC_PI_3);
        assert_eq!(copied, square.vertices().to_vec());
    }

    #[test]
    fn transform_copy_does_not_mutate() {
        let square = unit_square();
        let before = square.world_vertices().collect_vec();
        let _ = square.transform_copy(Vec2::zero(), Vec2::one(), 1.0);
        assert_eq!(square.world_vertices().collect_vec(), before);
    }

    #[test]
    fn edges_wrap_around_in_winding_order() {
        let square = unit_square();
        let edges = square.edges().collect_vec();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[0], (Vec2::zero(), Vec2::right()));
        // The last segment closes the outline back to the first vertex.
        assert_eq!(edges[3], (Vec2::down(), Vec2::zero()));
        // Each segment starts where the previous one ended.
        for (previous, next) in edges.iter().circular_tuple_windows() {
            assert_eq!(previous.1, next.0);
        }
    }

    #[test]
    fn is_colliding_derived_from_touching() {
        let mut a = unit_square();
        let b = unit_square();
        assert!(!a.is_colliding());
        a.insert_touching(b.id());
        assert!(a.is_colliding());
        assert!(a.touching().contains(&b.id()));
        a.remove_touching(b.id());
        assert!(!a.is_colliding());
    }
}
