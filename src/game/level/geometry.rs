// Static level geometry queries
//
// Ground and ladder polygons are mirrored here as standalone parry2d shapes
// so the controller can test a footprint against the map without touching
// the simulation.

use glam::Vec2;
use log::warn;
use parry2d::math::{Isometry, Point, Vector};
use parry2d::query;
use parry2d::shape::{ConvexPolygon, Cuboid};

/// Shrinks overlap bands so surfaces that only touch never count as blocking
const CONTACT_SKIN: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapObjectKind {
    Ground,
    Ladder,
}

/// One static polygon of the map
#[derive(Debug, Clone)]
pub struct MapObject {
    pub kind: MapObjectKind,
    /// Body origin in world units; the polygon is relative to it
    pub position: Vec2,
    pub polygon: ConvexPolygon,
}

impl MapObject {
    fn isometry(&self) -> Isometry<f32> {
        Isometry::translation(self.position.x, self.position.y)
    }

    /// Whether the polygon intersects an axis-aligned box, unsupported
    /// shape pairs count as intersecting
    pub fn intersects_box(&self, center: Vec2, half_extents: Vec2) -> bool {
        let band = Cuboid::new(Vector::new(half_extents.x, half_extents.y));
        let band_pos = Isometry::translation(center.x, center.y);

        match query::intersection_test(&self.isometry(), &self.polygon, &band_pos, &band) {
            Ok(hit) => hit,
            Err(_) => {
                warn!("Unsupported shape pair in overlap test, treating as blocked");
                true
            }
        }
    }
}

/// Queryable set of the static objects of one level
#[derive(Debug, Default)]
pub struct LevelGeometry {
    objects: Vec<MapObject>,
}

impl LevelGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the polygon for a map object, `None` if the points are degenerate
    pub fn polygon(points: &[Vec2]) -> Option<ConvexPolygon> {
        let points: Vec<Point<f32>> = points.iter().map(|p| Point::new(p.x, p.y)).collect();
        // Collinear input still hulls into a segment
        ConvexPolygon::from_convex_hull(&points).filter(|polygon| polygon.points().len() >= 3)
    }

    /// Register an object, returns its index
    pub fn push(&mut self, object: MapObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn grounds(&self) -> impl Iterator<Item = &MapObject> {
        self.objects
            .iter()
            .filter(|object| object.kind == MapObjectKind::Ground)
    }

    pub fn ladders(&self) -> impl Iterator<Item = &MapObject> {
        self.objects
            .iter()
            .filter(|object| object.kind == MapObjectKind::Ladder)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Whether any ground polygon reaches into the box spanning `bottom` to
    /// `top` with the given half width around `center_x`.
    ///
    /// A single pass over the ground objects; the box is shrunk by a small
    /// skin on every side so geometry that merely touches it is ignored.
    pub fn ground_overlaps_band(&self, center_x: f32, half_width: f32, bottom: f32, top: f32) -> bool {
        let half_extents = Vec2::new(
            (half_width - CONTACT_SKIN).max(CONTACT_SKIN),
            ((top - bottom) / 2.0 - CONTACT_SKIN).max(CONTACT_SKIN),
        );
        let center = Vec2::new(center_x, (bottom + top) / 2.0);

        self.grounds()
            .any(|object| object.intersects_box(center, half_extents))
    }
}
