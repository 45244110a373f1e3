// Level: the physics world plus every static and dynamic object in it
//
// - `geometry`: ground and ladder polygons with overlap queries
// - `rope`: jointed rope chains the player can hang from
// - `push_box`: boxes the player can carry
//
// Everything a level spawns lives in its `PhysicsWorld` and is torn down with
// it, together with any pending scheduled events.

pub mod geometry;
pub mod push_box;
pub mod rope;

use std::collections::HashMap;

use glam::Vec2;
use log::{debug, info};
use thiserror::Error;

use crate::engine::physics::{presets, vector, ColliderHandle, EntityId, PhysicsWorld, RigidBodyHandle};
use crate::engine::scheduler::Scheduler;

pub use geometry::{LevelGeometry, MapObject, MapObjectKind};
pub use push_box::{BoxId, PushBox};
pub use rope::{Rope, RopeId, SegmentRef};

/// Gravity used by levels unless overridden (world units per second squared)
pub const DEFAULT_GRAVITY: f32 = -50.0;

/// Events the level schedules for later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEvent {
    GameOver,
}

/// What a physics body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEntity {
    Player,
    Ground(usize),
    Ladder(usize),
    RopeSegment(SegmentRef),
    Crate(BoxId),
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("map object polygon is degenerate ({points} points)")]
    DegeneratePolygon { points: usize },
    #[error("a rope needs at least one segment")]
    EmptyRope,
    #[error("invalid size {width}x{height}")]
    InvalidSize { width: f32, height: f32 },
    #[error("level width must be positive, got {0}")]
    InvalidWidth(f32),
}

pub struct Level {
    pub physics: PhysicsWorld,
    pub geometry: LevelGeometry,
    pub ropes: Vec<Rope>,
    pub boxes: Vec<PushBox>,
    pub scheduler: Scheduler<LevelEvent>,
    entities: HashMap<EntityId, (LevelEntity, RigidBodyHandle)>,
    next_entity: u64,
    width: f32,
}

impl Level {
    /// Create an empty level `width` world units wide
    pub fn new(width: f32) -> Result<Self, LevelError> {
        Self::with_gravity(width, DEFAULT_GRAVITY)
    }

    pub fn with_gravity(width: f32, gravity: f32) -> Result<Self, LevelError> {
        if width <= 0.0 {
            return Err(LevelError::InvalidWidth(width));
        }

        Ok(Self {
            physics: PhysicsWorld::with_gravity(vector![0.0, gravity]),
            geometry: LevelGeometry::new(),
            ropes: Vec::new(),
            boxes: Vec::new(),
            scheduler: Scheduler::new(),
            entities: HashMap::new(),
            next_entity: 0,
            width,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Tag a body so contacts with it can be resolved to a level entity
    pub fn register(&mut self, body: RigidBodyHandle, entity: LevelEntity) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.physics.set_entity_mapping(body, id);
        self.entities.insert(id, (entity, body));
        id
    }

    /// Resolve the entity owning a collider
    pub fn entity_of_collider(&self, collider: ColliderHandle) -> Option<LevelEntity> {
        let id = self.physics.collider_entity(collider)?;
        self.entities.get(&id).map(|(entity, _)| *entity)
    }

    /// Add a solid polygon, vertices relative to `position`
    pub fn add_ground(&mut self, position: Vec2, points: &[Vec2]) -> Result<usize, LevelError> {
        self.add_map_object(MapObjectKind::Ground, position, points)
    }

    /// Add a climbable polygon, vertices relative to `position`
    pub fn add_ladder(&mut self, position: Vec2, points: &[Vec2]) -> Result<usize, LevelError> {
        self.add_map_object(MapObjectKind::Ladder, position, points)
    }

    fn add_map_object(
        &mut self,
        kind: MapObjectKind,
        position: Vec2,
        points: &[Vec2],
    ) -> Result<usize, LevelError> {
        let degenerate = || LevelError::DegeneratePolygon {
            points: points.len(),
        };
        let polygon = LevelGeometry::polygon(points).ok_or_else(degenerate)?;

        let raw: Vec<[f32; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
        let collider = match kind {
            MapObjectKind::Ground => presets::ground_collider(&raw),
            MapObjectKind::Ladder => presets::ladder_collider(&raw),
        }
        .ok_or_else(degenerate)?;

        let body = self
            .physics
            .add_rigid_body(presets::static_body(position.x, position.y));
        self.physics.add_collider(collider, body);

        let index = self.geometry.push(MapObject {
            kind,
            position,
            polygon,
        });
        let entity = match kind {
            MapObjectKind::Ground => LevelEntity::Ground(index),
            MapObjectKind::Ladder => LevelEntity::Ladder(index),
        };
        self.register(body, entity);

        debug!("Added {:?} #{} at {:?}", kind, index, position);
        Ok(index)
    }

    /// Hang a rope from `anchor`
    pub fn add_rope(&mut self, anchor: Vec2, segments: usize, part_size: Vec2) -> Result<RopeId, LevelError> {
        let id = RopeId(self.ropes.len());
        let rope = Rope::spawn(&mut self.physics, id, anchor, segments, part_size)?;

        for index in 0..rope.len() {
            if let (Some(body), Some(segment)) = (rope.segment_body(index), rope.segment(index)) {
                self.register(body, LevelEntity::RopeSegment(segment));
            }
        }

        self.ropes.push(rope);
        Ok(id)
    }

    pub fn add_box(&mut self, position: Vec2, size: Vec2) -> Result<BoxId, LevelError> {
        let id = BoxId(self.boxes.len());
        let push_box = PushBox::spawn(&mut self.physics, id, position, size)?;
        self.register(push_box.body(), LevelEntity::Crate(id));
        self.boxes.push(push_box);
        Ok(id)
    }

    pub fn rope(&self, id: RopeId) -> Option<&Rope> {
        self.ropes.get(id.0)
    }

    pub fn push_box(&self, id: BoxId) -> Option<&PushBox> {
        self.boxes.get(id.0)
    }

    /// Step the simulation and the clock, returns the events that came due
    pub fn step(&mut self, dt: f32) -> Vec<LevelEvent> {
        self.physics.set_timestep(dt);
        self.physics.step();
        self.scheduler.advance(dt)
    }

    /// Cancel pending events and drop every body the level owns
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();

        let before = self.physics.body_count();
        let mut bodies: Vec<RigidBodyHandle> = self.entities.values().map(|(_, body)| *body).collect();
        // Rope anchors are never registered
        bodies.extend(self.ropes.iter().flat_map(|rope| rope.bodies()));
        for body in bodies {
            self.physics.remove_rigid_body(body);
        }

        self.geometry.clear();
        self.ropes.clear();
        self.boxes.clear();
        self.entities.clear();

        info!(
            "Level torn down, {} bodies removed",
            before - self.physics.body_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Vec<Vec2> {
        vec![
            Vec2::new(-10.0, -1.0),
            Vec2::new(10.0, -1.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(-10.0, 0.0),
        ]
    }

    #[test]
    fn test_entities_resolve_from_colliders() {
        let mut level = Level::new(20.0).expect("valid level");
        let rope = level
            .add_rope(Vec2::new(5.0, 8.0), 2, Vec2::new(0.2, 0.5))
            .expect("valid rope");
        let crate_id = level
            .add_box(Vec2::new(2.0, 1.0), Vec2::ONE)
            .expect("valid box");

        let segment_collider = level
            .rope(rope)
            .and_then(|r| r.segment_collider(1))
            .expect("segment collider");
        let box_collider = level.push_box(crate_id).expect("box").collider();

        assert_eq!(
            level.entity_of_collider(segment_collider),
            Some(LevelEntity::RopeSegment(SegmentRef { rope, index: 1 }))
        );
        assert_eq!(
            level.entity_of_collider(box_collider),
            Some(LevelEntity::Crate(crate_id))
        );
    }

    #[test]
    fn test_degenerate_ground_rejected() {
        let mut level = Level::new(20.0).expect("valid level");
        let line = [Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0)];

        assert!(matches!(
            level.add_ground(Vec2::ZERO, &line),
            Err(LevelError::DegeneratePolygon { points: 3 })
        ));
        assert!(level.geometry.is_empty());
    }

    #[test]
    fn test_invalid_width_rejected() {
        assert!(matches!(Level::new(0.0), Err(LevelError::InvalidWidth(_))));
    }

    #[test]
    fn test_step_fires_scheduled_events() {
        let mut level = Level::new(20.0).expect("valid level");
        level.scheduler.schedule(0.5, LevelEvent::GameOver);

        assert!(level.step(0.25).is_empty());
        assert_eq!(level.step(0.25), vec![LevelEvent::GameOver]);
    }

    #[test]
    fn test_teardown_cancels_and_clears() {
        let mut level = Level::new(20.0).expect("valid level");
        level.add_ground(Vec2::ZERO, &floor()).expect("valid ground");
        level
            .add_rope(Vec2::new(0.0, 8.0), 3, Vec2::new(0.2, 0.5))
            .expect("valid rope");
        level.scheduler.schedule(1.0, LevelEvent::GameOver);

        level.teardown();

        assert_eq!(level.scheduler.pending_count(), 0);
        assert_eq!(level.physics.body_count(), 0);
        assert!(level.ropes.is_empty());
        assert!(level.step(2.0).is_empty());
    }
}
