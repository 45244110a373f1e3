// Hanging ropes: a fixed anchor and a chain of jointed segments

use glam::Vec2;
use log::debug;

use super::LevelError;
use crate::core::math::{to_vec2, to_vector};
use crate::engine::physics::{point, presets, ColliderHandle, PhysicsWorld, RigidBodyHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RopeId(pub usize);

/// Reference to one segment of a rope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentRef {
    pub rope: RopeId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

#[derive(Debug)]
pub struct Rope {
    id: RopeId,
    anchor: RigidBodyHandle,
    segments: Vec<Segment>,
    part_size: Vec2,
}

impl Rope {
    /// Hang `count` segments of `part_size` straight down from `anchor`
    pub fn spawn(
        physics: &mut PhysicsWorld,
        id: RopeId,
        anchor: Vec2,
        count: usize,
        part_size: Vec2,
    ) -> Result<Self, LevelError> {
        if count == 0 {
            return Err(LevelError::EmptyRope);
        }
        if part_size.x <= 0.0 || part_size.y <= 0.0 {
            return Err(LevelError::InvalidSize {
                width: part_size.x,
                height: part_size.y,
            });
        }

        let anchor_body = physics.add_rigid_body(presets::static_body(anchor.x, anchor.y));
        let half_height = part_size.y / 2.0;

        let mut segments = Vec::with_capacity(count);
        let mut parent = anchor_body;
        let mut parent_anchor = point![0.0, 0.0];

        for index in 0..count {
            let y = anchor.y - part_size.y * (index as f32 + 0.5);
            let body = physics.add_rigid_body(presets::rope_segment_body(anchor.x, y));
            let collider =
                physics.add_collider(presets::rope_segment_collider(part_size.x, part_size.y), body);
            physics.add_revolute_joint(parent, body, parent_anchor, point![0.0, half_height]);

            segments.push(Segment { body, collider });
            parent = body;
            parent_anchor = point![0.0, -half_height];
        }

        debug!("Rope {:?} spawned with {} segments", id, count);

        Ok(Self {
            id,
            anchor: anchor_body,
            segments,
            part_size,
        })
    }

    pub fn id(&self) -> RopeId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn part_size(&self) -> Vec2 {
        self.part_size
    }

    pub fn segment(&self, index: usize) -> Option<SegmentRef> {
        (index < self.segments.len()).then_some(SegmentRef {
            rope: self.id,
            index,
        })
    }

    pub fn segment_body(&self, index: usize) -> Option<RigidBodyHandle> {
        self.segments.get(index).map(|segment| segment.body)
    }

    pub fn segment_collider(&self, index: usize) -> Option<ColliderHandle> {
        self.segments.get(index).map(|segment| segment.collider)
    }

    /// Segment one step closer to the anchor, the first segment stays put
    pub fn previous(&self, segment: SegmentRef) -> SegmentRef {
        SegmentRef {
            rope: self.id,
            index: self.clamp_index(segment.index).saturating_sub(1),
        }
    }

    /// Segment one step further down, the last segment stays put
    pub fn next(&self, segment: SegmentRef) -> SegmentRef {
        let last = self.segments.len().saturating_sub(1);
        SegmentRef {
            rope: self.id,
            index: (self.clamp_index(segment.index) + 1).min(last),
        }
    }

    fn clamp_index(&self, index: usize) -> usize {
        index.min(self.segments.len().saturating_sub(1))
    }

    /// Push a segment sideways to make the rope swing
    pub fn swing(&self, physics: &mut PhysicsWorld, segment: SegmentRef, impulse: Vec2) {
        let Some(handle) = self.segment_body(segment.index) else {
            return;
        };
        if let Some(body) = physics.get_rigid_body_mut(handle) {
            body.apply_impulse(to_vector(impulse), true);
        }
    }

    /// Translation and rotation of a segment
    pub fn segment_pose(&self, physics: &PhysicsWorld, index: usize) -> Option<(Vec2, f32)> {
        let body = physics.get_rigid_body(self.segment_body(index)?)?;
        Some((to_vec2(body.translation()), body.rotation().angle()))
    }

    pub fn segment_velocity(&self, physics: &PhysicsWorld, index: usize) -> Option<Vec2> {
        let body = physics.get_rigid_body(self.segment_body(index)?)?;
        Some(to_vec2(body.linvel()))
    }

    /// Every body owned by the rope, anchor first
    pub fn bodies(&self) -> impl Iterator<Item = RigidBodyHandle> + '_ {
        std::iter::once(self.anchor).chain(self.segments.iter().map(|segment| segment.body))
    }
}
