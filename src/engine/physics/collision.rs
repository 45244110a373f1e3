use rapier2d::prelude::*;
use std::sync::{Arc, Mutex};

/// Collision groups for filtering what objects can collide with each other
///
/// The player walks on ground, passes through ladders and rope segments
/// (both are sensors) and shoves boxes around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// The player avatar
    Player = 0b0000_0010,

    /// Static ground tiles, walls and ceilings
    Ground = 0b0000_0100,

    /// Climbable ladder volumes
    Ladder = 0b0000_1000,

    /// Rope segments (grab targets)
    Rope = 0b0001_0000,

    /// Pushable, carryable boxes
    Crate = 0b0010_0000,
}

impl CollisionGroups {
    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            CollisionGroups::Player => Group::from_bits_truncate(
                CollisionGroups::Ground as u32
                    | CollisionGroups::Ladder as u32
                    | CollisionGroups::Rope as u32
                    | CollisionGroups::Crate as u32,
            ),

            CollisionGroups::Ground => Group::from_bits_truncate(
                CollisionGroups::Player as u32
                    | CollisionGroups::Crate as u32
                    | CollisionGroups::Rope as u32,
            ),

            CollisionGroups::Ladder => Group::from_bits_truncate(CollisionGroups::Player as u32),

            // Segments only need to see the player; the chain itself is held
            // together by joints, not contacts
            CollisionGroups::Rope => Group::from_bits_truncate(
                CollisionGroups::Player as u32 | CollisionGroups::Ground as u32,
            ),

            CollisionGroups::Crate => Group::from_bits_truncate(
                CollisionGroups::Player as u32
                    | CollisionGroups::Ground as u32
                    | CollisionGroups::Crate as u32,
            ),

            CollisionGroups::Default => Group::ALL,
        };

        InteractionGroups::new(memberships, filter)
    }
}

/// Custom collision event for game logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    /// Two colliders started touching
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        sensor: bool,
    },

    /// Two colliders stopped touching
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        sensor: bool,
    },
}

impl CollisionEvent {
    /// Both colliders of the pair
    pub fn colliders(&self) -> (ColliderHandle, ColliderHandle) {
        match *self {
            CollisionEvent::Started {
                collider1,
                collider2,
                ..
            }
            | CollisionEvent::Stopped {
                collider1,
                collider2,
                ..
            } => (collider1, collider2),
        }
    }

    /// If `collider` is part of this pair, return the other one
    pub fn other(&self, collider: ColliderHandle) -> Option<ColliderHandle> {
        let (a, b) = self.colliders();
        if a == collider {
            Some(b)
        } else if b == collider {
            Some(a)
        } else {
            None
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, CollisionEvent::Started { .. })
    }

    /// Whether one side of the pair is a sensor (overlap, no contact)
    pub fn is_sensor(&self) -> bool {
        match *self {
            CollisionEvent::Started { sensor, .. } | CollisionEvent::Stopped { sensor, .. } => sensor,
        }
    }
}

/// Queue for storing collision events during physics step
///
/// rapier hands events to the handler through `&self` from inside the
/// pipeline, hence the interior mutability.
pub struct CollisionEventQueue {
    events: Arc<Mutex<Vec<CollisionEvent>>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(32))),
        }
    }

    /// Clear all events (call at start of physics step)
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Get all collision events from this frame
    pub fn events(&self) -> Vec<CollisionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: CollisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for CollisionEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier2d::prelude::CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match event {
            rapier2d::prelude::CollisionEvent::Started(h1, h2, flags) => {
                self.push(CollisionEvent::Started {
                    collider1: h1,
                    collider2: h2,
                    sensor: flags.contains(CollisionEventFlags::SENSOR),
                });
            }
            rapier2d::prelude::CollisionEvent::Stopped(h1, h2, flags) => {
                self.push(CollisionEvent::Stopped {
                    collider1: h1,
                    collider2: h2,
                    sensor: flags.contains(CollisionEventFlags::SENSOR),
                });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
