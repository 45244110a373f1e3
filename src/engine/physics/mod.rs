// Physics system using rapier2d

pub mod body;
mod collision;
mod world;

pub use body::{presets, ColliderHandle, RigidBodyHandle};
pub use collision::CollisionEvent;
pub use world::{EntityId, PhysicsWorld};

// Re-export commonly used rapier types for convenience
pub use rapier2d::prelude::{point, vector, Isometry};
