// Pushable boxes the player can pick up and carry

use glam::Vec2;

use super::LevelError;
use crate::core::math::{to_vec2, to_vector};
use crate::engine::physics::{presets, vector, ColliderHandle, Isometry, PhysicsWorld, RigidBodyHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxId(pub usize);

#[derive(Debug)]
pub struct PushBox {
    id: BoxId,
    body: RigidBodyHandle,
    collider: ColliderHandle,
    size: Vec2,
}

impl PushBox {
    pub fn spawn(
        physics: &mut PhysicsWorld,
        id: BoxId,
        position: Vec2,
        size: Vec2,
    ) -> Result<Self, LevelError> {
        if size.x <= 0.0 || size.y <= 0.0 {
            return Err(LevelError::InvalidSize {
                width: size.x,
                height: size.y,
            });
        }

        let body = physics.add_rigid_body(presets::crate_body(position.x, position.y));
        let collider = physics.add_collider(presets::crate_collider(size.x, size.y), body);

        Ok(Self {
            id,
            body,
            collider,
            size,
        })
    }

    pub fn id(&self) -> BoxId {
        self.id
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics
            .get_rigid_body(self.body)
            .map(|body| to_vec2(body.translation()))
    }

    /// Where the box sits when held in front of a player.
    ///
    /// `facing` is -1, 0 or 1; the box rests `clearance` away from the
    /// player's side and slightly below the top of its own height.
    pub fn carry_pose(&self, player_position: Vec2, player_size: Vec2, facing: f32, clearance: f32) -> Vec2 {
        Vec2::new(
            player_position.x + facing * (player_size.x / 2.0 + self.size.x / 2.0 + clearance),
            player_position.y + self.size.y / 2.0 - clearance,
        )
    }

    /// Take the box out of the simulation so it can follow the player
    pub fn pick_up(&self, physics: &mut PhysicsWorld) {
        if let Some(body) = physics.get_rigid_body_mut(self.body) {
            body.set_enabled(false);
        }
    }

    /// Teleport the box, upright
    pub fn place(&self, physics: &mut PhysicsWorld, position: Vec2) {
        if let Some(body) = physics.get_rigid_body_mut(self.body) {
            body.set_position(Isometry::new(to_vector(position), 0.0), true);
        }
    }

    /// Hand the box back to the simulation at rest
    pub fn put_down(&self, physics: &mut PhysicsWorld) {
        if let Some(body) = physics.get_rigid_body_mut(self.body) {
            body.set_linvel(vector![0.0, 0.0], true);
            body.set_angvel(0.0, true);
            body.set_enabled(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_carry_pose_follows_facing() {
        let mut physics = PhysicsWorld::new();
        let push_box = PushBox::spawn(&mut physics, BoxId(0), Vec2::ZERO, Vec2::new(1.0, 1.0))
            .expect("valid box");
        let player = Vec2::new(5.0, 2.0);
        let size = Vec2::new(1.0, 2.0);

        let right = push_box.carry_pose(player, size, 1.0, 0.0625);
        assert_relative_eq!(right.x, 6.0625);
        assert_relative_eq!(right.y, 2.4375);

        let left = push_box.carry_pose(player, size, -1.0, 0.0625);
        assert_relative_eq!(left.x, 3.9375);
    }

    #[test]
    fn test_pick_up_and_put_down() {
        let mut physics = PhysicsWorld::new();
        let push_box = PushBox::spawn(&mut physics, BoxId(0), Vec2::ZERO, Vec2::ONE)
            .expect("valid box");

        push_box.pick_up(&mut physics);
        push_box.place(&mut physics, Vec2::new(3.0, 4.0));
        let body = physics.get_rigid_body(push_box.body()).expect("box body");
        assert!(!body.is_enabled());
        assert_eq!(push_box.position(&physics), Some(Vec2::new(3.0, 4.0)));

        if let Some(body) = physics.get_rigid_body_mut(push_box.body()) {
            body.set_linvel(vector![2.0, 1.0], true);
        }
        push_box.put_down(&mut physics);

        let body = physics.get_rigid_body(push_box.body()).expect("box body");
        assert!(body.is_enabled());
        assert_eq!(body.linvel().x, 0.0);
        assert_eq!(body.linvel().y, 0.0);
    }

    #[test]
    fn test_invalid_size_rejected() {
        let mut physics = PhysicsWorld::new();
        assert!(PushBox::spawn(&mut physics, BoxId(0), Vec2::ZERO, Vec2::new(1.0, -1.0)).is_err());
    }
}
