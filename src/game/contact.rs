// Contact bookkeeping for the player collider
//
// Collision events from the physics step are folded into three facts the
// controller reads: the last grabbable object touched, whether the player
// stands on something, and whether it overlaps a ladder. Standing needs a
// solid contact whose normal points up; walls and ceilings only touch.

use std::collections::HashSet;

use log::debug;

use crate::engine::physics::{ColliderHandle, CollisionEvent};
use crate::game::level::{BoxId, Level, LevelEntity, SegmentRef};
use crate::game::player::BodyState;

/// Minimum upward component of a contact normal that counts as standing
const MIN_SUPPORT_NORMAL_Y: f32 = 0.7;

/// A grabbable object the player touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    RopeSegment(SegmentRef),
    Crate(BoxId),
}

#[derive(Debug)]
pub struct ContactTracker {
    player_collider: ColliderHandle,
    last_contact: Option<Contact>,
    /// Solid colliders currently touching the player
    solids: HashSet<ColliderHandle>,
    /// The subset of `solids` the player stands on
    supports: HashSet<ColliderHandle>,
    ladders: HashSet<ColliderHandle>,
}

impl ContactTracker {
    pub fn new(player_collider: ColliderHandle) -> Self {
        Self {
            player_collider,
            last_contact: None,
            solids: HashSet::new(),
            supports: HashSet::new(),
            ladders: HashSet::new(),
        }
    }

    /// Fold the events of one physics step
    pub fn absorb(&mut self, level: &Level, events: &[CollisionEvent]) {
        for event in events {
            let Some(other) = event.other(self.player_collider) else {
                continue;
            };
            let Some(entity) = level.entity_of_collider(other) else {
                // Removed since the step, only stops matter
                if !event.is_started() {
                    self.solids.remove(&other);
                    self.ladders.remove(&other);
                }
                continue;
            };

            let started = event.is_started();
            let sensor = event.is_sensor();

            match entity {
                LevelEntity::Ground(_) => self.toggle_solid(other, started && !sensor),
                LevelEntity::Ladder(_) => {
                    if started {
                        self.ladders.insert(other);
                    } else {
                        self.ladders.remove(&other);
                    }
                }
                LevelEntity::RopeSegment(segment) => {
                    if started {
                        self.record(Contact::RopeSegment(segment));
                    }
                }
                LevelEntity::Crate(id) => {
                    if started {
                        self.record(Contact::Crate(id));
                    }
                    self.toggle_solid(other, started && !sensor);
                }
                LevelEntity::Player => {}
            }
        }

        // Re-read every tick: sliding off a wall onto its top emits no event
        let player = self.player_collider;
        self.supports = self
            .solids
            .iter()
            .copied()
            .filter(|solid| {
                level
                    .physics
                    .contact_normal(player, *solid)
                    .is_some_and(|normal| -normal.y >= MIN_SUPPORT_NORMAL_Y)
            })
            .collect();
    }

    fn toggle_solid(&mut self, collider: ColliderHandle, touching: bool) {
        if touching {
            self.solids.insert(collider);
        } else {
            self.solids.remove(&collider);
        }
    }

    /// Remember a grabbable object as the most recent contact
    pub fn record(&mut self, contact: Contact) {
        if self.last_contact != Some(contact) {
            debug!("Player touched {:?}", contact);
        }
        self.last_contact = Some(contact);
    }

    /// Most recent grabbable contact; may no longer be touching
    pub fn last_contact(&self) -> Option<Contact> {
        self.last_contact
    }

    pub fn forget(&mut self) {
        self.last_contact = None;
    }

    pub fn body_state(&self) -> BodyState {
        if self.supports.is_empty() {
            BodyState::Flying
        } else {
            BodyState::Landed
        }
    }

    pub fn on_ladder(&self) -> bool {
        !self.ladders.is_empty()
    }

    pub fn player_collider(&self) -> ColliderHandle {
        self.player_collider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::{presets, vector};
    use crate::game::level::RopeId;
    use glam::Vec2;

    fn rect(half: Vec2) -> Vec<Vec2> {
        vec![
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
    }

    fn level_with_player(x: f32, y: f32) -> (Level, ColliderHandle) {
        let mut level = Level::new(40.0).expect("valid level");
        let body = level.physics.add_rigid_body(presets::player_body(x, y));
        let collider = level
            .physics
            .add_collider(presets::player_collider(1.0, 2.0), body);
        level.register(body, LevelEntity::Player);
        (level, collider)
    }

    fn run(level: &mut Level, tracker: &mut ContactTracker, steps: usize) {
        for _ in 0..steps {
            level.step(1.0 / 60.0);
            let events = level.physics.get_collision_events();
            tracker.absorb(level, &events);
        }
    }

    #[test]
    fn test_landing_on_ground() {
        let (mut level, player) = level_with_player(0.0, 2.0);
        level
            .add_ground(Vec2::new(0.0, -0.5), &rect(Vec2::new(10.0, 0.5)))
            .expect("valid ground");
        let mut tracker = ContactTracker::new(player);
        assert_eq!(tracker.body_state(), BodyState::Flying);

        run(&mut level, &mut tracker, 120);

        assert_eq!(tracker.body_state(), BodyState::Landed);
    }

    #[test]
    fn test_wall_is_not_ground() {
        let (mut level, player) = level_with_player(0.0, 30.0);
        // Tall wall just right of the player, no floor anywhere
        level
            .add_ground(Vec2::new(1.1, 20.0), &rect(Vec2::new(0.5, 20.0)))
            .expect("valid wall");
        let mut tracker = ContactTracker::new(player);
        let body = level
            .physics
            .get_collider(player)
            .and_then(|collider| collider.parent())
            .expect("player body");

        let mut touched_wall = false;
        for _ in 0..30 {
            if let Some(rigid_body) = level.physics.get_rigid_body_mut(body) {
                let vertical = rigid_body.linvel().y;
                rigid_body.set_linvel(vector![5.0, vertical], true);
            }
            run(&mut level, &mut tracker, 1);
            touched_wall |= !tracker.solids.is_empty();
            assert_eq!(tracker.body_state(), BodyState::Flying);
        }

        assert!(touched_wall);
        let y = level.physics.get_rigid_body(body).map(|b| b.translation().y);
        assert!(y.is_some_and(|y| y < 30.0));
    }

    #[test]
    fn test_rope_contact_recorded() {
        let (mut level, player) = level_with_player(0.0, 1.0);
        level
            .add_rope(Vec2::new(0.0, 3.0), 3, Vec2::new(0.2, 0.5))
            .expect("valid rope");
        let mut tracker = ContactTracker::new(player);

        run(&mut level, &mut tracker, 3);

        assert!(matches!(
            tracker.last_contact(),
            Some(Contact::RopeSegment(SegmentRef { rope: RopeId(0), .. }))
        ));
    }

    #[test]
    fn test_ladder_overlap() {
        let (mut level, player) = level_with_player(0.0, 2.0);
        level
            .add_ladder(Vec2::new(0.0, 3.0), &rect(Vec2::new(0.5, 3.0)))
            .expect("valid ladder");
        let mut tracker = ContactTracker::new(player);

        run(&mut level, &mut tracker, 3);
        assert!(tracker.on_ladder());
        // A ladder is not something to stand on
        assert_eq!(tracker.body_state(), BodyState::Flying);
    }

    #[test]
    fn test_record_and_forget() {
        let (_, player) = level_with_player(0.0, 0.0);
        let mut tracker = ContactTracker::new(player);
        tracker.record(Contact::Crate(BoxId(3)));
        assert_eq!(tracker.last_contact(), Some(Contact::Crate(BoxId(3))));

        tracker.forget();
        assert_eq!(tracker.last_contact(), None);
    }
}
