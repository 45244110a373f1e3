// Player controller
//
// Once per fixed tick the controller reads the input snapshot and the contact
// tracker, resolves state transitions and writes the result to the player's
// rigid body and to whatever it carries. Each concern (death, carrying, jump,
// crouch, climb, grab, run) is resolved on its own, in a fixed order.

use glam::Vec2;
use log::{debug, info};
use thiserror::Error;

use super::animation::{AnimationSet, FrameRegion};
use super::carry::{hang_pose, CarriedObject};
use super::config::{ConfigError, PlayerConfig};
use super::state::{BodyState, Direction, PlayerState, PlayerStateMachine};
use crate::core::math::{clamp, to_pixels, to_vec2, to_vector};
use crate::engine::audio::{AudioCue, AudioSink};
use crate::engine::input::{Action, PlayerInput};
use crate::engine::physics::{
    presets, vector, ColliderHandle, EntityId, Isometry, PhysicsWorld, RigidBodyHandle,
};
use crate::engine::scheduler::TaskId;
use crate::game::contact::{Contact, ContactTracker};
use crate::game::level::{BoxId, Level, LevelEntity, LevelEvent, SegmentRef};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("invalid player config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Everything needed to draw the player for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderData {
    pub frame: FrameRegion,
    /// Bottom-left corner of the sprite, in pixels
    pub position: Vec2,
    /// Draw size, in pixels
    pub size: Vec2,
    pub rotation_degrees: f32,
}

#[derive(Debug)]
pub struct PlayerController {
    // Physics
    body: RigidBodyHandle,
    collider: ColliderHandle,
    entity: EntityId,

    config: PlayerConfig,
    state_machine: PlayerStateMachine,
    animations: AnimationSet,

    direction: Direction,
    /// Horizontal direction the animation frames currently face
    facing: Direction,
    body_state: BodyState,
    health: i32,
    /// Collider size in world units
    size: Vec2,
    speed: f32,
    map_width: f32,
    carried: CarriedObject,

    can_jump: bool,
    on_ladder: bool,
    /// Horizontal velocity is left alone until the next landing
    inert: bool,
    running: bool,
    crouch_moving: bool,
    /// Horizontal input resolved this tick (-1, 0 or 1)
    intent: f32,

    game_over: Option<TaskId>,
}

impl PlayerController {
    /// Create the player body in `level` at `position`
    pub fn spawn(level: &mut Level, position: Vec2, config: PlayerConfig) -> Result<Self, ControllerError> {
        config.validate()?;

        let body = level
            .physics
            .add_rigid_body(presets::player_body(position.x, position.y));
        let collider = level
            .physics
            .add_collider(presets::player_collider(config.width, config.height), body);
        let entity = level.register(body, LevelEntity::Player);

        info!("Player spawned at ({:.2}, {:.2})", position.x, position.y);

        Ok(Self {
            body,
            collider,
            entity,
            state_machine: PlayerStateMachine::new(),
            animations: AnimationSet::adventurer(),
            direction: Direction::Right,
            facing: Direction::Right,
            body_state: BodyState::Flying,
            health: config.max_health,
            size: Vec2::new(config.width, config.height),
            speed: config.move_speed,
            map_width: level.width(),
            carried: CarriedObject::None,
            can_jump: true,
            on_ladder: false,
            inert: false,
            running: false,
            crouch_moving: false,
            intent: 0.0,
            game_over: None,
            config,
        })
    }

    /// Advance one fixed tick of `dt` seconds
    pub fn update(
        &mut self,
        level: &mut Level,
        input: &PlayerInput,
        contacts: &ContactTracker,
        audio: &mut dyn AudioSink,
        dt: f32,
    ) {
        self.state_machine.tick(dt);

        if self.health <= 0 {
            self.die(level, audio);
        }

        if self.state_machine.is_dead() {
            if self.body_state == BodyState::Landed {
                if let Some(body) = level.physics.get_rigid_body_mut(self.body) {
                    body.set_linvel(vector![0.0, 0.0], false);
                }
            }
            self.clamp_to_map(&mut level.physics);
            return;
        }

        self.intent = 0.0;

        self.follow_carried(level);
        self.handle_jump(level, input, audio);
        self.handle_rope_traversal(level, input);
        self.handle_crouch(level, input, audio);
        self.handle_climb(level, input);
        self.handle_grab(level, input, contacts, audio);
        self.handle_release(level, input, audio);
        self.handle_run(level, input, audio);
        self.apply_motion(&mut level.physics);
    }

    /// Copy ground and ladder contact from the tracker
    pub fn sync_contacts(&mut self, contacts: &ContactTracker) {
        self.set_body_state(contacts.body_state());
        self.on_ladder = contacts.on_ladder();
    }

    // ---- transitions ----

    fn set_state(&mut self, physics: &mut PhysicsWorld, state: PlayerState) {
        let previous = self.state_machine.state();
        if !self.state_machine.transition(state) {
            return;
        }
        debug!("Player state {} -> {}", previous.name(), state.name());

        // Attached states ignore gravity and pass through what they hold on to
        let attached = state.is_attached();
        if let Some(body) = physics.get_rigid_body_mut(self.body) {
            body.set_gravity_scale(if attached { 0.0 } else { 1.0 }, true);
        }
        if let Some(collider) = physics.get_collider_mut(self.collider) {
            collider.set_sensor(attached);
        }
    }

    fn die(&mut self, level: &mut Level, audio: &mut dyn AudioSink) {
        if self.state_machine.is_dead() {
            return;
        }

        for cue in [
            AudioCue::Run,
            AudioCue::Crouch,
            AudioCue::Jump,
            AudioCue::Fall,
            AudioCue::RopeGrab,
        ] {
            audio.stop(cue);
        }
        self.running = false;
        self.crouch_moving = false;

        if let CarriedObject::Box(id) = self.carried.take() {
            if let Some(push_box) = level.boxes.get(id.0) {
                push_box.put_down(&mut level.physics);
            }
        }

        let landed = self.body_state == BodyState::Landed;
        if let Some(body) = level.physics.get_rigid_body_mut(self.body) {
            let vertical = body.linvel().y;
            body.set_linvel(vector![0.0, vertical], true);
            if landed {
                body.set_enabled(false);
            }
        }

        self.set_state(&mut level.physics, PlayerState::Dead);
        self.game_over = Some(
            level
                .scheduler
                .schedule(self.config.game_over_delay, LevelEvent::GameOver),
        );

        info!("Player died, game over in {:.1}s", self.config.game_over_delay);
    }

    /// Drop a carried reference whose target no longer exists
    fn drop_stale_carry(&mut self, physics: &mut PhysicsWorld) {
        debug!("Carried {:?} is gone, letting go", self.carried);
        self.carried = CarriedObject::None;
        if self.state() == PlayerState::Hang {
            self.set_state(physics, PlayerState::Jump);
        }
    }

    /// The player follows a held rope, a held box follows the player
    fn follow_carried(&mut self, level: &mut Level) {
        match self.carried {
            CarriedObject::None => {}
            CarriedObject::Rope(segment) => {
                let held = level.rope(segment.rope).and_then(|rope| {
                    let (position, _) = rope.segment_pose(&level.physics, segment.index)?;
                    let velocity = rope.segment_velocity(&level.physics, segment.index)?;
                    Some((position, velocity, rope.part_size()))
                });
                let Some((position, velocity, part_size)) = held else {
                    self.drop_stale_carry(&mut level.physics);
                    return;
                };

                let pose = hang_pose(position, part_size, self.size, self.direction);
                if let Some(body) = level.physics.get_rigid_body_mut(self.body) {
                    body.set_position(Isometry::new(to_vector(pose), 0.0), true);
                    body.set_linvel(to_vector(velocity), true);
                }
            }
            CarriedObject::Box(id) => {
                let Some(player) = self.position(&level.physics) else {
                    return;
                };
                let Some(push_box) = level.boxes.get(id.0) else {
                    self.drop_stale_carry(&mut level.physics);
                    return;
                };

                let pose = push_box.carry_pose(
                    player,
                    self.size,
                    self.facing.sign(),
                    self.config.carry_clearance,
                );
                push_box.place(&mut level.physics, pose);
            }
        }
    }

    fn handle_jump(&mut self, level: &mut Level, input: &PlayerInput, audio: &mut dyn AudioSink) {
        if !input.just_pressed(Action::Jump)
            || !self.state().can_jump()
            || self.body_state != BodyState::Landed
            || !self.can_jump
        {
            return;
        }

        let Some(body) = level.physics.get_rigid_body_mut(self.body) else {
            return;
        };
        let impulse = body.mass() * self.config.jump_impulse;
        body.apply_impulse(vector![0.0, impulse], true);

        self.set_state(&mut level.physics, PlayerState::Jump);
        audio.play(AudioCue::Jump);
    }

    fn handle_rope_traversal(&mut self, level: &Level, input: &PlayerInput) {
        if self.state() != PlayerState::Hang {
            return;
        }
        let Some(segment) = self.carried.rope() else {
            return;
        };
        let Some(rope) = level.rope(segment.rope) else {
            return;
        };

        let mut target = segment;
        if input.just_pressed(Action::Jump) {
            target = rope.previous(target);
        }
        if input.just_pressed(Action::Crouch) {
            target = rope.next(target);
        }

        if target != segment {
            debug!("Moved along rope to segment {}", target.index);
            self.carried = CarriedObject::Rope(target);
        }
    }

    fn handle_crouch(&mut self, level: &mut Level, input: &PlayerInput, audio: &mut dyn AudioSink) {
        let state = self.state();

        if input.is_pressed(Action::Crouch)
            && self.body_state == BodyState::Landed
            && state.can_crouch()
        {
            self.set_state(&mut level.physics, PlayerState::Crouching);
            let crouched = self.size.y / 2.0;
            self.resize(&mut level.physics, crouched, -crouched / 2.0);
            self.speed *= self.config.crouch_speed_factor;

            if self.running {
                self.running = false;
                audio.stop(AudioCue::Run);
            }
            return;
        }

        if state == PlayerState::Crouching && !input.is_pressed(Action::Crouch) {
            if self.headroom_blocked(level) {
                return;
            }

            self.set_state(&mut level.physics, PlayerState::Stay);
            self.stand_up(&mut level.physics, audio);
        }
    }

    /// Undo the crouch resize with the feet kept in place
    fn stand_up(&mut self, physics: &mut PhysicsWorld, audio: &mut dyn AudioSink) {
        let lift = self.size.y / 2.0;
        let standing = self.size.y * 2.0;
        self.resize(physics, standing, lift);
        self.speed /= self.config.crouch_speed_factor;

        if self.crouch_moving {
            self.crouch_moving = false;
            audio.stop(AudioCue::Crouch);
        }
    }

    /// Whether ground geometry occupies the space standing up would need.
    /// Standing doubles the height with the feet kept in place.
    fn headroom_blocked(&self, level: &Level) -> bool {
        let Some(position) = self.position(&level.physics) else {
            return false;
        };
        let top = position.y + self.size.y / 2.0;
        let standing_top = top + self.size.y;

        let blocked =
            level
                .geometry
                .ground_overlaps_band(position.x, self.size.x / 2.0, top, standing_top);
        if blocked {
            debug!("Ceiling blocks standing up");
        }
        blocked
    }

    /// Change the collider height and move the body centre by `shift`
    fn resize(&mut self, physics: &mut PhysicsWorld, height: f32, shift: f32) {
        self.size.y = height;

        if let Some(body) = physics.get_rigid_body_mut(self.body) {
            let mut translation = *body.translation();
            translation.y += shift;
            body.set_position(Isometry::new(translation, 0.0), true);
        }
        if let Some(collider) = physics.get_collider_mut(self.collider) {
            collider.set_shape(presets::player_shape(self.size.x, self.size.y));
        }
    }

    fn handle_climb(&mut self, level: &mut Level, input: &PlayerInput) {
        let state = self.state();

        if state == PlayerState::Climb {
            if !self.on_ladder {
                self.set_state(&mut level.physics, PlayerState::Jump);
                return;
            }
            if self.body_state == BodyState::Landed && input.is_pressed(Action::Crouch) {
                self.set_state(&mut level.physics, PlayerState::Stay);
                return;
            }
        } else if self.on_ladder
            && input.is_pressed(Action::Jump)
            && !matches!(state, PlayerState::Hang | PlayerState::Crouching)
        {
            self.set_state(&mut level.physics, PlayerState::Climb);
        } else {
            return;
        }

        let climb = input.vertical() * self.config.climb_speed;
        if let Some(body) = level.physics.get_rigid_body_mut(self.body) {
            let horizontal = body.linvel().x;
            body.set_linvel(vector![horizontal, climb], true);
        }
    }

    fn handle_grab(
        &mut self,
        level: &mut Level,
        input: &PlayerInput,
        contacts: &ContactTracker,
        audio: &mut dyn AudioSink,
    ) {
        if !input.is_pressed(Action::Grab)
            || self.state() == PlayerState::Hang
            || !self.carried.is_none()
        {
            return;
        }

        match contacts.last_contact() {
            Some(Contact::RopeSegment(segment)) => self.grab_rope(level, segment, audio),
            Some(Contact::Crate(id)) => self.grab_box(level, id),
            None => {}
        }
    }

    fn grab_rope(&mut self, level: &mut Level, segment: SegmentRef, audio: &mut dyn AudioSink) {
        let pose = level
            .rope(segment.rope)
            .and_then(|rope| rope.segment_pose(&level.physics, segment.index));
        let Some((position, angle)) = pose else {
            debug!("Rope segment {:?} no longer exists", segment);
            return;
        };

        if self.state() == PlayerState::Crouching {
            // The snap below replaces the lift, no headroom needed
            self.stand_up(&mut level.physics, audio);
        }

        let Some(body) = level.physics.get_rigid_body_mut(self.body) else {
            return;
        };
        body.set_position(Isometry::new(to_vector(position), angle), true);

        self.carried = CarriedObject::Rope(segment);
        self.set_state(&mut level.physics, PlayerState::Hang);

        let turned = match self.direction {
            Direction::Left => Direction::Right,
            _ => Direction::Left,
        };
        self.set_direction(turned);
        audio.play(AudioCue::RopeGrab);
    }

    fn grab_box(&mut self, level: &mut Level, id: BoxId) {
        let Some(player) = self.position(&level.physics) else {
            return;
        };
        let Some(push_box) = level.boxes.get(id.0) else {
            debug!("Box {:?} no longer exists", id);
            return;
        };

        push_box.pick_up(&mut level.physics);
        // Flush against the player; the gap appears once it follows
        let pose = push_box.carry_pose(player, self.size, self.facing.sign(), 0.0);
        push_box.place(&mut level.physics, pose);
        self.carried = CarriedObject::Box(id);

        debug!("Picked up box {:?}", id);
    }

    fn handle_release(&mut self, level: &mut Level, input: &PlayerInput, audio: &mut dyn AudioSink) {
        if !input.just_released(Action::Grab) {
            return;
        }

        match self.carried.take() {
            CarriedObject::Rope(segment) => {
                let velocity = level
                    .rope(segment.rope)
                    .and_then(|rope| rope.segment_velocity(&level.physics, segment.index));
                if let (Some(velocity), Some(body)) =
                    (velocity, level.physics.get_rigid_body_mut(self.body))
                {
                    body.set_linvel(to_vector(velocity), true);
                }
                self.inert = true;
            }
            CarriedObject::Box(id) => {
                if let Some(push_box) = level.boxes.get(id.0) {
                    push_box.put_down(&mut level.physics);
                }
            }
            CarriedObject::None => {}
        }

        if self.state() == PlayerState::Hang {
            self.set_state(&mut level.physics, PlayerState::Jump);
            audio.stop(AudioCue::RopeGrab);
        }
    }

    fn handle_run(&mut self, level: &mut Level, input: &PlayerInput, audio: &mut dyn AudioSink) {
        let left = input.is_pressed(Action::MoveLeft);
        let right = input.is_pressed(Action::MoveRight);

        if !left && !right {
            if self.running {
                self.running = false;
                audio.stop(AudioCue::Run);
            }
            if self.crouch_moving {
                self.crouch_moving = false;
                audio.stop(AudioCue::Crouch);
            }
            if self.state() == PlayerState::Run {
                self.set_state(&mut level.physics, PlayerState::Stay);
            }
            return;
        }

        // Right is resolved last so it wins when both are held
        for (action, direction) in [
            (Action::MoveLeft, Direction::Left),
            (Action::MoveRight, Direction::Right),
        ] {
            if input.is_pressed(action) {
                self.move_towards(level, direction, input.just_pressed(action), audio);
            }
        }
    }

    fn move_towards(
        &mut self,
        level: &mut Level,
        direction: Direction,
        just_pressed: bool,
        audio: &mut dyn AudioSink,
    ) {
        let state = self.state();
        if state.can_run() {
            self.set_state(&mut level.physics, PlayerState::Run);
            if !self.running {
                self.running = true;
                audio.play_looped(AudioCue::Run);
            }
        } else if state == PlayerState::Crouching && !self.crouch_moving {
            self.crouch_moving = true;
            audio.play_looped(AudioCue::Crouch);
        }

        if just_pressed {
            if let Some(segment) = self.carried.rope() {
                self.swing(level, segment, direction);
            }
        }

        self.set_direction(direction);
        self.intent = direction.sign();
    }

    /// Push the held segment sideways, proportional to the player's mass
    fn swing(&self, level: &mut Level, segment: SegmentRef, direction: Direction) {
        let mass = level
            .physics
            .get_rigid_body(self.body)
            .map_or(0.0, |body| body.mass());
        let impulse = Vec2::new(direction.sign() * mass / self.config.swing_divisor, 0.0);
        if let Some(rope) = level.ropes.get(segment.rope.0) {
            rope.swing(&mut level.physics, segment, impulse);
        }
    }

    fn apply_motion(&mut self, physics: &mut PhysicsWorld) {
        if self.carried.rope().is_none() && !self.inert {
            if let Some(body) = physics.get_rigid_body_mut(self.body) {
                let vertical = body.linvel().y;
                body.set_linvel(vector![self.intent * self.speed, vertical], true);
            }
        }

        self.clamp_to_map(physics);
    }

    /// Keep the whole body inside `[0, map_width]` horizontally
    fn clamp_to_map(&self, physics: &mut PhysicsWorld) {
        let Some(body) = physics.get_rigid_body_mut(self.body) else {
            return;
        };

        let half_width = self.size.x / 2.0;
        let mut translation = *body.translation();
        let x = clamp(translation.x, half_width, self.map_width - half_width);
        if x != translation.x {
            translation.x = x;
            body.set_translation(translation, true);
        }
    }

    // ---- rendering ----

    /// Frame and placement to draw, `state_time` being the seconds spent in
    /// the current state
    pub fn render(&self, physics: &PhysicsWorld, state_time: f32) -> Option<RenderData> {
        let body = physics.get_rigid_body(self.body)?;
        let frame = *self.animations.frame(self.state(), state_time)?;
        let center = to_vec2(body.translation());

        Some(RenderData {
            frame,
            position: Vec2::new(
                to_pixels(center.x) - self.config.sprite_width / 2.0,
                to_pixels(center.y) - to_pixels(self.size.y) / 2.0,
            ),
            size: Vec2::new(self.config.sprite_width, self.config.sprite_height),
            rotation_degrees: body.rotation().angle().to_degrees(),
        })
    }

    // ---- accessors ----

    pub fn state(&self) -> PlayerState {
        self.state_machine.state()
    }

    /// Seconds spent in the current state
    pub fn state_time(&self) -> f32 {
        self.state_machine.state_time()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Face `direction`; turning between left and right mirrors every frame
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        if direction.is_horizontal() && direction != self.facing {
            self.animations.mirror();
            self.facing = direction;
        }
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    /// Set health, clamped to `[0, total_health]`; zero kills on the next update
    pub fn set_health(&mut self, health: i32) {
        self.health = health.clamp(0, self.config.max_health);
    }

    pub fn take_damage(&mut self, amount: i32, audio: &mut dyn AudioSink) {
        if self.state_machine.is_dead() || amount <= 0 {
            return;
        }
        self.set_health(self.health - amount);
        audio.play(AudioCue::Damage);
    }

    pub fn total_health(&self) -> i32 {
        self.config.max_health
    }

    pub fn body_state(&self) -> BodyState {
        self.body_state
    }

    /// Landing clears inertia and ends a jump
    pub fn set_body_state(&mut self, body_state: BodyState) {
        if body_state == BodyState::Landed && self.body_state == BodyState::Flying {
            self.inert = false;
            if self.state() == PlayerState::Jump {
                // Jump and Stay share the same body setup
                self.state_machine.transition(PlayerState::Stay);
            }
        }
        self.body_state = body_state;
    }

    pub fn carried(&self) -> CarriedObject {
        self.carried
    }

    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics
            .get_rigid_body(self.body)
            .map(|body| to_vec2(body.translation()))
    }

    pub fn set_position(&self, physics: &mut PhysicsWorld, position: Vec2) {
        if let Some(body) = physics.get_rigid_body_mut(self.body) {
            body.set_translation(to_vector(position), true);
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn map_width(&self) -> f32 {
        self.map_width
    }

    pub fn set_map_width(&mut self, width: f32) {
        self.map_width = width;
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    pub fn set_can_jump(&mut self, can_jump: bool) {
        self.can_jump = can_jump;
    }

    pub fn on_ladder(&self) -> bool {
        self.on_ladder
    }

    pub fn set_on_ladder(&mut self, on_ladder: bool) {
        self.on_ladder = on_ladder;
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }

    pub fn set_inert(&mut self, inert: bool) {
        self.inert = inert;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn body_handle(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider_handle(&self) -> ColliderHandle {
        self.collider
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// The pending game over, if the player died
    pub fn game_over_task(&self) -> Option<TaskId> {
        self.game_over
    }
}
