// Player state machine

/// Exactly one of these is active at any time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerState {
    /// Standing still
    #[default]
    Stay,
    /// Moving horizontally
    Run,
    /// Airborne after a jump or a release
    Jump,
    /// On a ladder
    Climb,
    /// Holding a rope segment
    Hang,
    /// Half height, half speed
    Crouching,
    /// Terminal
    Dead,
}

impl PlayerState {
    pub const ALL: [PlayerState; 7] = [
        Self::Stay,
        Self::Run,
        Self::Jump,
        Self::Climb,
        Self::Hang,
        Self::Crouching,
        Self::Dead,
    ];

    /// Dense index, stable across runs
    pub fn index(self) -> usize {
        match self {
            Self::Stay => 0,
            Self::Run => 1,
            Self::Jump => 2,
            Self::Climb => 3,
            Self::Hang => 4,
            Self::Crouching => 5,
            Self::Dead => 6,
        }
    }

    /// Attached to a ladder or rope: no gravity and a sensor collider
    pub fn is_attached(self) -> bool {
        matches!(self, Self::Climb | Self::Hang)
    }

    /// Whether a jump may start from this state
    pub fn can_jump(self) -> bool {
        !matches!(self, Self::Jump | Self::Crouching | Self::Climb | Self::Hang | Self::Dead)
    }

    /// Whether crouching may start from this state
    pub fn can_crouch(self) -> bool {
        !matches!(self, Self::Crouching | Self::Hang | Self::Climb | Self::Dead)
    }

    /// Whether horizontal input switches to running; on a ladder it only
    /// steers
    pub fn can_run(self) -> bool {
        !matches!(self, Self::Jump | Self::Crouching | Self::Climb | Self::Hang | Self::Dead)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Stay => "stay",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Climb => "climb",
            Self::Hang => "hang",
            Self::Crouching => "crouching",
            Self::Dead => "dead",
        }
    }
}

/// Facing; only `Left` and `Right` mirror the sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Left,
    Up,
    #[default]
    Right,
    Bottom,
}

impl Direction {
    /// -1 for left, 1 for right, 0 for the vertical markers
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
            Self::Up | Self::Bottom => 0.0,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Whether the body currently rests on something
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyState {
    Landed,
    #[default]
    Flying,
}

/// Tracks the active state and how long it has been active
#[derive(Debug)]
pub struct PlayerStateMachine {
    current_state: PlayerState,
    previous_state: PlayerState,
    state_time: f32,
}

impl Default for PlayerStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStateMachine {
    pub fn new() -> Self {
        Self {
            current_state: PlayerState::Stay,
            previous_state: PlayerState::Stay,
            state_time: 0.0,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.current_state
    }

    pub fn previous_state(&self) -> PlayerState {
        self.previous_state
    }

    /// Seconds spent in the current state
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    pub fn is_dead(&self) -> bool {
        self.current_state == PlayerState::Dead
    }

    /// Switch state, resetting the clock. Returns whether anything changed;
    /// nothing ever leaves `Dead`.
    pub fn transition(&mut self, new_state: PlayerState) -> bool {
        if self.current_state == new_state || self.is_dead() {
            return false;
        }

        self.previous_state = self.current_state;
        self.current_state = new_state;
        self.state_time = 0.0;
        true
    }

    /// Advance the state clock
    pub fn tick(&mut self, dt: f32) {
        self.state_time += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let sm = PlayerStateMachine::new();
        assert_eq!(sm.state(), PlayerState::Stay);
        assert_eq!(sm.state_time(), 0.0);
    }

    #[test]
    fn test_transition_resets_clock() {
        let mut sm = PlayerStateMachine::new();
        sm.tick(0.5);

        assert!(sm.transition(PlayerState::Run));
        assert_eq!(sm.state(), PlayerState::Run);
        assert_eq!(sm.previous_state(), PlayerState::Stay);
        assert_eq!(sm.state_time(), 0.0);
    }

    #[test]
    fn test_same_state_is_noop() {
        let mut sm = PlayerStateMachine::new();
        sm.tick(0.25);
        assert!(!sm.transition(PlayerState::Stay));
        assert_eq!(sm.state_time(), 0.25);
    }

    #[test]
    fn test_dead_is_terminal() {
        let mut sm = PlayerStateMachine::new();
        assert!(sm.transition(PlayerState::Dead));

        for state in PlayerState::ALL {
            assert!(!sm.transition(state));
            assert_eq!(sm.state(), PlayerState::Dead);
        }
    }

    #[test]
    fn test_indices_are_dense() {
        for (i, state) in PlayerState::ALL.iter().enumerate() {
            assert_eq!(state.index(), i);
        }
    }

    #[test]
    fn test_state_predicates() {
        assert!(PlayerState::Stay.can_jump());
        assert!(PlayerState::Run.can_jump());
        assert!(!PlayerState::Hang.can_jump());
        assert!(!PlayerState::Crouching.can_jump());

        assert!(PlayerState::Jump.can_crouch());
        assert!(!PlayerState::Climb.can_crouch());

        assert!(!PlayerState::Climb.can_run());
        assert!(!PlayerState::Jump.can_run());

        assert!(PlayerState::Hang.is_attached());
        assert!(!PlayerState::Dead.is_attached());
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Left.sign(), -1.0);
        assert_eq!(Direction::Right.sign(), 1.0);
        assert_eq!(Direction::Up.sign(), 0.0);
        assert!(!Direction::Bottom.is_horizontal());
    }
}
