// Per-tick input snapshot for the player

use super::action::Action;
use std::collections::HashSet;

/// Key state for one simulation tick
///
/// `pressed` is the held-state table; the `just_*` sets hold the edges seen
/// since the last `update`.
#[derive(Debug, Default, Clone)]
pub struct PlayerInput {
    /// Actions that are currently held
    pressed: HashSet<Action>,

    /// Actions that went down this tick
    just_pressed: HashSet<Action>,

    /// Actions that went up this tick
    just_released: HashSet<Action>,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held down
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this tick
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this tick
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Register an action press (key repeats are ignored)
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Start a new tick: edges are forgotten, held keys stay held
    pub fn update(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Release everything, e.g. when the window loses focus
    pub fn reset(&mut self) {
        for action in self.pressed.drain() {
            self.just_released.insert(action);
        }
        self.just_pressed.clear();
    }

    /// Vertical intent: +1 up, -1 down, 0 for neither or both
    pub fn vertical(&self) -> f32 {
        let mut vertical = 0.0;
        if self.is_pressed(Action::Jump) {
            vertical += 1.0;
        }
        if self.is_pressed(Action::Crouch) {
            vertical -= 1.0;
        }
        vertical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        assert!(input.is_pressed(Action::Jump));
        assert!(input.just_pressed(Action::Jump));
    }

    #[test]
    fn test_release_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Grab);
        input.update();
        input.release(Action::Grab);
        assert!(!input.is_pressed(Action::Grab));
        assert!(input.just_released(Action::Grab));
    }

    #[test]
    fn test_release_unpressed_action() {
        let mut input = PlayerInput::new();
        input.release(Action::Grab);
        assert!(!input.just_released(Action::Grab));
    }

    #[test]
    fn test_just_pressed_cleared_on_update() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.update();
        assert!(input.is_pressed(Action::Jump));
        assert!(!input.just_pressed(Action::Jump));
    }

    #[test]
    fn test_repeat_press_is_not_an_edge() {
        let mut input = PlayerInput::new();
        input.press(Action::MoveLeft);
        input.update();
        input.press(Action::MoveLeft);
        assert!(!input.just_pressed(Action::MoveLeft));
    }

    #[test]
    fn test_reset_reports_releases() {
        let mut input = PlayerInput::new();
        input.press(Action::Grab);
        input.update();
        input.reset();
        assert!(!input.is_pressed(Action::Grab));
        assert!(input.just_released(Action::Grab));
    }

    #[test]
    fn test_vertical() {
        let mut input = PlayerInput::new();
        assert_eq!(input.vertical(), 0.0);
        input.press(Action::Crouch);
        assert_eq!(input.vertical(), -1.0);
        input.press(Action::Jump);
        assert_eq!(input.vertical(), 0.0);
    }
}
