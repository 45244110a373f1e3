// Input manager - turns window events into the per-tick snapshot

use super::action::{Action, InputSource};
use super::config::InputConfig;
use super::player::PlayerInput;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Routes keyboard events through the bindings into `PlayerInput`
#[derive(Debug)]
pub struct InputManager {
    config: InputConfig,
    player: PlayerInput,
}

impl InputManager {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            player: PlayerInput::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            let pressed = event.state == ElementState::Pressed;
            // Auto-repeat is not a new press
            if pressed && event.repeat {
                return;
            }
            self.process_key(key_code, pressed);
        }
    }

    /// Apply a key state change
    pub fn process_key(&mut self, key_code: KeyCode, pressed: bool) {
        let Some(action) = self.config.get_action(InputSource::key(key_code)) else {
            return;
        };

        if pressed {
            self.player.press(action);
        } else {
            self.player.release(action);
        }
    }

    /// Start a new tick; call after the controller consumed the snapshot
    pub fn update(&mut self) {
        self.player.update();
    }

    /// The snapshot for this tick
    pub fn player(&self) -> &PlayerInput {
        &self.player
    }

    pub fn config_mut(&mut self) -> &mut InputConfig {
        &mut self.config
    }

    pub fn menu_requested(&self) -> bool {
        self.player.just_pressed(Action::Menu)
    }

    /// Drop all held keys (focus lost)
    pub fn reset(&mut self) {
        self.player.reset();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(InputConfig::with_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_key_reaches_snapshot() {
        let mut manager = InputManager::default();
        manager.process_key(KeyCode::ShiftLeft, true);

        assert!(manager.player().is_pressed(Action::Grab));
        assert!(manager.player().just_pressed(Action::Grab));
    }

    #[test]
    fn test_unbound_key_ignored() {
        let mut manager = InputManager::default();
        manager.process_key(KeyCode::KeyZ, true);
        assert!(!manager.player().is_pressed(Action::Grab));
        assert!(!manager.player().is_pressed(Action::Jump));
    }

    #[test]
    fn test_release_edge_survives_until_update() {
        let mut manager = InputManager::default();
        manager.process_key(KeyCode::ArrowDown, true);
        manager.update();
        manager.process_key(KeyCode::ArrowDown, false);

        assert!(manager.player().just_released(Action::Crouch));
        manager.update();
        assert!(!manager.player().just_released(Action::Crouch));
    }

    #[test]
    fn test_rebinding_takes_effect() {
        let mut manager = InputManager::default();
        manager
            .config_mut()
            .bind(InputSource::key(KeyCode::Space), Action::Jump);
        manager.process_key(KeyCode::Space, true);
        assert!(manager.player().just_pressed(Action::Jump));
    }

    #[test]
    fn test_menu_request() {
        let mut manager = InputManager::default();
        manager.process_key(KeyCode::Escape, true);
        assert!(manager.menu_requested());
    }
}
