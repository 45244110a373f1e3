// Key binding configuration and remapping

use super::action::{default_bindings, global_bindings, Action, InputSource};
use std::collections::HashMap;

/// Maps input sources (keys) to game actions, several sources per action allowed
#[derive(Debug, Clone, Default)]
pub struct InputConfig {
    bindings: HashMap<InputSource, Action>,
}

impl InputConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration from a list of bindings
    pub fn from_bindings(bindings: impl IntoIterator<Item = (InputSource, Action)>) -> Self {
        let mut config = Self::new();
        for (source, action) in bindings {
            config.bind(source, action);
        }
        config
    }

    /// Default gameplay bindings plus the global ones
    pub fn with_defaults() -> Self {
        Self::from_bindings(default_bindings().into_iter().chain(global_bindings()))
    }

    /// Bind an input source to an action, replacing whatever it did before
    pub fn bind(&mut self, source: InputSource, action: Action) {
        if let Some(previous) = self.bindings.insert(source, action) {
            if previous != action {
                log::debug!("Rebound {:?}: {:?} -> {:?}", source, previous, action);
            }
        }
    }

    /// Get the action bound to an input source
    pub fn get_action(&self, source: InputSource) -> Option<Action> {
        self.bindings.get(&source).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_bind_action() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyQ);
        config.bind(source, Action::Grab);

        assert_eq!(config.get_action(source), Some(Action::Grab));
    }

    #[test]
    fn test_defaults_bind_arrows_and_wasd() {
        let config = InputConfig::with_defaults();

        for key in [KeyCode::ArrowUp, KeyCode::KeyW] {
            assert_eq!(config.get_action(InputSource::key(key)), Some(Action::Jump));
        }
        assert_eq!(
            config.get_action(InputSource::key(KeyCode::Escape)),
            Some(Action::Menu)
        );
    }

    #[test]
    fn test_rebind_source() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyA);

        config.bind(source, Action::MoveLeft);
        config.bind(source, Action::MoveRight);

        assert_eq!(config.get_action(source), Some(Action::MoveRight));
        // Other keys keep their own bindings
        config.bind(InputSource::key(KeyCode::ArrowLeft), Action::MoveLeft);
        assert_eq!(
            config.get_action(InputSource::key(KeyCode::ArrowLeft)),
            Some(Action::MoveLeft)
        );
    }
}
