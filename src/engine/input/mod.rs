// Input handling system
//
// Keyboard events are mapped through remappable bindings into a `PlayerInput`
// snapshot that gameplay reads once per fixed tick.
//
// ## Architecture
//
// - `action`: game actions and default key bindings
// - `config`: binding configuration and remapping
// - `player`: held / just-pressed / just-released state for one tick
// - `manager`: feeds winit events into the snapshot
//
// ## Usage Example
//
// ```rust
// let mut input = InputManager::default();
//
// // In the event loop
// input.process_keyboard_event(&key_event);
//
// // Each fixed tick
// controller.update(&mut level, input.player(), &contacts, &mut audio, dt);
// input.update();
// ```

pub mod action;
pub mod config;
pub mod manager;
pub mod player;

pub use action::{Action, InputSource};
pub use config::InputConfig;
pub use manager::InputManager;
pub use player::PlayerInput;
