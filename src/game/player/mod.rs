// Player character
//
// - `state`: player states, facing and ground state
// - `config`: movement and sizing values
// - `animation`: sprite sheet clips per state
// - `carry`: what the player holds on to
// - `controller`: the per-tick state machine driving the body

pub mod animation;
pub mod carry;
pub mod config;
pub mod controller;
pub mod state;

pub use animation::{AnimationClip, AnimationSet, FrameRegion};
pub use carry::CarriedObject;
pub use config::{PlayerConfig, BASE_CONFIG};
pub use controller::{ControllerError, PlayerController, RenderData};
pub use state::{BodyState, Direction, PlayerState, PlayerStateMachine};
