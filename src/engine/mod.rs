// Engine modules: physics, input, timing, audio intents

pub mod audio;
pub mod game_loop;
pub mod input;
pub mod physics;
pub mod scheduler;
