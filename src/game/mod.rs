// Gameplay: the level, contact tracking and the player

pub mod contact;
pub mod level;
pub mod player;
