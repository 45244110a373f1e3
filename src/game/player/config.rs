// Player tuning

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("player size must be positive, got {width}x{height}")]
    InvalidSize { width: f32, height: f32 },
    #[error("max health must be positive, got {0}")]
    InvalidHealth(i32),
    #[error("{name} cannot be negative, got {value}")]
    NegativeSpeed { name: &'static str, value: f32 },
    #[error("crouch speed factor must be positive, got {0}")]
    InvalidCrouchFactor(f32),
    #[error("swing divisor must be positive, got {0}")]
    InvalidSwingDivisor(f32),
}

/// Movement, sizing and timing values for the player
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    // Movement
    /// Horizontal speed while standing (units/second)
    pub move_speed: f32,
    /// Jump impulse per unit of mass
    pub jump_impulse: f32,
    /// Rope swing impulse is body mass divided by this
    pub swing_divisor: f32,
    /// Speed multiplier applied while crouching
    pub crouch_speed_factor: f32,
    /// Vertical speed on ladders
    pub climb_speed: f32,

    // Health
    pub max_health: i32,

    // Dimensions (physics collider, world units)
    pub width: f32,
    pub height: f32,
    /// Gap kept between the player and a carried box
    pub carry_clearance: f32,

    // Presentation
    /// Sprite draw size in pixels
    pub sprite_width: f32,
    pub sprite_height: f32,

    /// Seconds between death and game over
    pub game_over_delay: f32,
}

pub const BASE_CONFIG: PlayerConfig = PlayerConfig {
    move_speed: 10.0,
    jump_impulse: 25.0,
    swing_divisor: 20.0,
    crouch_speed_factor: 0.5,
    climb_speed: 4.0,

    max_health: 3,

    width: 1.0,
    height: 2.0,
    // Two pixels at 32 px per unit
    carry_clearance: 0.0625,

    sprite_width: 100.0,
    sprite_height: 74.0,

    game_over_delay: 1.0,
};

impl Default for PlayerConfig {
    fn default() -> Self {
        BASE_CONFIG
    }
}

impl PlayerConfig {
    /// Reason the config cannot drive a player, if any
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.max_health <= 0 {
            return Err(ConfigError::InvalidHealth(self.max_health));
        }
        for (name, value) in [("move speed", self.move_speed), ("climb speed", self.climb_speed)] {
            if value < 0.0 {
                return Err(ConfigError::NegativeSpeed { name, value });
            }
        }
        if self.crouch_speed_factor <= 0.0 {
            return Err(ConfigError::InvalidCrouchFactor(self.crouch_speed_factor));
        }
        if self.swing_divisor <= 0.0 {
            return Err(ConfigError::InvalidSwingDivisor(self.swing_divisor));
        }
        Ok(())
    }
}
