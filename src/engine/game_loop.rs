/// Fixed timestep accumulator
///
/// The controller, the physics world and the scheduler all advance in
/// `FIXED_TIMESTEP` slices; rendering happens once per frame afterwards and
/// may use `alpha` to interpolate.
use std::time::Duration;

/// Target simulation rate (60 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667);

/// Maximum number of ticks per frame to prevent spiral of death
pub const MAX_STEPS_PER_FRAME: u32 = 5;

/// Game loop timing state
#[derive(Debug)]
pub struct GameLoop {
    /// Time not yet consumed by a fixed tick
    accumulator: Duration,

    /// Whether the simulation is paused
    paused: bool,

    /// Total ticks executed
    update_count: u64,

    /// Wall-clock time of the last frame, in seconds
    render_delta_time: f32,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            paused: false,
            update_count: 0,
            render_delta_time: 0.0,
        }
    }

    /// Feed the wall-clock time of the last frame, returns how many fixed
    /// ticks to run now
    pub fn begin_frame(&mut self, frame_time: Duration) -> u32 {
        self.render_delta_time = frame_time.as_secs_f32();

        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            steps += 1;
        }

        // Whatever could not be simulated is dropped rather than carried over
        if steps == MAX_STEPS_PER_FRAME {
            self.accumulator = self.accumulator.min(FIXED_TIMESTEP_DURATION);
        }

        self.update_count += steps as u64;
        steps
    }

    /// Get the fixed timestep (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Seconds since the previous frame
    pub fn render_delta_time(&self) -> f32 {
        self.render_delta_time
    }

    /// Interpolation factor between the last two ticks, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        (self.accumulator.as_secs_f32() / FIXED_TIMESTEP).min(1.0)
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if self.paused {
            log::info!("Game paused");
        } else {
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Game resumed");
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
