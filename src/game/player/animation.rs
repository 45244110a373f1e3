// Player animation frames
//
// Each player state owns one clip of sprite sheet regions. Turning around
// mirrors every region of every clip at once, so the clip chosen after a
// state change is already facing the right way.

use super::state::PlayerState;

/// Size of one cell of the adventurer sheet, in pixels
pub const FRAME_WIDTH: u32 = 50;
pub const FRAME_HEIGHT: u32 = 37;

/// Full adventurer sheet size, in pixels
pub const SHEET_WIDTH: u32 = 350;
pub const SHEET_HEIGHT: u32 = 592;

/// A rectangle of the sprite sheet, optionally mirrored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub flip_x: bool,
}

impl FrameRegion {
    /// A standard sized cell at pixel offset `(x, y)`
    pub const fn cell(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            flip_x: false,
        }
    }

    pub fn flip(&mut self) {
        self.flip_x = !self.flip_x;
    }

    /// Texture coordinates `(u_min, v_min, u_max, v_max)`, with u swapped
    /// when mirrored
    pub fn uvs(&self, sheet_width: u32, sheet_height: u32) -> (f32, f32, f32, f32) {
        let sw = sheet_width as f32;
        let sh = sheet_height as f32;
        let left = self.x as f32 / sw;
        let right = (self.x + self.width) as f32 / sw;
        let top = self.y as f32 / sh;
        let bottom = (self.y + self.height) as f32 / sh;

        if self.flip_x {
            (right, top, left, bottom)
        } else {
            (left, top, right, bottom)
        }
    }
}

/// Frames of one state
#[derive(Debug, Clone)]
pub struct AnimationClip {
    /// Seconds each frame is shown
    pub frame_duration: f32,
    pub looping: bool,
    pub frames: Vec<FrameRegion>,
}

impl AnimationClip {
    pub fn new(frame_duration: f32, looping: bool, frames: Vec<FrameRegion>) -> Self {
        Self {
            frame_duration,
            looping,
            frames,
        }
    }

    /// Length of one cycle
    pub fn total_duration(&self) -> f32 {
        self.frames.len() as f32 * self.frame_duration
    }

    /// Frame index after `elapsed` seconds; wraps when looping, otherwise
    /// holds the last frame
    pub fn frame_index(&self, elapsed: f32) -> usize {
        let count = self.frames.len();
        if count == 0 || self.frame_duration <= 0.0 {
            return 0;
        }

        let index = (elapsed.max(0.0) / self.frame_duration) as usize;
        if self.looping {
            index % count
        } else {
            index.min(count - 1)
        }
    }

    pub fn frame(&self, elapsed: f32) -> Option<&FrameRegion> {
        self.frames.get(self.frame_index(elapsed))
    }

    pub fn is_finished(&self, elapsed: f32) -> bool {
        !self.looping && elapsed >= self.total_duration()
    }

    fn flip(&mut self) {
        for frame in &mut self.frames {
            frame.flip();
        }
    }
}

/// One clip per player state
#[derive(Debug, Clone)]
pub struct AnimationSet {
    clips: [AnimationClip; 7],
}

impl AnimationSet {
    /// Build a set by asking for the clip of every state
    pub fn from_fn(mut clip_for: impl FnMut(PlayerState) -> AnimationClip) -> Self {
        Self {
            clips: PlayerState::ALL.map(&mut clip_for),
        }
    }

    /// The adventurer sprite sheet, facing right
    pub fn adventurer() -> Self {
        let mut set = Self::from_fn(|state| {
            let frames = match state {
                PlayerState::Stay => vec![
                    FrameRegion::cell(0, 0),
                    FrameRegion::cell(50, 0),
                    FrameRegion::cell(100, 0),
                    FrameRegion::cell(150, 0),
                ],
                PlayerState::Run => vec![
                    FrameRegion::cell(50, 37),
                    FrameRegion::cell(100, 37),
                    FrameRegion::cell(150, 37),
                    FrameRegion::cell(200, 37),
                    FrameRegion::cell(250, 37),
                    FrameRegion::cell(300, 37),
                ],
                PlayerState::Jump => vec![
                    FrameRegion::cell(0, 74),
                    FrameRegion::cell(50, 74),
                    FrameRegion::cell(100, 74),
                    FrameRegion::cell(150, 74),
                    FrameRegion::cell(200, 74),
                    FrameRegion::cell(250, 74),
                    FrameRegion::cell(300, 74),
                    FrameRegion::cell(0, 111),
                ],
                PlayerState::Crouching => vec![
                    FrameRegion::cell(200, 0),
                    FrameRegion::cell(250, 0),
                    FrameRegion::cell(300, 0),
                    FrameRegion::cell(0, 37),
                ],
                PlayerState::Hang => vec![
                    FrameRegion::cell(50, 148),
                    FrameRegion::cell(100, 148),
                    FrameRegion::cell(150, 148),
                    FrameRegion::cell(200, 148),
                ],
                PlayerState::Dead => vec![
                    FrameRegion::cell(150, 111),
                    FrameRegion::cell(200, 111),
                    FrameRegion::cell(250, 111),
                    FrameRegion::cell(300, 111),
                ],
                PlayerState::Climb => vec![
                    FrameRegion::cell(200, 407),
                    FrameRegion::cell(250, 407),
                    FrameRegion::cell(300, 407),
                    FrameRegion::cell(0, 444),
                ],
            };
            AnimationClip::new(0.1, true, frames)
        });

        // The hang frames are drawn facing away from the rope
        set.clips[PlayerState::Hang.index()].flip();
        set
    }

    pub fn clip(&self, state: PlayerState) -> &AnimationClip {
        &self.clips[state.index()]
    }

    /// Frame to draw for `state` after `elapsed` seconds in it
    pub fn frame(&self, state: PlayerState, elapsed: f32) -> Option<&FrameRegion> {
        self.clip(state).frame(elapsed)
    }

    /// Flip every frame of every clip
    pub fn mirror(&mut self) {
        for clip in &mut self.clips {
            clip.flip();
        }
    }
}

impl Default for AnimationSet {
    fn default() -> Self {
        Self::adventurer()
    }
}
