// What the player is holding on to

use glam::Vec2;

use super::state::Direction;
use crate::game::level::{BoxId, SegmentRef};

/// At most one object is attached to the player; the player never owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarriedObject {
    #[default]
    None,
    Rope(SegmentRef),
    Box(BoxId),
}

impl CarriedObject {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn rope(&self) -> Option<SegmentRef> {
        match self {
            Self::Rope(segment) => Some(*segment),
            _ => None,
        }
    }

    /// Detach, returning what was held
    pub fn take(&mut self) -> CarriedObject {
        std::mem::take(self)
    }
}

/// Player centre while hanging from a segment centred at `segment`.
///
/// The player is shifted half a body width towards the side it faces and
/// hangs below the segment's lower end.
pub fn hang_pose(segment: Vec2, part_size: Vec2, player_size: Vec2, facing: Direction) -> Vec2 {
    let side = -facing.sign();
    Vec2::new(
        segment.x - side * player_size.x / 2.0,
        segment.y - part_size.y / 2.0 - player_size.y / 2.0,
    )
}
