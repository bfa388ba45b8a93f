use glam::Vec2;

use crate::gesture::Camera;
use crate::progress::Progress;
use crate::state::PieceId;

#[derive(Clone, Debug)]
pub enum SessionAction {
    DragStart {
        piece_id: PieceId,
    },
    DragMove {
        piece_id: PieceId,
        ndc: Vec2,
        camera: Camera,
    },
    DragEnd {
        piece_id: PieceId,
    },
    Tick {
        dt: f32,
    },
    EnableInteraction,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Snapped { pieces: Vec<PieceId> },
    Progress(Progress),
    Completed,
}
