use crate::game::{
    frame_lerp_factor, lerp, POSITION_LERP_PER_FRAME, SCALE_CONNECTED, SCALE_DRAGGING,
    SCALE_JUST_CONNECTED, SCALE_LERP_PER_FRAME, SCALE_NEAR, SCALE_REST,
};
use crate::state::PieceState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Highlight {
    JustConnected,
    Connected,
    Near,
    Dragging,
    None,
}

pub fn highlight_for(piece: &PieceState, near: bool) -> Highlight {
    if piece.is_connected {
        if piece.just_connected {
            Highlight::JustConnected
        } else {
            Highlight::Connected
        }
    } else if near {
        Highlight::Near
    } else if piece.is_dragging {
        Highlight::Dragging
    } else {
        Highlight::None
    }
}

pub fn target_scale(piece: &PieceState, near: bool) -> f32 {
    if piece.is_dragging {
        SCALE_DRAGGING
    } else if piece.just_connected {
        SCALE_JUST_CONNECTED
    } else if piece.is_connected {
        SCALE_CONNECTED
    } else if near {
        SCALE_NEAR
    } else {
        SCALE_REST
    }
}

pub fn step(pieces: &mut [PieceState], near: &[bool], dt: f32) {
    let position_t = frame_lerp_factor(POSITION_LERP_PER_FRAME, dt);
    let scale_t = frame_lerp_factor(SCALE_LERP_PER_FRAME, dt);
    for (index, piece) in pieces.iter_mut().enumerate() {
        let near = near.get(index).copied().unwrap_or(false);
        if piece.is_dragging {
            piece.display_position = piece.current_position;
        } else {
            piece.display_position = piece
                .display_position
                .lerp(piece.current_position, position_t);
        }
        let target = target_scale(piece, near);
        piece.scale = lerp(piece.scale, target, scale_t);
    }
}
