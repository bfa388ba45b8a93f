use glam::Vec3;
use rkyv::{Archive, Deserialize, Serialize};

use crate::progress::Progress;
use crate::state::PieceState;

pub const SESSION_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct PieceSnapshot {
    pub id: String,
    pub reference_position: [f32; 3],
    pub current_position: [f32; 3],
    pub display_position: [f32; 3],
    pub scale: f32,
    pub is_dragging: bool,
    pub is_connected: bool,
    pub just_connected: bool,
    pub partners: Vec<String>,
}

impl PieceSnapshot {
    pub fn from_piece(piece: &PieceState) -> Self {
        Self {
            id: piece.id.as_str().to_string(),
            reference_position: piece.reference_position.to_array(),
            current_position: piece.current_position.to_array(),
            display_position: piece.display_position.to_array(),
            scale: piece.scale,
            is_dragging: piece.is_dragging,
            is_connected: piece.is_connected,
            just_connected: piece.just_connected,
            partners: piece
                .partners
                .iter()
                .map(|partner| partner.as_str().to_string())
                .collect(),
        }
    }

    pub fn current_position(&self) -> Vec3 {
        Vec3::from_array(self.current_position)
    }

    pub fn display_position(&self) -> Vec3 {
        Vec3::from_array(self.display_position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub connected_count: u32,
    pub total_pieces: u32,
    pub completed: bool,
}

impl From<Progress> for ProgressSnapshot {
    fn from(progress: Progress) -> Self {
        Self {
            connected_count: u32::try_from(progress.connected_count).unwrap_or(u32::MAX),
            total_pieces: u32::try_from(progress.total_pieces).unwrap_or(u32::MAX),
            completed: progress.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub interaction_enabled: bool,
    pub pieces: Vec<PieceSnapshot>,
    pub progress: ProgressSnapshot,
}
