use std::fmt;

use glam::Vec3;

use crate::game::SCALE_REST;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(String);

impl PieceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PieceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PieceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieceGeometry {
    pub id: PieceId,
    pub reference_position: Vec3,
    pub size: Vec3,
}

impl PieceGeometry {
    pub fn new(id: impl Into<PieceId>, reference_position: Vec3, size: Vec3) -> Self {
        Self {
            id: id.into(),
            reference_position,
            size,
        }
    }

    pub fn horizontal_extent(&self) -> f32 {
        self.size.x.abs().max(self.size.z.abs())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieceState {
    pub id: PieceId,
    pub reference_position: Vec3,
    pub current_position: Vec3,
    pub display_position: Vec3,
    pub scale: f32,
    pub size: Vec3,
    pub is_dragging: bool,
    pub is_connected: bool,
    pub just_connected: bool,
    pub partners: Vec<PieceId>,
}

impl PieceState {
    pub fn scattered(geometry: &PieceGeometry, position: Vec3, partners: Vec<PieceId>) -> Self {
        Self {
            id: geometry.id.clone(),
            reference_position: geometry.reference_position,
            current_position: position,
            display_position: position,
            scale: SCALE_REST,
            size: geometry.size,
            is_dragging: false,
            is_connected: false,
            just_connected: false,
            partners,
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.current_position == self.reference_position
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiecePhase {
    Scattered,
    Dragging,
    Near,
    Connected,
}
