use glam::{Vec2, Vec3};

use crate::game::ground_point;
use crate::state::{PieceGeometry, PieceId};

pub fn grid_columns(count: usize) -> usize {
    ((count as f64).sqrt().ceil() as usize).max(1)
}

/// Keeps neighbouring slots distinct f32 values far from the origin.
pub fn fallback_spacing(min_separation: f32, center: Vec2) -> f32 {
    let magnitude = center.abs().max_element().max(1.0);
    min_separation.max(4.0 * magnitude * f32::EPSILON)
}

pub fn fallback_slot(slot: usize, columns: usize, spacing: f32, center: Vec2) -> Vec3 {
    let columns = columns.max(1);
    let col = (slot % columns) as f32;
    let row = (slot / columns) as f32;
    let half = columns as f32 / 2.0;
    ground_point(
        center.x + (col - half) * spacing,
        center.y + (row - half) * spacing,
    )
}

pub fn grid_piece_id(row: u32, col: u32) -> PieceId {
    PieceId::new(format!("piece-{row}-{col}"))
}

pub fn reference_grid(cols: u32, rows: u32, spacing: f32, piece_size: Vec3) -> Vec<PieceGeometry> {
    let mut pieces = Vec::with_capacity((cols as usize) * (rows as usize));
    let offset_x = (cols.saturating_sub(1)) as f32 * 0.5;
    let offset_z = (rows.saturating_sub(1)) as f32 * 0.5;
    for row in 0..rows {
        for col in 0..cols {
            let position = ground_point(
                (col as f32 - offset_x) * spacing,
                (row as f32 - offset_z) * spacing,
            );
            pieces.push(PieceGeometry::new(grid_piece_id(row, col), position, piece_size));
        }
    }
    pieces
}

pub fn staggered_grid(cols: u32, rows: u32, piece_size: Vec3) -> Vec<PieceGeometry> {
    let mut pieces = Vec::with_capacity((cols as usize) * (rows as usize));
    let width = piece_size.x.abs();
    let depth = piece_size.z.abs();
    let offset_x = (cols.saturating_sub(1)) as f32 * 0.5 * width;
    let offset_z = (rows.saturating_sub(1)) as f32 * 0.5 * depth;
    for row in 0..rows {
        let shift = if row % 2 == 1 { width * 0.5 } else { 0.0 };
        for col in 0..cols {
            let position = ground_point(
                col as f32 * width + shift - offset_x,
                row as f32 * depth - offset_z,
            );
            pieces.push(PieceGeometry::new(grid_piece_id(row, col), position, piece_size));
        }
    }
    pieces
}
