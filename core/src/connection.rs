use crate::state::PieceState;

/// Snapping uses a strict comparison: a drop exactly at the threshold stays loose.
pub fn within_snap(distance: f32, snap_threshold: f32) -> bool {
    distance < snap_threshold
}

pub fn is_near(
    pieces: &[PieceState],
    partners: &[Vec<usize>],
    index: usize,
    near_threshold: f32,
) -> bool {
    let Some(piece) = pieces.get(index) else {
        return false;
    };
    if piece.is_connected {
        return false;
    }
    partners
        .get(index)
        .map(|list| {
            list.iter().any(|&partner| {
                pieces
                    .get(partner)
                    .map(|other| {
                        piece.current_position.distance(other.current_position) < near_threshold
                    })
                    .unwrap_or(false)
            })
        })
        .unwrap_or(false)
}

pub fn near_flags(
    pieces: &[PieceState],
    partners: &[Vec<usize>],
    near_threshold: f32,
) -> Vec<bool> {
    (0..pieces.len())
        .map(|index| is_near(pieces, partners, index, near_threshold))
        .collect()
}

/// The drop position and the released piece's prior status are captured before the loop, so
/// pinning it mid-loop does not change what later partners are measured against.
pub fn evaluate_release(
    pieces: &mut [PieceState],
    partners: &[Vec<usize>],
    released: usize,
    snap_threshold: f32,
) -> Vec<usize> {
    let Some(piece) = pieces.get(released) else {
        return Vec::new();
    };
    let drop_position = piece.current_position;
    let was_connected = piece.is_connected;
    let Some(list) = partners.get(released) else {
        return Vec::new();
    };
    let mut touched = Vec::new();
    for &partner in list {
        let Some(other) = pieces.get(partner) else {
            continue;
        };
        let distance = drop_position.distance(other.current_position);
        if !within_snap(distance, snap_threshold) {
            continue;
        }
        if was_connected && other.is_connected {
            continue;
        }
        for index in [released, partner] {
            let piece = &mut pieces[index];
            piece.is_connected = true;
            piece.just_connected = true;
            piece.current_position = piece.reference_position;
            if !touched.contains(&index) {
                touched.push(index);
            }
        }
    }
    touched
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HighlightTimer {
    remaining_ms: Option<f32>,
}

impl HighlightTimer {
    pub fn arm(&mut self, duration_ms: u32) {
        self.remaining_ms = Some(duration_ms as f32);
    }

    pub fn disarm(&mut self) {
        self.remaining_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining_ms.is_some()
    }

    pub fn advance(&mut self, dt_ms: f32) -> bool {
        let Some(remaining) = self.remaining_ms else {
            return false;
        };
        let next = remaining - dt_ms.max(0.0);
        if next <= 0.0 {
            self.remaining_ms = None;
            true
        } else {
            self.remaining_ms = Some(next);
            false
        }
    }
}

pub fn clear_just_connected(pieces: &mut [PieceState]) {
    for piece in pieces {
        piece.just_connected = false;
    }
}
