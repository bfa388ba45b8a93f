use std::fmt;

use crate::state::PieceState;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub connected_count: usize,
    pub total_pieces: usize,
    pub completed: bool,
}

impl Progress {
    pub fn from_pieces(pieces: &[PieceState]) -> Self {
        let connected_count = pieces.iter().filter(|piece| piece.is_connected).count();
        let total_pieces = pieces.len();
        Self {
            connected_count,
            total_pieces,
            completed: is_complete(connected_count, total_pieces),
        }
    }

    pub fn remaining(&self) -> usize {
        self.total_pieces.saturating_sub(self.connected_count)
    }

    pub fn percent(&self) -> f32 {
        if self.total_pieces == 0 {
            return 0.0;
        }
        self.connected_count as f32 * 100.0 / self.total_pieces as f32
    }
}

/// An empty puzzle is never complete.
pub fn is_complete(connected_count: usize, total_pieces: usize) -> bool {
    total_pieces > 0 && connected_count == total_pieces
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} connected ({:.0}%)",
            self.connected_count,
            self.total_pieces,
            self.percent()
        )?;
        if self.completed {
            write!(f, ", complete")?;
        }
        Ok(())
    }
}
