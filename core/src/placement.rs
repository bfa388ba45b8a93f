use glam::Vec3;
use rand::Rng;
use tracing::warn;

use crate::config::ScatterArea;
use crate::game::PLACEMENT_MAX_ATTEMPTS;
use crate::grid::{fallback_slot, fallback_spacing, grid_columns};

const FALLBACK_SLOTS_PER_PIECE: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub positions: Vec<Vec3>,
    pub fallback_count: usize,
    /// Fallback pieces for which no clear slot was found. These may overlap.
    pub unresolved_count: usize,
}

pub fn is_clear(accepted: &[Vec3], candidate: Vec3, min_separation: f32) -> bool {
    accepted
        .iter()
        .all(|position| position.distance(candidate) >= min_separation)
}

pub fn generate_positions<R: Rng + ?Sized>(
    count: usize,
    min_separation: f32,
    area: ScatterArea,
    rng: &mut R,
) -> Placement {
    let min_separation = if min_separation.is_finite() {
        min_separation.max(0.0)
    } else {
        0.0
    };
    let columns = grid_columns(count);
    let center = area.center();
    let spacing = fallback_spacing(min_separation, center);
    let mut positions: Vec<Vec3> = Vec::with_capacity(count);
    let mut fallback_count = 0;
    let mut unresolved_count = 0;
    for index in 0..count {
        let mut accepted = None;
        for _ in 0..PLACEMENT_MAX_ATTEMPTS {
            let candidate = area.sample(rng);
            if is_clear(&positions, candidate, min_separation) {
                accepted = Some(candidate);
                break;
            }
        }
        let position = match accepted {
            Some(position) => position,
            None => {
                fallback_count += 1;
                // An open disk of radius `min_separation` covers at most four slots, so a free
                // slot exists within this window.
                let window = index + FALLBACK_SLOTS_PER_PIECE * count + columns;
                match (index..=window)
                    .map(|slot| fallback_slot(slot, columns, spacing, center))
                    .find(|candidate| is_clear(&positions, *candidate, min_separation))
                {
                    Some(candidate) => candidate,
                    None => {
                        unresolved_count += 1;
                        warn!(index, min_separation, "no clear grid slot for piece");
                        fallback_slot(index, columns, spacing, center)
                    }
                }
            }
        };
        positions.push(position);
    }
    if fallback_count > 0 {
        warn!(
            count,
            fallback_count,
            min_separation,
            "scatter fell back to grid placement"
        );
    }
    Placement {
        positions,
        fallback_count,
        unresolved_count,
    }
}
