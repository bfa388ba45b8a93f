use crate::state::PieceGeometry;

pub fn are_partners(a: &PieceGeometry, b: &PieceGeometry, adjacency_factor: f32) -> bool {
    let threshold = a.horizontal_extent().max(b.horizontal_extent()) * adjacency_factor;
    a.reference_position.distance(b.reference_position) < threshold
}

pub fn resolve_partners(geometries: &[PieceGeometry], adjacency_factor: f32) -> Vec<Vec<usize>> {
    let total = geometries.len();
    let mut partners = vec![Vec::new(); total];
    for a in 0..total {
        for b in (a + 1)..total {
            if are_partners(&geometries[a], &geometries[b], adjacency_factor) {
                partners[a].push(b);
                partners[b].push(a);
            }
        }
    }
    partners
}

pub fn partner_pairs(partners: &[Vec<usize>]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (a, list) in partners.iter().enumerate() {
        for &b in list {
            if a < b {
                pairs.push((a, b));
            }
        }
    }
    pairs
}

pub fn is_symmetric(partners: &[Vec<usize>]) -> bool {
    partners.iter().enumerate().all(|(a, list)| {
        list.iter().all(|&b| {
            b != a
                && partners
                    .get(b)
                    .map(|other| other.contains(&a))
                    .unwrap_or(false)
        })
    })
}
