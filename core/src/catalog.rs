use glam::Vec3;

use crate::config::SessionOptions;
use crate::grid::{reference_grid, staggered_grid};
use crate::layout::PuzzleLayout;
use crate::state::PieceGeometry;

#[derive(Clone, Copy, Debug)]
pub struct LayoutCatalogEntry {
    pub label: &'static str,
    pub slug: &'static str,
    pub build: fn() -> Vec<PieceGeometry>,
}

impl LayoutCatalogEntry {
    pub fn geometries(&self) -> Vec<PieceGeometry> {
        (self.build)()
    }

    pub fn layout(&self) -> PuzzleLayout {
        PuzzleLayout::from_geometries(self.slug, SessionOptions::default(), &self.geometries())
    }
}

const TILE: Vec3 = Vec3::new(1.0, 0.1, 1.0);
const BRICK: Vec3 = Vec3::new(2.0, 0.1, 1.0);

fn pair() -> Vec<PieceGeometry> {
    vec![
        PieceGeometry::new("left", Vec3::new(-0.5, 0.0, 0.0), TILE),
        PieceGeometry::new("right", Vec3::new(0.5, 0.0, 0.0), TILE),
    ]
}

fn three_by_three() -> Vec<PieceGeometry> {
    reference_grid(3, 3, 1.0, TILE)
}

fn strip_of_five() -> Vec<PieceGeometry> {
    reference_grid(5, 1, 1.0, TILE)
}

fn staggered() -> Vec<PieceGeometry> {
    staggered_grid(3, 3, BRICK)
}

pub const DEFAULT_LAYOUT_SLUG: &str = "three-by-three";

pub const LAYOUT_CATALOG: &[LayoutCatalogEntry] = &[
    LayoutCatalogEntry {
        label: "Pair",
        slug: "pair",
        build: pair,
    },
    LayoutCatalogEntry {
        label: "Three by three",
        slug: DEFAULT_LAYOUT_SLUG,
        build: three_by_three,
    },
    LayoutCatalogEntry {
        label: "Strip of five",
        slug: "strip-of-five",
        build: strip_of_five,
    },
    LayoutCatalogEntry {
        label: "Staggered bricks",
        slug: "staggered",
        build: staggered,
    },
];

pub fn layout_by_slug(slug: &str) -> Option<&'static LayoutCatalogEntry> {
    let trimmed = slug.trim();
    LAYOUT_CATALOG
        .iter()
        .find(|entry| entry.slug.eq_ignore_ascii_case(trimmed))
}

pub fn default_layout() -> &'static LayoutCatalogEntry {
    layout_by_slug(DEFAULT_LAYOUT_SLUG).unwrap_or(&LAYOUT_CATALOG[0])
}

pub fn catalog_slugs() -> impl Iterator<Item = &'static str> {
    LAYOUT_CATALOG.iter().map(|entry| entry.slug)
}
