use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, SessionOptions};
use crate::state::PieceGeometry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutPiece {
    pub id: String,
    pub position: [f32; 3],
    pub size: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PuzzleLayout {
    pub name: String,
    #[serde(default)]
    pub options: SessionOptions,
    #[serde(default)]
    pub pieces: Vec<LayoutPiece>,
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse layout: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to write layout: {0}")]
    Write(#[from] toml::ser::Error),
    #[error("invalid options: {0}")]
    Options(#[from] ConfigError),
    #[error("piece id `{0}` appears more than once")]
    DuplicateId(String),
    #[error("piece id must not be empty")]
    EmptyId,
    #[error("piece `{id}` has a non-finite {field}")]
    NonFinite { id: String, field: &'static str },
}

impl PuzzleLayout {
    pub fn from_geometries(
        name: impl Into<String>,
        options: SessionOptions,
        pieces: &[PieceGeometry],
    ) -> Self {
        Self {
            name: name.into(),
            options,
            pieces: pieces
                .iter()
                .map(|piece| LayoutPiece {
                    id: piece.id.as_str().to_string(),
                    position: piece.reference_position.to_array(),
                    size: piece.size.to_array(),
                })
                .collect(),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, LayoutError> {
        let layout: Self = toml::from_str(contents)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_path(path: &Path) -> Result<Self, LayoutError> {
        let contents = fs::read_to_string(path).map_err(|source| LayoutError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, LayoutError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        self.options.validate()?;
        let mut seen = HashSet::with_capacity(self.pieces.len());
        for piece in &self.pieces {
            if piece.id.trim().is_empty() {
                return Err(LayoutError::EmptyId);
            }
            if !seen.insert(piece.id.as_str()) {
                return Err(LayoutError::DuplicateId(piece.id.clone()));
            }
            if piece.position.iter().any(|value| !value.is_finite()) {
                return Err(LayoutError::NonFinite {
                    id: piece.id.clone(),
                    field: "position",
                });
            }
            if piece.size.iter().any(|value| !value.is_finite()) {
                return Err(LayoutError::NonFinite {
                    id: piece.id.clone(),
                    field: "size",
                });
            }
        }
        Ok(())
    }

    pub fn geometries(&self) -> Vec<PieceGeometry> {
        self.pieces
            .iter()
            .map(|piece| {
                PieceGeometry::new(
                    piece.id.as_str(),
                    Vec3::from_array(piece.position),
                    Vec3::from_array(piece.size),
                )
            })
            .collect()
    }
}
