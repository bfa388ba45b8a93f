use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::game::{
    ground_point, ADJACENCY_FACTOR_DEFAULT, CONNECTION_HIGHLIGHT_MS_DEFAULT,
    MIN_PIECE_DISTANCE_DEFAULT, NEAR_THRESHOLD_DEFAULT, SCATTER_MAX_DEFAULT, SCATTER_MIN_DEFAULT,
    SNAP_THRESHOLD_DEFAULT,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScatterArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScatterArea {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.z >= self.min.y
            && point.z <= self.max.y
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let size = self.size();
        let x = self.min.x + size.x * rng.random::<f32>();
        let z = self.min.y + size.y * rng.random::<f32>();
        ground_point(x, z)
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
    }
}

impl Default for ScatterArea {
    fn default() -> Self {
        Self::new(SCATTER_MIN_DEFAULT, SCATTER_MAX_DEFAULT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionOptions {
    pub min_separation: f32,
    pub adjacency_factor: f32,
    pub snap_threshold: f32,
    pub near_threshold: f32,
    pub connection_highlight_duration_ms: u32,
    pub require_settle: bool,
    pub scatter_area: ScatterArea,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            min_separation: MIN_PIECE_DISTANCE_DEFAULT,
            adjacency_factor: ADJACENCY_FACTOR_DEFAULT,
            snap_threshold: SNAP_THRESHOLD_DEFAULT,
            near_threshold: NEAR_THRESHOLD_DEFAULT,
            connection_highlight_duration_ms: CONNECTION_HIGHLIGHT_MS_DEFAULT,
            require_settle: false,
            scatter_area: ScatterArea::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("min_separation must not be negative, got {0}")]
    NegativeSeparation(f32),
    #[error("snap_threshold ({snap}) must be strictly below near_threshold ({near})")]
    SnapNotBelowNear { snap: f32, near: f32 },
    #[error("scatter_area must have finite bounds with min <= max")]
    InvalidScatterArea,
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field, value });
    }
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

impl SessionOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_separation.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "min_separation",
                value: self.min_separation,
            });
        }
        if self.min_separation < 0.0 {
            return Err(ConfigError::NegativeSeparation(self.min_separation));
        }
        check_positive("adjacency_factor", self.adjacency_factor)?;
        check_positive("snap_threshold", self.snap_threshold)?;
        check_positive("near_threshold", self.near_threshold)?;
        if self.snap_threshold >= self.near_threshold {
            return Err(ConfigError::SnapNotBelowNear {
                snap: self.snap_threshold,
                near: self.near_threshold,
            });
        }
        if !self.scatter_area.is_valid() {
            return Err(ConfigError::InvalidScatterArea);
        }
        Ok(())
    }

    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut options = self;
        if !(options.min_separation.is_finite() && options.min_separation >= 0.0) {
            warn!(value = options.min_separation, "min_separation unusable, using default");
            options.min_separation = defaults.min_separation;
        }
        if !(options.adjacency_factor.is_finite() && options.adjacency_factor > 0.0) {
            warn!(value = options.adjacency_factor, "adjacency_factor unusable, using default");
            options.adjacency_factor = defaults.adjacency_factor;
        }
        if !(options.snap_threshold.is_finite() && options.snap_threshold > 0.0) {
            warn!(value = options.snap_threshold, "snap_threshold unusable, using default");
            options.snap_threshold = defaults.snap_threshold;
        }
        if !(options.near_threshold.is_finite() && options.near_threshold > 0.0) {
            warn!(value = options.near_threshold, "near_threshold unusable, using default");
            options.near_threshold = defaults.near_threshold;
        }
        if !options.scatter_area.is_valid() {
            warn!(area = ?options.scatter_area, "scatter_area unusable, using default");
            options.scatter_area = defaults.scatter_area;
        }
        options
    }
}
