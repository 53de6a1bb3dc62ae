pub mod boids;
pub mod flock;
pub mod neighbors;
pub mod population;
pub mod render;
pub mod rules;
pub mod vector;

use std::{fmt, fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use boids::{Boid, BoidView};
pub use flock::{Flock, FlockStats};
pub use neighbors::NeighborSearch;
pub use vector::{Planar, Vec2};

/// Overall strength of the three steering rules together.
pub const DEFAULT_STRENGTH: f64 = 1.2;

/// Largest world side accepted; keeps grid cells and frame sizes within `u32`.
pub const MAX_BOUND: f64 = 1_000_000.0;

#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("failed to read parameters from {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse parameters: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid parameter {name}: {reason}")]
    Invalid {
        name: &'static str,
        reason: &'static str,
    },
}

/// How agents observe each other while a frame is being computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// In population order, each agent committed before the next is processed.
    #[default]
    Sequential,
    /// Every agent reads the pre-step state; results applied after the pass.
    Simultaneous,
}

impl FromStr for UpdateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(UpdateMode::Sequential),
            "simultaneous" => Ok(UpdateMode::Simultaneous),
            other => Err(format!(
                "unknown update mode '{other}', expected sequential or simultaneous"
            )),
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateMode::Sequential => write!(f, "sequential"),
            UpdateMode::Simultaneous => write!(f, "simultaneous"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Side length of the square world.
    pub bound_max: f64,
    pub neighborhood_radius: f64,
    pub personal_space_radius: f64,
    pub separation_gain: f64,
    pub cohesion_gain: f64,
    pub alignment_gain: f64,
    pub speed_cap: f64,
    pub population: usize,
    /// Seeded velocity components are integers in `[0, initial_speed)`.
    pub initial_speed: u32,
    pub update_mode: UpdateMode,
    pub neighbor_search: NeighborSearch,
    pub rng_seed: Option<u64>,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            bound_max: 800.0,
            neighborhood_radius: 70.0,
            personal_space_radius: 16.0,
            separation_gain: 0.014 * DEFAULT_STRENGTH,
            cohesion_gain: 0.007 * DEFAULT_STRENGTH,
            alignment_gain: 0.014 * DEFAULT_STRENGTH,
            speed_cap: 6.0,
            population: 950,
            initial_speed: 10,
            update_mode: UpdateMode::Sequential,
            neighbor_search: NeighborSearch::BruteForce,
            rng_seed: None,
        }
    }
}

impl Parameters {
    pub fn from_json(json: &str) -> Result<Self, ParameterError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParameterError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ParameterError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Rescales the three steering gains so their base values are multiplied
    /// by `strength` instead of [`DEFAULT_STRENGTH`].
    pub fn with_strength(mut self, strength: f64) -> Self {
        let factor = strength / DEFAULT_STRENGTH;
        self.separation_gain *= factor;
        self.cohesion_gain *= factor;
        self.alignment_gain *= factor;
        self
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        let positive = [
            ("bound_max", self.bound_max),
            ("neighborhood_radius", self.neighborhood_radius),
            ("personal_space_radius", self.personal_space_radius),
            ("speed_cap", self.speed_cap),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParameterError::Invalid {
                    name,
                    reason: "must be finite and greater than zero",
                });
            }
        }
        if self.bound_max > MAX_BOUND {
            return Err(ParameterError::Invalid {
                name: "bound_max",
                reason: "must not exceed MAX_BOUND",
            });
        }
        let gains = [
            ("separation_gain", self.separation_gain),
            ("cohesion_gain", self.cohesion_gain),
            ("alignment_gain", self.alignment_gain),
        ];
        for (name, value) in gains {
            if !value.is_finite() || value < 0.0 {
                return Err(ParameterError::Invalid {
                    name,
                    reason: "must be finite and non-negative",
                });
            }
        }
        if self.personal_space_radius > self.neighborhood_radius {
            return Err(ParameterError::Invalid {
                name: "personal_space_radius",
                reason: "must not exceed neighborhood_radius",
            });
        }
        if self.population == 0 {
            return Err(ParameterError::Invalid {
                name: "population",
                reason: "must be at least one",
            });
        }
        if self.initial_speed == 0 {
            return Err(ParameterError::Invalid {
                name: "initial_speed",
                reason: "must be at least one",
            });
        }
        Ok(())
    }
}
