//! Configuration for the sequencing engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};

/// Boundary policy for a segment's active frame range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Active on `[from, from + duration]`, one frame more than declared.
    #[default]
    Legacy,
    /// Active on `[from, from + duration - 1]`: exactly `duration` frames.
    Corrected,
}

impl BoundaryMode {
    /// Map the old "v2 breaking changes" boolean onto a mode.
    pub fn from_v2_flag(enabled: bool) -> Self {
        if enabled {
            BoundaryMode::Corrected
        } else {
            BoundaryMode::Legacy
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BoundaryMode::Legacy => "legacy",
            BoundaryMode::Corrected => "corrected",
        }
    }
}

impl FromStr for BoundaryMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(BoundaryMode::Legacy),
            "corrected" => Ok(BoundaryMode::Corrected),
            _ => Err(ConfigError::InvalidBoundaryMode {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level sequencing configuration.
///
/// This is read by the caller and handed to visibility queries explicitly;
/// nothing in the engine reads it from global state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SequencingConfig {
    pub boundary_mode: BoundaryMode,
}

impl SequencingConfig {
    pub fn new(boundary_mode: BoundaryMode) -> Self {
        Self { boundary_mode }
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
