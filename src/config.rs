//! Engine configuration.
//!
//! [`Config`] gathers the numeric policies the engine needs: the
//! coordinate-count ceiling guarding expensive operations, the snap tolerance
//! used when noding, STR-tree fan-out and default buffer parameters. It is
//! plain serde data and can be loaded from JSON or TOML.

use crate::buffer::BufferParameters;
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Engine configuration.
///
/// # Example
///
/// ```rust
/// use planar::Config;
///
/// let config = Config::default();
/// assert_eq!(config.strtree_node_capacity, 10);
///
/// let json = r#"{
///     "max_coordinates": 1000,
///     "snap_tolerance": 1e-9
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.max_coordinates, 1000);
/// assert_eq!(config.max_noding_iterations, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Inputs to overlay, buffer and relate with more coordinates than this
    /// are rejected with `ComplexityLimit`.
    #[serde(default = "Config::default_max_coordinates")]
    pub max_coordinates: usize,

    /// Relative distance within which computed intersection points snap to
    /// existing nodes. Scaled by the magnitude of the input coordinates.
    #[serde(default = "Config::default_snap_tolerance")]
    pub snap_tolerance: f64,

    /// Passes the noder may take before giving up with `Topology`.
    #[serde(default = "Config::default_max_noding_iterations")]
    pub max_noding_iterations: usize,

    /// Fan-out of STR-trees built by the engine.
    #[serde(default = "Config::default_strtree_node_capacity")]
    pub strtree_node_capacity: usize,

    /// Decimal places for WKT output; `None` writes shortest round-trip
    /// numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkt_precision: Option<usize>,

    /// Parameters used by `buffer` when none are given.
    #[serde(default)]
    pub buffer: BufferParameters,
}

impl Config {
    const fn default_max_coordinates() -> usize {
        5_000_000
    }

    const fn default_snap_tolerance() -> f64 {
        1e-11
    }

    const fn default_max_noding_iterations() -> usize {
        6
    }

    const fn default_strtree_node_capacity() -> usize {
        crate::index::DEFAULT_NODE_CAPACITY
    }

    pub fn with_max_coordinates(mut self, max_coordinates: usize) -> Self {
        self.max_coordinates = max_coordinates;
        self
    }

    pub fn with_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap_tolerance = tolerance;
        self
    }

    pub fn with_max_noding_iterations(mut self, iterations: usize) -> Self {
        self.max_noding_iterations = iterations;
        self
    }

    pub fn with_strtree_node_capacity(mut self, capacity: usize) -> Self {
        self.strtree_node_capacity = capacity;
        self
    }

    pub fn with_buffer_parameters(mut self, params: BufferParameters) -> Self {
        self.buffer = params;
        self
    }

    pub fn with_wkt_precision(mut self, decimals: usize) -> Self {
        self.wkt_precision = Some(decimals);
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_coordinates == 0 {
            return Err("Max coordinates must be greater than zero".to_string());
        }
        if !self.snap_tolerance.is_finite() || self.snap_tolerance < 0.0 {
            return Err("Snap tolerance must be finite and non-negative".to_string());
        }
        if self.max_noding_iterations == 0 {
            return Err("Max noding iterations must be greater than zero".to_string());
        }
        if self.strtree_node_capacity < 2 {
            return Err("STR-tree node capacity must be at least 2".to_string());
        }
        if let Some(p) = self.wkt_precision
            && p > 17
        {
            return Err("WKT precision must be at most 17 decimals".to_string());
        }
        self.buffer.validate()
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_coordinates: Self::default_max_coordinates(),
            snap_tolerance: Self::default_snap_tolerance(),
            max_noding_iterations: Self::default_max_noding_iterations(),
            strtree_node_capacity: Self::default_strtree_node_capacity(),
            wkt_precision: None,
            buffer: BufferParameters::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{EndCapStyle, JoinStyle};

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_coordinates, 5_000_000);
        assert_eq!(config.buffer.quadrant_segments, 8);
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config::default()
            .with_snap_tolerance(1e-9)
            .with_wkt_precision(3)
            .with_buffer_parameters(
                BufferParameters::default()
                    .with_end_cap_style(EndCapStyle::Flat)
                    .with_join_style(JoinStyle::Mitre),
            );
        let json = config.to_json().unwrap();
        let back = Config::from_json(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::default().with_strtree_node_capacity(1).validate().is_err());
        assert!(Config::default().with_snap_tolerance(-1.0).validate().is_err());
        assert!(Config::default().with_max_noding_iterations(0).validate().is_err());
        assert!(Config::from_json(r#"{"max_coordinates": 0}"#).is_err());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_round_trip() {
        let config = Config::default().with_max_coordinates(42);
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
