//! Factory builder for flexible configuration
//!
//! Collects [`Config`] settings one at a time and validates them once, in
//! [`FactoryBuilder::build`].

use crate::buffer::BufferParameters;
use crate::config::Config;
use crate::error::{GeometryError, Result};
use crate::factory::GeometryFactory;

/// Builder for a [`GeometryFactory`].
#[derive(Debug, Clone, Default)]
pub struct FactoryBuilder {
    config: Config,
}

impl FactoryBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Coordinate ceiling for overlay, buffer and relate inputs.
    pub fn max_coordinates(mut self, max_coordinates: usize) -> Self {
        self.config = self.config.with_max_coordinates(max_coordinates);
        self
    }

    /// Snap distance used when noding fails to converge.
    pub fn snap_tolerance(mut self, tolerance: f64) -> Self {
        self.config = self.config.with_snap_tolerance(tolerance);
        self
    }

    pub fn max_noding_iterations(mut self, iterations: usize) -> Self {
        self.config = self.config.with_max_noding_iterations(iterations);
        self
    }

    pub fn strtree_node_capacity(mut self, capacity: usize) -> Self {
        self.config = self.config.with_strtree_node_capacity(capacity);
        self
    }

    /// Defaults for `GeometryFactory::buffer` and `offset_curve`.
    pub fn buffer_parameters(mut self, params: BufferParameters) -> Self {
        self.config = self.config.with_buffer_parameters(params);
        self
    }

    /// Fixed number of decimals in written WKT.
    pub fn wkt_precision(mut self, decimals: usize) -> Self {
        self.config = self.config.with_wkt_precision(decimals);
        self
    }

    /// Load settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config = Config::from_json(json).map_err(|e| GeometryError::Config(e.to_string()))?;
        Ok(Self::new().config(config))
    }

    /// Load settings from a TOML document.
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config = Config::from_toml(toml_str).map_err(|e| GeometryError::Config(e.to_string()))?;
        Ok(Self::new().config(config))
    }

    /// Validate the configuration and build the factory.
    pub fn build(self) -> Result<GeometryFactory> {
        log::debug!("Building geometry factory with {:?}", self.config);
        GeometryFactory::with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default() {
        let factory = FactoryBuilder::new().build().unwrap();
        assert_eq!(
            factory.config().max_coordinates,
            Config::default().max_coordinates
        );
    }

    #[test]
    fn test_builder_settings() {
        let factory = FactoryBuilder::new()
            .max_coordinates(100)
            .snap_tolerance(0.5)
            .max_noding_iterations(3)
            .strtree_node_capacity(4)
            .wkt_precision(2)
            .build()
            .unwrap();
        let config = factory.config();
        assert_eq!(config.max_coordinates, 100);
        assert_eq!(config.snap_tolerance, 0.5);
        assert_eq!(config.max_noding_iterations, 3);
        assert_eq!(config.strtree_node_capacity, 4);
        assert_eq!(config.wkt_precision, Some(2));
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = FactoryBuilder::new().strtree_node_capacity(1).build();
        assert!(matches!(result, Err(GeometryError::Config(_))));

        let result = FactoryBuilder::new().snap_tolerance(-1.0).build();
        assert!(matches!(result, Err(GeometryError::Config(_))));
    }

    #[test]
    fn test_builder_from_json() {
        let builder = FactoryBuilder::from_json(r#"{"max_coordinates": 42}"#).unwrap();
        let factory = builder.build().unwrap();
        assert_eq!(factory.config().max_coordinates, 42);
        assert!(FactoryBuilder::from_json("{").is_err());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_builder_from_toml() {
        let factory = FactoryBuilder::from_toml("snap_tolerance = 0.25\n")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(factory.config().snap_tolerance, 0.25);
    }
}
