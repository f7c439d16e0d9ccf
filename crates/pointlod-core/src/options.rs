//! Configuration options for the point-cloud optimizer.

use serde::{Deserialize, Serialize};

use crate::error::{PointLodError, Result};

/// Build and selection options for a point-cloud optimizer.
///
/// Values are validated by [`OptimizerConfig::validate`] and never clamped:
/// an out-of-range value fails the build instead of being corrected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Number of contiguous segments the positions are split into.
    pub segment_count: usize,

    /// Once a view holds this many indices or fewer, no coarser views are built.
    pub indices_number_threshold: usize,

    /// Upper bound on index views per segment, including the full-density view.
    pub max_views_per_segment: usize,

    /// Pixel span a segment's largest extent is assumed to cover when its
    /// coarser views are generated.
    pub reference_resolution: f32,

    /// Whether segment ladders are generated on the rayon thread pool.
    pub parallel_build: bool,

    /// Whether per-frame selection runs on the rayon thread pool.
    pub parallel_selection: bool,

    /// Whether segments outside the view frustum are dropped during selection.
    pub frustum_culling: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            segment_count: 16,
            indices_number_threshold: 1000,
            max_views_per_segment: 8,
            reference_resolution: 1024.0,
            parallel_build: true,
            parallel_selection: false,
            frustum_culling: true,
        }
    }
}

impl OptimizerConfig {
    /// Creates a configuration with the given segment count and default options.
    pub fn new(segment_count: usize) -> Self {
        Self {
            segment_count,
            ..Self::default()
        }
    }

    /// Sets the index count below which no coarser views are generated.
    pub fn with_indices_number_threshold(mut self, threshold: usize) -> Self {
        self.indices_number_threshold = threshold;
        self
    }

    /// Sets the maximum number of views per segment.
    pub fn with_max_views_per_segment(mut self, max_views: usize) -> Self {
        self.max_views_per_segment = max_views;
        self
    }

    /// Sets the reference resolution used to size the coarser view grids.
    pub fn with_reference_resolution(mut self, resolution: f32) -> Self {
        self.reference_resolution = resolution;
        self
    }

    /// Enables or disables parallel ladder generation.
    pub fn with_parallel_build(mut self, parallel: bool) -> Self {
        self.parallel_build = parallel;
        self
    }

    /// Enables or disables parallel per-frame selection.
    pub fn with_parallel_selection(mut self, parallel: bool) -> Self {
        self.parallel_selection = parallel;
        self
    }

    /// Enables or disables frustum culling.
    pub fn with_frustum_culling(mut self, enabled: bool) -> Self {
        self.frustum_culling = enabled;
        self
    }

    /// Checks the options that do not depend on the position count.
    pub fn validate(&self) -> Result<()> {
        if self.segment_count == 0 {
            return Err(PointLodError::InvalidConfiguration(
                "segment_count must be greater than zero".to_string(),
            ));
        }
        if self.max_views_per_segment == 0 {
            return Err(PointLodError::InvalidConfiguration(
                "max_views_per_segment must be greater than zero".to_string(),
            ));
        }
        if !(self.reference_resolution.is_finite() && self.reference_resolution > 0.0) {
            return Err(PointLodError::InvalidConfiguration(format!(
                "reference_resolution must be positive and finite, got {}",
                self.reference_resolution
            )));
        }
        Ok(())
    }

    /// Checks the options against the number of positions to be optimized.
    pub fn validate_for(&self, num_positions: usize) -> Result<()> {
        self.validate()?;
        if num_positions == 0 {
            return Err(PointLodError::InvalidConfiguration(
                "positions must not be empty".to_string(),
            ));
        }
        if self.segment_count > num_positions {
            return Err(PointLodError::InvalidConfiguration(format!(
                "segment_count {} exceeds the number of positions {}",
                self.segment_count, num_positions
            )));
        }
        Ok(())
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes this configuration to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(OptimizerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_segments_rejected() {
        let config = OptimizerConfig::new(0);
        assert!(matches!(
            config.validate(),
            Err(PointLodError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_views_rejected() {
        let config = OptimizerConfig::new(4).with_max_views_per_segment(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_resolution_rejected() {
        assert!(OptimizerConfig::new(4)
            .with_reference_resolution(0.0)
            .validate()
            .is_err());
        assert!(OptimizerConfig::new(4)
            .with_reference_resolution(f32::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_for_position_count() {
        let config = OptimizerConfig::new(4);
        assert!(config.validate_for(4).is_ok());
        assert!(config.validate_for(3).is_err());
        assert!(config.validate_for(0).is_err());
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config = OptimizerConfig::from_json_str(r#"{ "segment_count": 32 }"#).unwrap();
        assert_eq!(config.segment_count, 32);
        assert_eq!(config.max_views_per_segment, 8);
        assert!(config.frustum_culling);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = OptimizerConfig::new(7)
            .with_indices_number_threshold(50)
            .with_parallel_build(false);
        let json = config.to_json_string().unwrap();
        assert_eq!(OptimizerConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_json_garbage_is_error() {
        assert!(matches!(
            OptimizerConfig::from_json_str("not json"),
            Err(PointLodError::JsonError(_))
        ));
    }
}
