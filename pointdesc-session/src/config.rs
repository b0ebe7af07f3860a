//! Session configuration

use pointdesc_algorithms::SpacingConfig;
use pointdesc_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Name of the scalar array the differences are stored under
pub const DIFFERENCE_ARRAY_NAME: &str = "DescriptorDifferences";

/// Configuration parameters for a comparison session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Radius of the marker drawn at the selected point (default: 0.05)
    pub marker_radius: f32,
    /// Name of the array the differences are stored under (default: "DescriptorDifferences")
    pub difference_array_name: String,
    /// Parameters of the average spacing estimate
    pub spacing: SpacingConfig,
    /// Only change the selection when control is held during a pick (default: true)
    pub require_control_for_selection: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            marker_radius: 0.05,
            difference_array_name: DIFFERENCE_ARRAY_NAME.to_string(),
            spacing: SpacingConfig::default(),
            require_control_for_selection: true,
        }
    }
}

impl SessionConfig {
    /// Check that the configuration values are usable
    pub fn validate(&self) -> Result<()> {
        if !(self.marker_radius.is_finite() && self.marker_radius > 0.0) {
            return Err(Error::Config(format!(
                "marker_radius must be positive, got {}",
                self.marker_radius
            )));
        }
        if self.difference_array_name.trim().is_empty() {
            return Err(Error::Config(
                "difference_array_name must not be empty".to_string()
            ));
        }
        Ok(())
    }
}
