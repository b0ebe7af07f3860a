//! Comparison session

use crate::config::SessionConfig;
use crate::selection::{PickEvent, PickOutcome, PointSelector, SelectionMarker};
use pointdesc_algorithms::{average_nearest_neighbor_spacing_with_config, descriptor_differences};
use pointdesc_core::{
    DescriptorArray, DescriptorCloud, Error, PointSelection, PointSet, Result, ScalarOverlay, ScalarRange,
};
use serde::{Deserialize, Serialize};

/// Usage text shown by the help action
pub const HELP_TEXT: &str = "Compare descriptors\n\
    Load a point cloud.\n\
    Ctrl+click to select a point.\n\
    Click Compare.\n";

/// Result of comparing the selected point's descriptor against every point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferenceReport {
    /// Descriptor array that was compared
    pub descriptor_name: String,
    /// Name the differences were stored under
    pub output_name: String,
    /// The selected reference point
    pub reference_index: usize,
    /// One difference per point
    pub values: Vec<f32>,
    /// Value range for color mapping
    pub range: ScalarRange,
}

/// State of an interactive descriptor comparison
#[derive(Debug, Clone)]
pub struct CompareSession {
    config: SessionConfig,
    cloud: DescriptorCloud,
    selector: PointSelector,
    array_to_compare: Option<String>,
}

impl CompareSession {
    /// Create an empty session
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let selector = PointSelector::new(config.marker_radius, config.require_control_for_selection);
        Ok(Self {
            config,
            cloud: DescriptorCloud::default(),
            selector,
            array_to_compare: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn cloud(&self) -> &DescriptorCloud {
        &self.cloud
    }

    /// Install a newly loaded cloud.
    ///
    /// Clears the selection and picks the first array as the one to compare.
    /// Returns the names of the arrays available for comparison.
    pub fn load(&mut self, cloud: DescriptorCloud) -> Vec<String> {
        log::info!(
            "Loaded point cloud with {} points and {} arrays",
            cloud.len(),
            cloud.point_data().len()
        );
        cloud.log_array_names();

        self.cloud = cloud;
        self.selector.clear();

        let names = self.array_names();
        self.array_to_compare = names.first().cloned();
        names
    }

    /// Names of the arrays attached to the points, in insertion order
    pub fn array_names(&self) -> Vec<String> {
        self.cloud.array_names().into_iter().map(str::to_string).collect()
    }

    /// Choose the descriptor array to compare
    pub fn set_array_to_compare(&mut self, name: &str) -> Result<()> {
        self.cloud.descriptor(name)?;
        log::debug!("nameOfArrayToCompare: {}", name);
        self.array_to_compare = Some(name.to_string());
        Ok(())
    }

    pub fn array_to_compare(&self) -> Option<&str> {
        self.array_to_compare.as_deref()
    }

    pub fn marker(&self) -> &SelectionMarker {
        self.selector.marker()
    }

    /// Resize the selection marker, usually to a fraction of the point spacing
    pub fn set_marker_radius(&mut self, radius: f32) -> Result<()> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "marker radius must be positive, got {}",
                radius
            )));
        }
        self.selector.set_marker_radius(radius);
        Ok(())
    }

    /// Forward a pick from the interaction layer
    pub fn handle_pick(&mut self, event: PickEvent) -> Result<PickOutcome> {
        self.selector.handle_pick(event, &self.cloud.cloud.points)
    }

    /// Compare the selected point's descriptor against every point.
    ///
    /// The differences are stored on the cloud under the configured output name
    /// and made the active scalars.
    pub fn compute_differences(&mut self) -> Result<DifferenceReport> {
        let point_count = self.cloud.len();
        log::debug!("There are {} points.", point_count);

        let reference_index = self
            .selector
            .selected()
            .filter(|&id| id < point_count)
            .ok_or_else(|| Error::InvalidArgument("a point must be selected to compare".to_string()))?;
        log::debug!("selectedPointId: {}", reference_index);

        let descriptor_name = self
            .array_to_compare
            .clone()
            .ok_or_else(|| Error::NotFound("no descriptor array chosen to compare".to_string()))?;

        let descriptors = self.cloud.descriptor(&descriptor_name)?;
        let values = descriptor_differences(descriptors, reference_index)?;

        let range = ScalarRange::of(&values).ok_or_else(|| {
            Error::InvalidData(format!("differences of '{}' contain no comparable values", descriptor_name))
        })?;
        log::debug!("Range: {}, {}", range.min, range.max);

        let output_name = self.config.difference_array_name.clone();
        self.cloud
            .add_array(DescriptorArray::scalars(output_name.clone(), values.clone()))?;
        self.cloud.point_data_mut().set_active_scalars(&output_name)?;

        Ok(DifferenceReport {
            descriptor_name,
            output_name,
            reference_index,
            values,
            range,
        })
    }

    /// Hand a report to a surface that renders it
    pub fn present<S: ScalarOverlay + ?Sized>(&self, report: &DifferenceReport, surface: &mut S) {
        surface.show_scalars(&report.output_name, &report.values, report.range);
    }

    /// Average nearest neighbor spacing of the loaded cloud
    pub fn average_spacing(&self) -> Result<f32> {
        average_nearest_neighbor_spacing_with_config(self.cloud.points(), &self.config.spacing)
    }

    pub fn help_text(&self) -> &'static str {
        HELP_TEXT
    }
}

impl PointSelection for CompareSession {
    fn on_point_selected(&mut self, index: usize) -> Result<()> {
        self.selector.select(index, &self.cloud.cloud.points)?;
        Ok(())
    }

    fn selected_point(&self) -> Option<usize> {
        self.selector.selected()
    }
}
