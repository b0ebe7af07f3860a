//! Reference point selection and its marker

use pointdesc_core::{Error, Point3f, Result};
use serde::{Deserialize, Serialize};

/// Sphere drawn at the selected point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionMarker {
    pub center: Point3f,
    pub radius: f32,
}

/// A pick reported by the interaction layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickEvent {
    /// Point under the cursor, `None` when the pick hit nothing
    pub point_id: Option<usize>,
    /// Control modifier held
    pub control: bool,
    /// Shift modifier held
    pub shift: bool,
}

/// What a pick changed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PickOutcome {
    /// New selection, if the pick changed it
    pub selected: Option<usize>,
    /// Position the camera should refocus on (shift-pick)
    pub focal_point: Option<Point3f>,
}

/// Tracks the selected reference point
#[derive(Debug, Clone)]
pub struct PointSelector {
    selected: Option<usize>,
    marker: SelectionMarker,
    require_control: bool,
}

impl PointSelector {
    pub fn new(marker_radius: f32, require_control: bool) -> Self {
        Self {
            selected: None,
            marker: SelectionMarker {
                center: Point3f::origin(),
                radius: marker_radius,
            },
            require_control,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn marker(&self) -> &SelectionMarker {
        &self.marker
    }

    pub fn set_marker_radius(&mut self, radius: f32) {
        self.marker.radius = radius;
    }

    /// Forget the current selection
    pub fn clear(&mut self) {
        self.selected = None;
        self.marker.center = Point3f::origin();
    }

    /// Select a point and move the marker onto it
    pub fn select(&mut self, index: usize, points: &[Point3f]) -> Result<Point3f> {
        let point = *points.get(index).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "selected point {} out of range for {} points",
                index,
                points.len()
            ))
        })?;

        self.selected = Some(index);
        self.marker.center = point;
        log::debug!("Changed point to: {} {} {}", point.x, point.y, point.z);
        Ok(point)
    }

    /// Apply a pick from the interaction layer.
    ///
    /// Shift requests a camera refocus on the picked point. The selection only
    /// changes when control is held, unless the selector was built without that
    /// requirement.
    pub fn handle_pick(&mut self, event: PickEvent, points: &[Point3f]) -> Result<PickOutcome> {
        let mut outcome = PickOutcome::default();
        let Some(id) = event.point_id else {
            return Ok(outcome);
        };

        let picked = *points.get(id).ok_or_else(|| {
            Error::InvalidArgument(format!("picked point {} out of range for {} points", id, points.len()))
        })?;

        if event.shift {
            outcome.focal_point = Some(picked);
        }

        if event.control || !self.require_control {
            self.select(id, points)?;
            outcome.selected = Some(id);
        }

        Ok(outcome)
    }
}
