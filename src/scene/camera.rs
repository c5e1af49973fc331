use serde::Serialize;
use strum_macros::Display;
use utoipa::ToSchema;

use super::transform::{inertial_to_scene, SceneScale};
use crate::catalog::Catalog;
use crate::propagation::Vector3;

/// Fraction of the remaining distance covered each frame.
pub const SMOOTHING: f64 = 0.1;
/// Below this distance from the origin a free camera stops re-centering.
pub const ORIGIN_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    Free,
    Locked,
}

/// What the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ViewState {
    pub mode: CameraMode,
    #[schema(value_type = Vec<f64>)]
    pub target: Vector3,
    pub zoom_enabled: bool,
    pub pan_enabled: bool,
}

/// Pure per-frame update: eases `target` toward the locked object, or back to
/// the origin when free. A locked camera without a position holds its target.
pub fn step(mode: CameraMode, target: Vector3, object: Option<Vector3>) -> ViewState {
    match mode {
        CameraMode::Locked => ViewState {
            mode,
            target: object.map_or(target, |position| target.lerp(&position, SMOOTHING)),
            zoom_enabled: false,
            pan_enabled: false,
        },
        CameraMode::Free => ViewState {
            mode,
            target: if target.norm() > ORIGIN_EPSILON {
                target.lerp(&Vector3::zeros(), SMOOTHING)
            } else {
                target
            },
            zoom_enabled: true,
            pan_enabled: true,
        },
    }
}

/// Camera targeting state machine driven by selection commands and frames.
#[derive(Debug, Clone)]
pub struct Camera {
    mode: CameraMode,
    selected: Option<String>,
    target: Vector3,
    scale: SceneScale,
}

impl Camera {
    pub fn new(scale: SceneScale) -> Self {
        Self {
            mode: CameraMode::Free,
            selected: None,
            target: Vector3::zeros(),
            scale,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[cfg(test)]
    pub fn target(&self) -> Vector3 {
        self.target
    }

    /// Selecting anything, or clearing the selection, drops back to free view.
    pub fn select(&mut self, id: Option<String>) {
        self.selected = id;
        self.mode = CameraMode::Free;
    }

    /// Locks onto the selection if it has a known position. Returns the
    /// resulting mode.
    pub fn set_satellite_view(&mut self, enabled: bool, catalog: &Catalog) -> CameraMode {
        self.mode = if enabled && self.selected_position(catalog).is_some() {
            CameraMode::Locked
        } else {
            CameraMode::Free
        };
        self.mode
    }

    /// Advances one frame against the latest catalog.
    pub fn frame(&mut self, catalog: &Catalog) -> ViewState {
        let object = match self.mode {
            CameraMode::Locked => self.selected_position(catalog),
            CameraMode::Free => None,
        };
        let view = step(self.mode, self.target, object);
        self.target = view.target;
        view
    }

    fn selected_position(&self, catalog: &Catalog) -> Option<Vector3> {
        let id = self.selected.as_deref()?;
        let position = catalog.get(id)?.inertial_position?;
        Some(inertial_to_scene(&position, &self.scale))
    }
}
