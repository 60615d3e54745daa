//! Canonical camera placements for the camera-view protocol.
//!
//! The renderer watches [`CameraRequest`](shared::CameraRequest) ids and, on
//! every change, moves its camera to the placement returned here.

use glam::{DMat4, DVec3};
use shared::{CameraView, ViewMode};

/// Distance from the origin for canonical views
pub const DEFAULT_DISTANCE: f64 = 20.0;

/// Vertical field of view for perspective views (radians)
pub const DEFAULT_FOV: f64 = std::f64::consts::FRAC_PI_4;

const NEAR: f64 = 0.1;
const FAR: f64 = 500.0;

/// Orbit-style camera placement around a target point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    /// Horizontal rotation around +Y, 0 looks from +Z (radians)
    pub yaw: f64,
    /// Elevation above the ground plane (radians)
    pub pitch: f64,
    /// Distance from target
    pub distance: f64,
    pub target: DVec3,
    /// Up vector for the view matrix; differs from +Y for top/bottom
    pub up: DVec3,
}

impl CameraPlacement {
    fn orbit(yaw: f64, pitch: f64) -> Self {
        Self {
            yaw,
            pitch,
            distance: DEFAULT_DISTANCE,
            target: DVec3::ZERO,
            up: DVec3::Y,
        }
    }

    /// Canonical placement for a view, looking at the world origin
    pub fn for_view(view: CameraView) -> Self {
        use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6, PI};

        match view {
            // True isometric: eye along (1, 1, 1)
            CameraView::Iso => Self::orbit(FRAC_PI_4, (1.0 / 2.0_f64.sqrt()).atan()),
            CameraView::Axo => Self::orbit(FRAC_PI_6, FRAC_PI_4),
            CameraView::Top => Self {
                up: DVec3::NEG_Z,
                ..Self::orbit(0.0, FRAC_PI_2)
            },
            CameraView::Bottom => Self {
                up: DVec3::Z,
                ..Self::orbit(0.0, -FRAC_PI_2)
            },
            CameraView::Front => Self::orbit(0.0, 0.0),
            CameraView::Back => Self::orbit(PI, 0.0),
            CameraView::Right => Self::orbit(FRAC_PI_2, 0.0),
            CameraView::Left => Self::orbit(-FRAC_PI_2, 0.0),
        }
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> DVec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + DVec3::new(cp * sy, sp, cp * cy) * self.distance
    }

    /// Unit vector from the eye toward the target
    pub fn forward(&self) -> DVec3 {
        (self.target - self.eye_position()).normalize_or_zero()
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye_position(), self.target, self.up)
    }

    /// Projection matrix (camera -> clip) for the given mode
    pub fn projection_matrix(&self, mode: ViewMode, aspect: f64) -> DMat4 {
        match mode {
            ViewMode::Perspective => DMat4::perspective_rh_gl(DEFAULT_FOV, aspect, NEAR, FAR),
            ViewMode::Orthographic => {
                // Same framing as the perspective view at the target distance
                let half_h = self.distance * (DEFAULT_FOV / 2.0).tan();
                let half_w = half_h * aspect;
                DMat4::orthographic_rh_gl(-half_w, half_w, -half_h, half_h, NEAR, FAR)
            }
        }
    }
}

/// Lookup of the canonical placement of a view
pub trait ViewPlacement {
    fn placement(&self) -> CameraPlacement;
}

impl ViewPlacement for CameraView {
    fn placement(&self) -> CameraPlacement {
        CameraPlacement::for_view(*self)
    }
}
