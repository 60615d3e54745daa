//! View signals and scene settings (no history)

use shared::{
    CameraRequest, CameraView, GridSettings, SunSettingsPatch, TransformMode, ViewMode,
};

use super::SceneStore;
use crate::solar::{self, SunPosition};

impl SceneStore {
    /// Ask the renderer to move the camera to a canonical view.
    ///
    /// Every call produces a new request id, even for the same view.
    pub fn request_camera_view(&mut self, view: CameraView) -> CameraRequest {
        let request = CameraRequest {
            id: self.next_camera_request_id,
            view,
        };
        self.next_camera_request_id += 1;
        self.camera_request = Some(request);
        self.view_mode = view.view_mode();
        self.version += 1;
        tracing::debug!(id = request.id, ?view, "camera view requested");
        request
    }

    /// Last camera request, if any
    pub fn camera_request(&self) -> Option<CameraRequest> {
        self.camera_request
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.version += 1;
    }

    pub fn transform_mode(&self) -> TransformMode {
        self.transform_mode
    }

    /// Switch gizmo mode; leaves drawing mode
    pub fn set_transform_mode(&mut self, mode: TransformMode) {
        self.cancel_drawing();
        self.transform_mode = mode;
        self.version += 1;
    }

    /// Merge a partial sun update (values are clamped)
    pub fn update_sun_settings(&mut self, patch: &SunSettingsPatch) {
        self.settings.sun = patch.apply(&self.settings.sun);
        self.version += 1;
    }

    pub fn set_background_color(&mut self, color: impl Into<String>) {
        self.settings.background_color = color.into();
        self.version += 1;
    }

    pub fn set_grid_settings(&mut self, grid: GridSettings) {
        self.settings.grid = grid;
        self.version += 1;
    }

    /// Sun position for the current sun settings
    pub fn sun_position(&self) -> SunPosition {
        let sun = &self.settings.sun;
        solar::sun_position(sun.latitude, sun.longitude, sun.date, sun.time)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_camera_request_ids_increase() {
        let mut s = SceneStore::new();
        assert!(s.camera_request().is_none());
        let a = s.request_camera_view(CameraView::Top);
        let b = s.request_camera_view(CameraView::Top);
        assert!(b.id > a.id);
        assert_eq!(s.camera_request(), Some(b));
        assert_eq!(s.view_mode(), ViewMode::Orthographic);

        s.request_camera_view(CameraView::Iso);
        assert_eq!(s.view_mode(), ViewMode::Perspective);
    }

    #[test]
    fn test_transform_mode_exits_drawing() {
        let mut s = SceneStore::new();
        s.set_drawing(true);
        s.add_drawing_point([1.0, 0.0, 1.0]);
        s.set_transform_mode(TransformMode::Rotate);
        assert!(!s.is_drawing());
        assert!(s.drawing_points().is_empty());
        assert_eq!(s.transform_mode(), TransformMode::Rotate);
    }

    #[test]
    fn test_sun_settings_clamped() {
        let mut s = SceneStore::new();
        s.update_sun_settings(&SunSettingsPatch {
            date: Some(0),
            time: Some(30.0),
            longitude: Some(-200.0),
            ..Default::default()
        });
        let sun = &s.settings().sun;
        assert_eq!(sun.date, 1);
        assert_eq!(sun.time, 24.0);
        assert_eq!(sun.longitude, -180.0);
    }

    #[test]
    fn test_sun_position_uses_settings() {
        let mut s = SceneStore::new();
        s.update_sun_settings(&SunSettingsPatch {
            latitude: Some(0.0),
            longitude: Some(0.0),
            date: Some(81),
            time: Some(12.0),
            ..Default::default()
        });
        let pos = s.sun_position();
        assert_relative_eq!(pos.declination, 0.0, epsilon = 1e-9);
        assert!(pos.altitude.to_degrees() > 85.0);
    }

    #[test]
    fn test_settings_setters_do_not_touch_history() {
        let mut s = SceneStore::new();
        s.set_background_color("#000000");
        s.set_grid_settings(GridSettings {
            divisions: 10,
            ..Default::default()
        });
        s.set_view_mode(ViewMode::Orthographic);
        assert_eq!(s.settings().background_color, "#000000");
        assert_eq!(s.settings().grid.divisions, 10);
        assert!(!s.can_undo());
    }
}
