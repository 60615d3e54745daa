//! Digitizer operations: freehand polygon → custom surface

use shared::{Shape, ShapeId, ShapeType, Vec3};

use super::{surface_name, SceneStore};

/// Extrusion height of a freshly digitized surface
pub const DEFAULT_SURFACE_DEPTH: f64 = 1.0;

impl SceneStore {
    /// Enter or leave drawing mode. Entering clears the buffer and the selection.
    pub fn set_drawing(&mut self, active: bool) {
        if !active {
            self.cancel_drawing();
            return;
        }
        if self.drawing.is_active() {
            return;
        }
        self.drawing.start();
        self.selection.clear();
        self.version += 1;
        tracing::debug!("drawing started");
    }

    /// Add a ground point while drawing
    pub fn add_drawing_point(&mut self, point: Vec3) -> bool {
        let added = self.drawing.add_point(point);
        if added {
            self.version += 1;
        }
        added
    }

    /// Close the polygon into a `custom` shape; needs at least three points
    pub fn finish_drawing(&mut self) -> Option<ShapeId> {
        let polygon = self.drawing.finish()?;

        self.save_undo();
        let name = surface_name(self.count_of(ShapeType::Custom));
        let mut shape = Shape::new(ShapeType::Custom, name);
        shape.position = polygon.anchor;
        shape.points = Some(polygon.points);
        shape.extrude_depth = Some(DEFAULT_SURFACE_DEPTH);
        let id = shape.id.clone();

        tracing::debug!(id = %id, name = %shape.name, "surface digitized");
        self.shapes_mut().push(shape);
        self.selection.select(id.clone());
        Some(id)
    }

    /// Drop the buffer and leave drawing mode
    pub fn cancel_drawing(&mut self) {
        if self.drawing.is_active() {
            self.drawing.cancel();
            self.version += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(store: &mut SceneStore, points: &[Vec3]) {
        store.set_drawing(true);
        for p in points {
            store.add_drawing_point(*p);
        }
    }

    const SQUARE: [Vec3; 4] = [
        [0.0, 0.0, 0.0],
        [2.0, 0.0, 0.0],
        [2.0, 0.0, 2.0],
        [0.0, 0.0, 2.0],
    ];

    #[test]
    fn test_finish_creates_surface() {
        let mut s = SceneStore::empty();
        draw(&mut s, &SQUARE);
        let id = s.finish_drawing().unwrap();

        let shape = s.shape(&id).unwrap();
        assert_eq!(shape.kind, ShapeType::Custom);
        assert_eq!(shape.name, "Surface 1");
        assert_eq!(shape.position, [1.0, 0.0, 1.0]);
        assert_eq!(shape.extrude_depth, Some(1.0));
        assert_eq!(shape.points.as_ref().unwrap()[0], [-1.0, 0.0, -1.0]);
        assert_eq!(s.selection().all(), &[id]);
        assert!(!s.is_drawing());
        assert!(s.drawing_points().is_empty());
        assert!(s.can_undo());
    }

    #[test]
    fn test_second_surface_name() {
        let mut s = SceneStore::empty();
        draw(&mut s, &SQUARE);
        s.finish_drawing().unwrap();
        draw(&mut s, &SQUARE);
        let id = s.finish_drawing().unwrap();
        assert_eq!(s.shape(&id).unwrap().name, "Surface 2");
    }

    #[test]
    fn test_finish_with_two_points_is_noop() {
        let mut s = SceneStore::empty();
        draw(&mut s, &SQUARE[..2]);
        assert!(s.finish_drawing().is_none());
        assert!(s.is_drawing());
        assert_eq!(s.drawing_points().len(), 2);
        assert!(!s.can_undo());
    }

    #[test]
    fn test_start_clears_selection_and_buffer() {
        let mut s = SceneStore::new();
        let id = s.shapes()[0].id.clone();
        s.select(Some(&id), false);
        s.set_drawing(true);
        assert!(s.selection().is_empty());
        assert!(s.drawing_points().is_empty());
    }

    #[test]
    fn test_points_ignored_when_idle() {
        let mut s = SceneStore::empty();
        assert!(!s.add_drawing_point([1.0, 0.0, 1.0]));
        assert!(s.drawing_points().is_empty());
    }

    #[test]
    fn test_set_drawing_false_cancels() {
        let mut s = SceneStore::empty();
        draw(&mut s, &SQUARE);
        s.set_drawing(false);
        assert!(!s.is_drawing());
        assert!(s.drawing_points().is_empty());
        assert!(s.shapes().is_empty());
    }
}
