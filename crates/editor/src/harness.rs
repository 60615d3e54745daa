//! Headless test harness for programmatic scene manipulation.
//!
//! Wraps a `SceneStore` with id-oriented helpers so tests and the command
//! protocol can drive the editor without a UI.

use shared::{Shape, ShapeId, ShapePatch, ShapeType, Vec3};

use crate::error::ExchangeError;
use crate::state::grouping;
use crate::state::scene::SceneStore;
use crate::validation::SceneValidator;

/// Headless test harness around a scene store
pub struct TestHarness {
    pub scene: SceneStore,
}

impl TestHarness {
    /// Create a harness with an empty scene.
    pub fn new() -> Self {
        Self {
            scene: SceneStore::empty(),
        }
    }

    /// Create a harness with the default scene (one box).
    pub fn with_default_scene() -> Self {
        Self {
            scene: SceneStore::new(),
        }
    }

    /// Wrap an existing store.
    pub fn from_store(scene: SceneStore) -> Self {
        Self { scene }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Add a shape with default placement and return its ID
    pub fn add(&mut self, kind: ShapeType) -> ShapeId {
        self.scene.add_shape(kind, &ShapePatch::default())
    }

    /// Add a shape at a position and return its ID
    pub fn add_at(&mut self, kind: ShapeType, pos: Vec3) -> ShapeId {
        self.scene.add_shape(kind, &ShapePatch::position(pos))
    }

    /// Add a box at a position and return its ID
    pub fn add_box_at(&mut self, pos: Vec3) -> ShapeId {
        self.add_at(ShapeType::Box, pos)
    }

    /// Select exactly `ids` and group them
    pub fn group(&mut self, ids: &[ShapeId]) -> Option<ShapeId> {
        self.scene.set_selection(ids);
        self.scene.group_selected()
    }

    /// Select exactly `id` and ungroup it
    pub fn ungroup(&mut self, id: &str) -> Option<Vec<ShapeId>> {
        self.scene.set_selection(&[id.to_string()]);
        self.scene.ungroup_selected()
    }

    /// Select exactly `ids` and delete them with their descendants
    pub fn delete(&mut self, ids: &[ShapeId]) -> Vec<ShapeId> {
        self.scene.set_selection(ids);
        self.scene.delete_selected()
    }

    /// Select exactly `ids` and duplicate them
    pub fn duplicate(&mut self, ids: &[ShapeId], with_offset: bool) -> Vec<ShapeId> {
        self.scene.set_selection(ids);
        self.scene.duplicate_selected(with_offset)
    }

    /// Digitize a polygon in one go and return the new surface ID
    pub fn draw_polygon(&mut self, points: &[Vec3]) -> Option<ShapeId> {
        self.scene.set_drawing(true);
        for p in points {
            self.scene.add_drawing_point(*p);
        }
        self.scene.finish_drawing()
    }

    /// Simulate a drag: one undo step, then a position update per step
    pub fn drag(&mut self, id: &str, steps: &[Vec3]) {
        self.scene.begin_gesture();
        for pos in steps {
            self.scene.update_shape(id, &ShapePatch::position(*pos));
        }
    }

    /// Undo the last operation
    pub fn undo(&mut self) -> bool {
        self.scene.undo()
    }

    /// Redo the last undone operation
    pub fn redo(&mut self) -> bool {
        self.scene.redo()
    }

    /// Reset to the default scene
    pub fn clear(&mut self) {
        self.scene.reset_scene();
    }

    // ── Exchange ──────────────────────────────────────────────

    /// Replace the scene with a JSON document
    pub fn load_scene_json(&mut self, json: &str) -> Result<usize, ExchangeError> {
        self.scene.load_document(json)
    }

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> String {
        self.scene.export_json().unwrap_or_default()
    }

    // ── Inspection ────────────────────────────────────────────

    /// Number of shapes in the scene
    pub fn shape_count(&self) -> usize {
        self.scene.shapes().len()
    }

    /// Number of shapes of one kind
    pub fn count_of(&self, kind: ShapeType) -> usize {
        self.scene.count_of(kind)
    }

    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.scene.shape(id)
    }

    /// Stored (possibly group-local) position of a shape
    pub fn position_of(&self, id: &str) -> Option<Vec3> {
        self.scene.shape(id).map(|s| s.position)
    }

    /// World position of a shape, following its parent groups
    pub fn world_position_of(&self, id: &str) -> Option<Vec3> {
        let shapes = self.scene.shapes();
        let index = shapes.iter().position(|s| s.id == id)?;
        Some(grouping::world_position(shapes, index))
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.scene.shape(id).and_then(|s| s.parent_id.as_deref())
    }

    /// Shape names in collection order
    pub fn names(&self) -> Vec<&str> {
        self.scene.shapes().iter().map(|s| s.name.as_str()).collect()
    }

    pub fn selected(&self) -> &[ShapeId] {
        self.scene.selection().all()
    }

    /// Create a validator for the current shapes
    pub fn validator(&self) -> SceneValidator<'_> {
        SceneValidator::new(self.scene.shapes())
    }

    /// Invariant violations of the current scene
    pub fn validate(&self) -> Vec<String> {
        self.validator().validate_all()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_harness_empty() {
        let h = TestHarness::new();
        assert_eq!(h.shape_count(), 0);
        assert_eq!(TestHarness::with_default_scene().shape_count(), 1);
    }

    #[test]
    fn test_add_primitives() {
        let mut h = TestHarness::new();
        h.add(ShapeType::Box);
        h.add(ShapeType::Cylinder);
        h.add(ShapeType::Sphere);
        h.add(ShapeType::Cone);
        h.add(ShapeType::Tree);
        assert_eq!(h.shape_count(), 5);
        assert_eq!(h.names(), vec!["Box 01", "Cylinder 01", "Sphere 01", "Cone 01", "Tree 01"]);
        assert!(h.validate().is_empty());
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut h = TestHarness::new();
        h.add(ShapeType::Box);
        assert_eq!(h.shape_count(), 1);
        assert!(h.undo());
        assert_eq!(h.shape_count(), 0);
        assert!(h.redo());
        assert_eq!(h.shape_count(), 1);
    }

    #[test]
    fn test_drag_is_one_undo_step() {
        let mut h = TestHarness::new();
        let id = h.add_box_at([0.0; 3]);
        h.drag(&id, &[[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        assert_eq!(h.position_of(&id), Some([3.0, 0.0, 0.0]));
        assert!(h.undo());
        assert_eq!(h.position_of(&id), Some([0.0; 3]));
    }

    #[test]
    fn test_load_export_json() {
        let mut h = TestHarness::new();
        h.add(ShapeType::Box);
        let json = h.export_scene_json();

        let mut h2 = TestHarness::new();
        assert_eq!(h2.load_scene_json(&json).unwrap(), 1);
        assert_eq!(h2.shape_count(), 1);
    }

    #[test]
    fn test_clear_resets_to_default_box() {
        let mut h = TestHarness::new();
        h.add(ShapeType::Sphere);
        h.clear();
        assert_eq!(h.names(), vec!["Box 01"]);
    }

    #[test]
    fn test_draw_polygon() {
        let mut h = TestHarness::new();
        let id = h.draw_polygon(&crate::fixtures::l_shape_points()).unwrap();
        let shape = h.shape(&id).unwrap();
        assert_eq!(shape.points.as_ref().map(Vec::len), Some(6));
        assert_eq!(shape.position, [2.0, 0.0, 1.5]);
    }
}
