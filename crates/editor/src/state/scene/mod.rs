//! Scene state management
//!
//! `SceneStore` owns the shape collection together with selection, undo/redo
//! history, the drawing buffer and view signals. Every mutation goes through its
//! methods; readers get immutable snapshots.
//!
//! Structural operations (add, delete, duplicate, group, ungroup, finish
//! drawing, import) record an undo step themselves. Continuous edits
//! (`update_shape`, visibility/lock/collapse toggles) do not: call
//! [`SceneStore::begin_gesture`] once before a drag so the whole gesture undoes
//! as one step.

mod display;
mod drawing_ops;
pub mod exchange;
mod group_ops;
pub mod history;
mod shape_ops;
mod view_ops;

pub use display::{default_name, shape_display_name, shape_icon, short_id, surface_name};
pub use history::{History, DEFAULT_HISTORY_LIMIT};

use std::sync::Arc;

use shared::{CameraRequest, SceneSettings, Shape, ShapeType, TransformMode, Vec3, ViewMode};

use super::drawing::DrawingState;
use super::selection::SelectionState;
use super::settings::AppSettings;

/// Immutable view of the whole shape collection at one instant
pub type Snapshot = Arc<Vec<Shape>>;

/// Default offset applied by duplicate/paste on X and Z
pub const DEFAULT_DUPLICATE_OFFSET: f64 = 2.0;

/// Scene state with shapes, selection and undo/redo history
#[derive(Debug, Clone)]
pub struct SceneStore {
    /// Current shape collection
    shapes: Snapshot,
    pub(crate) history: History,
    pub(crate) selection: SelectionState,
    pub(crate) drawing: DrawingState,
    /// Single-slot clipboard written by `copy`
    pub(crate) clipboard: Option<Shape>,
    pub(crate) camera_request: Option<CameraRequest>,
    pub(crate) next_camera_request_id: u64,
    pub(crate) view_mode: ViewMode,
    pub(crate) transform_mode: TransformMode,
    pub(crate) settings: SceneSettings,
    pub(crate) duplicate_offset: f64,
    /// Monotonically increasing version counter for cache invalidation
    pub(crate) version: u64,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneStore {
    /// Store with the default scene (a single box)
    pub fn new() -> Self {
        let mut store = Self::empty();
        store.shapes = Arc::new(vec![Self::default_box()]);
        store
    }

    /// Store with no shapes at all
    pub fn empty() -> Self {
        Self {
            shapes: Arc::new(Vec::new()),
            history: History::default(),
            selection: SelectionState::default(),
            drawing: DrawingState::default(),
            clipboard: None,
            camera_request: None,
            next_camera_request_id: 1,
            view_mode: ViewMode::default(),
            transform_mode: TransformMode::default(),
            settings: SceneSettings::default(),
            duplicate_offset: DEFAULT_DUPLICATE_OFFSET,
            version: 0,
        }
    }

    /// Default store configured from application settings
    pub fn with_settings(settings: &AppSettings) -> Self {
        let mut store = Self::new();
        store.history = History::new(settings.history_limit);
        store.settings = settings.scene.clone();
        store.duplicate_offset = settings.duplicate_offset;
        store
    }

    /// Store seeded with the given shapes (no history)
    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        let mut store = Self::empty();
        store.shapes = Arc::new(shapes);
        store
    }

    fn default_box() -> Shape {
        let mut shape = Shape::new(ShapeType::Box, default_name(ShapeType::Box, 0));
        shape.position = default_position(ShapeType::Box);
        shape
    }

    // ── Readers ───────────────────────────────────────────────

    /// Current version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Current shapes
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Cheap handle to the current collection; never changes after it is taken
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.shapes)
    }

    /// Get a shape by ID
    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Direct children of a group
    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Shape> + 'a {
        self.shapes
            .iter()
            .filter(move |s| s.parent_id.as_deref() == Some(id))
    }

    /// Number of shapes of a given type
    pub fn count_of(&self, kind: ShapeType) -> usize {
        self.shapes.iter().filter(|s| s.kind == kind).count()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Selected shapes in selection order
    pub fn selected_shapes(&self) -> Vec<&Shape> {
        self.selection
            .all()
            .iter()
            .filter_map(|id| self.shape(id))
            .collect()
    }

    pub fn clipboard(&self) -> Option<&Shape> {
        self.clipboard.as_ref()
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.is_active()
    }

    /// Points accumulated by the digitizer
    pub fn drawing_points(&self) -> &[Vec3] {
        self.drawing.points()
    }

    // ── Internal mutation helpers ─────────────────────────────

    /// Save current state to undo stack
    pub(crate) fn save_undo(&mut self) {
        self.history.snapshot(Arc::clone(&self.shapes));
    }

    /// Writable collection; copies it first if a snapshot still shares it
    pub(crate) fn shapes_mut(&mut self) -> &mut Vec<Shape> {
        self.version += 1;
        Arc::make_mut(&mut self.shapes)
    }

    /// Replace one shape by id with the result of `f`; false if id is absent
    pub(crate) fn replace_shape(&mut self, id: &str, f: impl FnOnce(&Shape) -> Shape) -> bool {
        let Some(index) = self.shapes.iter().position(|s| s.id == id) else {
            return false;
        };
        let next = f(&self.shapes[index]);
        self.shapes_mut()[index] = next;
        true
    }

    pub(crate) fn set_shapes(&mut self, shapes: Vec<Shape>) {
        self.shapes = Arc::new(shapes);
        self.version += 1;
    }
}

/// Default position for a new shape of `kind`: volumetric primitives sit on the ground
pub fn default_position(kind: ShapeType) -> Vec3 {
    if kind.is_volumetric() {
        [0.0, 0.5, 0.0]
    } else {
        [0.0; 3]
    }
}

/// Default rotation for a new shape of `kind`: planes and images lie flat
pub fn default_rotation(kind: ShapeType) -> Vec3 {
    if kind.lies_flat() {
        [-std::f64::consts::FRAC_PI_2, 0.0, 0.0]
    } else {
        [0.0; 3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_has_default_box() {
        let store = SceneStore::new();
        assert_eq!(store.shapes().len(), 1);
        let b = &store.shapes()[0];
        assert_eq!(b.kind, ShapeType::Box);
        assert_eq!(b.name, "Box 01");
        assert_eq!(b.position, [0.0, 0.5, 0.0]);
        assert!(store.selection().is_empty());
        assert!(!store.can_undo());
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let mut store = SceneStore::new();
        let before = store.snapshot();
        let id = store.shapes()[0].id.clone();
        store.update_shape(&id, &shared::ShapePatch::position([5.0, 0.0, 5.0]));
        assert_eq!(before[0].position, [0.0, 0.5, 0.0]);
        assert_eq!(store.shapes()[0].position, [5.0, 0.0, 5.0]);
    }

    #[test]
    fn test_default_placement() {
        assert_eq!(default_position(ShapeType::Sphere), [0.0, 0.5, 0.0]);
        assert_eq!(default_position(ShapeType::Tree), [0.0; 3]);
        assert_eq!(default_position(ShapeType::Image), [0.0; 3]);
        assert_eq!(default_rotation(ShapeType::Plane)[0], -std::f64::consts::FRAC_PI_2);
        assert_eq!(default_rotation(ShapeType::Box), [0.0; 3]);
    }

    #[test]
    fn test_children_of() {
        let mut a = Shape::new(ShapeType::Box, "a");
        let g = Shape::new(ShapeType::Group, "g");
        a.parent_id = Some(g.id.clone());
        let b = Shape::new(ShapeType::Box, "b");
        let gid = g.id.clone();
        let store = SceneStore::from_shapes(vec![a, g, b]);
        let names: Vec<&str> = store.children_of(&gid).map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
    }
}
