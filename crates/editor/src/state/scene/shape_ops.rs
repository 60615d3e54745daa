//! Shape CRUD operations

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use shared::{Shape, ShapeId, ShapePatch, ShapeType};

use super::exchange::break_parent_cycles;
use super::{default_name, default_position, default_rotation, SceneStore};

impl SceneStore {
    /// Create a new shape of `kind`, merge `overrides` and select it
    pub fn add_shape(&mut self, kind: ShapeType, overrides: &ShapePatch) -> ShapeId {
        let overrides = self.checked_patch(None, overrides);
        self.save_undo();

        let mut shape = Shape::new(kind, default_name(kind, self.count_of(kind)));
        shape.position = default_position(kind);
        shape.rotation = default_rotation(kind);
        let shape = overrides.apply(&shape);
        let id = shape.id.clone();

        tracing::debug!(id = %id, name = %shape.name, "add shape");
        self.shapes_mut().push(shape);
        self.selection.select(id.clone());
        id
    }

    /// Append prepared shapes as one undo step and select the last one.
    ///
    /// Empty or already taken ids are replaced with fresh ones; references
    /// inside the batch follow a replaced id. Parents that do not resolve to a
    /// group are dropped. Returns the ids as stored.
    pub fn add_shapes(&mut self, shapes: Vec<Shape>) -> Vec<ShapeId> {
        if shapes.is_empty() {
            return Vec::new();
        }

        let mut taken: HashSet<ShapeId> = self.shapes().iter().map(|s| s.id.clone()).collect();
        let mut renamed: HashMap<ShapeId, ShapeId> = HashMap::new();
        let mut batch: Vec<Shape> = Vec::with_capacity(shapes.len());
        for shape in shapes {
            let shape = if shape.id.is_empty() || taken.contains(&shape.id) {
                let fresh = shape.with_fresh_id();
                // First occurrence in the batch owns the remapping
                if !shape.id.is_empty() && self.shape(&shape.id).is_some() {
                    renamed.entry(shape.id.clone()).or_insert_with(|| fresh.id.clone());
                }
                fresh
            } else {
                shape
            };
            taken.insert(shape.id.clone());
            batch.push(shape.sanitized());
        }

        let groups: HashSet<ShapeId> = self
            .shapes()
            .iter()
            .chain(batch.iter())
            .filter(|s| s.is_group())
            .map(|s| s.id.clone())
            .collect();
        for shape in &mut batch {
            let parent = shape
                .parent_id
                .take()
                .map(|p| renamed.get(&p).cloned().unwrap_or(p));
            shape.parent_id = match parent {
                Some(p) if groups.contains(&p) && p != shape.id => Some(p),
                Some(p) => {
                    tracing::warn!(shape = %shape.name, parent = %p, "dropping invalid parent");
                    None
                }
                None => None,
            };
        }
        break_parent_cycles(&mut batch);

        let ids: Vec<ShapeId> = batch.iter().map(|s| s.id.clone()).collect();
        self.save_undo();
        tracing::debug!(count = ids.len(), "add shapes");
        self.shapes_mut().extend(batch);
        if let Some(last) = ids.last() {
            self.selection.select(last.clone());
        }
        ids
    }

    /// Shallow-merge `patch` into a shape. Does not record undo (see `begin_gesture`).
    ///
    /// A `parent_id` that would not name a group outside the shape's own
    /// subtree is ignored, as is turning a group with children into another type.
    pub fn update_shape(&mut self, id: &str, patch: &ShapePatch) -> bool {
        let patch = self.checked_patch(Some(id), patch);
        self.replace_shape(id, |shape| patch.apply(shape))
    }

    /// `patch` with the tree-breaking fields removed for shape `id` (`None` for a new shape)
    fn checked_patch<'p>(&self, id: Option<&str>, patch: &'p ShapePatch) -> Cow<'p, ShapePatch> {
        let bad_parent = match &patch.parent_id {
            Some(Some(parent)) => !self.accepts_parent(id, parent),
            _ => false,
        };
        let bad_kind = match (patch.kind, id) {
            (Some(kind), Some(id)) => {
                kind != ShapeType::Group
                    && self.shape(id).is_some_and(Shape::is_group)
                    && self.children_of(id).next().is_some()
            }
            _ => false,
        };
        if !bad_parent && !bad_kind {
            return Cow::Borrowed(patch);
        }

        let mut patch = patch.clone();
        if bad_parent {
            tracing::warn!(shape = ?id, parent = ?patch.parent_id, "ignoring invalid parent");
            patch.parent_id = None;
        }
        if bad_kind {
            tracing::warn!(shape = ?id, "ignoring type change of a non-empty group");
            patch.kind = None;
        }
        Cow::Owned(patch)
    }

    /// Whether `parent` can hold shape `id`: an existing group outside the shape's subtree
    fn accepts_parent(&self, id: Option<&str>, parent: &str) -> bool {
        if !self.shape(parent).is_some_and(Shape::is_group) {
            return false;
        }
        match id {
            Some(id) => !self.descendants_closure(&[id.to_string()]).contains(parent),
            None => true,
        }
    }

    /// Toggle shape visibility (not undoable)
    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        self.replace_shape(id, |shape| Shape {
            visible: !shape.visible,
            ..shape.clone()
        })
    }

    /// Toggle shape lock (not undoable)
    pub fn toggle_lock(&mut self, id: &str) -> bool {
        self.replace_shape(id, |shape| Shape {
            locked: !shape.locked,
            ..shape.clone()
        })
    }

    /// Ids of `roots` plus every shape that descends from them through `parent_id`
    pub fn descendants_closure(&self, roots: &[ShapeId]) -> HashSet<ShapeId> {
        let mut closure: HashSet<ShapeId> = roots.iter().cloned().collect();
        loop {
            let before = closure.len();
            for shape in self.shapes() {
                if let Some(parent) = &shape.parent_id {
                    if closure.contains(parent) {
                        closure.insert(shape.id.clone());
                    }
                }
            }
            if closure.len() == before {
                return closure;
            }
        }
    }

    /// Delete the selected shapes and all of their descendants
    pub fn delete_selected(&mut self) -> Vec<ShapeId> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let closure = self.descendants_closure(self.selection.all());

        self.save_undo();
        let removed: Vec<ShapeId> = self
            .shapes()
            .iter()
            .filter(|s| closure.contains(&s.id))
            .map(|s| s.id.clone())
            .collect();
        self.shapes_mut().retain(|s| !closure.contains(&s.id));
        self.selection.clear();

        tracing::debug!(count = removed.len(), "delete selected");
        removed
    }

    /// Duplicate every selected shape; groups bring copies of their direct children.
    ///
    /// Returns the new top-level ids, which become the selection.
    pub fn duplicate_selected(&mut self, with_offset: bool) -> Vec<ShapeId> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let offset = if with_offset { self.duplicate_offset } else { 0.0 };

        let mut created = Vec::new();
        let mut top_level = Vec::new();
        for id in self.selection.all() {
            // Already copied as a child of a selected ancestor
            if self.has_selected_ancestor(id) {
                continue;
            }
            let Some(source) = self.shape(id) else {
                continue;
            };
            let mut copy = source.with_fresh_id();
            copy.name = format!("{} (Copy)", source.name);
            copy.position[0] += offset;
            copy.position[2] += offset;
            top_level.push(copy.id.clone());

            let children: Vec<Shape> = if source.is_group() {
                self.children_of(&source.id)
                    .map(|child| Shape {
                        parent_id: Some(copy.id.clone()),
                        ..child.with_fresh_id()
                    })
                    .collect()
            } else {
                Vec::new()
            };
            created.push(copy);
            created.extend(children);
        }
        if top_level.is_empty() {
            return top_level;
        }

        self.save_undo();
        tracing::debug!(count = created.len(), "duplicate selected");
        self.shapes_mut().extend(created);
        self.selection.set(top_level.iter().cloned());
        top_level
    }

    fn has_selected_ancestor(&self, id: &str) -> bool {
        let mut current = self.shape(id).and_then(|s| s.parent_id.as_deref());
        let mut steps = 0;
        while let Some(parent) = current {
            if steps >= self.shapes().len() {
                return false;
            }
            if self.selection.is_selected(parent) {
                return true;
            }
            current = self.shape(parent).and_then(|s| s.parent_id.as_deref());
            steps += 1;
        }
        false
    }

    /// Put the primary selected shape into the clipboard
    pub fn copy(&mut self) {
        if let Some(shape) = self.selection.primary().and_then(|id| self.shape(id)) {
            self.clipboard = Some(shape.clone());
        }
    }

    /// Paste: duplicates the current selection with an offset.
    ///
    /// The clipboard written by `copy` is not consulted.
    pub fn paste(&mut self) -> Vec<ShapeId> {
        self.duplicate_selected(true)
    }

    /// Replace the scene with a single default box and forget history
    pub fn reset_scene(&mut self) {
        self.set_shapes(vec![Self::default_box()]);
        self.selection.clear();
        self.history.clear();
        self.clipboard = None;
        self.drawing.cancel();
        tracing::info!("scene reset");
    }

    // ── Selection ─────────────────────────────────────────────

    /// Pointer selection: `None` clears, `multi` toggles, otherwise select only `id`
    pub fn select(&mut self, id: Option<&str>, multi: bool) {
        match id {
            Some(id) if self.shape(id).is_some() => self.selection.click(id.to_string(), multi),
            Some(_) => {}
            None => self.selection.clear(),
        }
    }

    /// Replace the selection; unknown ids are dropped
    pub fn set_selection(&mut self, ids: &[ShapeId]) {
        let known: Vec<ShapeId> = ids
            .iter()
            .filter(|id| self.shape(id).is_some())
            .cloned()
            .collect();
        self.selection.set(known);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::SceneValidator;

    fn store() -> SceneStore {
        SceneStore::empty()
    }

    #[test]
    fn test_add_shape_defaults() {
        let mut s = store();
        let id = s.add_shape(ShapeType::Box, &ShapePatch::default());
        let shape = s.shape(&id).unwrap();
        assert_eq!(shape.name, "Box 01");
        assert_eq!(shape.position, [0.0, 0.5, 0.0]);
        assert_eq!(s.selection().all(), &[id.clone()]);
        assert!(s.can_undo());

        let id2 = s.add_shape(ShapeType::Box, &ShapePatch::default());
        assert_eq!(s.shape(&id2).unwrap().name, "Box 02");
        let plane = s.add_shape(ShapeType::Plane, &ShapePatch::default());
        let plane = s.shape(&plane).unwrap();
        assert_eq!(plane.name, "Plane 01");
        assert_eq!(plane.position, [0.0; 3]);
        assert_eq!(plane.rotation[0], -std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_add_shape_overrides() {
        let mut s = store();
        let patch = ShapePatch {
            name: Some("Tower".to_string()),
            position: Some([3.0, 0.0, 1.0]),
            opacity: Some(4.0),
            ..Default::default()
        };
        let id = s.add_shape(ShapeType::Cylinder, &patch);
        let shape = s.shape(&id).unwrap();
        assert_eq!(shape.name, "Tower");
        assert_eq!(shape.position, [3.0, 0.0, 1.0]);
        assert_eq!(shape.opacity, 1.0);
    }

    #[test]
    fn test_add_shapes_selects_last() {
        let mut s = store();
        let a = Shape::new(ShapeType::Model, "a");
        let b = Shape::new(ShapeType::Model, "b");
        let b_id = b.id.clone();
        s.add_shapes(vec![a, b]);
        assert_eq!(s.shapes().len(), 2);
        assert_eq!(s.selection().all(), &[b_id]);
        assert_eq!(s.history_len(), (1, 0));

        s.add_shapes(Vec::new());
        assert_eq!(s.history_len(), (1, 0));
    }

    #[test]
    fn test_add_shapes_replaces_taken_ids() {
        let mut s = store();
        let shape = Shape::new(ShapeType::Model, "tower");
        let first = s.add_shapes(vec![shape.clone()]);
        assert_eq!(first, vec![shape.id.clone()]);

        let second = s.add_shapes(vec![shape.clone(), shape.clone()]);
        assert_eq!(second.len(), 2);
        assert!(!second.contains(&shape.id));
        assert_ne!(second[0], second[1]);
        assert_eq!(s.shapes().len(), 3);
        assert!(SceneValidator::new(s.shapes()).validate_all().is_empty());

        let unnamed = Shape { id: String::new(), ..Shape::new(ShapeType::Box, "b") };
        let ids = s.add_shapes(vec![unnamed]);
        assert!(!ids[0].is_empty());
    }

    #[test]
    fn test_add_shapes_remaps_batch_parents() {
        let mut s = store();
        let group = Shape::new(ShapeType::Group, "Group 01");
        let child = Shape {
            parent_id: Some(group.id.clone()),
            ..Shape::new(ShapeType::Box, "Box 01")
        };
        s.add_shapes(vec![group.clone(), child.clone()]);

        // Same ids again: the copy of the child follows the renamed group
        let ids = s.add_shapes(vec![group, child]);
        assert_eq!(s.shape(&ids[1]).unwrap().parent_id.as_deref(), Some(ids[0].as_str()));

        let orphan = Shape {
            parent_id: Some("missing".to_string()),
            ..Shape::new(ShapeType::Box, "Box 02")
        };
        let box_parent = Shape {
            parent_id: Some(ids[1].clone()),
            ..Shape::new(ShapeType::Box, "Box 03")
        };
        let ids = s.add_shapes(vec![orphan, box_parent]);
        assert!(ids.iter().all(|id| s.shape(id).unwrap().parent_id.is_none()));
        assert!(SceneValidator::new(s.shapes()).validate_all().is_empty());
    }

    #[test]
    fn test_update_shape_rejects_bad_parent() {
        let mut s = store();
        let a = s.add_shape(ShapeType::Box, &ShapePatch::default());
        let b = s.add_shape(ShapeType::Box, &ShapePatch::default());
        s.set_selection(&[a.clone(), b.clone()]);
        let g = s.group_selected().unwrap();

        let reparent = |p: &str| ShapePatch {
            parent_id: Some(Some(p.to_string())),
            position: Some([7.0, 0.0, 0.0]),
            ..Default::default()
        };
        // Itself, a non-group, an unknown id and its own descendant
        s.update_shape(&a, &reparent(&a));
        s.update_shape(&a, &reparent(&b));
        s.update_shape(&a, &reparent("missing"));
        let other = s.add_shape(ShapeType::Box, &ShapePatch::default());
        s.set_selection(&[g.clone(), other]);
        let outer = s.group_selected().unwrap();
        s.update_shape(&outer, &reparent(&g));

        assert_eq!(s.shape(&a).unwrap().parent_id.as_deref(), Some(g.as_str()));
        // The rest of the patch still applies
        assert_eq!(s.shape(&a).unwrap().position, [7.0, 0.0, 0.0]);
        assert!(s.shape(&outer).unwrap().parent_id.is_none());
        assert!(SceneValidator::new(s.shapes()).validate_all().is_empty());

        // Detaching and moving under a real group are accepted
        let detach = ShapePatch { parent_id: Some(None), ..Default::default() };
        s.update_shape(&a, &detach);
        assert!(s.shape(&a).unwrap().parent_id.is_none());
        s.update_shape(&a, &reparent(&outer));
        assert_eq!(s.shape(&a).unwrap().parent_id.as_deref(), Some(outer.as_str()));
    }

    #[test]
    fn test_update_shape_keeps_non_empty_group_type() {
        let mut s = store();
        let a = s.add_shape(ShapeType::Box, &ShapePatch::default());
        let b = s.add_shape(ShapeType::Box, &ShapePatch::default());
        s.set_selection(&[a, b]);
        let g = s.group_selected().unwrap();
        let patch = ShapePatch { kind: Some(ShapeType::Box), ..Default::default() };
        s.update_shape(&g, &patch);
        assert!(s.shape(&g).unwrap().is_group());
    }

    #[test]
    fn test_add_shape_rejects_bad_parent() {
        let mut s = store();
        let a = s.add_shape(ShapeType::Box, &ShapePatch::default());
        let patch = ShapePatch { parent_id: Some(Some(a)), ..Default::default() };
        let id = s.add_shape(ShapeType::Sphere, &patch);
        assert!(s.shape(&id).unwrap().parent_id.is_none());
    }

    #[test]
    fn test_update_shape_no_history() {
        let mut s = store();
        let id = s.add_shape(ShapeType::Box, &ShapePatch::default());
        let (past, _) = s.history_len();
        assert!(s.update_shape(&id, &ShapePatch::position([1.0, 1.0, 1.0])));
        assert_eq!(s.history_len().0, past);
        assert_eq!(s.shape(&id).unwrap().position, [1.0, 1.0, 1.0]);
        assert!(!s.update_shape("missing", &ShapePatch::position([0.0; 3])));
    }

    #[test]
    fn test_toggles() {
        let mut s = store();
        let id = s.add_shape(ShapeType::Box, &ShapePatch::default());
        let past = s.history_len().0;
        s.toggle_visibility(&id);
        s.toggle_lock(&id);
        let shape = s.shape(&id).unwrap();
        assert!(!shape.visible);
        assert!(shape.locked);
        assert_eq!(s.history_len().0, past);
        assert!(!s.toggle_visibility("missing"));
    }

    #[test]
    fn test_duplicate_offset() {
        let mut s = store();
        let id = s.add_shape(ShapeType::Box, &ShapePatch::position([0.0; 3]));

        let copies = s.duplicate_selected(true);
        assert_eq!(copies.len(), 1);
        let copy = s.shape(&copies[0]).unwrap();
        assert_eq!(copy.position, [2.0, 0.0, 2.0]);
        assert_eq!(copy.name, "Box 01 (Copy)");
        assert_ne!(copy.id, id);

        s.set_selection(&[id]);
        let copies = s.duplicate_selected(false);
        assert_eq!(s.shape(&copies[0]).unwrap().position, [0.0; 3]);
        assert_eq!(s.selection().all(), copies.as_slice());
    }

    #[test]
    fn test_duplicate_group_with_selected_child() {
        let mut s = store();
        let a = s.add_shape(ShapeType::Box, &ShapePatch::position([1.0, 0.0, 0.0]));
        let b = s.add_shape(ShapeType::Box, &ShapePatch::position([3.0, 0.0, 0.0]));
        s.set_selection(&[a.clone(), b]);
        let g = s.group_selected().unwrap();

        s.set_selection(&[g.clone(), a]);
        let copies = s.duplicate_selected(true);
        assert_eq!(copies.len(), 1);
        assert_eq!(s.shapes().len(), 6);
        assert_eq!(s.children_of(&copies[0]).count(), 2);
    }

    #[test]
    fn test_duplicate_empty_selection_noop() {
        let mut s = store();
        assert!(s.duplicate_selected(true).is_empty());
        assert!(!s.can_undo());
    }

    #[test]
    fn test_select_ignores_unknown_id() {
        let mut s = store();
        let id = s.add_shape(ShapeType::Box, &ShapePatch::default());
        s.select(Some("missing"), false);
        assert_eq!(s.selection().all(), &[id]);
        s.select(None, false);
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_reset_scene() {
        let mut s = store();
        s.add_shape(ShapeType::Sphere, &ShapePatch::default());
        s.add_shape(ShapeType::Cone, &ShapePatch::default());
        s.copy();
        s.reset_scene();
        assert_eq!(s.shapes().len(), 1);
        assert_eq!(s.shapes()[0].kind, ShapeType::Box);
        assert!(s.selection().is_empty());
        assert!(!s.can_undo());
        assert!(!s.can_redo());
        assert!(s.clipboard().is_none());
    }
}
