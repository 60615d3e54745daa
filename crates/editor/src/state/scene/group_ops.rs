//! Group/ungroup operations

use shared::{Shape, ShapeId, ShapeType};

use super::{default_name, SceneStore};
use crate::state::grouping;

impl SceneStore {
    /// Group the selected shapes around their centroid and select the new group
    pub fn group_selected(&mut self) -> Option<ShapeId> {
        let members: Vec<ShapeId> = self
            .selection
            .all()
            .iter()
            .filter(|id| self.shape(id).is_some())
            .cloned()
            .collect();
        if members.len() < 2 {
            return None;
        }

        let name = default_name(ShapeType::Group, self.count_of(ShapeType::Group));
        let mut shapes = self.shapes().to_vec();
        let group_id = grouping::group(&mut shapes, &members, name)?;

        self.save_undo();
        self.set_shapes(shapes);
        self.selection.select(group_id.clone());
        tracing::debug!(group = %group_id, members = members.len(), "group selected");
        Some(group_id)
    }

    /// Dissolve the single selected group and select its former children
    pub fn ungroup_selected(&mut self) -> Option<Vec<ShapeId>> {
        if self.selection.count() != 1 {
            return None;
        }
        let group_id = self
            .selection
            .primary()
            .and_then(|id| self.shape(id))
            .filter(|s| s.is_group())
            .map(|s| s.id.clone())?;

        let mut shapes = self.shapes().to_vec();
        let children = grouping::ungroup(&mut shapes, &group_id)?;

        self.save_undo();
        self.set_shapes(shapes);
        self.selection.set(children.iter().cloned());
        tracing::debug!(group = %group_id, children = children.len(), "ungroup selected");
        Some(children)
    }

    /// Flip the tree expand/collapse flag of a group (UI only, not undoable)
    pub fn toggle_group_collapse(&mut self, id: &str) -> bool {
        self.replace_shape(id, |shape| Shape {
            collapsed: !shape.collapsed,
            ..shape.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use shared::ShapePatch;

    use super::*;

    fn store_with(positions: &[[f64; 3]]) -> (SceneStore, Vec<ShapeId>) {
        let mut s = SceneStore::empty();
        let ids = positions
            .iter()
            .map(|p| s.add_shape(ShapeType::Box, &ShapePatch::position(*p)))
            .collect();
        (s, ids)
    }

    #[test]
    fn test_group_and_ungroup() {
        let (mut s, ids) = store_with(&[[1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        s.set_selection(&ids);

        let gid = s.group_selected().unwrap();
        assert_eq!(s.selection().all(), &[gid.clone()]);
        let g = s.shape(&gid).unwrap();
        assert_eq!(g.name, "Group 01");
        assert_eq!(g.position, [2.0, 0.0, 0.0]);
        assert_eq!(s.shape(&ids[0]).unwrap().position, [-1.0, 0.0, 0.0]);
        assert_eq!(s.shape(&ids[1]).unwrap().position, [1.0, 0.0, 0.0]);

        let children = s.ungroup_selected().unwrap();
        assert_eq!(children, ids);
        assert_eq!(s.selection().all(), ids.as_slice());
        assert!(s.shape(&gid).is_none());
        assert_eq!(s.shape(&ids[0]).unwrap().position, [1.0, 0.0, 0.0]);
        assert_eq!(s.shape(&ids[1]).unwrap().position, [3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_group_requires_two() {
        let (mut s, ids) = store_with(&[[1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        s.set_selection(&ids[..1]);
        let past = s.history_len().0;
        assert!(s.group_selected().is_none());
        assert_eq!(s.history_len().0, past);
    }

    #[test]
    fn test_ungroup_requires_single_group() {
        let (mut s, ids) = store_with(&[[1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        s.set_selection(&ids[..1]);
        assert!(s.ungroup_selected().is_none());

        s.set_selection(&ids);
        let gid = s.group_selected().unwrap();
        s.set_selection(&[gid, ids[0].clone()]);
        assert!(s.ungroup_selected().is_none());
    }

    #[test]
    fn test_group_undo_restores_world_positions() {
        let (mut s, ids) = store_with(&[[1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        s.set_selection(&ids);
        s.group_selected().unwrap();
        assert!(s.undo());
        assert_eq!(s.shapes().len(), 2);
        assert_eq!(s.shape(&ids[0]).unwrap().position, [1.0, 0.0, 0.0]);
        assert!(s.shape(&ids[0]).unwrap().parent_id.is_none());
    }

    #[test]
    fn test_grouping_nested_member_keeps_world_position() {
        let (mut s, ids) = store_with(&[[0.0, 0.0, 0.0], [4.0, 0.0, 0.0]]);
        s.set_selection(&ids);
        let inner = s.group_selected().unwrap();
        let outside = s.add_shape(ShapeType::Box, &ShapePatch::position([10.0, 0.0, 0.0]));

        s.set_selection(&[ids[0].clone(), outside.clone()]);
        let outer = s.group_selected().unwrap();
        // Mean of world positions (0 + 10) / 2
        assert_eq!(s.shape(&outer).unwrap().position, [5.0, 0.0, 0.0]);
        let a = s.shape(&ids[0]).unwrap();
        assert_eq!(a.parent_id.as_deref(), Some(outer.as_str()));
        assert_eq!(a.position, [-5.0, 0.0, 0.0]);
        assert_eq!(s.shape(&outside).unwrap().position, [5.0, 0.0, 0.0]);
        // b stays under the inner group
        assert_eq!(s.shape(&ids[1]).unwrap().parent_id.as_deref(), Some(inner.as_str()));
        assert!(crate::validation::SceneValidator::new(s.shapes()).validate_all().is_empty());
    }

    #[test]
    fn test_toggle_group_collapse() {
        let (mut s, ids) = store_with(&[[0.0; 3], [1.0, 0.0, 0.0]]);
        s.set_selection(&ids);
        let gid = s.group_selected().unwrap();
        let past = s.history_len().0;
        assert!(s.toggle_group_collapse(&gid));
        assert!(s.shape(&gid).unwrap().collapsed);
        assert_eq!(s.history_len().0, past);
    }
}
