//! Scene invariant validation.
//!
//! `SceneValidator` checks a shape collection against the data-model
//! invariants: unique ids, parents that exist and are groups, acyclic parent
//! chains, opacity in range and custom polygons with at least three points.

use std::collections::{HashMap, HashSet};

use shared::{Shape, ShapeId, ShapeType};

use crate::state::drawing::MIN_POLYGON_POINTS;

/// Validator for a shape collection.
pub struct SceneValidator<'a> {
    shapes: &'a [Shape],
}

impl<'a> SceneValidator<'a> {
    /// Create a new validator for the given shapes.
    pub fn new(shapes: &'a [Shape]) -> Self {
        Self { shapes }
    }

    fn by_id(&self) -> HashMap<&'a str, &'a Shape> {
        self.shapes.iter().map(|s| (s.id.as_str(), s)).collect()
    }

    /// Ids that appear more than once.
    pub fn duplicate_ids(&self) -> Vec<ShapeId> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for shape in self.shapes {
            if !seen.insert(shape.id.as_str()) && !duplicates.contains(&shape.id) {
                duplicates.push(shape.id.clone());
            }
        }
        duplicates
    }

    /// Shapes whose `parent_id` names no shape in the collection.
    pub fn dangling_parents(&self) -> Vec<&'a Shape> {
        let index = self.by_id();
        self.shapes
            .iter()
            .filter(|s| matches!(&s.parent_id, Some(p) if !index.contains_key(p.as_str())))
            .collect()
    }

    /// Shapes whose parent exists but is not a group.
    pub fn non_group_parents(&self) -> Vec<&'a Shape> {
        let index = self.by_id();
        self.shapes
            .iter()
            .filter(|s| {
                s.parent_id
                    .as_deref()
                    .and_then(|p| index.get(p))
                    .is_some_and(|parent| !parent.is_group())
            })
            .collect()
    }

    /// Shapes that are their own ancestor.
    pub fn cyclic_shapes(&self) -> Vec<&'a Shape> {
        let index = self.by_id();
        self.shapes
            .iter()
            .filter(|shape| {
                let mut seen = HashSet::new();
                let mut current = shape.parent_id.as_deref();
                while let Some(id) = current {
                    if id == shape.id {
                        return true;
                    }
                    if !seen.insert(id) {
                        return false;
                    }
                    current = index.get(id).and_then(|s| s.parent_id.as_deref());
                }
                false
            })
            .collect()
    }

    /// Shapes whose opacity lies outside [0, 1].
    pub fn opacity_out_of_range(&self) -> Vec<&'a Shape> {
        self.shapes
            .iter()
            .filter(|s| !(0.0..=1.0).contains(&s.opacity))
            .collect()
    }

    /// Custom shapes with fewer than three points.
    pub fn degenerate_polygons(&self) -> Vec<&'a Shape> {
        self.shapes
            .iter()
            .filter(|s| {
                s.kind == ShapeType::Custom
                    && s.points.as_ref().map_or(0, Vec::len) < MIN_POLYGON_POINTS
            })
            .collect()
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the scene is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for id in self.duplicate_ids() {
            errors.push(format!("Duplicate shape id {id}"));
        }
        for shape in self.dangling_parents() {
            errors.push(format!(
                "Shape '{}' references missing parent {}",
                shape.name,
                shape.parent_id.as_deref().unwrap_or_default()
            ));
        }
        for shape in self.non_group_parents() {
            errors.push(format!("Shape '{}' has a parent that is not a group", shape.name));
        }
        for shape in self.cyclic_shapes() {
            errors.push(format!("Shape '{}' is its own ancestor", shape.name));
        }
        for shape in self.opacity_out_of_range() {
            errors.push(format!(
                "Shape '{}' has opacity {} outside [0, 1]",
                shape.name, shape.opacity
            ));
        }
        for shape in self.degenerate_polygons() {
            errors.push(format!(
                "Surface '{}' has fewer than {MIN_POLYGON_POINTS} points",
                shape.name
            ));
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate_all().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(kind: ShapeType, name: &str) -> Shape {
        Shape::new(kind, name)
    }

    #[test]
    fn test_valid_scene() {
        let group = shape(ShapeType::Group, "g");
        let mut child = shape(ShapeType::Box, "a");
        child.parent_id = Some(group.id.clone());
        let shapes = vec![group, child];
        assert!(SceneValidator::new(&shapes).is_valid());
    }

    #[test]
    fn test_duplicate_ids() {
        let a = shape(ShapeType::Box, "a");
        let mut b = shape(ShapeType::Box, "b");
        b.id = a.id.clone();
        let shapes = vec![a.clone(), b, a];
        let v = SceneValidator::new(&shapes);
        assert_eq!(v.duplicate_ids().len(), 1);
        assert_eq!(v.validate_all().len(), 1);
    }

    #[test]
    fn test_parent_checks() {
        let box_parent = shape(ShapeType::Box, "p");
        let mut a = shape(ShapeType::Sphere, "a");
        a.parent_id = Some(box_parent.id.clone());
        let mut b = shape(ShapeType::Sphere, "b");
        b.parent_id = Some("missing".to_string());
        let shapes = vec![box_parent, a, b];
        let v = SceneValidator::new(&shapes);
        assert_eq!(v.non_group_parents()[0].name, "a");
        assert_eq!(v.dangling_parents()[0].name, "b");
    }

    #[test]
    fn test_cycle_detected() {
        let mut g1 = shape(ShapeType::Group, "g1");
        let mut g2 = shape(ShapeType::Group, "g2");
        g1.parent_id = Some(g2.id.clone());
        g2.parent_id = Some(g1.id.clone());
        let outside = {
            let mut s = shape(ShapeType::Box, "c");
            s.parent_id = Some(g1.id.clone());
            s
        };
        let shapes = vec![g1, g2, outside];
        let names: Vec<&str> = SceneValidator::new(&shapes)
            .cyclic_shapes()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["g1", "g2"]);
    }

    #[test]
    fn test_opacity_and_polygon() {
        let mut a = shape(ShapeType::Box, "a");
        a.opacity = 1.5;
        let mut s = shape(ShapeType::Custom, "Surface 1");
        s.points = Some(vec![[0.0; 3], [1.0, 0.0, 0.0]]);
        let shapes = vec![a, s];
        let errors = SceneValidator::new(&shapes).validate_all();
        assert_eq!(errors.len(), 2);
        assert!(errors[1].contains("Surface 1"));
    }
}
