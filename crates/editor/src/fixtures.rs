//! Factory functions for creating test data.
//!
//! Provides helpers to construct `Shape`, `SceneDocument` and digitizer
//! inputs used in tests and by the command protocol.

use shared::*;

// ── Shape factories ─────────────────────────────────────────────

/// Shape of any kind at a position.
pub fn shape_at(kind: ShapeType, name: &str, pos: Vec3) -> Shape {
    Shape {
        position: pos,
        ..Shape::new(kind, name)
    }
}

/// Box at a position.
pub fn box_at(name: &str, pos: Vec3) -> Shape {
    shape_at(ShapeType::Box, name, pos)
}

/// Unit box resting on the ground at the origin.
pub fn unit_box(name: &str) -> Shape {
    box_at(name, [0.0, 0.5, 0.0])
}

/// Tree at a position.
pub fn tree_at(name: &str, pos: Vec3) -> Shape {
    shape_at(ShapeType::Tree, name, pos)
}

/// Imported model node.
pub fn model_node(name: &str, url: &str, node: Option<&str>) -> Shape {
    Shape {
        model_url: Some(url.to_string()),
        model_node_name: node.map(str::to_string),
        ..Shape::new(ShapeType::Model, name)
    }
}

/// Custom surface with the given local points.
pub fn custom_surface(name: &str, points: Vec<Vec3>, depth: f64) -> Shape {
    Shape {
        points: Some(points),
        extrude_depth: Some(depth),
        ..Shape::new(ShapeType::Custom, name)
    }
}

/// Group at `pos` holding `children`; child positions become relative to the group.
///
/// Returns the group followed by the children.
pub fn group_of(name: &str, pos: Vec3, children: Vec<Shape>) -> Vec<Shape> {
    let group = shape_at(ShapeType::Group, name, pos);
    let group_id = group.id.clone();
    let mut shapes = vec![group];
    shapes.extend(children.into_iter().map(|child| Shape {
        parent_id: Some(group_id.clone()),
        ..child
    }));
    shapes
}

// ── Digitizer inputs ────────────────────────────────────────────

/// Axis-aligned square on the ground with one corner at `origin`.
pub fn square_points(origin: Vec3, size: f64) -> Vec<Vec3> {
    let [x, _, z] = origin;
    vec![
        [x, 0.0, z],
        [x + size, 0.0, z],
        [x + size, 0.0, z + size],
        [x, 0.0, z + size],
    ]
}

/// L-shaped footprint (six points).
pub fn l_shape_points() -> Vec<Vec3> {
    vec![
        [0.0, 0.0, 0.0],
        [4.0, 0.0, 0.0],
        [4.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 0.0, 3.0],
        [0.0, 0.0, 3.0],
    ]
}

// ── Document factories ──────────────────────────────────────────

/// Document with shapes and no settings.
pub fn document(shapes: Vec<Shape>) -> SceneDocument {
    SceneDocument::new(shapes, None)
}

/// Document with shapes and settings.
pub fn document_with_settings(shapes: Vec<Shape>, settings: SceneSettings) -> SceneDocument {
    SceneDocument::new(shapes, Some(settings))
}

/// Sample scene: two boxes, a tree and a grouped pair.
pub fn sample_document() -> SceneDocument {
    let mut shapes = vec![
        box_at("Box 01", [0.0, 0.5, 0.0]),
        box_at("Box 02", [4.0, 0.5, 0.0]),
        tree_at("Tree 01", [-3.0, 0.0, 2.0]),
    ];
    shapes.extend(group_of(
        "Group 01",
        [0.0, 0.0, 6.0],
        vec![
            box_at("Box 03", [-1.0, 0.5, 0.0]),
            box_at("Box 04", [1.0, 0.5, 0.0]),
        ],
    ));
    document(shapes)
}

/// Serialize a document to JSON.
pub fn document_json(doc: &SceneDocument) -> String {
    serde_json::to_string(doc).unwrap_or_default()
}
