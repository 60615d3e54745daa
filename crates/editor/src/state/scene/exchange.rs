//! Scene document export/import.
//!
//! A document is the flat shape list plus the scene settings as metadata.
//! Imported shapes always receive fresh ids; parent references inside the
//! document are remapped to the new ids and dropped when they do not name a
//! group of the same document.

use std::collections::{HashMap, HashSet};

use shared::{
    new_shape_id, SceneDocument, SceneSettings, Shape, ShapeId, ShapeType, DOCUMENT_VERSION,
};

use super::SceneStore;
use crate::error::ExchangeError;
use crate::state::drawing::MIN_POLYGON_POINTS;

/// Serialize shapes and settings as a pretty-printed document
pub fn export_document(
    shapes: &[Shape],
    settings: &SceneSettings,
) -> Result<String, ExchangeError> {
    let doc = SceneDocument::new(shapes.to_vec(), Some(settings.clone()));
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse and check a document without touching any scene
pub fn parse_document(json: &str) -> Result<SceneDocument, ExchangeError> {
    let doc: SceneDocument = serde_json::from_str(json)?;
    if doc.version != DOCUMENT_VERSION {
        return Err(ExchangeError::UnsupportedVersion(doc.version));
    }
    for shape in &doc.shapes {
        if shape.kind == ShapeType::Custom {
            let points = shape.points.as_ref().map_or(0, Vec::len);
            if points < MIN_POLYGON_POINTS {
                return Err(ExchangeError::DegeneratePolygon {
                    name: shape.name.clone(),
                    points,
                });
            }
        }
    }
    Ok(doc)
}

/// Give every shape a fresh id and rewrite parent references accordingly
pub fn remap_ids(shapes: Vec<Shape>) -> Vec<Shape> {
    // First occurrence wins if the document repeats an id
    let mut new_ids: HashMap<ShapeId, ShapeId> = HashMap::new();
    let mut groups: HashSet<ShapeId> = HashSet::new();
    let mut fresh: Vec<ShapeId> = Vec::with_capacity(shapes.len());
    for shape in &shapes {
        let id = new_shape_id();
        if !shape.id.is_empty() && !new_ids.contains_key(&shape.id) {
            new_ids.insert(shape.id.clone(), id.clone());
            if shape.is_group() {
                groups.insert(id.clone());
            }
        }
        fresh.push(id);
    }

    let mut remapped: Vec<Shape> = shapes
        .into_iter()
        .zip(fresh)
        .map(|(shape, id)| {
            let parent_id = shape.parent_id.as_ref().and_then(|old| {
                let new = new_ids.get(old).filter(|new| groups.contains(*new));
                if new.is_none() {
                    tracing::warn!(
                        shape = %shape.name,
                        parent = %old,
                        "dropping unknown parent on import"
                    );
                }
                new.cloned()
            });
            Shape {
                id,
                parent_id,
                ..shape
            }
            .sanitized()
        })
        .collect();

    break_parent_cycles(&mut remapped);
    remapped
}

/// Detach shapes whose parent chain loops back on itself
pub(crate) fn break_parent_cycles(shapes: &mut [Shape]) {
    let index: HashMap<ShapeId, usize> = shapes
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.clone(), i))
        .collect();

    for i in 0..shapes.len() {
        let mut seen = HashSet::new();
        let mut current = i;
        loop {
            let Some(&parent) = shapes[current].parent_id.as_ref().and_then(|p| index.get(p)) else {
                break;
            };
            if parent == i {
                tracing::warn!(shape = %shapes[i].name, "breaking parent cycle");
                shapes[i].parent_id = None;
                break;
            }
            // Loop further up that does not include `i`; handled when its members are visited
            if !seen.insert(parent) {
                break;
            }
            current = parent;
        }
    }
}

impl SceneStore {
    /// Current shapes and settings as a document
    pub fn export_json(&self) -> Result<String, ExchangeError> {
        let json = export_document(self.shapes(), &self.settings)?;
        tracing::info!(shapes = self.shapes().len(), "scene exported");
        Ok(json)
    }

    /// Append the shapes of a document as one undo step and restore its settings.
    ///
    /// On error the scene is unchanged.
    pub fn import_document(&mut self, json: &str) -> Result<usize, ExchangeError> {
        let doc = parse_document(json)?;
        let shapes = remap_ids(doc.shapes);
        let count = shapes.len();

        if let Some(settings) = doc.metadata {
            self.settings = settings;
            self.version += 1;
        }
        self.add_shapes(shapes);
        tracing::info!(shapes = count, "scene imported");
        Ok(count)
    }

    /// Replace the whole scene with a document; history and selection are cleared
    pub fn load_document(&mut self, json: &str) -> Result<usize, ExchangeError> {
        let doc = parse_document(json)?;
        let shapes = remap_ids(doc.shapes);
        let count = shapes.len();

        if let Some(settings) = doc.metadata {
            self.settings = settings;
        }
        self.set_shapes(shapes);
        self.history.clear();
        self.selection.clear();
        self.drawing.cancel();
        tracing::info!(shapes = count, "scene loaded");
        Ok(count)
    }
}
