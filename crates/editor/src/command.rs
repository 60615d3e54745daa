//! JSON command protocol for headless control of the editor.
//!
//! One command per `SceneStore` operation family; commands are internally
//! tagged objects such as `{"command": "add_shape", "type": "box"}`.

use serde::{Deserialize, Serialize};
use shared::{
    CameraView, GridSettings, Shape, ShapeId, ShapePatch, ShapeType, SunSettingsPatch,
    TransformMode, Vec3, ViewMode,
};

use crate::harness::TestHarness;
use crate::solar;
use crate::state::{shape_display_name, shape_icon};
use crate::validation::SceneValidator;

fn default_true() -> bool {
    true
}

/// A command that drives the scene store.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Add a shape of a given type, optionally overriding defaults
    AddShape {
        #[serde(rename = "type")]
        kind: ShapeType,
        #[serde(default)]
        overrides: ShapePatch,
    },
    /// Add prepared shapes as one undo step
    AddShapes {
        shapes: Vec<Shape>,
    },
    /// Shallow-merge a patch into a shape (no undo step)
    UpdateShape {
        id: ShapeId,
        patch: ShapePatch,
    },
    ToggleVisibility {
        id: ShapeId,
    },
    ToggleLock {
        id: ShapeId,
    },
    ToggleGroupCollapse {
        id: ShapeId,
    },
    /// Delete the selection and its descendants
    DeleteSelected,
    DuplicateSelected {
        #[serde(default = "default_true")]
        with_offset: bool,
    },
    Copy,
    Paste,
    GroupSelected,
    UngroupSelected,
    /// Pointer selection; `id: null` clears
    Select {
        #[serde(default)]
        id: Option<ShapeId>,
        #[serde(default)]
        multi: bool,
    },
    SetSelection {
        ids: Vec<ShapeId>,
    },
    ClearSelection,
    /// Record one undo step before a series of `update_shape`
    BeginGesture,
    Undo,
    Redo,
    SetDrawing {
        active: bool,
    },
    AddDrawingPoint {
        point: Vec3,
    },
    FinishDrawing,
    CancelDrawing,
    RequestCameraView {
        view: CameraView,
    },
    SetViewMode {
        mode: ViewMode,
    },
    SetTransformMode {
        mode: TransformMode,
    },
    UpdateSunSettings {
        patch: SunSettingsPatch,
    },
    SetBackgroundColor {
        color: String,
    },
    SetGridSettings {
        grid: GridSettings,
    },
    /// Current sun position, optionally with the daily path
    SunPosition {
        #[serde(default)]
        path_samples: Option<usize>,
    },
    /// Replace everything with a single default box
    ResetScene,
    /// Append shapes from a scene document
    ImportDocument {
        document: serde_json::Value,
    },
    /// Export the scene as JSON.
    ExportScene,
    /// Inspect the scene: list all shapes and editor state.
    Inspect,
    /// Check the data-model invariants
    Validate,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn changed(found: bool, id: &str) -> Self {
        if found {
            Self::ok()
        } else {
            Self::err(format!("Shape {id} not found"))
        }
    }
}

fn shape_summary(shape: &Shape) -> serde_json::Value {
    serde_json::json!({
        "id": shape.id,
        "name": shape.name,
        "label": shape_display_name(shape),
        "icon": shape_icon(shape),
        "type": shape.kind,
        "parent_id": shape.parent_id,
        "position": shape.position,
        "visible": shape.visible,
        "locked": shape.locked,
    })
}

fn sun_json(pos: &solar::SunPosition) -> serde_json::Value {
    serde_json::json!({
        "altitude_deg": pos.altitude_degrees(),
        "azimuth_deg": pos.azimuth_degrees(),
        "declination_deg": pos.declination.to_degrees(),
        "direction": pos.direction.to_array(),
    })
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: EditorCommand) -> CommandResponse {
    let scene = &mut harness.scene;
    match cmd {
        EditorCommand::AddShape { kind, overrides } => {
            let id = scene.add_shape(kind, &overrides);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        EditorCommand::AddShapes { shapes } => {
            let ids = scene.add_shapes(shapes);
            CommandResponse::ok_with_data(serde_json::json!({ "ids": ids }))
        }

        EditorCommand::UpdateShape { id, patch } => {
            CommandResponse::changed(scene.update_shape(&id, &patch), &id)
        }

        EditorCommand::ToggleVisibility { id } => {
            CommandResponse::changed(scene.toggle_visibility(&id), &id)
        }

        EditorCommand::ToggleLock { id } => CommandResponse::changed(scene.toggle_lock(&id), &id),

        EditorCommand::ToggleGroupCollapse { id } => {
            CommandResponse::changed(scene.toggle_group_collapse(&id), &id)
        }

        EditorCommand::DeleteSelected => {
            let removed = scene.delete_selected();
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        EditorCommand::DuplicateSelected { with_offset } => {
            let ids = scene.duplicate_selected(with_offset);
            CommandResponse::ok_with_data(serde_json::json!({ "ids": ids }))
        }

        EditorCommand::Copy => {
            scene.copy();
            let copied = scene.clipboard().map(|s| s.id.clone());
            CommandResponse::ok_with_data(serde_json::json!({ "copied": copied }))
        }

        EditorCommand::Paste => {
            let ids = scene.paste();
            CommandResponse::ok_with_data(serde_json::json!({ "ids": ids }))
        }

        EditorCommand::GroupSelected => match scene.group_selected() {
            Some(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
            None => CommandResponse::err("Select at least two shapes to group"),
        },

        EditorCommand::UngroupSelected => match scene.ungroup_selected() {
            Some(ids) => CommandResponse::ok_with_data(serde_json::json!({ "ids": ids })),
            None => CommandResponse::err("Select exactly one group to ungroup"),
        },

        EditorCommand::Select { id, multi } => {
            scene.select(id.as_deref(), multi);
            CommandResponse::ok_with_data(serde_json::json!({
                "selected": scene.selection().all()
            }))
        }

        EditorCommand::SetSelection { ids } => {
            scene.set_selection(&ids);
            CommandResponse::ok_with_data(serde_json::json!({
                "selected": scene.selection().all()
            }))
        }

        EditorCommand::ClearSelection => {
            scene.clear_selection();
            CommandResponse::ok()
        }

        EditorCommand::BeginGesture => {
            scene.begin_gesture();
            CommandResponse::ok()
        }

        EditorCommand::Undo => {
            let success = scene.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        EditorCommand::Redo => {
            let success = scene.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        EditorCommand::SetDrawing { active } => {
            scene.set_drawing(active);
            CommandResponse::ok()
        }

        EditorCommand::AddDrawingPoint { point } => {
            let added = scene.add_drawing_point(point);
            CommandResponse::ok_with_data(serde_json::json!({
                "added": added,
                "points": scene.drawing_points().len(),
            }))
        }

        EditorCommand::FinishDrawing => match scene.finish_drawing() {
            Some(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
            None => CommandResponse::err("Need at least 3 points to finish drawing"),
        },

        EditorCommand::CancelDrawing => {
            scene.cancel_drawing();
            CommandResponse::ok()
        }

        EditorCommand::RequestCameraView { view } => {
            let request = scene.request_camera_view(view);
            CommandResponse::ok_with_data(serde_json::json!({
                "request": request,
                "view_mode": scene.view_mode(),
            }))
        }

        EditorCommand::SetViewMode { mode } => {
            scene.set_view_mode(mode);
            CommandResponse::ok()
        }

        EditorCommand::SetTransformMode { mode } => {
            scene.set_transform_mode(mode);
            CommandResponse::ok()
        }

        EditorCommand::UpdateSunSettings { patch } => {
            scene.update_sun_settings(&patch);
            CommandResponse::ok_with_data(serde_json::json!({ "sun": scene.settings().sun }))
        }

        EditorCommand::SetBackgroundColor { color } => {
            scene.set_background_color(color);
            CommandResponse::ok()
        }

        EditorCommand::SetGridSettings { grid } => {
            scene.set_grid_settings(grid);
            CommandResponse::ok()
        }

        EditorCommand::SunPosition { path_samples } => {
            let mut data = sun_json(&scene.sun_position());
            if let Some(samples) = path_samples {
                let sun = &scene.settings().sun;
                let path: Vec<serde_json::Value> =
                    solar::daily_path(sun.latitude, sun.longitude, sun.date, samples)
                        .iter()
                        .map(|(hour, pos)| {
                            serde_json::json!({
                                "hour": hour,
                                "position": pos.world_position(sun.radius).to_array(),
                            })
                        })
                        .collect();
                data["path"] = serde_json::Value::Array(path);
            }
            CommandResponse::ok_with_data(data)
        }

        EditorCommand::ResetScene => {
            scene.reset_scene();
            CommandResponse::ok()
        }

        EditorCommand::ImportDocument { document } => {
            match scene.import_document(&document.to_string()) {
                Ok(count) => {
                    CommandResponse::ok_with_data(serde_json::json!({ "imported": count }))
                }
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        EditorCommand::ExportScene => match scene.export_json() {
            Ok(json) => CommandResponse::ok_with_data(serde_json::json!({ "scene_json": json })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        EditorCommand::Inspect => {
            let shapes: Vec<serde_json::Value> = scene.shapes().iter().map(shape_summary).collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "shape_count": shapes.len(),
                "shapes": shapes,
                "selected": scene.selection().all(),
                "can_undo": scene.can_undo(),
                "can_redo": scene.can_redo(),
                "drawing": scene.is_drawing(),
                "view_mode": scene.view_mode(),
                "transform_mode": scene.transform_mode(),
            }))
        }

        EditorCommand::Validate => {
            let errors = SceneValidator::new(scene.shapes()).validate_all();
            CommandResponse::ok_with_data(serde_json::json!({
                "valid": errors.is_empty(),
                "errors": errors,
            }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
