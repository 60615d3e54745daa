//! Display helper functions for shapes

use shared::{Shape, ShapeType};

/// Default name for the next shape of `kind` given how many already exist ("Box 01")
pub fn default_name(kind: ShapeType, existing: usize) -> String {
    format!("{} {:02}", kind.label(), existing + 1)
}

/// Name given by the digitizer to a new surface ("Surface 3")
pub fn surface_name(existing: usize) -> String {
    format!("{} {}", ShapeType::Custom.label(), existing + 1)
}

/// Get display name for a shape
pub fn shape_display_name(shape: &Shape) -> String {
    format!("{} ({})", shape.name, short_id(&shape.id))
}

/// Get icon for a shape
pub fn shape_icon(shape: &Shape) -> &'static str {
    match shape.kind {
        ShapeType::Box => "[B]",
        ShapeType::Sphere => "[S]",
        ShapeType::Cylinder => "[Y]",
        ShapeType::Cone => "[K]",
        ShapeType::Plane => "[P]",
        ShapeType::Tree => "[T]",
        ShapeType::Custom => "[~]",
        ShapeType::Image => "[I]",
        ShapeType::Model => "[M]",
        ShapeType::Group => {
            if shape.collapsed {
                "[+]"
            } else {
                "[-]"
            }
        }
    }
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}
