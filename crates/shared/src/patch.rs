//! Частичные обновления (shallow merge) фигур и настроек солнца

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Shape, ShapeId, ShapeType, SunSettings, Vec3};

/// Отличает отсутствующее поле от явного `null`
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Частичное обновление фигуры: задаются только изменяемые поля.
///
/// `parent_id: Some(None)` снимает родителя, `None` оставляет как есть.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ShapeType>,
    #[serde(
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<ShapeId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Vec3>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extrude_depth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_node_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wireframe: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_color: Option<String>,
}

impl ShapePatch {
    /// Пустой патч — ничего не меняет
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn position(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Применить патч к фигуре и вернуть новое значение.
    ///
    /// Непрозрачность ограничивается [0, 1], высота выдавливания — неотрицательная.
    pub fn apply(&self, shape: &Shape) -> Shape {
        let mut next = shape.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(kind) = self.kind {
            next.kind = kind;
        }
        if let Some(parent_id) = &self.parent_id {
            next.parent_id = parent_id.clone();
        }
        if let Some(collapsed) = self.collapsed {
            next.collapsed = collapsed;
        }
        if let Some(position) = self.position {
            next.position = position;
        }
        if let Some(rotation) = self.rotation {
            next.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            next.scale = scale;
        }
        if let Some(points) = &self.points {
            next.points = Some(points.clone());
        }
        if let Some(depth) = self.extrude_depth {
            next.extrude_depth = Some(depth.max(0.0));
        }
        if let Some(url) = &self.image_url {
            next.image_url = Some(url.clone());
        }
        if let Some(ratio) = self.aspect_ratio {
            next.aspect_ratio = Some(ratio);
        }
        if let Some(url) = &self.model_url {
            next.model_url = Some(url.clone());
        }
        if let Some(node) = &self.model_node_name {
            next.model_node_name = Some(node.clone());
        }
        if let Some(color) = &self.color {
            next.color = color.clone();
        }
        if let Some(color) = &self.secondary_color {
            next.secondary_color = Some(color.clone());
        }
        if let Some(opacity) = self.opacity {
            next.opacity = clamp_opacity(opacity);
        }
        if let Some(visible) = self.visible {
            next.visible = visible;
        }
        if let Some(locked) = self.locked {
            next.locked = locked;
        }
        if let Some(wireframe) = self.wireframe {
            next.wireframe = wireframe;
        }
        if let Some(edges) = self.edges {
            next.edges = edges;
        }
        if let Some(color) = &self.edge_color {
            next.edge_color = color.clone();
        }
        next
    }
}

/// Ограничить непрозрачность диапазоном [0, 1] (NaN → 1)
pub(crate) fn clamp_opacity(opacity: f64) -> f64 {
    if opacity.is_nan() {
        1.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

impl Shape {
    /// Привести значения к допустимым диапазонам
    pub fn sanitized(mut self) -> Self {
        self.opacity = clamp_opacity(self.opacity);
        self.extrude_depth = self.extrude_depth.map(|d| d.max(0.0));
        self
    }
}

/// Частичное обновление настроек солнца
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunSettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_path: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sun_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_color: Option<String>,
}

impl SunSettingsPatch {
    /// Применить патч, ограничивая значения допустимыми диапазонами
    pub fn apply(&self, sun: &SunSettings) -> SunSettings {
        let mut next = sun.clone();
        if let Some(enabled) = self.enabled {
            next.enabled = enabled;
        }
        if let Some(show_path) = self.show_path {
            next.show_path = show_path;
        }
        if let Some(latitude) = self.latitude {
            next.latitude = latitude.clamp(-90.0, 90.0);
        }
        if let Some(longitude) = self.longitude {
            next.longitude = longitude.clamp(-180.0, 180.0);
        }
        if let Some(date) = self.date {
            next.date = date.clamp(1, 365);
        }
        if let Some(time) = self.time {
            next.time = time.clamp(0.0, 24.0);
        }
        if let Some(radius) = self.radius {
            next.radius = radius.max(0.0);
        }
        if let Some(color) = &self.sun_color {
            next.sun_color = color.clone();
        }
        if let Some(color) = &self.path_color {
            next.path_color = color.clone();
        }
        if let Some(color) = &self.shadow_color {
            next.shadow_color = color.clone();
        }
        next
    }
}
