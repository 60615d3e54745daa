use serde::{Deserialize, Serialize};

mod patch;
mod settings;
mod view;

pub use patch::{ShapePatch, SunSettingsPatch};
pub use settings::{GridSettings, SceneSettings, SunSettings};
pub use view::{CameraRequest, CameraView, TransformMode, ViewMode};

/// Уникальный идентификатор фигуры в сцене
pub type ShapeId = String;

/// Трёхкомпонентный вектор (позиция, поворот в радианах, масштаб)
pub type Vec3 = [f64; 3];

/// Текущая версия формата документа сцены
pub const DOCUMENT_VERSION: u32 = 1;

/// Цвет по умолчанию для объёмных фигур
pub const DEFAULT_COLOR: &str = "#d1d5db";
/// Цвет кроны дерева
pub const TREE_COLOR: &str = "#4d7c0f";
/// Цвет ствола дерева
pub const TREE_TRUNK_COLOR: &str = "#78350f";
/// Цвет рёбер по умолчанию
pub const DEFAULT_EDGE_COLOR: &str = "#1f2937";

/// Сгенерировать новый идентификатор (UUID v4)
pub fn new_shape_id() -> ShapeId {
    uuid::Uuid::new_v4().to_string()
}

/// Тип фигуры
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Plane,
    Tree,
    Custom,
    Image,
    Model,
    Group,
}

impl ShapeType {
    /// Отображаемое имя типа (используется в именах по умолчанию)
    pub fn label(&self) -> &'static str {
        match self {
            ShapeType::Box => "Box",
            ShapeType::Sphere => "Sphere",
            ShapeType::Cylinder => "Cylinder",
            ShapeType::Cone => "Cone",
            ShapeType::Plane => "Plane",
            ShapeType::Tree => "Tree",
            ShapeType::Custom => "Surface",
            ShapeType::Image => "Image",
            ShapeType::Model => "Model",
            ShapeType::Group => "Group",
        }
    }

    /// Объёмный примитив (ставится на землю со смещением 0.5 по Y)
    pub fn is_volumetric(&self) -> bool {
        matches!(
            self,
            ShapeType::Box | ShapeType::Sphere | ShapeType::Cylinder | ShapeType::Cone
        )
    }

    /// Плоская фигура, которая по умолчанию лежит на земле (поворот -90° по X)
    pub fn lies_flat(&self) -> bool {
        matches!(self, ShapeType::Plane | ShapeType::Image)
    }

    /// Все типы фигур
    pub fn all() -> &'static [ShapeType] {
        &[
            ShapeType::Box,
            ShapeType::Sphere,
            ShapeType::Cylinder,
            ShapeType::Cone,
            ShapeType::Plane,
            ShapeType::Tree,
            ShapeType::Custom,
            ShapeType::Image,
            ShapeType::Model,
            ShapeType::Group,
        ]
    }
}

fn default_imported_kind() -> ShapeType {
    // Узел без метаданных фигуры считается импортированной моделью
    ShapeType::Model
}

/// Фигура — единственная сохраняемая сущность сцены.
///
/// Фигуры неизменяемы с точки зрения хранилища: любое изменение
/// заменяет значение целиком внутри новой коллекции.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shape {
    /// Уникальный идентификатор
    pub id: ShapeId,
    /// Имя (отображается в дереве)
    pub name: String,
    /// Тип фигуры
    #[serde(rename = "type", default = "default_imported_kind")]
    pub kind: ShapeType,
    /// Родительская группа; если задана, трансформация локальна относительно неё
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ShapeId>,
    /// Свёрнута ли группа в дереве (только UI)
    pub collapsed: bool,
    pub position: Vec3,
    /// Поворот в радианах
    pub rotation: Vec3,
    pub scale: Vec3,
    /// Контур пользовательской фигуры в локальной плоскости XZ (Y = 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Vec3>>,
    /// Высота выдавливания (custom) или push/pull для примитивов
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extrude_depth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    /// Конкретный узел внутри внешней модели
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_node_name: Option<String>,
    pub color: String,
    /// Вторичный цвет (ствол дерева)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    /// Непрозрачность, всегда в диапазоне [0, 1]
    pub opacity: f64,
    pub visible: bool,
    pub locked: bool,
    pub wireframe: bool,
    pub edges: bool,
    pub edge_color: String,
}

impl Default for Shape {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            kind: default_imported_kind(),
            parent_id: None,
            collapsed: false,
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
            points: None,
            extrude_depth: None,
            image_url: None,
            aspect_ratio: None,
            model_url: None,
            model_node_name: None,
            color: DEFAULT_COLOR.to_string(),
            secondary_color: None,
            opacity: 1.0,
            visible: true,
            locked: false,
            wireframe: false,
            edges: true,
            edge_color: DEFAULT_EDGE_COLOR.to_string(),
        }
    }
}

impl Shape {
    /// Новая фигура заданного типа со свежим идентификатором и стилем по умолчанию.
    ///
    /// Имя, смещение по Y и поворот задаёт хранилище сцены.
    pub fn new(kind: ShapeType, name: impl Into<String>) -> Self {
        let mut shape = Self {
            id: new_shape_id(),
            name: name.into(),
            kind,
            ..Self::default()
        };
        if kind == ShapeType::Tree {
            shape.color = TREE_COLOR.to_string();
            shape.secondary_color = Some(TREE_TRUNK_COLOR.to_string());
        }
        shape
    }

    /// Является ли фигура группой
    pub fn is_group(&self) -> bool {
        self.kind == ShapeType::Group
    }

    /// Копия с новым идентификатором (остальные поля без изменений)
    pub fn with_fresh_id(&self) -> Self {
        Self {
            id: new_shape_id(),
            ..self.clone()
        }
    }
}

/// Документ сцены — формат обмена (экспорт/импорт)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Версия формата
    #[serde(default = "default_document_version")]
    pub version: u32,
    /// Плоский список фигур (иерархия через parent_id)
    #[serde(default)]
    pub shapes: Vec<Shape>,
    /// Настройки сцены (фон, сетка, солнце), непрозрачные для потребителя
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SceneSettings>,
}

fn default_document_version() -> u32 {
    DOCUMENT_VERSION
}

impl SceneDocument {
    pub fn new(shapes: Vec<Shape>, metadata: Option<SceneSettings>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            shapes,
            metadata,
        }
    }
}
