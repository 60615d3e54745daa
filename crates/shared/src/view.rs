//! Протокол вида камеры и режимы редактора

use serde::{Deserialize, Serialize};

/// Стандартный вид камеры
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraView {
    Iso,
    Axo,
    Top,
    Front,
    Right,
    Left,
    Back,
    Bottom,
}

impl CameraView {
    /// Режим проекции, сопровождающий запрос вида
    pub fn view_mode(&self) -> ViewMode {
        match self {
            CameraView::Iso | CameraView::Axo => ViewMode::Perspective,
            _ => ViewMode::Orthographic,
        }
    }

    /// Все виды
    pub fn all() -> &'static [CameraView] {
        &[
            CameraView::Iso,
            CameraView::Axo,
            CameraView::Top,
            CameraView::Front,
            CameraView::Right,
            CameraView::Left,
            CameraView::Back,
            CameraView::Bottom,
        ]
    }
}

/// Запрос на перестановку камеры.
///
/// Рендерер должен реагировать на любое изменение `id`,
/// даже если `view` совпадает с предыдущим.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRequest {
    pub id: u64,
    pub view: CameraView,
}

/// Тип проекции
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Perspective,
    Orthographic,
}

/// Режим гизмо трансформации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}
