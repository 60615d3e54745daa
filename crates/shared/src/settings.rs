//! Настройки сцены, которые экспортируются вместе с фигурами

use serde::{Deserialize, Serialize};

/// Параметры солнца для оверлея инсоляции
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunSettings {
    /// Показывать солнце и тени
    pub enabled: bool,
    /// Показывать суточную траекторию
    pub show_path: bool,
    /// Широта в градусах (-90..90)
    pub latitude: f64,
    /// Долгота в градусах (-180..180)
    pub longitude: f64,
    /// День года (1..=365)
    pub date: u16,
    /// Время UTC в часах (0..24)
    pub time: f64,
    /// Радиус сферы, на которой рисуется солнце
    pub radius: f64,
    pub sun_color: String,
    pub path_color: String,
    pub shadow_color: String,
}

impl Default for SunSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            show_path: false,
            latitude: 51.5,
            longitude: 0.0,
            date: 172,
            time: 12.0,
            radius: 50.0,
            sun_color: "#fde047".to_string(),
            path_color: "#f59e0b".to_string(),
            shadow_color: "#000000".to_string(),
        }
    }
}

/// Параметры сетки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Показывать сетку
    pub visible: bool,
    /// Размер ячейки
    pub size: f64,
    /// Количество делений
    pub divisions: u32,
    pub major_color: String,
    pub minor_color: String,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: true,
            size: 1.0,
            divisions: 50,
            major_color: "#9ca3af".to_string(),
            minor_color: "#e5e7eb".to_string(),
        }
    }
}

/// Набор настроек, прикладываемый к экспорту как метаданные
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Цвет фона (hex)
    pub background_color: String,
    pub grid: GridSettings,
    pub sun: SunSettings,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            background_color: "#f8fafc".to_string(),
            grid: GridSettings::default(),
            sun: SunSettings::default(),
        }
    }
}
