pub mod drawing;
pub mod grouping;
pub mod scene;
pub mod selection;
pub mod settings;

pub use drawing::{DigitizedPolygon, DrawingState};
pub use scene::{shape_display_name, shape_icon, short_id, History, SceneStore, Snapshot};
pub use selection::SelectionState;
pub use settings::AppSettings;
