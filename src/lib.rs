//! Headless core of an image captioning editor: a scene of background image, text and
//! shapes, a layer registry mirroring its stacking order, pointer and keyboard
//! interaction, and PNG export.

pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod geometry;
pub mod input;
pub mod layers;
pub mod logging;
pub mod notification;
pub mod render;
pub mod scene;
pub mod search;
pub mod state;
pub mod storage;
pub mod viewport;
pub mod worker;

pub use config::{load_app_config, AppConfig};
pub use editor::{EditorCanvas, EditorSession};
pub use error::{AppError, AppResult};
pub use export::{export_raster, ExportOutcome};
pub use render::Rasterizer;
