pub mod api;
pub mod app;
pub mod brush_engine;
pub mod canvas;
pub mod cli;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod styling;
pub mod ui;
pub mod uploads;
pub mod utils;

pub use api::{GeminiClient, ImageService};
pub use app::{StudioApp, StudioSession};
pub use canvas::MaskCanvas;
pub use config::StudioArgs;
pub use error::{Result, StudioError};
pub use orchestrator::{RequestOrchestrator, Submission};
