pub mod input_handler;
pub mod state;
pub mod studio;

use std::sync::Arc;

use crate::api::ImageService;

pub use state::{EditSession, GenerateOptions, ModeKind, StudioMode, StudioSession};
pub use studio::StudioApp;

/// Open the studio window and block until it closes.
pub fn run_native(service: Arc<dyn ImageService>, history_limit: usize) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([720.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Rusty Inpainter",
        options,
        Box::new(move |cc| Ok(Box::new(StudioApp::new(cc, service, history_limit)))),
    )
}
