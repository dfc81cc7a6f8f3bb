//! Mask painting: raster storage, stroke history and the canvas engine.
pub mod history;
pub mod mask_canvas;
pub mod raster;

pub use mask_canvas::{MaskCanvas, MaskExport};
pub use raster::RasterBuffer;
