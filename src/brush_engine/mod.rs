pub mod brush;
pub mod stroke;

pub use brush::MaskBrush;
pub use stroke::StrokeState;
