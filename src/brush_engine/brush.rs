use image::Rgba;

use crate::canvas::raster::RasterBuffer;
use crate::utils::vector::Vec2;

/// Mask paint: violet at 70% opacity.
pub const MASK_COLOR: Rgba<u8> = Rgba([139, 92, 246, 179]);

pub const MIN_DIAMETER: f32 = 5.0;
pub const MAX_DIAMETER: f32 = 100.0;
pub const DEFAULT_DIAMETER: f32 = 30.0;

/// Round brush used to paint the edit mask.
///
/// The diameter is expressed in display pixels; it is converted to raster
/// pixels with the current display scale at paint time.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskBrush {
    diameter: f32,
    color: Rgba<u8>,
}

impl Default for MaskBrush {
    fn default() -> Self {
        Self::new(DEFAULT_DIAMETER)
    }
}

impl MaskBrush {
    pub fn new(diameter: f32) -> Self {
        Self {
            diameter: clamp_diameter(diameter),
            color: MASK_COLOR,
        }
    }

    pub fn diameter(&self) -> f32 {
        self.diameter
    }

    /// Set the diameter, clamped to the supported range.
    pub fn set_diameter(&mut self, diameter: f32) {
        self.diameter = clamp_diameter(diameter);
    }

    pub fn color(&self) -> Rgba<u8> {
        self.color
    }

    /// Radius in raster pixels.
    pub fn radius_px(&self, display_scale: f32) -> f32 {
        self.diameter * display_scale * 0.5
    }

    /// Paint a capsule from `from` to `to`. Returns true if the segment
    /// touched the raster at all.
    pub fn stroke_segment(
        &self,
        raster: &mut RasterBuffer,
        from: Vec2,
        to: Vec2,
        display_scale: f32,
    ) -> bool {
        raster.draw_segment(from, to, self.radius_px(display_scale), self.color)
    }
}

fn clamp_diameter(diameter: f32) -> f32 {
    if diameter.is_nan() {
        return DEFAULT_DIAMETER;
    }
    diameter.clamp(MIN_DIAMETER, MAX_DIAMETER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diameter_is_clamped() {
        let mut brush = MaskBrush::default();
        assert_eq!(brush.diameter(), 30.0);
        brush.set_diameter(1.0);
        assert_eq!(brush.diameter(), MIN_DIAMETER);
        brush.set_diameter(400.0);
        assert_eq!(brush.diameter(), MAX_DIAMETER);
        brush.set_diameter(f32::NAN);
        assert_eq!(brush.diameter(), DEFAULT_DIAMETER);
    }

    #[test]
    fn radius_follows_display_scale() {
        let brush = MaskBrush::new(40.0);
        assert_eq!(brush.radius_px(1.0), 20.0);
        assert_eq!(brush.radius_px(2.0), 40.0);
    }
}
