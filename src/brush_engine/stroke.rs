use crate::brush_engine::brush::MaskBrush;
use crate::canvas::raster::RasterBuffer;
use crate::utils::{profiler::ScopeTimer, vector::Vec2};

/// Tracks per-stroke state: the last raster position seen.
#[derive(Debug)]
pub struct StrokeState {
    pub last_pos: Option<Vec2>,
    stroke_timer: Option<ScopeTimer>,
}

impl StrokeState {
    /// Start a stroke anchored at `start` and begin the profiling timer.
    pub fn new(start: Vec2) -> Self {
        Self {
            last_pos: Some(start),
            stroke_timer: Some(ScopeTimer::new("mask_stroke")),
        }
    }

    /// Connect the previous sample to `pos`. Returns true if pixels were touched.
    pub fn add_point(
        &mut self,
        raster: &mut RasterBuffer,
        brush: &MaskBrush,
        display_scale: f32,
        pos: Vec2,
    ) -> bool {
        let Some(prev) = self.last_pos else {
            return false;
        };
        let painted = brush.stroke_segment(raster, prev, pos, display_scale);
        self.last_pos = Some(pos);
        painted
    }

    pub fn is_active(&self) -> bool {
        self.last_pos.is_some()
    }

    /// Reset the stroke state and emit the profiling metric.
    pub fn end(&mut self) {
        self.last_pos = None;
        self.stroke_timer.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_joined_and_end_stops_painting() {
        let mut raster = RasterBuffer::new(64, 64);
        let brush = MaskBrush::new(10.0);
        let mut stroke = StrokeState::new(Vec2::new(10.0, 32.0));

        assert!(stroke.add_point(&mut raster, &brush, 1.0, Vec2::new(50.0, 32.0)));
        assert_eq!(stroke.last_pos, Some(Vec2::new(50.0, 32.0)));
        assert_eq!(raster.pixel(30, 32)[3], 179);

        stroke.end();
        assert!(!stroke.is_active());
        assert!(!stroke.add_point(&mut raster, &brush, 1.0, Vec2::new(30.0, 5.0)));
        assert_eq!(raster.pixel(30, 5)[3], 0);
    }
}
