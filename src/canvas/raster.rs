use std::io::Cursor;

use eframe::egui::ColorImage;
use image::imageops::{self, FilterType};
use image::{ImageFormat, ImageResult, Rgba, RgbaImage};
use rayon::prelude::*;

use crate::utils::profiler::ScopeTimer;
use crate::utils::vector::{Vec2, distance_to_segment};

const CHANNELS: usize = 4;

/// Mask pixels in raster space, stored as unmultiplied RGBA.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterBuffer {
    image: RgbaImage,
}

impl RasterBuffer {
    /// Fully transparent raster of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn clear(&mut self) {
        self.image.fill(0);
    }

    /// True when no pixel carries any alpha.
    pub fn is_blank(&self) -> bool {
        self.image
            .as_raw()
            .par_chunks(CHANNELS)
            .all(|px| px[3] == 0)
    }

    /// Paint an anti-aliased capsule of `radius` around the segment `a..b`.
    ///
    /// A pixel's alpha only ever grows: it becomes the max of its current
    /// alpha and `color.a * coverage`, so overlapping passes never darken
    /// the mask beyond the brush alpha.
    pub fn draw_segment(&mut self, a: Vec2, b: Vec2, radius: f32, color: Rgba<u8>) -> bool {
        let (width, height) = self.dimensions();
        if width == 0 || height == 0 || radius <= 0.0 {
            return false;
        }

        let reach = radius + 1.0;
        let x0 = (a.x.min(b.x) - reach).floor().max(0.0) as usize;
        let y0 = (a.y.min(b.y) - reach).floor().max(0.0) as usize;
        let x1 = ((a.x.max(b.x) + reach).ceil().max(0.0) as usize).min(width as usize);
        let y1 = ((a.y.max(b.y) + reach).ceil().max(0.0) as usize).min(height as usize);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        let row_len = width as usize * CHANNELS;
        let [r, g, bl, alpha] = color.0;
        let brush_alpha = alpha as f32;

        self.image
            .par_chunks_mut(row_len)
            .enumerate()
            .skip(y0)
            .take(y1 - y0)
            .for_each(|(y, row)| {
                let py = y as f32 + 0.5;
                for x in x0..x1 {
                    let dist = distance_to_segment(Vec2::new(x as f32 + 0.5, py), a, b);
                    let coverage = (radius + 0.5 - dist).clamp(0.0, 1.0);
                    if coverage <= 0.0 {
                        continue;
                    }
                    let value = (brush_alpha * coverage).round() as u8;
                    let px = &mut row[x * CHANNELS..(x + 1) * CHANNELS];
                    if value > px[3] {
                        px.copy_from_slice(&[r, g, bl, value]);
                    }
                }
            });
        true
    }

    /// Copy of this raster rescaled to new dimensions (nearest neighbour).
    pub fn reprojected(&self, width: u32, height: u32) -> Self {
        if self.dimensions() == (width, height) {
            return self.clone();
        }
        let _timer = ScopeTimer::new("mask_reproject");
        Self {
            image: imageops::resize(&self.image, width, height, FilterType::Nearest),
        }
    }

    /// Replace the contents with `snapshot`, rescaling it when it was captured
    /// at a different size.
    pub fn restore_from(&mut self, snapshot: RgbaImage) {
        let (width, height) = self.dimensions();
        self.image = if snapshot.dimensions() == (width, height) {
            snapshot
        } else {
            imageops::resize(&snapshot, width, height, FilterType::Nearest)
        };
    }

    /// Inclusive bounding box `(min_x, min_y, max_x, max_y)` of painted pixels.
    pub fn painted_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        self.image
            .enumerate_pixels()
            .filter(|(_, _, px)| px[3] > 0)
            .fold(None, |acc, (x, y, _)| match acc {
                None => Some((x, y, x, y)),
                Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
            })
    }

    pub fn encode_png(&self) -> ImageResult<Vec<u8>> {
        let _timer = ScopeTimer::new("mask_encode_png");
        let mut out = Cursor::new(Vec::new());
        self.image.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    /// Overlay texture for egui.
    pub fn to_color_image(&self) -> ColorImage {
        let (width, height) = self.dimensions();
        ColorImage::from_rgba_unmultiplied([width as usize, height as usize], self.image.as_raw())
    }
}
