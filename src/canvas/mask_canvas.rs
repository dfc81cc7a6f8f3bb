use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use eframe::egui::ColorImage;

use crate::api::ImagePayload;
use crate::brush_engine::{MaskBrush, StrokeState};
use crate::canvas::history::{DEFAULT_HISTORY_LIMIT, History};
use crate::canvas::raster::RasterBuffer;
use crate::error::{Result, StudioError};
use crate::utils::vector::Vec2;

pub const MASK_MIME_TYPE: &str = "image/png";

/// Encoded mask, ready to attach to an edit request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskExport {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl MaskExport {
    pub fn base64(&self) -> String {
        BASE64.encode(&self.png)
    }

    pub fn data_url(&self) -> String {
        format!("data:{MASK_MIME_TYPE};base64,{}", self.base64())
    }

    pub fn to_payload(&self) -> ImagePayload {
        ImagePayload::new(MASK_MIME_TYPE, self.base64())
    }
}

/// Lazily encoded export. `Absent` means "no mask".
#[derive(Debug)]
enum ExportState {
    Absent,
    Stale,
    Ready(MaskExport),
}

/// Paint engine for the edit mask laid over the reference image.
///
/// The raster matches the reference image's rendered size in physical pixels.
/// Every operation is a no-op until a reference has been attached.
#[derive(Debug)]
pub struct MaskCanvas {
    raster: Option<RasterBuffer>,
    history: History,
    brush: MaskBrush,
    stroke: Option<StrokeState>,
    display_scale: f32,
    export: ExportState,
    revision: u64,
}

impl Default for MaskCanvas {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl MaskCanvas {
    pub fn new(history_limit: usize) -> Self {
        Self {
            raster: None,
            history: History::new(history_limit),
            brush: MaskBrush::default(),
            stroke: None,
            display_scale: 1.0,
            export: ExportState::Absent,
            revision: 0,
        }
    }

    /// True once a reference image has been attached.
    pub fn is_ready(&self) -> bool {
        self.raster.is_some()
    }

    /// True between `begin_stroke` and `end_stroke`.
    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    /// Raster size in pixels, if attached.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.raster.as_ref().map(RasterBuffer::dimensions)
    }

    pub fn raster(&self) -> Option<&RasterBuffer> {
        self.raster.as_ref()
    }

    /// Bumped whenever the raster pixels or size change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of pre-stroke snapshots held.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether the Undo button has anything to step back to.
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// The brush used for new strokes.
    pub fn brush(&self) -> &MaskBrush {
        &self.brush
    }

    /// Mutable brush access for the diameter slider.
    pub fn brush_mut(&mut self) -> &mut MaskBrush {
        &mut self.brush
    }

    pub fn display_scale(&self) -> f32 {
        self.display_scale
    }

    /// Physical pixels per display point; scales the brush into raster space.
    pub fn set_display_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.display_scale = scale;
        }
    }

    /// Start over with a blank raster for a newly rendered reference image.
    pub fn attach(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        log::debug!("Mask attached at {width}x{height}");
        self.raster = Some(RasterBuffer::new(width, height));
        self.history.clear();
        self.stroke = None;
        self.export = ExportState::Absent;
        self.touch();
    }

    /// Attach on first sight of the reference, resize afterwards.
    pub fn sync_size(&mut self, width: u32, height: u32) {
        if self.is_ready() {
            self.resize(width, height);
        } else {
            self.attach(width, height);
        }
    }

    /// Reproject the committed raster onto a buffer of the new size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let has_history = !self.history.is_empty();
        let Some(raster) = self.raster.as_mut() else {
            return;
        };
        if raster.dimensions() == (width, height) {
            return;
        }

        log::debug!(
            "Mask resized {}x{} -> {width}x{height}",
            raster.width(),
            raster.height()
        );
        *raster = if has_history {
            raster.reprojected(width, height)
        } else {
            RasterBuffer::new(width, height)
        };
        if let Some(mut stroke) = self.stroke.take() {
            stroke.end();
        }
        if has_history {
            self.export = ExportState::Stale;
        }
        self.touch();
    }

    /// Forget the reference image and everything painted over it.
    pub fn detach(&mut self) {
        if self.raster.take().is_none() {
            return;
        }
        self.history.clear();
        self.stroke = None;
        self.export = ExportState::Absent;
        self.touch();
    }

    /// Map a screen position to raster pixels given where the reference image
    /// is displayed.
    pub fn map_to_raster(&self, screen: Vec2, display_min: Vec2, display_size: Vec2) -> Option<Vec2> {
        let (width, height) = self.dimensions()?;
        if display_size.x <= 0.0 || display_size.y <= 0.0 {
            return None;
        }
        let local = screen - display_min;
        Some(Vec2::new(
            local.x * width as f32 / display_size.x,
            local.y * height as f32 / display_size.y,
        ))
    }

    /// Snapshot the raster and start tracking a stroke at `pos`.
    pub fn begin_stroke(&mut self, pos: Vec2) -> bool {
        if self.raster.is_none() {
            return false;
        }
        self.end_stroke();
        let Some(raster) = self.raster.as_ref() else {
            return false;
        };
        self.history.push(raster.image().clone());
        self.stroke = Some(StrokeState::new(pos));
        true
    }

    /// Paint from the last tracked point to `pos`. No-op without an active stroke.
    pub fn continue_stroke(&mut self, pos: Vec2) {
        let (Some(raster), Some(stroke)) = (self.raster.as_mut(), self.stroke.as_mut()) else {
            return;
        };
        if stroke.add_point(raster, &self.brush, self.display_scale, pos) {
            self.touch();
        }
    }

    /// Commit the active stroke and mark the export stale.
    pub fn end_stroke(&mut self) {
        let Some(mut stroke) = self.stroke.take() else {
            return;
        };
        stroke.end();
        self.export = ExportState::Stale;
    }

    /// Drop the newest snapshot and repaint from the one beneath it.
    /// With at most one snapshot left this is a clear.
    pub fn undo(&mut self) {
        if self.raster.is_none() {
            return;
        }
        self.stroke = None;
        if self.history.len() <= 1 {
            self.clear();
            return;
        }
        self.history.pop();
        if let (Some(raster), Some(top)) = (self.raster.as_mut(), self.history.last()) {
            raster.restore_from(top.clone());
            self.export = ExportState::Stale;
            self.touch();
        }
    }

    /// Erase the raster and the history; the mask becomes absent.
    pub fn clear(&mut self) {
        let Some(raster) = self.raster.as_mut() else {
            return;
        };
        raster.clear();
        self.history.clear();
        self.stroke = None;
        self.export = ExportState::Absent;
        self.touch();
    }

    /// Current mask as PNG, or `None` when nothing is painted.
    pub fn export(&mut self) -> Result<Option<MaskExport>> {
        if let ExportState::Stale = self.export {
            self.export = match self.raster.as_ref().filter(|r| !r.is_blank()) {
                Some(raster) => ExportState::Ready(MaskExport {
                    png: raster.encode_png().map_err(StudioError::Encode)?,
                    width: raster.width(),
                    height: raster.height(),
                }),
                None => ExportState::Absent,
            };
        }
        Ok(match &self.export {
            ExportState::Ready(export) => Some(export.clone()),
            ExportState::Absent | ExportState::Stale => None,
        })
    }

    /// The export as an inline image part for the edit request.
    pub fn export_payload(&mut self) -> Result<Option<ImagePayload>> {
        Ok(self.export()?.as_ref().map(MaskExport::to_payload))
    }

    /// Overlay for display; `None` before a reference is attached.
    pub fn overlay_image(&self) -> Option<ColorImage> {
        self.raster.as_ref().map(RasterBuffer::to_color_image)
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
