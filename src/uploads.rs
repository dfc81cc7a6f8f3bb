//! Source images for the edit call.
//!
//! Each upload keeps its original bytes as base64 for the request and a
//! decoded RGBA copy for display. The display handle type is generic: the
//! desktop app stores an egui texture whose drop frees the GPU memory.
use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use eframe::egui::ColorImage;
use image::RgbaImage;

use crate::api::ImagePayload;
use crate::error::{Result, StudioError};
use crate::utils::profiler::ScopeTimer;

/// A decoded user image together with its wire encoding.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub name: String,
    pub mime_type: String,
    pub base64: String,
    pub rgba: RgbaImage,
}

impl SourceImage {
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| StudioError::io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, &bytes)
    }

    /// Detect the format from content, not from the file name.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let _timer = ScopeTimer::new("decode_upload");
        let name = name.into();
        let format = image::guess_format(bytes).map_err(|e| StudioError::decode(&name, e))?;
        let rgba = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| StudioError::decode(&name, e))?
            .to_rgba8();
        log::info!(
            "Loaded {name} ({}x{}, {})",
            rgba.width(),
            rgba.height(),
            format.to_mime_type()
        );
        Ok(Self {
            mime_type: format.to_mime_type().to_string(),
            base64: BASE64.encode(bytes),
            rgba,
            name,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.rgba.dimensions()
    }

    pub fn payload(&self) -> ImagePayload {
        ImagePayload::new(self.mime_type.clone(), self.base64.clone())
    }

    pub fn to_color_image(&self) -> ColorImage {
        let (width, height) = self.dimensions();
        ColorImage::from_rgba_unmultiplied([width as usize, height as usize], self.rgba.as_raw())
    }
}

/// One member of the set. Dropping it releases `handle`.
#[derive(Debug)]
pub struct UploadedImage<H> {
    pub source: SourceImage,
    pub handle: H,
}

/// Ordered uploads; index 0 is the reference image the mask is painted on.
#[derive(Debug)]
pub struct UploadedImageSet<H> {
    images: Vec<UploadedImage<H>>,
}

impl<H> Default for UploadedImageSet<H> {
    fn default() -> Self {
        Self { images: Vec::new() }
    }
}

impl<H> UploadedImageSet<H> {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one image with its display handle.
    pub fn push(&mut self, source: SourceImage, handle: H) {
        self.images.push(UploadedImage { source, handle });
    }

    /// Append several images, keeping their order.
    pub fn extend(&mut self, images: impl IntoIterator<Item = (SourceImage, H)>) {
        self.images.extend(
            images
                .into_iter()
                .map(|(source, handle)| UploadedImage { source, handle }),
        );
    }

    /// Remove and release the image at `index`; out of range is a no-op.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.images.len() {
            return false;
        }
        let removed = self.images.remove(index);
        log::debug!("Removed upload {}", removed.source.name);
        true
    }

    /// Drop every image and its handle.
    pub fn clear(&mut self) {
        self.images.clear();
    }

    /// The reference image.
    pub fn first(&self) -> Option<&UploadedImage<H>> {
        self.images.first()
    }

    /// Image at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&UploadedImage<H>> {
        self.images.get(index)
    }

    /// Number of uploaded images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UploadedImage<H>> {
        self.images.iter()
    }

    /// Wire payloads in upload order.
    pub fn payloads(&self) -> Vec<ImagePayload> {
        self.images.iter().map(|img| img.source.payload()).collect()
    }
}
