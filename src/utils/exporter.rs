use std::path::PathBuf;

use image::ImageFormat;

use crate::api::GeneratedImage;
use crate::error::{Result, StudioError};
use crate::utils::profiler::ScopeTimer;

/// Default download name for a result, derived from the current time.
pub fn default_file_name() -> String {
    file_name_for(chrono::Utc::now().timestamp_millis())
}

pub fn file_name_for(timestamp_millis: i64) -> String {
    format!("generated-{timestamp_millis}.png")
}

/// Return the PNG encoding of a generated image, re-encoding when the
/// service answered with another format.
pub fn to_png_bytes(image: &GeneratedImage) -> Result<Vec<u8>> {
    if matches!(image::guess_format(&image.bytes), Ok(ImageFormat::Png)) {
        return Ok(image.bytes.clone());
    }

    let decoded = image::load_from_memory(&image.bytes)
        .map_err(|e| StudioError::decode("generated image", e))?;
    let mut out = std::io::Cursor::new(Vec::new());
    decoded
        .write_to(&mut out, ImageFormat::Png)
        .map_err(StudioError::Encode)?;
    Ok(out.into_inner())
}

/// Save a generated image to disk as PNG.
pub fn save_png(image: &GeneratedImage, path: impl Into<PathBuf>) -> Result<PathBuf> {
    let _timer = ScopeTimer::new("save_png");
    let path = ensure_extension(path.into(), "png");
    let bytes = to_png_bytes(image)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StudioError::io(parent, e))?;
    }
    std::fs::write(&path, bytes).map_err(|e| StudioError::io(&path, e))?;
    log::info!("Saved result to {}", path.display());
    Ok(path)
}

/// Ask the user where to save, pre-filled with the timestamped name.
pub fn pick_save_path(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("PNG", &["png"])
        .save_file()
}

fn ensure_extension(mut path: PathBuf, ext: &str) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(current) if current.eq_ignore_ascii_case(ext) => path,
        _ => {
            path.set_extension(ext);
            path
        }
    }
}
