//! Remote image service: request types, the service seam, and the Gemini client.
pub mod error;
pub mod gemini;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use clap::ValueEnum;

use crate::error::ValidationError;

pub use error::ServiceError;
pub use gemini::{ApiConfig, GeminiClient};

/// Generation model tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum GenerateModel {
    #[default]
    Standard,
    Pro,
}

impl GenerateModel {
    pub const ALL: [GenerateModel; 2] = [GenerateModel::Standard, GenerateModel::Pro];

    pub fn label(&self) -> &'static str {
        match self {
            GenerateModel::Standard => "Standard",
            GenerateModel::Pro => "Pro",
        }
    }
}

/// Output aspect ratios accepted by the generation endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum AspectRatio {
    #[default]
    #[value(name = "1:1")]
    Square,
    #[value(name = "9:16")]
    Portrait,
    #[value(name = "16:9")]
    Landscape,
    #[value(name = "4:3")]
    Wide,
    #[value(name = "3:4")]
    Tall,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Landscape,
        AspectRatio::Wide,
        AspectRatio::Tall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Wide => "4:3",
            AspectRatio::Tall => "3:4",
        }
    }
}

/// Base64 image data tagged with its content type, as sent inline to the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub base64: String,
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, base64: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64: base64.into(),
        }
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, BASE64.encode(bytes))
    }
}

/// One decodable image returned by the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl GeneratedImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn from_base64(data: &str, mime_type: impl Into<String>) -> Result<Self, ServiceError> {
        Ok(Self::new(BASE64.decode(data.as_bytes())?, mime_type))
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.bytes))
    }

    pub fn decode(&self) -> image::ImageResult<image::DynamicImage> {
        image::load_from_memory(&self.bytes)
    }
}

/// A validated text-to-image request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub model: GenerateModel,
    pub aspect_ratio: AspectRatio,
}

impl GenerateRequest {
    pub fn new(
        prompt: &str,
        model: GenerateModel,
        aspect_ratio: AspectRatio,
    ) -> Result<Self, ValidationError> {
        if prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }
        Ok(Self {
            prompt: prompt.to_string(),
            model,
            aspect_ratio,
        })
    }
}

/// A validated edit request: ordered source images plus an optional mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditRequest {
    pub prompt: String,
    pub images: Vec<ImagePayload>,
    pub mask: Option<ImagePayload>,
}

impl EditRequest {
    pub fn new(
        prompt: &str,
        images: Vec<ImagePayload>,
        mask: Option<ImagePayload>,
    ) -> Result<Self, ValidationError> {
        if prompt.trim().is_empty() {
            return Err(ValidationError::EmptyEditPrompt);
        }
        if images.is_empty() {
            return Err(ValidationError::NoImages);
        }
        Ok(Self {
            prompt: prompt.to_string(),
            images,
            mask,
        })
    }
}

/// The remote generative-image service.
pub trait ImageService: Send + Sync {
    fn generate(&self, request: &GenerateRequest) -> Result<GeneratedImage, ServiceError>;

    fn edit(&self, request: &EditRequest) -> Result<GeneratedImage, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_requires_a_prompt() {
        assert_eq!(
            GenerateRequest::new("   ", GenerateModel::Pro, AspectRatio::Wide),
            Err(ValidationError::EmptyPrompt)
        );
        assert!(GenerateRequest::new("a cat", GenerateModel::Pro, AspectRatio::Wide).is_ok());
    }

    #[test]
    fn edit_requires_prompt_then_images() {
        let image = ImagePayload::from_bytes("image/png", b"png");
        assert_eq!(
            EditRequest::new("", vec![image.clone()], None),
            Err(ValidationError::EmptyEditPrompt)
        );
        assert_eq!(
            EditRequest::new("valid", Vec::new(), None),
            Err(ValidationError::NoImages)
        );
        assert!(EditRequest::new("valid", vec![image], None).is_ok());
    }

    #[test]
    fn aspect_ratios_cover_five_strings() {
        let names: Vec<_> = AspectRatio::ALL.iter().map(AspectRatio::as_str).collect();
        assert_eq!(names, ["1:1", "9:16", "16:9", "4:3", "3:4"]);
    }

    #[test]
    fn generated_image_round_trips_through_base64() {
        let image = GeneratedImage::from_base64("aGVsbG8=", "image/png").unwrap();
        assert_eq!(image.bytes, b"hello");
        assert_eq!(image.data_url(), "data:image/png;base64,aGVsbG8=");
        assert!(matches!(
            GeneratedImage::from_base64("not base64!", "image/png"),
            Err(ServiceError::Base64(_))
        ));
    }
}
