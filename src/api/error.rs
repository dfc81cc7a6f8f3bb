use thiserror::Error;

/// Failure of one remote image call.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("no images returned")]
    NoImages,

    #[error("no image data in response")]
    NoImageData,

    #[error("request worker terminated unexpectedly")]
    WorkerPanicked,
}

impl ServiceError {
    /// The call succeeded but carried nothing we can display.
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::NoImages | Self::NoImageData)
    }

    pub fn generate_message(&self) -> &'static str {
        if self.is_empty_result() {
            "Image generation failed: No images returned."
        } else {
            "Failed to generate image. Please check your prompt and API key."
        }
    }

    pub fn edit_message(&self) -> &'static str {
        if self.is_empty_result() {
            "Image editing failed: No image data in response."
        } else {
            "Failed to edit image. The model may not have been able to fulfill the request."
        }
    }
}
