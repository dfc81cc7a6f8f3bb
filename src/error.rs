use std::path::PathBuf;

use thiserror::Error;

use crate::api::ServiceError;

pub type Result<T> = std::result::Result<T, StudioError>;

/// Input problems caught before any request leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a prompt.")]
    EmptyPrompt,

    #[error("Please enter a prompt to describe the edit.")]
    EmptyEditPrompt,

    #[error("Please upload at least one image to edit.")]
    NoImages,
}

/// Everything that can end a user action. `Display` is the message shown in
/// the UI; the underlying cause stays reachable through `source()`.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", .0.generate_message())]
    Generate(#[source] ServiceError),

    #[error("{}", .0.edit_message())]
    Edit(#[source] ServiceError),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

impl StudioError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn decode(name: impl Into<String>, source: image::ImageError) -> Self {
        Self::Decode {
            name: name.into(),
            source,
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_failures_map_to_stable_messages() {
        let rejected = || ServiceError::Rejected {
            status: 400,
            body: "bad request".to_string(),
        };
        assert_eq!(
            StudioError::Generate(rejected()).to_string(),
            "Failed to generate image. Please check your prompt and API key."
        );
        assert_eq!(
            StudioError::Generate(ServiceError::NoImages).to_string(),
            "Image generation failed: No images returned."
        );
        assert_eq!(
            StudioError::Edit(rejected()).to_string(),
            "Failed to edit image. The model may not have been able to fulfill the request."
        );
        assert_eq!(
            StudioError::Edit(ServiceError::NoImageData).to_string(),
            "Image editing failed: No image data in response."
        );
    }

    #[test]
    fn validation_messages_pass_through() {
        let err: StudioError = ValidationError::NoImages.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please upload at least one image to edit.");
    }
}
