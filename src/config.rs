//! Command-line and environment configuration.
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::api::gemini::{
    DEFAULT_API_BASE, DEFAULT_EDIT_MODEL, DEFAULT_GENERATE_MODEL, DEFAULT_GENERATE_PRO_MODEL,
};
use crate::api::{ApiConfig, AspectRatio, GenerateModel};
use crate::canvas::history::DEFAULT_HISTORY_LIMIT;

/// Secondary environment variable consulted when `GEMINI_API_KEY` is unset.
pub const FALLBACK_KEY_ENV: &str = "API_KEY";

/// AI image studio: generate images from text, or edit them with a painted mask.
///
/// Without a subcommand the desktop window opens.
#[derive(Parser, Debug)]
#[command(name = "rusty-inpainter", version, about)]
pub struct StudioArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub api: ApiArgs,

    /// Undo depth of the mask canvas.
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT, global = true)]
    pub history_limit: usize,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one image from a text prompt.
    Generate(GenerateArgs),
    /// Edit one or more images, optionally restricted to a mask.
    Edit(EditArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[arg(short, long)]
    pub prompt: String,

    #[arg(short, long, value_enum, default_value_t = GenerateModel::Standard)]
    pub model: GenerateModel,

    #[arg(short, long, value_enum, default_value_t = AspectRatio::Square)]
    pub aspect_ratio: AspectRatio,

    /// Output PNG. Defaults to generated-<unix millis>.png.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    #[arg(short, long)]
    pub prompt: String,

    /// Source image; repeat for several. The first one is the reference.
    #[arg(short, long = "image", value_name = "FILE", required = true)]
    pub images: Vec<PathBuf>,

    /// PNG mask whose painted pixels mark the region to change.
    #[arg(short, long, value_name = "FILE")]
    pub mask: Option<PathBuf>,

    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// API key for the Generative Language API.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_API_BASE, global = true)]
    pub api_base: String,

    #[arg(long, default_value = DEFAULT_GENERATE_MODEL, global = true)]
    pub generate_model: String,

    #[arg(long, default_value = DEFAULT_GENERATE_PRO_MODEL, global = true)]
    pub generate_pro_model: String,

    #[arg(long, default_value = DEFAULT_EDIT_MODEL, global = true)]
    pub edit_model: String,

    /// Whole-request timeout in seconds.
    #[arg(long, default_value_t = 120, global = true)]
    pub timeout_secs: u64,
}

impl ApiArgs {
    pub fn to_api_config(&self) -> ApiConfig {
        let api_key = self
            .api_key
            .clone()
            .or_else(|| std::env::var(FALLBACK_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            log::warn!("No API key configured; set GEMINI_API_KEY or pass --api-key");
        }
        ApiConfig {
            api_key,
            api_base: self.api_base.clone(),
            generate_model: self.generate_model.clone(),
            generate_pro_model: self.generate_pro_model.clone(),
            edit_model: self.edit_model.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_opens_the_window() {
        let args = StudioArgs::try_parse_from(["rusty-inpainter"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.history_limit, DEFAULT_HISTORY_LIMIT);
        let config = args.api.to_api_config();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn generate_flags_parse_to_typed_values() {
        let args = StudioArgs::try_parse_from([
            "rusty-inpainter",
            "generate",
            "--prompt",
            "a red kite",
            "--model",
            "pro",
            "--aspect-ratio",
            "16:9",
            "--api-key",
            "k",
        ])
        .unwrap();
        let Some(Command::Generate(generate)) = args.command else {
            panic!("expected generate");
        };
        assert_eq!(generate.model, GenerateModel::Pro);
        assert_eq!(generate.aspect_ratio, AspectRatio::Landscape);
        assert!(generate.output.is_none());
        assert_eq!(args.api.to_api_config().api_key.as_deref(), Some("k"));
    }

    #[test]
    fn edit_takes_repeated_images_and_optional_mask() {
        let args = StudioArgs::try_parse_from([
            "rusty-inpainter",
            "edit",
            "-p",
            "remove the car",
            "--image",
            "a.png",
            "--image",
            "b.jpg",
            "--mask",
            "mask.png",
            "--edit-model",
            "custom-edit",
        ])
        .unwrap();
        let Some(Command::Edit(edit)) = args.command else {
            panic!("expected edit");
        };
        assert_eq!(edit.images, [PathBuf::from("a.png"), PathBuf::from("b.jpg")]);
        assert_eq!(edit.mask, Some(PathBuf::from("mask.png")));
        assert_eq!(args.api.to_api_config().edit_model, "custom-edit");
    }

    #[test]
    fn edit_without_images_is_rejected() {
        assert!(StudioArgs::try_parse_from(["rusty-inpainter", "edit", "-p", "x"]).is_err());
        assert!(
            StudioArgs::try_parse_from(["rusty-inpainter", "generate", "-p", "x", "-a", "2:1"])
                .is_err()
        );
    }
}
