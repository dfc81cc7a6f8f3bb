//! Headless mode: one request per invocation, result written as PNG.
//!
//! ```text
//! rusty-inpainter generate --prompt "a lighthouse at dusk" --aspect-ratio 16:9
//! rusty-inpainter edit --prompt "add a hat" --image cat.png --mask mask.png -o out.png
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::api::{GeminiClient, ImageService, ServiceError};
use crate::config::{ApiArgs, Command};
use crate::error::Result;
use crate::orchestrator::{RequestKind, RequestOrchestrator};
use crate::uploads::{SourceImage, UploadedImageSet};
use crate::utils::exporter;

/// Run one subcommand against the configured service and return an OS exit code.
pub fn run(command: Command, api: &ApiArgs) -> ExitCode {
    let service: Arc<dyn ImageService> = match GeminiClient::new(api.to_api_config()) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            log::error!("Could not build HTTP client: {err}");
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match execute(command, service) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Submit the request, wait for it and save the result. Returns the written path.
pub fn execute(command: Command, service: Arc<dyn ImageService>) -> Result<PathBuf> {
    let mut orchestrator = RequestOrchestrator::new(service);

    let (kind, output) = match command {
        Command::Generate(args) => {
            orchestrator.submit_generate(&args.prompt, args.model, args.aspect_ratio)?;
            (RequestKind::Generate, args.output)
        }
        Command::Edit(args) => {
            let mut uploads = UploadedImageSet::new();
            for path in &args.images {
                uploads.push(SourceImage::from_path(path)?, ());
            }
            let mask = args
                .mask
                .as_deref()
                .map(SourceImage::from_path)
                .transpose()?
                .map(|mask| mask.payload());
            orchestrator.submit_edit(&args.prompt, uploads.payloads(), mask)?;
            (RequestKind::Edit, args.output)
        }
    };

    let image = orchestrator
        .wait()
        .unwrap_or_else(|| Err(kind.failure(ServiceError::WorkerPanicked)))?;
    let output = output.unwrap_or_else(|| PathBuf::from(exporter::default_file_name()));
    exporter::save_png(&image, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AspectRatio, GenerateModel};
    use crate::config::{EditArgs, GenerateArgs};
    use crate::error::StudioError;
    use crate::orchestrator::tests::{ScriptedService, png_result};
    use crate::uploads::tests::encoded;
    use image::ImageFormat;

    #[test]
    fn generate_writes_the_result() {
        let dir = tempfile::tempdir().unwrap();
        let service = ScriptedService::ok();
        let command = Command::Generate(GenerateArgs {
            prompt: "a kite".to_string(),
            model: GenerateModel::Standard,
            aspect_ratio: AspectRatio::Square,
            output: Some(dir.path().join("kite.png")),
        });

        let path = execute(command, service.clone()).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), png_result().bytes);
        assert_eq!(service.calls(), 1);
    }

    #[test]
    fn edit_reads_images_and_mask_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("cat.jpg");
        let mask = dir.path().join("mask.png");
        std::fs::write(&image, encoded(6, 6, ImageFormat::Jpeg)).unwrap();
        std::fs::write(&mask, encoded(6, 6, ImageFormat::Png)).unwrap();

        let service = ScriptedService::ok();
        let command = Command::Edit(EditArgs {
            prompt: "add a hat".to_string(),
            images: vec![image],
            mask: Some(mask),
            output: Some(dir.path().join("out")),
        });
        let path = execute(command, service.clone()).unwrap();
        assert_eq!(path, dir.path().join("out.png"));
        assert_eq!(service.calls(), 1);
    }

    #[test]
    fn unreadable_upload_stops_before_the_request() {
        let dir = tempfile::tempdir().unwrap();
        let service = ScriptedService::ok();
        let command = Command::Edit(EditArgs {
            prompt: "add a hat".to_string(),
            images: vec![dir.path().join("missing.png")],
            mask: None,
            output: None,
        });
        assert!(matches!(
            execute(command, service.clone()),
            Err(StudioError::Io { .. })
        ));
        assert_eq!(service.calls(), 0);
    }

    #[test]
    fn empty_generate_result_is_an_error() {
        let service = ScriptedService::replying(|| Err(ServiceError::NoImages));
        let command = Command::Generate(GenerateArgs {
            prompt: "nothing".to_string(),
            model: GenerateModel::Pro,
            aspect_ratio: AspectRatio::Tall,
            output: None,
        });
        let err = execute(command, service).unwrap_err();
        assert_eq!(err.to_string(), "Image generation failed: No images returned.");
    }
}
