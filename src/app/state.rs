use std::sync::Arc;

use crate::api::{AspectRatio, GenerateModel, GeneratedImage, ImageService};
use crate::canvas::MaskCanvas;
use crate::error::Result;
use crate::orchestrator::{RequestOrchestrator, Submission};
use crate::uploads::{SourceImage, UploadedImageSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeKind {
    Generate,
    Edit,
}

impl ModeKind {
    pub const ALL: [ModeKind; 2] = [ModeKind::Generate, ModeKind::Edit];

    pub fn label(&self) -> &'static str {
        match self {
            ModeKind::Generate => "Generate",
            ModeKind::Edit => "Edit",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub model: GenerateModel,
    pub aspect_ratio: AspectRatio,
}

/// Edit-mode state: the uploads and the mask painted over the first one.
#[derive(Debug)]
pub struct EditSession<H> {
    pub uploads: UploadedImageSet<H>,
    pub mask: MaskCanvas,
}

impl<H> EditSession<H> {
    fn new(history_limit: usize) -> Self {
        Self {
            uploads: UploadedImageSet::new(),
            mask: MaskCanvas::new(history_limit),
        }
    }
}

#[derive(Debug)]
pub enum StudioMode<H> {
    Generate(GenerateOptions),
    Edit(EditSession<H>),
}

impl<H> StudioMode<H> {
    pub fn kind(&self) -> ModeKind {
        match self {
            StudioMode::Generate(_) => ModeKind::Generate,
            StudioMode::Edit(_) => ModeKind::Edit,
        }
    }
}

/// Everything the studio window shows, independent of egui.
///
/// `H` is the display handle kept alongside each upload.
pub struct StudioSession<H> {
    pub prompt: String,
    mode: StudioMode<H>,
    orchestrator: RequestOrchestrator,
    result: Option<GeneratedImage>,
    error: Option<String>,
    history_limit: usize,
}

impl<H> StudioSession<H> {
    pub fn new(service: Arc<dyn ImageService>, history_limit: usize) -> Self {
        Self {
            prompt: String::new(),
            mode: StudioMode::Generate(GenerateOptions::default()),
            orchestrator: RequestOrchestrator::new(service),
            result: None,
            error: None,
            history_limit,
        }
    }

    pub fn mode(&self) -> &StudioMode<H> {
        &self.mode
    }

    pub fn mode_mut(&mut self) -> &mut StudioMode<H> {
        &mut self.mode
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn result(&self) -> Option<&GeneratedImage> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.orchestrator.is_pending()
    }

    pub fn uploads(&self) -> Option<&UploadedImageSet<H>> {
        match &self.mode {
            StudioMode::Edit(edit) => Some(&edit.uploads),
            StudioMode::Generate(_) => None,
        }
    }

    pub fn mask(&self) -> Option<&MaskCanvas> {
        match &self.mode {
            StudioMode::Edit(edit) => Some(&edit.mask),
            StudioMode::Generate(_) => None,
        }
    }

    pub fn mask_mut(&mut self) -> Option<&mut MaskCanvas> {
        match &mut self.mode {
            StudioMode::Edit(edit) => Some(&mut edit.mask),
            StudioMode::Generate(_) => None,
        }
    }

    /// Switch to another mode, dropping uploads, mask, result and error.
    /// Returns false when nothing changed.
    pub fn switch_mode(&mut self, kind: ModeKind) -> bool {
        if kind == self.mode_kind() || self.is_pending() {
            return false;
        }
        log::info!("Switching to {} mode", kind.label());
        self.mode = match kind {
            ModeKind::Generate => StudioMode::Generate(GenerateOptions::default()),
            ModeKind::Edit => StudioMode::Edit(EditSession::new(self.history_limit)),
        };
        self.result = None;
        self.error = None;
        true
    }

    /// Append uploads; ignored outside edit mode.
    pub fn add_images(&mut self, images: impl IntoIterator<Item = (SourceImage, H)>) {
        if let StudioMode::Edit(edit) = &mut self.mode {
            edit.uploads.extend(images);
        }
    }

    /// Remove an upload. Dropping the reference image also drops the mask.
    pub fn remove_image(&mut self, index: usize) {
        let StudioMode::Edit(edit) = &mut self.mode else {
            return;
        };
        if edit.uploads.remove(index) && index == 0 {
            edit.mask.detach();
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Hide the current result, e.g. to return to the mask editor.
    pub fn clear_result(&mut self) {
        self.result = None;
    }

    /// Validate and dispatch the request for the current mode.
    pub fn submit(&mut self) -> Submission {
        if self.is_pending() {
            return Submission::Ignored;
        }
        match self.dispatch() {
            Ok(Submission::Started) => {
                self.result = None;
                self.error = None;
                Submission::Started
            }
            Ok(Submission::Ignored) => Submission::Ignored,
            Err(err) => {
                log::warn!("Submission rejected: {err}");
                self.result = None;
                self.error = Some(err.to_string());
                Submission::Ignored
            }
        }
    }

    /// Settle the pending request if it finished. Returns true when it did.
    pub fn poll(&mut self) -> bool {
        match self.orchestrator.poll() {
            Some(outcome) => {
                self.settle(outcome);
                true
            }
            None => false,
        }
    }

    /// Block until the pending request settles.
    pub fn wait(&mut self) -> bool {
        match self.orchestrator.wait() {
            Some(outcome) => {
                self.settle(outcome);
                true
            }
            None => false,
        }
    }

    fn dispatch(&mut self) -> Result<Submission> {
        match &mut self.mode {
            StudioMode::Generate(options) => self.orchestrator.submit_generate(
                &self.prompt,
                options.model,
                options.aspect_ratio,
            ),
            StudioMode::Edit(edit) => {
                let mask = edit.mask.export_payload()?;
                self.orchestrator
                    .submit_edit(&self.prompt, edit.uploads.payloads(), mask)
            }
        }
    }

    fn settle(&mut self, outcome: Result<GeneratedImage>) {
        match outcome {
            Ok(image) => {
                self.result = Some(image);
                self.error = None;
            }
            Err(err) => {
                self.result = None;
                self.error = Some(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ServiceError;
    use crate::orchestrator::tests::{GatedService, ScriptedService, png_result};
    use crate::uploads::tests::{CountingHandle, source};
    use crate::utils::vector::Vec2;
    use std::cell::Cell;
    use std::rc::Rc;

    fn edit_session(service: Arc<dyn ImageService>) -> StudioSession<CountingHandle> {
        let mut session = StudioSession::new(service, 16);
        assert!(session.switch_mode(ModeKind::Edit));
        session
    }

    fn paint(session: &mut StudioSession<CountingHandle>) {
        let mask = session.mask_mut().unwrap();
        mask.attach(64, 64);
        mask.begin_stroke(Vec2::new(10.0, 32.0));
        mask.continue_stroke(Vec2::new(54.0, 32.0));
        mask.end_stroke();
    }

    #[test]
    fn starts_in_generate_mode_with_defaults() {
        let session: StudioSession<()> = StudioSession::new(ScriptedService::ok(), 16);
        assert_eq!(session.mode_kind(), ModeKind::Generate);
        let StudioMode::Generate(options) = session.mode() else {
            panic!("expected generate mode");
        };
        assert_eq!(options.model, GenerateModel::Standard);
        assert_eq!(options.aspect_ratio, AspectRatio::Square);
        assert!(session.uploads().is_none());
    }

    #[test]
    fn switching_modes_resets_uploads_mask_and_result() {
        let released = Rc::new(Cell::new(0));
        let mut session = edit_session(ScriptedService::ok());
        session.prompt = "add a hat".to_string();
        session.add_images([
            (source("a.png"), CountingHandle(released.clone())),
            (source("b.png"), CountingHandle(released.clone())),
        ]);
        paint(&mut session);
        assert_eq!(session.submit(), Submission::Started);
        assert!(session.wait());
        assert!(session.result().is_some());

        assert!(session.switch_mode(ModeKind::Generate));
        assert!(session.result().is_none());
        assert!(session.error().is_none());
        assert!(session.mask().is_none());
        assert_eq!(released.get(), 2);
        assert_eq!(session.prompt, "add a hat");

        assert!(session.switch_mode(ModeKind::Edit));
        assert!(session.uploads().unwrap().is_empty());
        assert!(!session.mask().unwrap().is_ready());
    }

    #[test]
    fn removing_the_reference_releases_it_and_drops_the_mask() {
        let released = Rc::new(Cell::new(0));
        let mut session = edit_session(ScriptedService::ok());
        session.add_images([
            (source("a.png"), CountingHandle(released.clone())),
            (source("b.png"), CountingHandle(released.clone())),
        ]);
        paint(&mut session);

        session.remove_image(0);
        assert_eq!(session.uploads().unwrap().len(), 1);
        assert_eq!(released.get(), 1);
        assert!(!session.mask().unwrap().is_ready());

        session.remove_image(3);
        assert_eq!(session.uploads().unwrap().len(), 1);
    }

    #[test]
    fn removing_a_secondary_image_keeps_the_mask() {
        let mut session = edit_session(ScriptedService::ok());
        let released = Rc::new(Cell::new(0));
        session.add_images([
            (source("a.png"), CountingHandle(released.clone())),
            (source("b.png"), CountingHandle(released.clone())),
        ]);
        paint(&mut session);
        session.remove_image(1);
        assert!(session.mask().unwrap().can_undo());
    }

    #[test]
    fn validation_errors_surface_without_a_request() {
        let service = ScriptedService::ok();
        let mut session: StudioSession<CountingHandle> = StudioSession::new(service.clone(), 16);
        session.prompt = "   ".to_string();
        assert_eq!(session.submit(), Submission::Ignored);
        assert_eq!(session.error(), Some("Please enter a prompt."));

        session.switch_mode(ModeKind::Edit);
        session.prompt = "valid".to_string();
        session.submit();
        assert_eq!(session.error(), Some("Please upload at least one image to edit."));
        assert!(!session.is_pending());
        assert_eq!(service.calls(), 0);
    }

    #[test]
    fn failures_keep_uploads_and_mask() {
        let service = ScriptedService::replying(|| Err(ServiceError::NoImageData));
        let mut session = edit_session(service);
        let released = Rc::new(Cell::new(0));
        session.add_images([(source("a.png"), CountingHandle(released.clone()))]);
        paint(&mut session);
        session.prompt = "make it night".to_string();

        assert_eq!(session.submit(), Submission::Started);
        assert!(session.wait());
        assert_eq!(
            session.error(),
            Some("Image editing failed: No image data in response.")
        );
        assert!(session.result().is_none());
        assert_eq!(session.uploads().unwrap().len(), 1);
        assert!(session.mask().unwrap().can_undo());
        assert_eq!(released.get(), 0);
    }

    #[test]
    fn success_clears_a_previous_error() {
        let mut session: StudioSession<()> = StudioSession::new(ScriptedService::ok(), 16);
        session.submit();
        assert!(session.error().is_some());

        session.prompt = "a boat".to_string();
        assert_eq!(session.submit(), Submission::Started);
        assert!(session.error().is_none());
        assert!(session.wait());
        assert_eq!(session.result(), Some(&png_result()));
        assert!(!session.wait());
    }

    #[test]
    fn pending_request_blocks_resubmission_and_mode_switch() {
        let (release, service) = GatedService::new();
        let mut session: StudioSession<()> = StudioSession::new(service, 16);
        session.prompt = "a castle".to_string();

        assert_eq!(session.submit(), Submission::Started);
        assert_eq!(session.submit(), Submission::Ignored);
        assert!(!session.switch_mode(ModeKind::Edit));
        assert_eq!(session.mode_kind(), ModeKind::Generate);
        assert!(!session.poll());

        release.send(()).unwrap();
        assert!(session.wait());
        assert!(session.result().is_some());
        assert!(session.switch_mode(ModeKind::Edit));
    }

    #[test]
    fn uploads_are_ignored_in_generate_mode() {
        let mut session: StudioSession<()> = StudioSession::new(ScriptedService::ok(), 16);
        session.add_images([(source("a.png"), ())]);
        session.remove_image(0);
        assert!(session.uploads().is_none());
    }
}
