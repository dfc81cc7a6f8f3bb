//! Runs at most one remote image request at a time on a worker thread.
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::api::{
    AspectRatio, EditRequest, GenerateModel, GenerateRequest, GeneratedImage, ImagePayload,
    ImageService, ServiceError,
};
use crate::error::{Result, StudioError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    Generate,
    Edit,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Generate => f.write_str("generate"),
            RequestKind::Edit => f.write_str("edit"),
        }
    }
}

impl RequestKind {
    /// Wrap a service failure so it displays the message for this kind of request.
    pub fn failure(self, err: ServiceError) -> StudioError {
        match self {
            RequestKind::Generate => StudioError::Generate(err),
            RequestKind::Edit => StudioError::Edit(err),
        }
    }
}

/// Outcome of a submit call that passed validation (or was never checked).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    Started,
    /// A request was already in flight; nothing happened.
    Ignored,
}

struct PendingRequest {
    kind: RequestKind,
    handle: JoinHandle<std::result::Result<GeneratedImage, ServiceError>>,
}

pub struct RequestOrchestrator {
    service: Arc<dyn ImageService>,
    pending: Option<PendingRequest>,
}

impl RequestOrchestrator {
    pub fn new(service: Arc<dyn ImageService>) -> Self {
        Self {
            service,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_kind(&self) -> Option<RequestKind> {
        self.pending.as_ref().map(|p| p.kind)
    }

    /// Validate and start a text-to-image request.
    pub fn submit_generate(
        &mut self,
        prompt: &str,
        model: GenerateModel,
        aspect_ratio: AspectRatio,
    ) -> Result<Submission> {
        if self.is_pending() {
            return Ok(Submission::Ignored);
        }
        let request = GenerateRequest::new(prompt, model, aspect_ratio)?;
        log::info!(
            "Generating with {} model at {}",
            model.label(),
            aspect_ratio.as_str()
        );
        let service = Arc::clone(&self.service);
        self.spawn(RequestKind::Generate, move || service.generate(&request));
        Ok(Submission::Started)
    }

    /// Validate and start an edit of `images`, optionally constrained by `mask`.
    pub fn submit_edit(
        &mut self,
        prompt: &str,
        images: Vec<ImagePayload>,
        mask: Option<ImagePayload>,
    ) -> Result<Submission> {
        if self.is_pending() {
            return Ok(Submission::Ignored);
        }
        let request = EditRequest::new(prompt, images, mask)?;
        log::info!(
            "Editing {} image(s){}",
            request.images.len(),
            if request.mask.is_some() { " with mask" } else { "" }
        );
        let service = Arc::clone(&self.service);
        self.spawn(RequestKind::Edit, move || service.edit(&request));
        Ok(Submission::Started)
    }

    /// Non-blocking: returns the outcome once the worker has finished.
    pub fn poll(&mut self) -> Option<Result<GeneratedImage>> {
        if !self.pending.as_ref()?.handle.is_finished() {
            return None;
        }
        self.wait()
    }

    /// Block until the pending request settles. `None` if nothing is pending.
    pub fn wait(&mut self) -> Option<Result<GeneratedImage>> {
        let PendingRequest { kind, handle } = self.pending.take()?;
        let outcome = handle
            .join()
            .unwrap_or_else(|_| Err(ServiceError::WorkerPanicked));
        Some(outcome.map_err(|err| {
            log::error!("{kind} request failed: {err}");
            kind.failure(err)
        }))
    }

    fn spawn<F>(&mut self, kind: RequestKind, job: F)
    where
        F: FnOnce() -> std::result::Result<GeneratedImage, ServiceError> + Send + 'static,
    {
        self.pending = Some(PendingRequest {
            kind,
            handle: thread::spawn(job),
        });
    }
}
