pub mod archive;
pub mod classifier;
pub mod orchestrator;
pub mod state;

use crate::{
    error::{Result, StudioError},
    imagen::ImageService,
    models::ConfigField,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use archive::{build_archive, ArchiveBlob, ARCHIVE_FILE_NAME};
pub use classifier::{classify, ErrorPresentation, RATE_LIMIT_DOCS_URL};
pub use orchestrator::Orchestrator;
pub use state::{ResultArea, SessionState, ERROR_DIALOG_TITLE};

/// What the error dialog shows for a failure. Only service failures go
/// through the classifier; local errors are shown as they are.
pub fn present(err: &StudioError) -> ErrorPresentation {
    match err {
        StudioError::ExternalService(_) => classify(&err.raw_message()),
        other => ErrorPresentation::text(other.to_string()),
    }
}

/// What a call to [`Studio::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The generation ran and its images are in the state.
    Generated,
    /// A generation was already in flight, so nothing was sent.
    Busy,
}

/// Holds a busy flag for one async task. A task dropped before it reports
/// has its flag released here.
struct InFlight<'a> {
    state: &'a mut SessionState,
    release: Option<fn(SessionState) -> SessionState>,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a mut SessionState, release: fn(SessionState) -> SessionState) -> Self {
        Self {
            state,
            release: Some(release),
        }
    }

    fn finish(mut self, transition: impl FnOnce(SessionState) -> SessionState) {
        self.release = None;
        let state = std::mem::take(&mut *self.state);
        *self.state = transition(state);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            log::warn!("Task dropped before completion, releasing busy flag");
            let state = std::mem::take(&mut *self.state);
            *self.state = release(state);
        }
    }
}

/// A studio session: the view-state plus the orchestrator that serves it.
pub struct Studio {
    orchestrator: Orchestrator,
    state: SessionState,
}

impl Studio {
    pub fn new(service: Arc<dyn ImageService>) -> Self {
        Self {
            orchestrator: Orchestrator::new(service),
            state: SessionState::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Applies a state transition.
    pub fn update(&mut self, transition: impl FnOnce(SessionState) -> SessionState) {
        let state = std::mem::take(&mut self.state);
        self.state = transition(state);
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        self.update(|state| state.set_prompt(prompt));
    }

    pub fn set_config_field(&mut self, field: ConfigField) {
        self.update(|state| state.set_config_field(field));
    }

    pub fn clear_all(&mut self) {
        self.update(SessionState::clear_all);
    }

    pub fn dismiss_error(&mut self) {
        self.update(SessionState::dismiss_error);
    }

    /// Runs one generation from the current fields.
    ///
    /// Failures are also recorded in the state (error dialog open, busy flag
    /// cleared) before being returned. A submit while a generation is in
    /// flight sends nothing and returns [`SubmitOutcome::Busy`]. Dropping the
    /// returned future mid-call releases the busy flag.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        let was_busy = self.state.is_generating();
        let (state, request) = std::mem::take(&mut self.state).submit_prompt();
        self.state = state;

        let Some(request) = request else {
            if was_busy {
                return Ok(SubmitOutcome::Busy);
            }
            return Err(StudioError::empty_prompt());
        };

        log::info!("Submitting prompt: {}", request.prompt);
        let in_flight = InFlight::new(&mut self.state, SessionState::abandon_generation);
        match self.orchestrator.generate(&request).await {
            Ok(images) => {
                in_flight.finish(|state| state.finish_generation(Ok(images)));
                Ok(SubmitOutcome::Generated)
            }
            Err(e) => {
                let presentation = present(&e);
                in_flight.finish(|state| state.finish_generation(Err(presentation)));
                Err(e)
            }
        }
    }

    /// Packs the current images into an archive.
    ///
    /// Returns `Ok(None)` without touching any flag when there is nothing to
    /// pack or another operation is running.
    pub async fn download_all(&mut self) -> Result<Option<ArchiveBlob>> {
        if !self.state.can_download_all() {
            return Ok(None);
        }

        let images = self.state.images().to_vec();
        self.update(SessionState::begin_archive);
        let in_flight = InFlight::new(&mut self.state, SessionState::abandon_archive);

        match build_archive(&images).await {
            Ok(blob) => {
                in_flight.finish(|state| state.finish_archive(Ok(())));
                Ok(blob)
            }
            Err(e) => {
                let presentation = present(&e);
                in_flight.finish(|state| state.finish_archive(Err(presentation)));
                Err(e)
            }
        }
    }

    /// Saves one image under its download name.
    pub fn download_image(&self, index: usize, dir: &Path) -> Result<PathBuf> {
        let image = self.state.images().get(index).ok_or_else(|| {
            StudioError::Validation(format!("No generated image at position {}", index + 1))
        })?;
        image.save(dir, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AspectRatio, GenerateImagesParams, GeneratedImage, ImagenModel, PersonGeneration,
    };
    use super::orchestrator::tests::RecordingService;
    use async_trait::async_trait;
    use std::time::Duration;

    /// A service whose call never completes.
    struct StalledService;

    #[async_trait]
    impl ImageService for StalledService {
        async fn generate_images(&self, _params: &GenerateImagesParams) -> Result<Vec<String>> {
            std::future::pending::<Result<Vec<String>>>().await
        }
    }

    #[tokio::test]
    async fn test_red_fox_scenario() {
        let service = RecordingService::succeeding(&["Zmlyc3Q=", "c2Vjb25k"]);
        let mut studio = Studio::new(service.clone());
        studio.set_prompt("a red fox");
        studio.set_config_field(ConfigField::Model(ImagenModel::Fast));
        studio.set_config_field(ConfigField::ImageCount(2));
        studio.set_config_field(ConfigField::AspectRatio(AspectRatio::Square));
        studio.set_config_field(ConfigField::PersonGeneration(PersonGeneration::AllowAll));

        assert_eq!(studio.submit().await.unwrap(), SubmitOutcome::Generated);

        let calls = service.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            GenerateImagesParams {
                model: "imagen-4.0-fast-generate-001".into(),
                prompt: "a red fox".into(),
                config: crate::models::GenerateImagesConfig {
                    number_of_images: 2,
                    aspect_ratio: "1:1".into(),
                    person_generation: "allow_all".into(),
                },
            }
        );

        let state = studio.state();
        assert!(!state.is_generating());
        assert_eq!(state.images().len(), 2);
        assert!(state
            .images()
            .iter()
            .all(|img| img.data_uri().starts_with("data:image/png;base64,")));
    }

    #[tokio::test]
    async fn test_empty_prompt_scenario() {
        let service = RecordingService::succeeding(&["Zmlyc3Q="]);
        let mut studio = Studio::new(service.clone());

        let err = studio.submit().await.unwrap_err();

        assert!(matches!(err, StudioError::Validation(_)));
        assert_eq!(service.call_count(), 0);
        assert_eq!(
            studio.state().error(),
            Some(&ErrorPresentation::text(
                "Please enter a prompt to generate an image."
            ))
        );
    }

    #[tokio::test]
    async fn test_rate_limited_scenario() {
        let raw = r#"got status: 429 Too Many Requests. {"error":{"code":429,"message":"You exceeded your current quota","status":"RESOURCE_EXHAUSTED"}}"#;
        let service = RecordingService::failing(raw);
        let mut studio = Studio::new(service.clone());
        studio.set_prompt("a red fox");

        let err = studio.submit().await.unwrap_err();

        assert_eq!(err.raw_message(), raw);
        assert_eq!(service.call_count(), 1);
        let state = studio.state();
        assert!(!state.is_generating());
        assert!(state.images().is_empty());
        assert_eq!(state.error(), Some(&ErrorPresentation::rate_limited()));
    }

    #[tokio::test]
    async fn test_service_message_is_extracted() {
        let raw = r#"got status: 400 Bad Request. {"error":{"code":400,"message":"Invalid aspect ratio","status":"INVALID_ARGUMENT"}}"#;
        let mut studio = Studio::new(RecordingService::failing(raw));
        studio.set_prompt("a red fox");

        assert!(studio.submit().await.is_err());
        assert_eq!(
            studio.state().error(),
            Some(&ErrorPresentation::text("Invalid aspect ratio"))
        );

        studio.dismiss_error();
        assert!(!studio.state().error_visible());
    }

    #[tokio::test]
    async fn test_failure_after_success_drops_old_images() {
        let mut studio = Studio::new(RecordingService::succeeding(&["Zmlyc3Q="]));
        studio.set_prompt("a red fox");
        studio.submit().await.unwrap();
        assert_eq!(studio.state().images().len(), 1);

        studio.orchestrator = Orchestrator::new(RecordingService::failing("network down"));
        assert!(studio.submit().await.is_err());
        assert!(studio.state().images().is_empty());
        assert_eq!(
            studio.state().error(),
            Some(&ErrorPresentation::text("network down"))
        );
    }

    #[tokio::test]
    async fn test_timed_out_submit_releases_busy_flag() {
        let mut studio = Studio::new(Arc::new(StalledService));
        studio.set_prompt("a red fox");

        let timed_out = tokio::time::timeout(Duration::from_millis(50), studio.submit()).await;

        assert!(timed_out.is_err());
        assert!(!studio.state().is_generating());
        assert!(studio.state().can_submit());
        assert!(!studio.state().error_visible());

        let service = RecordingService::succeeding(&["Zmlyc3Q="]);
        studio.orchestrator = Orchestrator::new(service.clone());
        assert_eq!(studio.submit().await.unwrap(), SubmitOutcome::Generated);
        assert_eq!(service.call_count(), 1);
        assert_eq!(studio.state().images().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_while_generating_reports_busy() {
        let service = RecordingService::succeeding(&["Zmlyc3Q="]);
        let mut studio = Studio::new(service.clone());
        studio.set_prompt("a red fox");
        studio.update(|state| state.submit_prompt().0);

        assert_eq!(studio.submit().await.unwrap(), SubmitOutcome::Busy);
        assert_eq!(service.call_count(), 0);
        assert!(studio.state().is_generating());
    }

    #[test]
    fn test_dropped_archive_task_releases_flag() {
        let image = GeneratedImage::from_base64("Zmlyc3Q=").unwrap();
        let mut state = SessionState::new()
            .finish_generation(Ok(vec![image]))
            .begin_archive();

        drop(InFlight::new(&mut state, SessionState::abandon_archive));

        assert!(!state.is_zipping());
        assert!(state.can_download_all());
    }

    #[test]
    fn test_finished_task_keeps_its_transition() {
        let mut state = SessionState::new().begin_archive();

        InFlight::new(&mut state, SessionState::abandon_archive)
            .finish(|state| state.finish_archive(Err(ErrorPresentation::text("boom"))));

        assert!(!state.is_zipping());
        assert_eq!(state.error(), Some(&ErrorPresentation::text("boom")));
    }

    #[tokio::test]
    async fn test_download_all_without_images_is_noop() {
        let mut studio = Studio::new(RecordingService::succeeding(&[]));

        let blob = studio.download_all().await.unwrap();

        assert!(blob.is_none());
        assert!(!studio.state().is_zipping());
        assert!(!studio.state().error_visible());
    }

    #[tokio::test]
    async fn test_download_all_builds_archive() {
        let mut studio = Studio::new(RecordingService::succeeding(&["Zmlyc3Q=", "c2Vjb25k"]));
        studio.set_prompt("a red fox");
        studio.submit().await.unwrap();

        let blob = studio.download_all().await.unwrap().unwrap();

        assert_eq!(blob.file_name, ARCHIVE_FILE_NAME);
        assert!(!blob.is_empty());
        assert!(!studio.state().is_zipping());

        let dir = tempfile::tempdir().unwrap();
        let path = blob.save(dir.path()).unwrap();
        assert!(path.ends_with("imagen4-studio-images.zip"));
    }

    #[tokio::test]
    async fn test_download_image() {
        let mut studio = Studio::new(RecordingService::succeeding(&["Zmlyc3Q=", "c2Vjb25k"]));
        studio.set_prompt("a red fox");
        studio.submit().await.unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = studio.download_image(1, dir.path()).unwrap();

        assert_eq!(path, dir.path().join("imagen4-studio-2.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        assert!(studio.download_image(5, dir.path()).is_err());
    }

    #[tokio::test]
    async fn test_clear_all_after_generation() {
        let mut studio = Studio::new(RecordingService::succeeding(&["Zmlyc3Q="]));
        studio.set_prompt("a red fox");
        studio.set_config_field(ConfigField::ImageCount(4));
        studio.submit().await.unwrap();

        studio.clear_all();

        assert_eq!(studio.state().prompt(), "");
        assert!(studio.state().images().is_empty());
        assert_eq!(studio.state().request().image_count.get(), 2);
    }

    #[test]
    fn test_present_local_errors_verbatim() {
        assert_eq!(
            present(&StudioError::archive_failed()),
            ErrorPresentation::text("Failed to create the zip file.")
        );
        assert_eq!(
            present(&StudioError::ExternalService(r#"{"message": "foo"}"#.into())),
            ErrorPresentation::text("foo")
        );
    }
}
