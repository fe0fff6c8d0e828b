//! View-state of one studio session.
//!
//! Every transition takes the old state by value and returns the new one, so
//! the state is independent of whatever renders it.

use super::classifier::ErrorPresentation;
use crate::models::{ConfigField, GeneratedImage, GenerationRequest, GenerationResult};
use serde::Serialize;

pub const ERROR_DIALOG_TITLE: &str = "Generation Failed";

/// What the result area currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultArea {
    Empty,
    Loading,
    Images(usize),
}

impl ResultArea {
    pub fn headline(&self) -> String {
        match self {
            ResultArea::Empty => "Your generated images will appear here".to_string(),
            ResultArea::Loading => "Generating images...".to_string(),
            ResultArea::Images(1) => "1 image generated".to_string(),
            ResultArea::Images(n) => format!("{} images generated", n),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    request: GenerationRequest,
    images: GenerationResult,
    is_generating: bool,
    is_zipping: bool,
    show_settings: bool,
    error: Option<ErrorPresentation>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    pub fn prompt(&self) -> &str {
        &self.request.prompt
    }

    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    pub fn is_zipping(&self) -> bool {
        self.is_zipping
    }

    pub fn settings_visible(&self) -> bool {
        self.show_settings
    }

    pub fn error_visible(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&ErrorPresentation> {
        self.error.as_ref()
    }

    /// The submit control is disabled while a generation is in flight.
    pub fn can_submit(&self) -> bool {
        !self.is_generating
    }

    pub fn can_download_all(&self) -> bool {
        !self.is_generating && !self.is_zipping && !self.images.is_empty()
    }

    pub fn result_area(&self) -> ResultArea {
        if self.is_generating {
            ResultArea::Loading
        } else if self.images.is_empty() {
            ResultArea::Empty
        } else {
            ResultArea::Images(self.images.len())
        }
    }

    pub fn set_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.request.prompt = prompt.into();
        self
    }

    /// Starts a generation from the current fields.
    ///
    /// Returns the request to issue, or `None` when nothing should be sent:
    /// either a generation is already running, or the prompt is empty (in
    /// which case the validation message is shown instead).
    pub fn submit_prompt(self) -> (Self, Option<GenerationRequest>) {
        if !self.can_submit() {
            log::debug!("Submit ignored, generation already in progress");
            return (self, None);
        }

        if let Err(e) = self.request.validate() {
            let state = self.show_error(ErrorPresentation::text(e.to_string()));
            return (state, None);
        }

        let request = self.request.clone();
        let state = Self {
            images: Vec::new(),
            is_generating: true,
            ..self
        };
        (state, Some(request))
    }

    /// Completes a generation. The busy flag is cleared whatever the outcome;
    /// on success the images replace the current ones, on failure the error
    /// dialog opens and no images are kept.
    pub fn finish_generation(
        self,
        outcome: std::result::Result<GenerationResult, ErrorPresentation>,
    ) -> Self {
        let state = Self {
            is_generating: false,
            ..self
        };
        match outcome {
            Ok(images) => Self { images, ..state },
            Err(presentation) => Self {
                images: Vec::new(),
                ..state
            }
            .show_error(presentation),
        }
    }

    /// Clears the busy flag of a generation that will never report back.
    /// Nothing is shown and no images are kept.
    pub fn abandon_generation(self) -> Self {
        Self {
            is_generating: false,
            images: Vec::new(),
            ..self
        }
    }

    pub fn set_config_field(mut self, field: ConfigField) -> Self {
        self.request.apply(field);
        self
    }

    /// Resets prompt, images and every request setting to defaults.
    pub fn clear_all(self) -> Self {
        Self {
            request: GenerationRequest::default(),
            images: Vec::new(),
            ..self
        }
    }

    pub fn open_settings(self) -> Self {
        Self {
            show_settings: true,
            ..self
        }
    }

    pub fn close_settings(self) -> Self {
        Self {
            show_settings: false,
            ..self
        }
    }

    pub fn toggle_settings(self) -> Self {
        let show_settings = !self.show_settings;
        Self {
            show_settings,
            ..self
        }
    }

    pub fn show_error(self, presentation: ErrorPresentation) -> Self {
        Self {
            error: Some(presentation),
            ..self
        }
    }

    pub fn dismiss_error(self) -> Self {
        Self { error: None, ..self }
    }

    pub fn begin_archive(self) -> Self {
        Self {
            is_zipping: true,
            ..self
        }
    }

    pub fn finish_archive(self, outcome: std::result::Result<(), ErrorPresentation>) -> Self {
        let state = Self {
            is_zipping: false,
            ..self
        };
        match outcome {
            Ok(()) => state,
            Err(presentation) => state.show_error(presentation),
        }
    }

    pub fn abandon_archive(self) -> Self {
        Self {
            is_zipping: false,
            ..self
        }
    }
}
