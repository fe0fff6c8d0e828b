use crate::{
    error::Result,
    imagen::ImageService,
    logger,
    models::{GenerateImagesParams, GeneratedImage, GenerationRequest, GenerationResult},
};
use std::sync::Arc;

/// Runs the generation call against an injected [`ImageService`].
#[derive(Clone)]
pub struct Orchestrator {
    service: Arc<dyn ImageService>,
}

impl Orchestrator {
    pub fn new(service: Arc<dyn ImageService>) -> Self {
        Self { service }
    }

    /// Validates the request, issues exactly one call, and wraps each returned
    /// payload as a [`GeneratedImage`] in service order.
    ///
    /// An empty prompt fails with [`Validation`](crate::StudioError::Validation) before any call
    /// is made. A failed call or an undecodable payload yields no images.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        request.validate()?;

        let params = GenerateImagesParams::from(request);
        let timer = logger::timer("image generation");

        let payloads = self.service.generate_images(&params).await.map_err(|e| {
            log::error!("Error generating images: {}", e);
            e
        })?;
        timer.stop();

        let images = payloads
            .into_iter()
            .map(GeneratedImage::from_base64)
            .collect::<Result<GenerationResult>>()?;

        log::info!("Generated {} image(s)", images.len());
        Ok(images)
    }
}
