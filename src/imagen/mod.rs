pub mod image_client;

use crate::{error::Result, models::GenerateImagesParams};
use async_trait::async_trait;

pub use image_client::ImagenClient;

/// The hosted text-to-image service.
///
/// One call is one request/response exchange. Implementations return the
/// base64 image payloads in the order the service produced them; any failure
/// is an [`ExternalService`](crate::StudioError::ExternalService) error whose
/// message is the raw text the service or transport reported.
#[async_trait]
pub trait ImageService: Send + Sync {
    async fn generate_images(&self, params: &GenerateImagesParams) -> Result<Vec<String>>;
}
