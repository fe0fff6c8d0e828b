use super::request::GenerationRequest;
use serde::{Deserialize, Serialize};

/// The generation call as handed to an [`ImageService`](crate::imagen::ImageService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateImagesParams {
    pub model: String,
    pub prompt: String,
    pub config: GenerateImagesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateImagesConfig {
    pub number_of_images: u8,
    pub aspect_ratio: String,
    pub person_generation: String,
}

impl From<&GenerationRequest> for GenerateImagesParams {
    fn from(request: &GenerationRequest) -> Self {
        GenerateImagesParams {
            model: request.model.id().to_string(),
            prompt: request.prompt.clone(),
            config: GenerateImagesConfig {
                number_of_images: request.image_count.get(),
                aspect_ratio: request.aspect_ratio.as_str().to_string(),
                person_generation: request.person_generation.api_value().to_string(),
            },
        }
    }
}

// Wire types for `models/{model}:predict`
#[derive(Debug, Serialize)]
pub struct PredictRequest {
    pub instances: Vec<PredictInstance>,
    pub parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
pub struct PredictInstance {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    pub sample_count: u8,
    pub aspect_ratio: String,
    pub person_generation: String,
}

impl From<&GenerateImagesParams> for PredictRequest {
    fn from(params: &GenerateImagesParams) -> Self {
        PredictRequest {
            instances: vec![PredictInstance {
                prompt: params.prompt.clone(),
            }],
            parameters: PredictParameters {
                sample_count: params.config.number_of_images,
                aspect_ratio: params.config.aspect_ratio.clone(),
                person_generation: params.config.person_generation.clone(),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    /// Set instead of image bytes when a safety filter removed the image.
    #[serde(default)]
    pub rai_filtered_reason: Option<String>,
}

impl PredictResponse {
    /// Base64 payloads in service order. Filtered entries carry no bytes and
    /// are skipped.
    pub fn into_payloads(self) -> Vec<String> {
        self.predictions
            .into_iter()
            .filter_map(|prediction| {
                if let Some(reason) = &prediction.rai_filtered_reason {
                    log::warn!("Image removed by safety filter: {}", reason);
                }
                prediction.bytes_base64_encoded
            })
            .collect()
    }
}
