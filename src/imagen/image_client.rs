use super::ImageService;
use crate::{
    config::ImagenConfig,
    error::{Result, StudioError},
    models::{GenerateImagesParams, PredictRequest, PredictResponse},
};
use async_trait::async_trait;
use reqwest::Client;

const MISSING_API_KEY_MESSAGE: &str = "API key must be set when using the Gemini API.";

#[derive(Clone)]
pub struct ImagenClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl ImagenClient {
    /// The key is not checked here; a missing or bad key shows up as a
    /// failed call.
    pub fn new(config: ImagenConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:predict", self.base_url, model)
    }

    pub fn supported_models() -> Vec<(&'static str, &'static str)> {
        crate::models::ImagenModel::ALL
            .iter()
            .map(|model| (model.id(), model.display_name()))
            .collect()
    }
}

/// Formats a non-success response the way the service's own SDK reports it,
/// so the body text (with its `"message"` and `"status"` fields) stays intact.
pub(crate) fn status_error_message(status: reqwest::StatusCode, body: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("");
    let mut message = format!("got status: {} {}.", status.as_u16(), reason);
    if !body.trim().is_empty() {
        message.push(' ');
        message.push_str(body.trim());
    }
    message
}

#[async_trait]
impl ImageService for ImagenClient {
    async fn generate_images(&self, params: &GenerateImagesParams) -> Result<Vec<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| StudioError::ExternalService(MISSING_API_KEY_MESSAGE.into()))?;

        let url = self.endpoint(&params.model);
        let body = PredictRequest::from(params);

        log::info!("Generating images with model: {}", params.model);
        log::debug!(
            "Predict parameters: sampleCount={} aspectRatio={} personGeneration={}",
            body.parameters.sample_count,
            body.parameters.aspect_ratio,
            body.parameters.person_generation
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StudioError::ExternalService(status_error_message(
                status, &text,
            )));
        }

        let predict_response: PredictResponse = response.json().await?;
        let payloads = predict_response.into_payloads();
        log::debug!("Service returned {} image(s)", payloads.len());

        Ok(payloads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = ImagenClient::new(ImagenConfig::new().with_base_url("http://localhost:8080/"));
        assert_eq!(
            client.endpoint("imagen-4.0-fast-generate-001"),
            "http://localhost:8080/models/imagen-4.0-fast-generate-001:predict"
        );
    }

    #[test]
    fn test_supported_models() {
        let models = ImagenClient::supported_models();
        assert_eq!(models.len(), 3);
        assert_eq!(models[0], ("imagen-4.0-fast-generate-001", "Imagen 4 Fast"));
    }

    #[test]
    fn test_status_error_message_keeps_body() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let message = status_error_message(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(
            message,
            format!("got status: 429 Too Many Requests. {}", body)
        );
    }

    #[test]
    fn test_status_error_message_without_body() {
        let message = status_error_message(StatusCode::BAD_GATEWAY, "");
        assert_eq!(message, "got status: 502 Bad Gateway.");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_the_call() {
        let client = ImagenClient::new(ImagenConfig::new());
        let params = GenerateImagesParams::from(&crate::models::GenerationRequest::new("a red fox"));

        let err = client.generate_images(&params).await.unwrap_err();

        match err {
            StudioError::ExternalService(message) => {
                assert_eq!(message, MISSING_API_KEY_MESSAGE)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
