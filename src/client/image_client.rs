use crate::{
    error::{GeneratorError, Result},
    models::{GenerationRequest, GenerationResponse},
};
use reqwest::Client;

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ImageClient {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Sends a single generation request. No retries.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        log::debug!("Invoking image model: {}", request.model);
        log::debug!(
            "Image generation request payload: {}",
            serde_json::to_string(request).unwrap_or_default()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GeneratorError::HttpStatus { status, body });
        }

        serde_json::from_str::<GenerationResponse>(&body)
            .map_err(|e| GeneratorError::MalformedResponse(e.to_string()))
    }
}
