//! DeepSeek API driver using the OpenAI-compatible client.

use crate::{ApiKey, OpenAICompatibleClient};
use annals_core::{ApiSettings, GenerateRequest, GenerateResponse};
use annals_error::{AnnalsResult, ModelsResult};
use annals_interface::AnnalsDriver;
use async_trait::async_trait;
use std::time::Duration;
use tracing::instrument;

/// DeepSeek chat driver.
///
/// Built from the `[api]` settings and an already-resolved key, so it never
/// reads the environment itself.
#[derive(Debug, Clone)]
pub struct DeepSeekDriver {
    inner: OpenAICompatibleClient,
}

impl DeepSeekDriver {
    /// Creates a driver for the configured endpoint and model.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    #[instrument(skip_all, fields(model = %settings.model(), base_url = %settings.base_url()))]
    pub fn new(settings: &ApiSettings, api_key: ApiKey) -> ModelsResult<Self> {
        let inner = OpenAICompatibleClient::new(
            api_key,
            settings.model().clone(),
            settings.base_url(),
            "deepseek",
            (*settings.timeout_secs()).map(Duration::from_secs),
        )?;
        Ok(Self { inner })
    }

    /// Full chat-completions URL.
    pub fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}

#[async_trait]
impl AnnalsDriver for DeepSeekDriver {
    #[instrument(skip(self, req), fields(provider = "deepseek", model = %self.inner.model_name()))]
    async fn generate(&self, req: &GenerateRequest) -> AnnalsResult<GenerateResponse> {
        Ok(self.inner.generate(req).await?)
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
