//! Construcción de proveedores a partir de una selección.
//!
//! El orquestador sólo conoce `ProviderFactory`; el binario usa
//! `HttpProviderFactory` y los tests inyectan fakes.

use std::sync::Arc;

use pulse_core::AppError;

use crate::chat_client::{ChatClientConfig, ChatCompletionsClient};
use crate::credentials::ProviderRoute;
use crate::provider::{ProviderId, ReasoningProvider};

/// Modelo a usar con cada familia de proveedor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderModels {
    pub openai: String,
    pub groq: String,
}

impl Default for ProviderModels {
    fn default() -> Self {
        Self { openai: ProviderId::OpenAi.default_model().to_string(),
               groq: ProviderId::Groq.default_model().to_string() }
    }
}

impl ProviderModels {
    pub fn model_for(&self, id: ProviderId) -> &str {
        match id {
            ProviderId::OpenAi => &self.openai,
            ProviderId::Groq => &self.groq,
        }
    }
}

pub trait ProviderFactory: Send + Sync {
    fn create(&self, route: &ProviderRoute) -> Result<Arc<dyn ReasoningProvider>, AppError>;
}

/// Fábrica de clientes chat-completions sobre HTTP.
#[derive(Debug, Clone)]
pub struct HttpProviderFactory {
    pub openai_endpoint: String,
    pub groq_endpoint: String,
    pub timeout_secs: u64,
}

impl Default for HttpProviderFactory {
    fn default() -> Self {
        Self { openai_endpoint: ProviderId::OpenAi.default_endpoint().to_string(),
               groq_endpoint: ProviderId::Groq.default_endpoint().to_string(),
               timeout_secs: 60 }
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn create(&self, route: &ProviderRoute) -> Result<Arc<dyn ReasoningProvider>, AppError> {
        let endpoint = match route.id {
            ProviderId::OpenAi => self.openai_endpoint.clone(),
            ProviderId::Groq => self.groq_endpoint.clone(),
        };
        let config = ChatClientConfig { provider: route.id,
                                        endpoint,
                                        api_key: route.api_key.clone(),
                                        timeout_secs: self.timeout_secs };
        let client = ChatCompletionsClient::new(config).map_err(|e| AppError::unexpected(e.to_string()))?;
        Ok(Arc::new(client))
    }
}
