//! Configuración de la aplicación.
//!
//! Único punto que lee el entorno del proceso (con `.env` cargado una sola
//! vez). El resultado es un `AppConfig` inmutable del que se derivan la
//! configuración del workflow y la fábrica HTTP de proveedores.

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use pulse_core::RetryPolicy;
use pulse_providers::{HttpProviderFactory, ProviderCredentials, ProviderId, ProviderModels};
use pulse_workflow::WorkflowConfig;

use crate::errors::ConfigError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv();
});

pub const PRIMARY_KEY_VAR: &str = "OPENAI_API_KEY";
pub const SECONDARY_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: ProviderCredentials,
    pub models: ProviderModels,
    pub primary_endpoint: String,
    pub secondary_endpoint: String,
    pub retry: RetryPolicy,
    pub http_timeout_secs: u64,
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, var: &str, default: T) -> Result<T, ConfigError> {
    match lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid { var: var.to_string(),
                                                                     value: raw }),
    }
}

fn string_or(lookup: &impl Fn(&str) -> Option<String>, var: &str, default: &str) -> String {
    lookup(var).map(|v| v.trim().to_string())
               .filter(|v| !v.is_empty())
               .unwrap_or_else(|| default.to_string())
}

impl AppConfig {
    /// Lee el entorno del proceso.
    pub fn from_env() -> Result<Self, ConfigError> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Construye la configuración con una función de búsqueda arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        let defaults = RetryPolicy::default();
        let retry = RetryPolicy::new(parse_or(&lookup, "PULSEFLOW_RETRIES", defaults.retries)?,
                                     parse_or(&lookup, "PULSEFLOW_RETRY_DELAY_MS", defaults.delay_ms)?,
                                     parse_or(&lookup, "PULSEFLOW_RETRY_FACTOR", defaults.factor)?);

        Ok(Self { credentials: ProviderCredentials::new(lookup(PRIMARY_KEY_VAR), lookup(SECONDARY_KEY_VAR)),
                  models: ProviderModels { openai: string_or(&lookup,
                                                             "PULSEFLOW_PRIMARY_MODEL",
                                                             ProviderId::OpenAi.default_model()),
                                           groq: string_or(&lookup,
                                                           "PULSEFLOW_SECONDARY_MODEL",
                                                           ProviderId::Groq.default_model()) },
                  primary_endpoint: string_or(&lookup,
                                              "PULSEFLOW_PRIMARY_ENDPOINT",
                                              ProviderId::OpenAi.default_endpoint()),
                  secondary_endpoint: string_or(&lookup,
                                                "PULSEFLOW_SECONDARY_ENDPOINT",
                                                ProviderId::Groq.default_endpoint()),
                  retry,
                  http_timeout_secs: parse_or(&lookup, "PULSEFLOW_HTTP_TIMEOUT_SECS", 60)? })
    }

    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig::default().with_credentials(self.credentials.clone())
                                 .with_models(self.models.clone())
                                 .with_retry(self.retry)
    }

    pub fn provider_factory(&self) -> HttpProviderFactory {
        HttpProviderFactory { openai_endpoint: self.primary_endpoint.clone(),
                              groq_endpoint: self.secondary_endpoint.clone(),
                              timeout_secs: self.http_timeout_secs }
    }
}
