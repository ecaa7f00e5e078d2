//! Identificadores de proveedor y contrato de razonamiento.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agent::{AgentRequest, AgentResponse};
use crate::error::ProviderError;

/// Conjunto cerrado de proveedores de razonamiento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Familia primaria.
    OpenAi,
    /// Familia secundaria (alternativa ante sobrecarga).
    Groq,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Groq => "groq",
        }
    }

    /// Prefijo con el que se emiten las credenciales de este proveedor.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "sk-",
            ProviderId::Groq => "gsk_",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "https://api.openai.com/v1/chat/completions",
            ProviderId::Groq => "https://api.groq.com/openai/v1/chat/completions",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "gpt-4o-mini",
            ProviderId::Groq => "llama-3.3-70b-versatile",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capacidad de razonamiento: una implementación por proveedor.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Una única llamada de razonamiento (sin reintentos).
    async fn run_agent(&self, request: AgentRequest) -> Result<AgentResponse, ProviderError>;

    /// Libera la sesión del proveedor. Se invoca en toda salida del workflow.
    async fn finalize(&self, _session_id: &str) {}
}
