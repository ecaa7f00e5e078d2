//! Configuración explícita del orquestador.
//!
//! Se construye fuera (el binario la carga del entorno) y se pasa en la
//! construcción; ningún componente del workflow lee estado ambiental.

use pulse_core::RetryPolicy;
use pulse_providers::{KnowledgeSource, ProviderCredentials, ProviderModels};

#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub credentials: ProviderCredentials,
    pub retry: RetryPolicy,
    pub models: ProviderModels,
    /// Almacenes consultados por el paso de contexto.
    pub knowledge_sources: Vec<KnowledgeSource>,
    /// Rondas de herramientas permitidas en el análisis en tiempo real.
    pub max_tool_rounds: usize,
    pub passages_per_source: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self { credentials: ProviderCredentials::default(),
               retry: RetryPolicy::default(),
               models: ProviderModels::default(),
               knowledge_sources: KnowledgeSource::ALL.to_vec(),
               max_tool_rounds: 3,
               passages_per_source: 3 }
    }
}

impl WorkflowConfig {
    pub fn with_credentials(mut self, credentials: ProviderCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_models(mut self, models: ProviderModels) -> Self {
        self.models = models;
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }
}
