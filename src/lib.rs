//! PulseFlow
//!
//! Crate raíz del workspace:
//! - `config` carga `AppConfig` del entorno (`.env` incluido).
//! - `logging` inicializa `tracing-subscriber`.
//! - `errors` define los errores propios de esta capa.
//!
//! El workflow vive en `pulse-workflow`; aquí sólo se ensambla.

pub mod config;
pub mod errors;
pub mod logging;

pub use config::AppConfig;
pub use errors::ConfigError;
pub use pulse_core::ResultEnvelope;
pub use pulse_workflow::{Orchestrator, WorkflowConfig, WorkflowRequest};

/// Orquestador de producción a partir de la configuración cargada.
pub fn build_orchestrator(config: &AppConfig) -> Orchestrator {
    Orchestrator::builder(config.workflow_config()).factory(std::sync::Arc::new(config.provider_factory()))
                                                   .build()
}
