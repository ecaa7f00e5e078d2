//! pulse-workflow: orquestador del análisis en seis pasos.
//!
//! Encadena contexto, análisis en tiempo real con herramientas,
//! predicciones, recomendaciones, alertas públicas y respuesta
//! conversacional, y devuelve siempre un único `ResultEnvelope`.

pub mod chain;
pub mod config;
pub mod orchestrator;
pub mod prompts;
pub mod report;
pub mod request;
pub mod steps;

pub use chain::{ContextData, StepOutputChain};
pub use config::WorkflowConfig;
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use report::{DetailedAnalysis, ReportMeta, WorkflowReport};
pub use request::WorkflowRequest;
