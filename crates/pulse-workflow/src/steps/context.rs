use pulse_core::AppError;
use pulse_providers::CapabilityGateway;
use tracing::debug;

use crate::chain::ContextData;
use crate::config::WorkflowConfig;
use crate::request::WorkflowRequest;

/// Recupera pasajes de los almacenes configurados usando la pregunta como
/// consulta.
pub async fn run(gateway: &CapabilityGateway,
                 request: &WorkflowRequest,
                 config: &WorkflowConfig)
                 -> Result<ContextData, AppError> {
    let passages = gateway.retrieve_context(request.input(), &config.knowledge_sources, config.passages_per_source)
                          .await?;
    debug!(passages = passages.len(), "context retrieved");
    Ok(ContextData { passages,
                     environment: request.environment().clone() })
}
