use pulse_core::AppError;
use pulse_providers::CapabilityGateway;

use crate::chain::StepOutputChain;
use crate::prompts;
use crate::request::WorkflowRequest;

/// Alertas públicas a partir de las recomendaciones.
pub async fn run(gateway: &CapabilityGateway,
                 request: &WorkflowRequest,
                 chain: &StepOutputChain,
                 recommendations: &str)
                 -> Result<String, AppError> {
    super::complete_text(gateway, &prompts::public_alerts(chain, recommendations), request.input()).await
}
