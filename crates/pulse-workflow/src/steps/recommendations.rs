use pulse_core::AppError;
use pulse_providers::CapabilityGateway;

use crate::chain::StepOutputChain;
use crate::prompts;
use crate::request::WorkflowRequest;

pub async fn run(gateway: &CapabilityGateway,
                 request: &WorkflowRequest,
                 chain: &StepOutputChain,
                 predictions: &str)
                 -> Result<String, AppError> {
    super::complete_text(gateway, &prompts::recommendations(chain, predictions), request.input()).await
}
