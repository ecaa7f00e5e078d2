use pulse_core::AppError;
use pulse_providers::CapabilityGateway;

use crate::chain::StepOutputChain;
use crate::prompts;
use crate::request::WorkflowRequest;

pub async fn run(gateway: &CapabilityGateway,
                 request: &WorkflowRequest,
                 chain: &StepOutputChain,
                 realtime_analysis: &str)
                 -> Result<String, AppError> {
    super::complete_text(gateway, &prompts::predictions(chain, realtime_analysis), request.input()).await
}
