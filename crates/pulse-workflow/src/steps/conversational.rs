//! Respuesta conversacional: el entregable final.
//!
//! No tiene gate; corre con el subconjunto de salidas disponible. Si la
//! llamada falla, el orquestador usa `degraded_response`.

use pulse_core::AppError;
use pulse_providers::CapabilityGateway;

use crate::chain::StepOutputChain;
use crate::prompts;
use crate::request::WorkflowRequest;

pub async fn run(gateway: &CapabilityGateway,
                 request: &WorkflowRequest,
                 chain: &StepOutputChain)
                 -> Result<String, AppError> {
    super::complete_text(gateway, &prompts::conversational(chain), request.input()).await
}

/// Texto usado cuando el propio paso conversacional falla. Sólo reproduce
/// salidas ya presentes en la cadena.
pub fn degraded_response(chain: &StepOutputChain) -> String {
    let available: Vec<&str> = [chain.public_alerts.as_deref(),
                                chain.recommendations.as_deref(),
                                chain.predictions.as_deref(),
                                chain.realtime_analysis.as_deref()].into_iter()
                                                                    .flatten()
                                                                    .collect();
    match available.first() {
        Some(latest) => format!("The assistant could not compose a conversational reply right now. \
                                 Here is the most recent analysis available:\n\n{latest}"),
        None => "The assistant could not complete the analysis right now. Please try again in a few minutes."
            .to_string(),
    }
}
