//! Forma del reporte compuesto que viaja en el envelope de éxito.

use chrono::{DateTime, Utc};
use pulse_core::constants::{CONFIDENCE_LEVEL, WORKFLOW_VERSION};
use pulse_core::StepResult;
use pulse_providers::ProviderId;
use serde::Serialize;
use uuid::Uuid;

use crate::chain::StepOutputChain;

/// Salidas de análisis; las ausentes se serializan como `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedAnalysis {
    pub context_summary: Option<String>,
    pub realtime_analysis: Option<String>,
    pub predictions: Option<String>,
    pub recommendations: Option<String>,
    pub public_alerts: Option<String>,
    /// Placeholder constante.
    pub confidence_level: &'static str,
}

impl DetailedAnalysis {
    pub fn from_chain(chain: &StepOutputChain) -> Self {
        Self { context_summary: chain.context_summary(),
               realtime_analysis: chain.realtime_analysis.clone(),
               predictions: chain.predictions.clone(),
               recommendations: chain.recommendations.clone(),
               public_alerts: chain.public_alerts.clone(),
               confidence_level: CONFIDENCE_LEVEL }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowReport {
    pub conversational_response: String,
    pub detailed_analysis: DetailedAnalysis,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMeta {
    pub flow_id: Uuid,
    pub workflow_version: &'static str,
    pub provider: ProviderId,
    pub fallback_used: bool,
    pub steps: Vec<StepResult>,
}

impl ReportMeta {
    pub fn new(flow_id: Uuid, provider: ProviderId, fallback_used: bool, steps: Vec<StepResult>) -> Self {
        Self { flow_id,
               workflow_version: WORKFLOW_VERSION,
               provider,
               fallback_used,
               steps }
    }
}
