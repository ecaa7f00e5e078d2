use std::fmt;

use serde::{Deserialize, Serialize};

/// Tipo general del paso dentro del pipeline lineal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    /// Primer paso: no consume salidas previas.
    Source,
    /// Consume la salida de su predecesor inmediato.
    Transform,
    /// Entregable final: consume cualquier subconjunto disponible.
    Sink,
}

/// Identificadores de los seis pasos, en orden de ejecución.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    CollectContext,
    AnalyzeRealtimeData,
    GeneratePredictions,
    GenerateRecommendations,
    GeneratePublicAlerts,
    GenerateConversationalResponse,
}

impl StepId {
    /// Todos los pasos en orden de ejecución (= orden de reporte).
    pub const ALL: [StepId; 6] = [StepId::CollectContext,
                                  StepId::AnalyzeRealtimeData,
                                  StepId::GeneratePredictions,
                                  StepId::GenerateRecommendations,
                                  StepId::GeneratePublicAlerts,
                                  StepId::GenerateConversationalResponse];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::CollectContext => "collect_context",
            StepId::AnalyzeRealtimeData => "analyze_realtime_data",
            StepId::GeneratePredictions => "generate_predictions",
            StepId::GenerateRecommendations => "generate_recommendations",
            StepId::GeneratePublicAlerts => "generate_public_alerts",
            StepId::GenerateConversationalResponse => "generate_conversational_response",
        }
    }

    pub fn kind(&self) -> StepKind {
        match self {
            StepId::CollectContext => StepKind::Source,
            StepId::GenerateConversationalResponse => StepKind::Sink,
            _ => StepKind::Transform,
        }
    }

    /// Predecesor inmediato cuya salida debe existir para ejecutar el paso.
    /// `None` para la fuente y para el paso conversacional (no condicionado).
    pub fn dependency(&self) -> Option<StepId> {
        match self {
            StepId::CollectContext => None,
            StepId::AnalyzeRealtimeData => Some(StepId::CollectContext),
            StepId::GeneratePredictions => Some(StepId::AnalyzeRealtimeData),
            StepId::GenerateRecommendations => Some(StepId::GeneratePredictions),
            StepId::GeneratePublicAlerts => Some(StepId::GenerateRecommendations),
            StepId::GenerateConversationalResponse => None,
        }
    }

    /// Un fallo en un paso fatal termina todo el workflow.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StepId::CollectContext)
    }

    /// Posición 0-indexada en el pipeline.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
