//! Salidas intermedias del pipeline.
//!
//! Cada campo está presente sólo si su paso terminó bien. Un paso lee
//! únicamente campos ya presentes; nunca fabrica sustitutos.

use pulse_providers::Passage;
use serde::Serialize;
use serde_json::{Map, Value};

/// Salida del paso de contexto.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextData {
    pub passages: Vec<Passage>,
    pub environment: Map<String, Value>,
}

impl ContextData {
    /// Resumen textual: un pasaje por línea etiquetado con su almacén, más el
    /// entorno si no está vacío.
    pub fn summary(&self) -> String {
        let mut lines: Vec<String> = self.passages
                                         .iter()
                                         .map(|p| format!("[{}] {}", p.source, p.text))
                                         .collect();
        if !self.environment.is_empty() {
            lines.push(format!("[environment] {}", Value::Object(self.environment.clone())));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutputChain {
    pub context: Option<ContextData>,
    pub realtime_analysis: Option<String>,
    pub predictions: Option<String>,
    pub recommendations: Option<String>,
    pub public_alerts: Option<String>,
    pub conversational: Option<String>,
}

impl StepOutputChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context_summary(&self) -> Option<String> {
        self.context.as_ref().map(ContextData::summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_providers::KnowledgeSource;
    use serde_json::json;

    #[test]
    fn summary_labels_each_passage() {
        let mut env = Map::new();
        env.insert("city".into(), json!("Jaipur"));
        let ctx = ContextData { passages: vec![Passage { source: KnowledgeSource::FestivalCalendar,
                                                         text: "Diwali next week".into(),
                                                         score: 0.5 }],
                                environment: env };
        assert_eq!(ctx.summary(), "[festival_calendar] Diwali next week\n[environment] {\"city\":\"Jaipur\"}");
    }

    #[test]
    fn empty_chain_has_no_summary() {
        assert!(StepOutputChain::new().context_summary().is_none());
    }
}
