use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{StepId, StepStatus};
use crate::constants::DEPENDENCY_FAILED;
use crate::errors::{AppError, ErrorBody};

/// Registro inmutable de la ejecución (o descarte) de un paso.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub id: StepId,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl StepResult {
    pub fn ok(id: StepId, output: Option<Value>, duration_ms: u64) -> Self {
        Self { id,
               status: StepStatus::Ok,
               output,
               error: None,
               duration_ms: Some(duration_ms) }
    }

    pub fn failed(id: StepId, error: &AppError, duration_ms: u64) -> Self {
        Self { id,
               status: StepStatus::Error,
               output: None,
               error: Some(error.to_body()),
               duration_ms: Some(duration_ms) }
    }

    /// Paso descartado porque la salida de `missing` no existe.
    pub fn skipped(id: StepId, missing: Option<StepId>) -> Self {
        let message = match missing {
            Some(dep) => format!("skipped: required output of '{dep}' is not available"),
            None => "skipped: required upstream output is not available".to_string(),
        };
        Self { id,
               status: StepStatus::Skipped,
               output: None,
               error: Some(ErrorBody { code: DEPENDENCY_FAILED.to_string(),
                                       message,
                                       details: None,
                                       retryable: Some(false),
                                       docs: None,
                                       step: Some(id.as_str().to_string()) }),
               duration_ms: None }
    }
}

/// Resultado etiquetado que el ejecutor devuelve al orquestador.
#[derive(Debug)]
pub enum StepRunResult<T> {
    Ok(T),
    Skipped,
    Failed(AppError),
}

impl<T> StepRunResult<T> {
    /// Salida del paso si terminó bien; `None` en otro caso.
    pub fn ok(self) -> Option<T> {
        match self {
            StepRunResult::Ok(v) => Some(v),
            _ => None,
        }
    }

    pub fn status(&self) -> StepStatus {
        match self {
            StepRunResult::Ok(_) => StepStatus::Ok,
            StepRunResult::Skipped => StepStatus::Skipped,
            StepRunResult::Failed(_) => StepStatus::Error,
        }
    }
}
