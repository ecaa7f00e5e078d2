//! Taxonomía de errores del orquestador.
//!
//! `AppError` es el único artefacto de fallo visible para el llamador: todas
//! las capas (gateway, pasos, orquestador) terminan convirtiendo sus fallos a
//! este tipo, y `ErrorBody` es su forma serializada dentro del envelope.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Categorías reconocidas de fallo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Entrada ausente o mal formada.
    ValidationError,
    /// Credencial ausente o rechazada.
    AuthError,
    /// Falló una llamada a un servicio externo.
    ExternalServiceError,
    /// Un paso con nombre falló tras agotar sus reintentos.
    WorkflowStepError,
    /// Cualquier fallo no categorizado.
    UnexpectedError,
}

impl ErrorKind {
    /// Código estable usado en el wire (`error.code`).
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::AuthError => "AUTH_ERROR",
            ErrorKind::ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
            ErrorKind::WorkflowStepError => "WORKFLOW_STEP_ERROR",
            ErrorKind::UnexpectedError => "UNEXPECTED_ERROR",
        }
    }

    /// Status HTTP equivalente por defecto.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::ValidationError => 400,
            ErrorKind::AuthError => 401,
            ErrorKind::ExternalServiceError => 502,
            ErrorKind::WorkflowStepError | ErrorKind::UnexpectedError => 500,
        }
    }

    /// Sólo los errores de servicio externo son reintentables por defecto.
    pub fn retryable_by_default(&self) -> bool {
        matches!(self, ErrorKind::ExternalServiceError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error inmutable con información suficiente para serializarse como único
/// artefacto de fallo.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub http_status: u16,
    pub details: Option<Value>,
    pub retryable: bool,
    pub docs: Option<String>,
    pub step: Option<String>,
}

impl AppError {
    /// Construye un error con los valores por defecto de su categoría.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind,
               message: message.into(),
               http_status: kind.http_status(),
               details: None,
               retryable: kind.retryable_by_default(),
               docs: None,
               step: None }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthError, message)
    }

    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalServiceError, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnexpectedError, message)
    }

    /// Envuelve la causa de un paso fatal. El resultado nunca es reintentable.
    pub fn workflow_step(step: &str, cause: &AppError) -> Self {
        Self { kind: ErrorKind::WorkflowStepError,
               message: format!("Step '{step}' failed: {}", cause.message),
               http_status: ErrorKind::WorkflowStepError.http_status(),
               details: Some(json!({ "cause": cause.to_body() })),
               retryable: false,
               docs: None,
               step: Some(step.to_string()) }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Inserta `key` dentro de `details`, convirtiéndolo en objeto si hace falta.
    pub fn with_detail(mut self, key: &str, value: Value) -> Self {
        let mut map = match self.details.take() {
            Some(Value::Object(map)) => map,
            Some(other) => {
                let mut map = serde_json::Map::new();
                map.insert("value".to_string(), other);
                map
            }
            None => serde_json::Map::new(),
        };
        map.insert(key.to_string(), value);
        self.details = Some(Value::Object(map));
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }

    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Forma serializada usada en `error` del envelope y en los `StepResult`.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody { code: self.kind.code().to_string(),
                    message: self.message.clone(),
                    details: self.details.clone(),
                    retryable: Some(self.retryable),
                    docs: self.docs.clone(),
                    step: self.step.clone() }
    }
}

/// Cuerpo de error en el wire: `{code, message, details?, retryable?, docs?, step?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        err.to_body()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_per_kind() {
        let e = AppError::external_service("upstream down");
        assert_eq!(e.http_status, 502);
        assert!(e.retryable);
        assert_eq!(e.code(), "EXTERNAL_SERVICE_ERROR");

        let v = AppError::validation("input vacío");
        assert_eq!(v.http_status, 400);
        assert!(!v.retryable);

        assert_eq!(AppError::auth("x").http_status, 401);
        assert_eq!(AppError::unexpected("x").http_status, 500);
    }

    #[test]
    fn display_is_the_message() {
        let e = AppError::external_service("Model is overloaded");
        assert_eq!(e.to_string(), "Model is overloaded");
    }

    #[test]
    fn workflow_step_wraps_cause() {
        let cause = AppError::external_service("retrieval failed");
        let e = AppError::workflow_step("collect_context", &cause);
        assert_eq!(e.kind, ErrorKind::WorkflowStepError);
        assert_eq!(e.step.as_deref(), Some("collect_context"));
        assert!(!e.retryable);
        assert_eq!(e.http_status, 500);
        assert!(e.message.contains("retrieval failed"));
        let details = e.details.expect("details");
        assert_eq!(details["cause"]["code"], "EXTERNAL_SERVICE_ERROR");
    }

    #[test]
    fn with_detail_merges_into_object() {
        let e = AppError::unexpected("x").with_detail("a", json!(1)).with_detail("b", json!(2));
        assert_eq!(e.details, Some(json!({"a": 1, "b": 2})));
    }

    #[test]
    fn body_omits_absent_fields() {
        let body = AppError::validation("bad").to_body();
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v, json!({"code": "VALIDATION_ERROR", "message": "bad", "retryable": false}));
    }
}
