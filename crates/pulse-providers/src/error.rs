//! Errores de proveedores externos.
//! Se convierten a `AppError` conservando el mensaje original, del que depende
//! la detección de sobrecarga transitoria.

use pulse_core::AppError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("response error: {0}")]
    Response(String),
    #[error("retrieval error: {0}")]
    Retrieval(String),
}

impl ProviderError {
    /// Construye un `Status` normalizando 429/503 para que su mensaje siempre
    /// contenga un fragmento reconocido como transitorio.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = match status {
            429 if !body.to_lowercase().contains("rate limit") => format!("rate limit: {body}"),
            503 if !body.to_lowercase().contains("temporarily unavailable") => {
                format!("temporarily unavailable: {body}")
            }
            _ => body,
        };
        ProviderError::Status { status, message }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match &err {
            ProviderError::Status { status, .. } if *status == 401 || *status == 403 => {
                AppError::auth(err.to_string()).with_detail("upstream_status", json!(status))
            }
            ProviderError::Status { status, .. } => {
                AppError::external_service(err.to_string()).with_detail("upstream_status", json!(status))
            }
            _ => AppError::external_service(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::{is_transient_overload, ErrorKind};

    #[test]
    fn throttling_statuses_are_transient() {
        assert!(is_transient_overload(&ProviderError::status(429, "slow down").to_string()));
        assert!(is_transient_overload(&ProviderError::status(503, "").to_string()));
        assert!(!is_transient_overload(&ProviderError::status(400, "bad request").to_string()));
    }

    #[test]
    fn conversion_keeps_message_and_status() {
        let app: AppError = ProviderError::status(429, "Rate limit reached").into();
        assert_eq!(app.kind, ErrorKind::ExternalServiceError);
        assert_eq!(app.message, "HTTP 429: Rate limit reached");
        assert_eq!(app.details.unwrap()["upstream_status"], 429);
    }

    #[test]
    fn rejected_credentials_map_to_auth() {
        let app: AppError = ProviderError::status(401, "invalid api key").into();
        assert_eq!(app.kind, ErrorKind::AuthError);
    }
}
