//! Petición de workflow y su validación.

use pulse_core::AppError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Petición inmutable de una invocación. `environment` es opaco para el
/// workflow: sólo se reenvía a las instrucciones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowRequest {
    input: String,
    environment: Map<String, Value>,
}

impl WorkflowRequest {
    /// Valida que `input` no esté vacío tras recortar espacios.
    pub fn new(input: impl Into<String>) -> Result<Self, AppError> {
        let input = input.into();
        if input.trim().is_empty() {
            return Err(AppError::validation("input must be a non-empty string").with_detail("field",
                                                                                             Value::from("input")));
        }
        Ok(Self { input,
                  environment: Map::new() })
    }

    pub fn with_environment(mut self, environment: Map<String, Value>) -> Self {
        self.environment = environment;
        self
    }

    /// Valida un cuerpo JSON arbitrario: objeto con `input` string no vacío y
    /// `environment` opcional (objeto).
    pub fn from_value(value: &Value) -> Result<Self, AppError> {
        let Some(body) = value.as_object() else {
            return Err(AppError::validation("request body must be a JSON object"));
        };
        let input = match body.get("input") {
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(AppError::validation("input must be a non-empty string").with_detail("field",
                                                                                                 Value::from("input")))
            }
            None => return Err(AppError::validation("input is required").with_detail("field", Value::from("input"))),
        };
        let environment = match body.get("environment") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => {
                return Err(AppError::validation("environment must be a JSON object").with_detail("field",
                                                                                                  Value::from("environment")))
            }
        };
        Ok(Self::new(input)?.with_environment(environment))
    }

    pub fn input(&self) -> &str {
        self.input.trim()
    }

    pub fn environment(&self) -> &Map<String, Value> {
        &self.environment
    }
}
