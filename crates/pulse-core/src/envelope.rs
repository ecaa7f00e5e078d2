//! Envelope canónico de resultado.
//!
//! Única representación que cruza la frontera del workflow:
//! `{success: true, data, meta}` o `{success: false, error}`. Los únicos
//! constructores son `success_envelope` y `error_envelope`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::errors::{AppError, ErrorBody};

/// Unión discriminada éxito/error.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultEnvelope {
    Success { data: Value, meta: Value },
    Failure { error: ErrorBody },
}

/// Envelope de éxito.
pub fn success_envelope(data: Value, meta: Value) -> ResultEnvelope {
    ResultEnvelope::Success { data, meta }
}

/// Envelope de error a partir de un `AppError`.
pub fn error_envelope(error: &AppError) -> ResultEnvelope {
    ResultEnvelope::Failure { error: error.to_body() }
}

impl ResultEnvelope {
    pub fn is_success(&self) -> bool {
        matches!(self, ResultEnvelope::Success { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            ResultEnvelope::Success { data, .. } => Some(data),
            ResultEnvelope::Failure { .. } => None,
        }
    }

    pub fn meta(&self) -> Option<&Value> {
        match self {
            ResultEnvelope::Success { meta, .. } => Some(meta),
            ResultEnvelope::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorBody> {
        match self {
            ResultEnvelope::Success { .. } => None,
            ResultEnvelope::Failure { error } => Some(error),
        }
    }

    /// Serializa a JSON. Si la serialización falla se devuelve un documento
    /// de error fijo, de modo que el llamador siempre recibe un envelope.
    pub fn to_json_string(&self, pretty: bool) -> String {
        let rendered = if pretty { serde_json::to_string_pretty(self) } else { serde_json::to_string(self) };
        rendered.unwrap_or_else(|_| {
            r#"{"success":false,"error":{"code":"UNEXPECTED_ERROR","message":"failed to serialize result envelope"}}"#
                .to_string()
        })
    }
}

#[derive(Serialize, Deserialize)]
struct WireEnvelope {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

impl Serialize for ResultEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            ResultEnvelope::Success { data, meta } => WireEnvelope { success: true,
                                                                     data: Some(data.clone()),
                                                                     meta: Some(meta.clone()),
                                                                     error: None },
            ResultEnvelope::Failure { error } => WireEnvelope { success: false,
                                                                data: None,
                                                                meta: None,
                                                                error: Some(error.clone()) },
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ResultEnvelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireEnvelope::deserialize(deserializer)?;
        if wire.success {
            Ok(ResultEnvelope::Success { data: wire.data.unwrap_or(Value::Null),
                                         meta: wire.meta.unwrap_or(Value::Null) })
        } else {
            let error = wire.error
                            .ok_or_else(|| serde::de::Error::missing_field("error"))?;
            Ok(ResultEnvelope::Failure { error })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_wire_shape() {
        let env = success_envelope(json!({"answer": 42}), json!({"steps": []}));
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v, json!({"success": true, "data": {"answer": 42}, "meta": {"steps": []}}));
    }

    #[test]
    fn error_wire_shape_has_no_data() {
        let err = AppError::auth("missing key").with_docs("set OPENAI_API_KEY");
        let v = serde_json::to_value(error_envelope(&err)).unwrap();
        assert_eq!(v["success"], json!(false));
        assert!(v.get("data").is_none());
        assert!(v.get("meta").is_none());
        assert_eq!(v["error"]["code"], "AUTH_ERROR");
        assert_eq!(v["error"]["docs"], "set OPENAI_API_KEY");
    }

    #[test]
    fn failure_requires_error_field() {
        let parsed: Result<ResultEnvelope, _> = serde_json::from_value(json!({"success": false}));
        assert!(parsed.is_err());

        let ok: ResultEnvelope =
            serde_json::from_value(json!({"success": false, "error": {"code": "X", "message": "m"}})).unwrap();
        assert_eq!(ok.error().map(|e| e.code.as_str()), Some("X"));
    }
}
