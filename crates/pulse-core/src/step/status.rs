use serde::{Deserialize, Serialize};

/// Estado final de un paso dentro de un `StepResult`.
///
/// No hay estados intermedios: un `StepResult` sólo se crea cuando el paso ya
/// terminó o fue descartado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// El paso finalizó correctamente y su salida quedó disponible.
    Ok,
    /// No se ejecutó porque faltaba la salida de su predecesor.
    Skipped,
    /// Se ejecutó y falló.
    Error,
}
