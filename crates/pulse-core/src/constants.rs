//! Constantes del orquestador.
//!
//! Valores estáticos compartidos entre el core, los proveedores y el workflow.
//! `WORKFLOW_VERSION` viaja en el `meta` de cada envelope para que los
//! consumidores puedan detectar cambios incompatibles en la forma del reporte.

/// Versión lógica del pipeline de seis pasos.
pub const WORKFLOW_VERSION: &str = "W1.0";

/// Número de pasos definidos en el pipeline.
pub const STEP_COUNT: usize = 6;

/// Código usado en un `StepResult` saltado por dependencia ausente.
pub const DEPENDENCY_FAILED: &str = "DEPENDENCY_FAILED";

/// Nivel de confianza reportado. Placeholder: no se deriva de ningún paso.
pub const CONFIDENCE_LEVEL: &str = "High";

/// Fragmentos (en minúsculas) que identifican una sobrecarga transitoria.
pub const TRANSIENT_OVERLOAD_PATTERNS: [&str; 4] =
    ["model is overloaded", "rate limit", "temporarily unavailable", "please try again later"];
