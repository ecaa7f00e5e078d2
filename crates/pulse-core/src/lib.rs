//! pulse-core: tipos base del orquestador de análisis.
//!
//! Contiene la taxonomía de errores y el envelope de resultado, el
//! controlador de reintentos y el ejecutor de pasos. No conoce proveedores ni
//! el contenido de los pasos.

pub mod constants;
pub mod envelope;
pub mod errors;
pub mod retry;
pub mod step;

pub use envelope::{error_envelope, success_envelope, ResultEnvelope};
pub use errors::{AppError, ErrorBody, ErrorKind};
pub use retry::{is_transient_overload, with_retries, RecordingSleeper, RetryPolicy, Sleeper, TokioSleeper};
pub use step::{StepExecutor, StepId, StepKind, StepResult, StepRunResult, StepStatus};
