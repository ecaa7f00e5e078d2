//! Pasos del pipeline.
//!
//! - `StepId` / `StepKind`: identidad, orden y reglas de dependencia.
//! - `StepStatus` y `StepResult`: registro observable por paso.
//! - `StepRunResult`: resultado etiquetado que consume el orquestador.
//! - `StepExecutor`: corre un paso y acumula la secuencia de resultados.

mod executor;
mod id;
mod result;
mod status;

pub use executor::StepExecutor;
pub use id::{StepId, StepKind};
pub use result::{StepResult, StepRunResult};
pub use status::StepStatus;
