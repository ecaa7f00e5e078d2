//! Ejecutor de pasos.
//!
//! Corre una unidad de trabajo con nombre, anota su `StepResult` (ok, skipped
//! o error) y devuelve un resultado etiquetado. La secuencia de resultados es
//! append-only y su orden es el de ejecución.

use std::future::Future;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use super::{StepId, StepResult, StepRunResult};
use crate::errors::AppError;

#[derive(Debug, Default)]
pub struct StepExecutor {
    results: Vec<StepResult>,
}

impl StepExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ejecuta `thunk` como el paso `id`.
    ///
    /// En pasos fatales el error devuelto (y registrado) es el
    /// `WORKFLOW_STEP_ERROR` que envuelve la causa; en el resto se registra la
    /// causa con el paso anotado y el orquestador decide qué descartar.
    pub async fn run_step<T, F, Fut>(&mut self, id: StepId, thunk: F) -> StepRunResult<T>
        where F: FnOnce() -> Fut,
              Fut: Future<Output = Result<T, AppError>>,
              T: Serialize
    {
        info!(step = %id, "step started");
        let started = Instant::now();
        let outcome = thunk().await;
        let elapsed = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(output) => {
                let recorded = serde_json::to_value(&output).ok();
                self.results.push(StepResult::ok(id, recorded, elapsed));
                info!(step = %id, duration_ms = elapsed, "step finished");
                StepRunResult::Ok(output)
            }
            Err(cause) => {
                let err = if id.is_fatal() {
                    AppError::workflow_step(id.as_str(), &cause)
                } else {
                    cause.with_step(id.as_str())
                };
                warn!(step = %id, code = err.code(), error = %err, fatal = id.is_fatal(), "step failed");
                self.results.push(StepResult::failed(id, &err, elapsed));
                StepRunResult::Failed(err)
            }
        }
    }

    /// Ejecuta el paso sólo si la salida de su dependencia existe; si no, lo
    /// registra como `skipped` con motivo `DEPENDENCY_FAILED`.
    pub async fn run_gated<'a, D, T, F, Fut>(&mut self, id: StepId, dependency: Option<&'a D>, thunk: F) -> StepRunResult<T>
        where D: ?Sized,
              F: FnOnce(&'a D) -> Fut,
              Fut: Future<Output = Result<T, AppError>>,
              T: Serialize
    {
        match dependency {
            Some(input) => self.run_step(id, || thunk(input)).await,
            None => {
                self.skip(id);
                StepRunResult::Skipped
            }
        }
    }

    /// Registra `id` como descartado por dependencia ausente.
    pub fn skip(&mut self, id: StepId) {
        info!(step = %id, missing = ?id.dependency(), "step skipped");
        self.results.push(StepResult::skipped(id, id.dependency()));
    }

    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<StepResult> {
        self.results
    }
}
