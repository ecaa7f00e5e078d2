//! Controlador de reintentos.
//!
//! Envuelve una única llamada upstream con backoff exponencial acotado. Sólo
//! se reintenta cuando el mensaje del error coincide con el patrón de
//! sobrecarga transitoria; cualquier otro error se propaga en el primer
//! intento sin consumir presupuesto.

mod policy;
mod sleeper;
mod transient;

use std::fmt::Display;
use std::future::Future;

use tracing::{debug, warn};

pub use policy::RetryPolicy;
pub use sleeper::{RecordingSleeper, Sleeper, TokioSleeper};
pub use transient::is_transient_overload;

/// Ejecuta `operation` aplicando `policy`.
///
/// Los intentos son 0-indexados; tras un fallo transitorio en el intento `n`
/// (con presupuesto restante) se espera `policy.delay_for(n)` y se vuelve a
/// llamar. El último error se devuelve tal cual.
pub async fn with_retries<T, E, F, Fut>(policy: &RetryPolicy, sleeper: &dyn Sleeper, mut operation: F) -> Result<T, E>
    where F: FnMut() -> Fut,
          Fut: Future<Output = Result<T, E>>,
          E: Display
{
    let mut attempt: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempt, "upstream call succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                let message = err.to_string();
                if !is_transient_overload(&message) {
                    return Err(err);
                }
                if attempt >= policy.retries {
                    warn!(attempts = attempt + 1, error = %message, "retry budget exhausted");
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                warn!(attempt, delay_ms = delay.as_millis() as u64, error = %message, "transient overload, retrying");
                sleeper.sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
