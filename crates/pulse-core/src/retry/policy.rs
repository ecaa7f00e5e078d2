use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Parámetros del backoff exponencial puro (sin jitter).
///
/// `retries` cuenta reintentos, no intentos: con `retries = 3` se hacen como
/// máximo 4 llamadas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay_ms: u64,
    pub factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { retries: 3,
               delay_ms: 500,
               factor: 2 }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, delay_ms: u64, factor: u32) -> Self {
        Self { retries, delay_ms, factor }
    }

    /// Política sin reintentos (una sola llamada).
    pub fn none() -> Self {
        Self { retries: 0, ..Self::default() }
    }

    /// Espera antes del reintento que sigue al intento `attempt` (0-indexado):
    /// `delay_ms * factor^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let multiplier = u64::from(self.factor).saturating_pow(attempt);
        Duration::from_millis(self.delay_ms.saturating_mul(multiplier))
    }

    /// Suma de todas las esperas cuando se agota el presupuesto.
    pub fn max_total_wait(&self) -> Duration {
        (0..self.retries).map(|a| self.delay_for(a)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_is_500_1000_2000() {
        let p = RetryPolicy::default();
        assert_eq!(p.delay_for(0), Duration::from_millis(500));
        assert_eq!(p.delay_for(1), Duration::from_millis(1000));
        assert_eq!(p.delay_for(2), Duration::from_millis(2000));
        assert_eq!(p.max_total_wait(), Duration::from_millis(3500));
    }

    #[test]
    fn huge_exponents_saturate() {
        let p = RetryPolicy::new(100, u64::MAX / 2, 10);
        assert_eq!(p.delay_for(90), Duration::from_millis(u64::MAX));
    }
}
