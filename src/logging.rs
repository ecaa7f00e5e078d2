//! Inicialización de logging.

use tracing_subscriber::EnvFilter;

/// Logs a stderr con filtro de `RUST_LOG` (por defecto `info`); stdout queda
/// reservado para el envelope JSON. Llamadas repetidas no tienen efecto.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter)
                                     .with_writer(std::io::stderr)
                                     .with_target(false)
                                     .try_init();
}
