//! Implementaciones de los seis pasos.
//!
//! Cada paso es una función async que recibe sus entradas ya resueltas y
//! devuelve su salida; el control de flujo (gates, registro de resultados)
//! queda en el orquestador.

pub mod alerts;
pub mod context;
pub mod conversational;
pub mod predictions;
pub mod realtime;
pub mod recommendations;

use pulse_core::AppError;
use pulse_providers::{CapabilityGateway, Turn};

/// Llamada de texto simple: instrucciones más la pregunta del usuario.
/// Un contenido vacío se trata como fallo del servicio externo.
pub(crate) async fn complete_text(gateway: &CapabilityGateway, instructions: &str, input: &str) -> Result<String, AppError> {
    let mut conversation = vec![Turn::user(input)];
    let response = gateway.run_agent(instructions, &mut conversation, None).await?;
    response.text_content()
            .map(str::to_string)
            .ok_or_else(|| AppError::external_service("reasoning provider returned an empty response"))
}
