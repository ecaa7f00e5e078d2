//! Análisis en tiempo real con bucle de herramientas.
//!
//! Cada ronda ofrece las herramientas al modelo. Si responde con llamadas, se
//! añade el turno del asistente, se ejecuta cada herramienta en orden y su
//! resultado vuelve a la conversación etiquetado con nombre e id de llamada.
//! Agotadas las rondas se hace una última llamada sin herramientas.

use pulse_core::AppError;
use pulse_providers::{AgentResponse, CapabilityGateway, Turn};
use tracing::{debug, info};

use crate::chain::ContextData;
use crate::prompts;
use crate::request::WorkflowRequest;

fn final_text(response: &AgentResponse) -> Result<String, AppError> {
    response.text_content()
            .map(str::to_string)
            .ok_or_else(|| AppError::external_service("empty analysis"))
}

pub async fn run(gateway: &CapabilityGateway,
                 request: &WorkflowRequest,
                 context: &ContextData,
                 max_tool_rounds: usize)
                 -> Result<String, AppError> {
    let instructions = prompts::realtime_analysis(&context.summary());
    let mut conversation = vec![Turn::user(request.input())];

    for round in 0..max_tool_rounds {
        let response = gateway.run_agent(&instructions, &mut conversation, Some(gateway.tool_schemas()))
                              .await?;
        if response.tool_calls.is_empty() {
            return final_text(&response);
        }

        info!(round, calls = response.tool_calls.len(), "model requested tools");
        let calls = response.tool_calls;
        conversation.push(Turn::assistant_tool_calls(calls.clone()));
        for call in calls {
            let result = gateway.invoke_tool(&call.name, &call.arguments_json);
            debug!(tool = %call.name, call_id = %call.call_id, "tool result injected");
            conversation.push(Turn::tool(call.name, call.call_id, result));
        }
    }

    let response = gateway.run_agent(&instructions, &mut conversation, None).await?;
    final_text(&response)
}
