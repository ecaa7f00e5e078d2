//! Modelo de mensajes de una llamada de razonamiento.
//!
//! Una llamada lleva instrucciones, turnos de conversación y, opcionalmente,
//! esquemas de herramientas; la respuesta trae texto libre o un conjunto de
//! invocaciones de herramientas solicitadas por el modelo.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// Invocación de herramienta pedida por el modelo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub call_id: String,
    pub name: String,
    pub arguments_json: String,
}

/// Un turno de la conversación de trabajo de un paso.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// Nombre de la herramienta que originó el turno (sólo `Tool`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Id de la llamada a la que responde el turno (sólo `Tool`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Llamadas solicitadas (sólo `Assistant`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl Turn {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self { role,
               content: content.into(),
               tool_name: None,
               tool_call_id: None,
               tool_calls: vec![] }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    /// Turno del asistente que sólo transporta llamadas a herramientas.
    pub fn assistant_tool_calls(calls: Vec<ToolCall>) -> Self {
        Self { tool_calls: calls, ..Self::plain(Role::Assistant, "") }
    }

    /// Resultado de una herramienta, etiquetado con su nombre e id de llamada.
    pub fn tool(name: impl Into<String>, call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self { tool_name: Some(name.into()),
               tool_call_id: Some(call_id.into()),
               ..Self::plain(Role::Tool, content) }
    }
}

/// Esquema de función expuesto al modelo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// JSON Schema de los argumentos.
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRequest {
    /// Sesión del proveedor; una por invocación del workflow.
    pub session_id: String,
    pub model: String,
    pub instructions: String,
    pub conversation: Vec<Turn>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSchema>,
    pub stream: bool,
}

impl AgentRequest {
    pub fn new(session_id: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self { session_id: session_id.into(),
               model: String::new(),
               instructions: instructions.into(),
               conversation: vec![],
               tools: vec![],
               stream: false }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl AgentResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()),
               tool_calls: vec![] }
    }

    pub fn calls(tool_calls: Vec<ToolCall>) -> Self {
        Self { content: None, tool_calls }
    }

    /// Texto no vacío de la respuesta, si lo hay.
    pub fn text_content(&self) -> Option<&str> {
        self.content.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}
