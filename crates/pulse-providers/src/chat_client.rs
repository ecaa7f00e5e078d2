//! Cliente HTTP compatible con la API de chat-completions.
//!
//! Sirve para ambas familias de proveedor (cambia endpoint y credencial). No
//! reintenta: los reintentos y la alternativa viven en el gateway.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::agent::{AgentRequest, AgentResponse, Role, ToolCall, ToolSchema, Turn};
use crate::error::ProviderError;
use crate::provider::{ProviderId, ReasoningProvider};

#[derive(Clone)]
pub struct ChatClientConfig {
    pub provider: ProviderId,
    pub endpoint: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl ChatClientConfig {
    pub fn new(provider: ProviderId, api_key: impl Into<String>) -> Self {
        Self { provider,
               endpoint: provider.default_endpoint().to_string(),
               api_key: api_key.into(),
               timeout_secs: 60 }
    }
}

impl std::fmt::Debug for ChatClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClientConfig")
         .field("provider", &self.provider)
         .field("endpoint", &self.endpoint)
         .field("timeout_secs", &self.timeout_secs)
         .finish_non_exhaustive()
    }
}

pub struct ChatCompletionsClient {
    client: reqwest::Client,
    config: ChatClientConfig,
}

impl ChatCompletionsClient {
    pub fn new(config: ChatClientConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(std::time::Duration::from_secs(config.timeout_secs))
                                               .build()
                                               .map_err(|e| ProviderError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = format!("Bearer {}", self.config.api_key);
        headers.insert(AUTHORIZATION,
                       HeaderValue::from_str(&bearer).map_err(|e| ProviderError::Http(e.to_string()))?);
        Ok(headers)
    }
}

// Estructuras del wire

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ChatTool>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Serialize)]
struct ChatTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: ChatFunction,
}

#[derive(Debug, Serialize)]
struct ChatFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<ChatErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ChatErrorDetail {
    message: String,
}

fn function_type() -> String {
    "function".to_string()
}

fn to_wire_message(turn: &Turn) -> ChatMessage {
    let tool_calls = turn.tool_calls
                         .iter()
                         .map(|c| WireToolCall { id: c.call_id.clone(),
                                                 kind: function_type(),
                                                 function: WireFunctionCall { name: c.name.clone(),
                                                                              arguments: c.arguments_json.clone() } })
                         .collect::<Vec<_>>();
    let content = if turn.role == Role::Assistant && !tool_calls.is_empty() && turn.content.is_empty() {
        None
    } else {
        Some(turn.content.clone())
    };
    ChatMessage { role: turn.role.as_str(),
                  content,
                  name: turn.tool_name.clone(),
                  tool_call_id: turn.tool_call_id.clone(),
                  tool_calls }
}

fn to_wire_tool(schema: &ToolSchema) -> ChatTool {
    ChatTool { kind: "function",
               function: ChatFunction { name: schema.name.clone(),
                                        description: schema.description.clone(),
                                        parameters: schema.parameters.clone() } }
}

fn build_body(request: &AgentRequest) -> ChatRequest {
    let mut messages = Vec::with_capacity(request.conversation.len() + 1);
    if !request.instructions.trim().is_empty() {
        messages.push(to_wire_message(&Turn::system(request.instructions.clone())));
    }
    messages.extend(request.conversation.iter().map(to_wire_message));
    ChatRequest { model: request.model.clone(),
                  messages,
                  tools: request.tools.iter().map(to_wire_tool).collect(),
                  stream: false }
}

fn parse_response(text: &str) -> Result<AgentResponse, ProviderError> {
    let parsed: ChatResponse = serde_json::from_str(text).map_err(|e| ProviderError::Serialization(e.to_string()))?;
    if let Some(error) = parsed.error {
        return Err(ProviderError::Response(error.message));
    }
    let message = parsed.choices
                        .into_iter()
                        .next()
                        .map(|c| c.message)
                        .ok_or_else(|| ProviderError::Response("missing choices".to_string()))?;
    let tool_calls = message.tool_calls
                            .unwrap_or_default()
                            .into_iter()
                            .map(|c| ToolCall { call_id: c.id,
                                                name: c.function.name,
                                                arguments_json: c.function.arguments })
                            .collect();
    Ok(AgentResponse { content: message.content, tool_calls })
}

#[async_trait]
impl ReasoningProvider for ChatCompletionsClient {
    fn id(&self) -> ProviderId {
        self.config.provider
    }

    async fn run_agent(&self, request: AgentRequest) -> Result<AgentResponse, ProviderError> {
        let body = build_body(&request);
        debug!(provider = %self.config.provider, model = %body.model, messages = body.messages.len(), "chat request");

        let response = self.client
                           .post(&self.config.endpoint)
                           .headers(self.headers()?)
                           .json(&body)
                           .send()
                           .await
                           .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = response.status();
        let text = response.text()
                           .await
                           .map_err(|e| ProviderError::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(ProviderError::status(status.as_u16(), text));
        }
        parse_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_carries_instructions_tools_and_tool_turns() {
        let mut req = AgentRequest::new("s1", "be brief");
        req.model = "gpt-4o-mini".into();
        req.conversation = vec![Turn::user("hola"),
                                Turn::assistant_tool_calls(vec![ToolCall { call_id: "c1".into(),
                                                                           name: "get_weather_aqi".into(),
                                                                           arguments_json: "{}".into() }]),
                                Turn::tool("get_weather_aqi", "c1", "{\"aqi\":80}")];
        req.tools = vec![ToolSchema { name: "get_weather_aqi".into(),
                                      description: "d".into(),
                                      parameters: json!({"type": "object"}) }];

        let v = serde_json::to_value(build_body(&req)).unwrap();
        assert_eq!(v["stream"], json!(false));
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][2]["tool_calls"][0]["function"]["name"], "get_weather_aqi");
        assert!(v["messages"][2].get("content").is_none());
        assert_eq!(v["messages"][3]["tool_call_id"], "c1");
        assert_eq!(v["messages"][3]["name"], "get_weather_aqi");
        assert_eq!(v["tools"][0]["type"], "function");
    }

    #[test]
    fn parses_text_and_tool_calls() {
        let text = r#"{"choices":[{"message":{"content":null,"tool_calls":[{"id":"c9","type":"function","function":{"name":"analyze_health_trends","arguments":"{\"region\":\"north\"}"}}]}}]}"#;
        let resp = parse_response(text).unwrap();
        assert!(resp.content.is_none());
        assert_eq!(resp.tool_calls[0].call_id, "c9");
        assert_eq!(resp.tool_calls[0].name, "analyze_health_trends");

        let resp = parse_response(r#"{"choices":[{"message":{"content":"ok"}}]}"#).unwrap();
        assert_eq!(resp.text_content(), Some("ok"));
    }

    #[test]
    fn api_error_and_empty_choices_are_errors() {
        assert!(matches!(parse_response(r#"{"error":{"message":"Model is overloaded"}}"#),
                         Err(ProviderError::Response(m)) if m == "Model is overloaded"));
        assert!(parse_response(r#"{"choices":[]}"#).is_err());
        assert!(matches!(parse_response("not json"), Err(ProviderError::Serialization(_))));
    }

    #[test]
    fn config_debug_hides_key() {
        let cfg = ChatClientConfig::new(ProviderId::Groq, "gsk_secret");
        assert_eq!(cfg.endpoint, ProviderId::Groq.default_endpoint());
        assert!(!format!("{cfg:?}").contains("gsk_secret"));
    }
}
