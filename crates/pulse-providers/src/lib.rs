//! pulse-providers: acceso a las capacidades externas del workflow.
//!
//! Proveedores de razonamiento (cliente HTTP compatible con
//! chat-completions), selección primario/alternativa, almacenes de
//! conocimiento y herramientas simuladas, todo detrás de `CapabilityGateway`.

pub mod agent;
pub mod chat_client;
pub mod credentials;
pub mod error;
pub mod factory;
pub mod gateway;
pub mod knowledge;
pub mod provider;
pub mod selector;
pub mod tools;

pub use agent::{AgentRequest, AgentResponse, Role, ToolCall, ToolSchema, Turn};
pub use chat_client::{ChatClientConfig, ChatCompletionsClient};
pub use credentials::{ProviderCredentials, ProviderRoute, ProviderSelection};
pub use error::ProviderError;
pub use factory::{HttpProviderFactory, ProviderFactory, ProviderModels};
pub use gateway::CapabilityGateway;
pub use knowledge::{InMemoryKnowledgeStore, KnowledgeSource, KnowledgeStore, Passage};
pub use provider::{ProviderId, ReasoningProvider};
pub use selector::{BoundProvider, FallbackSelector};
pub use tools::{SimulatedTool, ToolRegistry, TOOL_NOT_FOUND};
