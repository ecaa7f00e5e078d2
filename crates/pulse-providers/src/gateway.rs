//! Gateway de capacidades.
//!
//! Interfaz uniforme que ve el orquestador: recuperar contexto, ejecutar una
//! llamada de razonamiento e invocar herramientas. Oculta qué proveedor
//! atiende cada llamada; los reintentos y la alternativa se aplican aquí.

use std::sync::Arc;

use pulse_core::{with_retries, AppError, RetryPolicy, Sleeper};

use crate::agent::{AgentRequest, AgentResponse, ToolSchema, Turn};
use crate::knowledge::{KnowledgeSource, KnowledgeStore, Passage};
use crate::provider::ProviderId;
use crate::selector::FallbackSelector;
use crate::tools::ToolRegistry;

pub struct CapabilityGateway {
    session_id: String,
    selector: FallbackSelector,
    knowledge: Arc<dyn KnowledgeStore>,
    tools: ToolRegistry,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl CapabilityGateway {
    pub fn new(session_id: impl Into<String>,
               selector: FallbackSelector,
               knowledge: Arc<dyn KnowledgeStore>,
               retry: RetryPolicy,
               sleeper: Arc<dyn Sleeper>)
               -> Self {
        Self { session_id: session_id.into(),
               selector,
               knowledge,
               tools: ToolRegistry::standard(),
               retry,
               sleeper }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn primary_provider(&self) -> ProviderId {
        self.selector.primary_id()
    }

    pub fn fallback_provider(&self) -> Option<ProviderId> {
        self.selector.fallback_id()
    }

    pub fn fallback_used(&self) -> bool {
        self.selector.fallback_used()
    }

    /// Consulta los almacenes `sources`. Los fallos se convierten en
    /// `EXTERNAL_SERVICE_ERROR` tras agotar los reintentos.
    pub async fn retrieve_context(&self,
                                  query: &str,
                                  sources: &[KnowledgeSource],
                                  limit_per_source: usize)
                                  -> Result<Vec<Passage>, AppError> {
        let store = Arc::clone(&self.knowledge);
        with_retries(&self.retry, self.sleeper.as_ref(), || {
            let store = Arc::clone(&store);
            async move {
                store.retrieve(query, sources, limit_per_source)
                     .await
                     .map_err(AppError::from)
            }
        }).await
    }

    /// Una llamada de razonamiento sobre la conversación de trabajo del paso.
    ///
    /// Si el primario sigue sobrecargado tras los reintentos, la nota de
    /// alternativa se añade a `conversation`.
    pub async fn run_agent(&self,
                           instructions: &str,
                           conversation: &mut Vec<Turn>,
                           tools: Option<Vec<ToolSchema>>)
                           -> Result<AgentResponse, AppError> {
        let mut request = AgentRequest::new(self.session_id.clone(), instructions);
        request.tools = tools.unwrap_or_default();
        self.selector
            .dispatch(request, conversation, &self.retry, self.sleeper.as_ref())
            .await
    }

    /// Despacha una herramienta simulada. Nunca falla.
    pub fn invoke_tool(&self, name: &str, arguments_json: &str) -> String {
        self.tools.invoke(name, arguments_json)
    }

    pub fn tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools.schemas()
    }

    /// Libera la sesión en todos los proveedores instanciados.
    pub async fn finalize(&self) {
        self.selector.finalize(&self.session_id).await;
    }
}
