#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pulse_core::{AppError, RecordingSleeper};
use pulse_providers::{AgentRequest, AgentResponse, KnowledgeSource, KnowledgeStore, Passage, ProviderCredentials,
                      ProviderError, ProviderFactory, ProviderId, ProviderRoute, ReasoningProvider};
use pulse_workflow::{Orchestrator, WorkflowConfig};

/// Etapa del pipeline deducida de las instrucciones de la llamada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Realtime,
    Predictions,
    Recommendations,
    Alerts,
    Conversational,
    Unknown,
}

pub fn stage_of(request: &AgentRequest) -> Stage {
    let i = &request.instructions;
    if i.contains("friendly public-health assistant") {
        Stage::Conversational
    } else if i.contains("Use the available tools") {
        Stage::Realtime
    } else if i.contains("Predict the likely") {
        Stage::Predictions
    } else if i.contains("Recommend concrete") {
        Stage::Recommendations
    } else if i.contains("Draft short public") {
        Stage::Alerts
    } else {
        Stage::Unknown
    }
}

type Handler = Box<dyn Fn(&AgentRequest) -> Result<AgentResponse, ProviderError> + Send + Sync>;

pub struct FakeProvider {
    id: ProviderId,
    handler: Handler,
    pub requests: Mutex<Vec<AgentRequest>>,
    pub finalized: AtomicUsize,
}

impl FakeProvider {
    pub fn new<H>(id: ProviderId, handler: H) -> Arc<Self>
        where H: Fn(&AgentRequest) -> Result<AgentResponse, ProviderError> + Send + Sync + 'static
    {
        Arc::new(Self { id,
                        handler: Box::new(handler),
                        requests: Mutex::new(vec![]),
                        finalized: AtomicUsize::new(0) })
    }

    /// Responde a cada etapa con `"<stage> ok"`.
    pub fn answering(id: ProviderId) -> Arc<Self> {
        Self::new(id, |req| Ok(AgentResponse::text(format!("{:?} ok", stage_of(req)))))
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.requests.lock().unwrap().iter().map(stage_of).collect()
    }

    pub fn finalized(&self) -> usize {
        self.finalized.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReasoningProvider for FakeProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn run_agent(&self, request: AgentRequest) -> Result<AgentResponse, ProviderError> {
        let result = (self.handler)(&request);
        self.requests.lock().unwrap().push(request);
        result
    }

    async fn finalize(&self, _session_id: &str) {
        self.finalized.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fábrica que entrega los fakes registrados y cuenta instanciaciones.
#[derive(Default)]
pub struct FakeFactory {
    providers: HashMap<ProviderId, Arc<FakeProvider>>,
    pub created: AtomicUsize,
}

impl FakeFactory {
    pub fn with(mut self, provider: Arc<FakeProvider>) -> Self {
        self.providers.insert(provider.id, provider);
        self
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ProviderFactory for FakeFactory {
    fn create(&self, route: &ProviderRoute) -> Result<Arc<dyn ReasoningProvider>, AppError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        let provider = self.providers
                           .get(&route.id)
                           .cloned()
                           .ok_or_else(|| AppError::unexpected(format!("no fake for {}", route.id)))?;
        Ok(provider)
    }
}

/// Almacén que siempre falla con un error no transitorio.
pub struct BrokenStore;

#[async_trait]
impl KnowledgeStore for BrokenStore {
    async fn retrieve(&self, _q: &str, _s: &[KnowledgeSource], _l: usize) -> Result<Vec<Passage>, ProviderError> {
        Err(ProviderError::Retrieval("index corrupted".into()))
    }
}

/// Almacén que no responde nunca; sirve para cancelar el workflow a mitad.
pub struct SlowStore;

#[async_trait]
impl KnowledgeStore for SlowStore {
    async fn retrieve(&self, _q: &str, _s: &[KnowledgeSource], _l: usize) -> Result<Vec<Passage>, ProviderError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(vec![])
    }
}

pub fn credentials(primary: Option<&str>, secondary: Option<&str>) -> ProviderCredentials {
    ProviderCredentials::new(primary.map(String::from), secondary.map(String::from))
}

pub fn config(primary: Option<&str>, secondary: Option<&str>) -> WorkflowConfig {
    WorkflowConfig::default().with_credentials(credentials(primary, secondary))
}

pub fn orchestrator(config: WorkflowConfig, factory: Arc<FakeFactory>) -> Orchestrator {
    Orchestrator::builder(config).factory(factory)
                                 .sleeper(Arc::new(RecordingSleeper::new()))
                                 .build()
}
