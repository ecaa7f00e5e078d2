//! Selector de proveedor con alternativa única.
//!
//! Cada llamada lógica va primero al proveedor primario bajo el controlador
//! de reintentos. Si el error final es una sobrecarga transitoria y existe
//! alternativa, se anota un turno de sistema en la conversación de trabajo y
//! se reemite la misma petición una sola vez, sin reintentos, al otro
//! proveedor. No hay segundo salto.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pulse_core::{is_transient_overload, with_retries, AppError, RetryPolicy, Sleeper};
use tracing::warn;

use crate::agent::{AgentRequest, AgentResponse, Turn};
use crate::credentials::ProviderSelection;
use crate::factory::{ProviderFactory, ProviderModels};
use crate::provider::{ProviderId, ReasoningProvider};

/// Proveedor listo para usar con su modelo.
#[derive(Clone)]
pub struct BoundProvider {
    pub provider: Arc<dyn ReasoningProvider>,
    pub model: String,
}

impl BoundProvider {
    pub fn new(provider: Arc<dyn ReasoningProvider>, model: impl Into<String>) -> Self {
        Self { provider,
               model: model.into() }
    }

    pub fn id(&self) -> ProviderId {
        self.provider.id()
    }
}

pub struct FallbackSelector {
    primary: BoundProvider,
    fallback: Option<BoundProvider>,
    fallback_used: AtomicBool,
}

impl FallbackSelector {
    pub fn new(primary: BoundProvider, fallback: Option<BoundProvider>) -> Self {
        Self { primary,
               fallback,
               fallback_used: AtomicBool::new(false) }
    }

    /// Instancia ambos proveedores de la selección con la fábrica dada.
    pub fn from_selection(selection: &ProviderSelection,
                          factory: &dyn ProviderFactory,
                          models: &ProviderModels)
                          -> Result<Self, AppError> {
        let primary = BoundProvider::new(factory.create(&selection.primary)?,
                                         models.model_for(selection.primary.id));
        let fallback = match &selection.fallback {
            Some(route) => Some(BoundProvider::new(factory.create(route)?, models.model_for(route.id))),
            None => None,
        };
        Ok(Self::new(primary, fallback))
    }

    pub fn primary_id(&self) -> ProviderId {
        self.primary.id()
    }

    pub fn fallback_id(&self) -> Option<ProviderId> {
        self.fallback.as_ref().map(BoundProvider::id)
    }

    /// `true` si alguna llamada de esta sesión pasó a la alternativa.
    pub fn fallback_used(&self) -> bool {
        self.fallback_used.load(Ordering::SeqCst)
    }

    /// Ejecuta `request` contra el primario (con reintentos) y, ante
    /// sobrecarga persistente, una vez contra la alternativa.
    ///
    /// `conversation` es la conversación de trabajo del paso; la nota de
    /// cambio de proveedor queda registrada en ella.
    pub async fn dispatch(&self,
                          request: AgentRequest,
                          conversation: &mut Vec<Turn>,
                          policy: &RetryPolicy,
                          sleeper: &dyn Sleeper)
                          -> Result<AgentResponse, AppError> {
        let mut primary_request = request.clone();
        primary_request.model = self.primary.model.clone();
        primary_request.conversation = conversation.clone();

        let outcome = with_retries(policy, sleeper, || {
                          let provider = Arc::clone(&self.primary.provider);
                          let req = primary_request.clone();
                          async move { provider.run_agent(req).await.map_err(AppError::from) }
                      }).await;

        let err = match outcome {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };
        if !is_transient_overload(&err.message) {
            return Err(err);
        }
        let Some(fallback) = &self.fallback else {
            return Err(err);
        };

        warn!(from = %self.primary.id(), to = %fallback.id(), error = %err, "primary provider overloaded, falling back");
        self.fallback_used.store(true, Ordering::SeqCst);
        conversation.push(Turn::system(format!("[fallback] {} overloaded; request re-issued to {}",
                                               self.primary.id(),
                                               fallback.id())));

        let mut fallback_request = request;
        fallback_request.model = fallback.model.clone();
        fallback_request.conversation = conversation.clone();
        fallback.provider.run_agent(fallback_request).await.map_err(AppError::from)
    }

    /// Libera la sesión en los proveedores instanciados.
    pub async fn finalize(&self, session_id: &str) {
        self.primary.provider.finalize(session_id).await;
        if let Some(fallback) = &self.fallback {
            fallback.provider.finalize(session_id).await;
        }
    }
}
