//! Orquestador del workflow de seis pasos.
//!
//! Máquina de estados lineal:
//! `collect_context → analyze_realtime_data → generate_predictions →
//! generate_recommendations → generate_public_alerts →
//! generate_conversational_response`.
//!
//! - El contexto es fatal: si falla se devuelve un envelope de error y no se
//!   ejecuta ningún otro paso.
//! - Los pasos intermedios dependen sólo de la salida de su predecesor
//!   inmediato; sin ella quedan `skipped`.
//! - El paso conversacional siempre corre con lo que haya en la cadena.
//! - La sesión de proveedor se finaliza en toda salida una vez creada,
//!   incluida la cancelación del futuro de `run`.

use std::sync::Arc;

use chrono::Utc;
use pulse_core::{error_envelope, success_envelope, AppError, ResultEnvelope, Sleeper, StepExecutor, StepId,
                 StepRunResult, StepStatus, TokioSleeper};
use pulse_providers::{CapabilityGateway, FallbackSelector, HttpProviderFactory, InMemoryKnowledgeStore,
                      KnowledgeStore, ProviderFactory, ProviderSelection};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chain::StepOutputChain;
use crate::config::WorkflowConfig;
use crate::report::{DetailedAnalysis, ReportMeta, WorkflowReport};
use crate::request::WorkflowRequest;
use crate::steps;

/// Libera la sesión del proveedor si el futuro de `run` se descarta antes
/// de llegar al `finalize` normal.
struct FinalizeGuard {
    gateway: Option<Arc<CapabilityGateway>>,
}

impl FinalizeGuard {
    fn new(gateway: Arc<CapabilityGateway>) -> Self {
        Self { gateway: Some(gateway) }
    }

    async fn release(mut self) {
        if let Some(gateway) = self.gateway.take() {
            gateway.finalize().await;
        }
    }
}

impl Drop for FinalizeGuard {
    fn drop(&mut self) {
        let Some(gateway) = self.gateway.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!(session = gateway.session_id(), "workflow cancelled, releasing provider session");
                handle.spawn(async move {
                          gateway.finalize().await;
                      });
            }
            Err(_) => warn!(session = gateway.session_id(), "no async runtime, provider session not released"),
        }
    }
}

pub struct Orchestrator {
    config: WorkflowConfig,
    factory: Arc<dyn ProviderFactory>,
    knowledge: Arc<dyn KnowledgeStore>,
    sleeper: Arc<dyn Sleeper>,
}

/// Builder de `Orchestrator`. Lo no indicado usa las implementaciones de
/// producción (HTTP, corpus en memoria, sleeper de tokio).
pub struct OrchestratorBuilder {
    config: WorkflowConfig,
    factory: Option<Arc<dyn ProviderFactory>>,
    knowledge: Option<Arc<dyn KnowledgeStore>>,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl OrchestratorBuilder {
    pub fn factory(mut self, factory: Arc<dyn ProviderFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn knowledge(mut self, knowledge: Arc<dyn KnowledgeStore>) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    pub fn build(self) -> Orchestrator {
        Orchestrator { config: self.config,
                       factory: self.factory.unwrap_or_else(|| Arc::new(HttpProviderFactory::default())),
                       knowledge: self.knowledge
                                      .unwrap_or_else(|| Arc::new(InMemoryKnowledgeStore::with_default_corpus())),
                       sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)) }
    }
}

impl Orchestrator {
    pub fn builder(config: WorkflowConfig) -> OrchestratorBuilder {
        OrchestratorBuilder { config,
                              factory: None,
                              knowledge: None,
                              sleeper: None }
    }

    /// Valida un cuerpo JSON y ejecuta el workflow.
    pub async fn run_value(&self, body: &Value) -> ResultEnvelope {
        match WorkflowRequest::from_value(body) {
            Ok(request) => self.run(&request).await,
            Err(err) => {
                warn!(error = %err, "rejected workflow request");
                error_envelope(&err)
            }
        }
    }

    /// Ejecuta el workflow para una pregunta de texto.
    pub async fn run_input(&self, input: &str) -> ResultEnvelope {
        match WorkflowRequest::new(input) {
            Ok(request) => self.run(&request).await,
            Err(err) => error_envelope(&err),
        }
    }

    /// Produce exactamente un envelope por petición.
    pub async fn run(&self, request: &WorkflowRequest) -> ResultEnvelope {
        // credenciales antes de instanciar cualquier proveedor: sin red
        let selection = match ProviderSelection::from_credentials(&self.config.credentials) {
            Ok(selection) => selection,
            Err(err) => {
                warn!(error = %err, "workflow aborted before start");
                return error_envelope(&err);
            }
        };
        let selector = match FallbackSelector::from_selection(&selection, self.factory.as_ref(), &self.config.models) {
            Ok(selector) => selector,
            Err(err) => return error_envelope(&err),
        };

        let flow_id = Uuid::new_v4();
        let gateway = Arc::new(CapabilityGateway::new(flow_id.to_string(),
                                                      selector,
                                                      Arc::clone(&self.knowledge),
                                                      self.config.retry,
                                                      Arc::clone(&self.sleeper)));
        let guard = FinalizeGuard::new(Arc::clone(&gateway));
        info!(%flow_id, provider = %gateway.primary_provider(), fallback = ?gateway.fallback_provider(), "workflow started");

        let outcome = self.execute(flow_id, &gateway, request).await;
        guard.release().await;

        match outcome {
            Ok((data, meta)) => {
                info!(%flow_id, fallback_used = gateway.fallback_used(), "workflow finished");
                success_envelope(data, meta)
            }
            Err(err) => {
                warn!(%flow_id, code = err.code(), error = %err, "workflow failed");
                error_envelope(&err)
            }
        }
    }

    async fn execute(&self,
                     flow_id: Uuid,
                     gateway: &CapabilityGateway,
                     request: &WorkflowRequest)
                     -> Result<(Value, Value), AppError> {
        let mut executor = StepExecutor::new();
        let mut chain = StepOutputChain::new();

        match executor.run_step(StepId::CollectContext, || steps::context::run(gateway, request, &self.config))
                      .await
        {
            StepRunResult::Ok(context) => chain.context = Some(context),
            StepRunResult::Failed(err) => {
                let steps = to_json(executor.results())?;
                return Err(err.with_detail("steps", steps));
            }
            StepRunResult::Skipped => return Err(AppError::unexpected("context step was skipped")),
        }

        let realtime = executor.run_gated(StepId::AnalyzeRealtimeData, chain.context.as_ref(), |context| {
                                   steps::realtime::run(gateway, request, context, self.config.max_tool_rounds)
                               })
                               .await
                               .ok();
        chain.realtime_analysis = realtime;

        let predictions = executor.run_gated(StepId::GeneratePredictions, chain.realtime_analysis.as_deref(), |analysis| {
                                      steps::predictions::run(gateway, request, &chain, analysis)
                                  })
                                  .await
                                  .ok();
        chain.predictions = predictions;

        let recommendations = executor.run_gated(StepId::GenerateRecommendations, chain.predictions.as_deref(), |predictions| {
                                          steps::recommendations::run(gateway, request, &chain, predictions)
                                      })
                                      .await
                                      .ok();
        chain.recommendations = recommendations;

        let alerts = executor.run_gated(StepId::GeneratePublicAlerts, chain.recommendations.as_deref(), |recommendations| {
                                 steps::alerts::run(gateway, request, &chain, recommendations)
                             })
                             .await
                             .ok();
        chain.public_alerts = alerts;

        let conversational = executor.run_step(StepId::GenerateConversationalResponse, || {
                                         steps::conversational::run(gateway, request, &chain)
                                     })
                                     .await
                                     .ok();
        let conversational_response =
            conversational.clone()
                          .unwrap_or_else(|| steps::conversational::degraded_response(&chain));
        chain.conversational = conversational;

        let results = executor.into_results();
        let completed = results.iter().filter(|r| r.status == StepStatus::Ok).count();
        info!(%flow_id, completed, total = results.len(), "pipeline complete");

        let report = WorkflowReport { conversational_response,
                                      detailed_analysis: DetailedAnalysis::from_chain(&chain),
                                      timestamp: Utc::now() };
        let meta = ReportMeta::new(flow_id, gateway.primary_provider(), gateway.fallback_used(), results);
        Ok((to_json(&report)?, to_json(&meta)?))
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::unexpected(format!("failed to serialize report: {e}")))
}
