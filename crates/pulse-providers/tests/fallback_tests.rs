use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pulse_core::{ErrorKind, RecordingSleeper, RetryPolicy};
use pulse_providers::{AgentRequest, AgentResponse, BoundProvider, FallbackSelector, ProviderError, ProviderId,
                      ReasoningProvider, Role, Turn};

/// Proveedor con respuestas en cola; al vaciarse repite la última.
struct Scripted {
    id: ProviderId,
    script: Mutex<VecDeque<Result<AgentResponse, ProviderError>>>,
    last: Mutex<Option<Result<AgentResponse, ProviderError>>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<AgentRequest>>,
    finalized: AtomicUsize,
}

impl Scripted {
    fn new(id: ProviderId, script: Vec<Result<AgentResponse, ProviderError>>) -> Arc<Self> {
        Arc::new(Self { id,
                        script: Mutex::new(script.into()),
                        last: Mutex::new(None),
                        calls: AtomicUsize::new(0),
                        seen: Mutex::new(vec![]),
                        finalized: AtomicUsize::new(0) })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReasoningProvider for Scripted {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn run_agent(&self, request: AgentRequest) -> Result<AgentResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(r) => {
                *self.last.lock().unwrap() = Some(r.clone());
                r
            }
            None => self.last.lock().unwrap().clone().unwrap_or_else(|| Ok(AgentResponse::text("default"))),
        }
    }

    async fn finalize(&self, _session_id: &str) {
        self.finalized.fetch_add(1, Ordering::SeqCst);
    }
}

fn overloaded() -> Result<AgentResponse, ProviderError> {
    Err(ProviderError::Response("Model is overloaded".into()))
}

fn selector(primary: &Arc<Scripted>, fallback: Option<&Arc<Scripted>>) -> FallbackSelector {
    let p: Arc<dyn ReasoningProvider> = primary.clone();
    FallbackSelector::new(BoundProvider::new(p, "gpt-4o-mini"),
                          fallback.map(|f| {
                                      let f: Arc<dyn ReasoningProvider> = f.clone();
                                      BoundProvider::new(f, "llama-3.3-70b-versatile")
                                  }))
}

#[tokio::test]
async fn persistent_overload_falls_back_exactly_once() {
    let primary = Scripted::new(ProviderId::OpenAi, vec![overloaded()]);
    let secondary = Scripted::new(ProviderId::Groq, vec![Ok(AgentResponse::text("from groq"))]);
    let sel = selector(&primary, Some(&secondary));
    let sleeper = RecordingSleeper::new();
    let mut conversation = vec![Turn::user("how is the air today?")];

    let resp = sel.dispatch(AgentRequest::new("flow-1", "analyze"), &mut conversation, &RetryPolicy::default(), &sleeper)
                  .await
                  .unwrap();

    assert_eq!(resp.text_content(), Some("from groq"));
    assert_eq!(primary.calls(), 4);
    assert_eq!(secondary.calls(), 1);
    assert!(sel.fallback_used());
    assert_eq!(sleeper.waits(),
               vec![Duration::from_millis(500), Duration::from_millis(1000), Duration::from_millis(2000)]);

    // la nota de sistema queda en la conversación de trabajo y viaja en la reemisión
    let note = conversation.last().unwrap();
    assert_eq!(note.role, Role::System);
    assert_eq!(note.content, "[fallback] openai overloaded; request re-issued to groq");
    let reissued = &secondary.seen.lock().unwrap()[0];
    assert_eq!(reissued.model, "llama-3.3-70b-versatile");
    assert_eq!(reissued.conversation.len(), 2);
    assert_eq!(reissued.session_id, "flow-1");
}

#[tokio::test]
async fn failing_fallback_surfaces_external_service_error() {
    let primary = Scripted::new(ProviderId::OpenAi, vec![overloaded()]);
    let secondary = Scripted::new(ProviderId::Groq, vec![overloaded()]);
    let sel = selector(&primary, Some(&secondary));
    let mut conversation = vec![];

    let err = sel.dispatch(AgentRequest::new("s", "i"), &mut conversation, &RetryPolicy::default(), &RecordingSleeper::new())
                 .await
                 .unwrap_err();

    assert_eq!(err.kind, ErrorKind::ExternalServiceError);
    assert_eq!(secondary.calls(), 1, "fallback must not be retried");
    assert_eq!(primary.calls(), 4);
}

#[tokio::test]
async fn non_transient_error_never_falls_back() {
    let primary = Scripted::new(ProviderId::OpenAi, vec![Err(ProviderError::Status { status: 400,
                                                                                      message: "bad request".into() })]);
    let secondary = Scripted::new(ProviderId::Groq, vec![]);
    let sel = selector(&primary, Some(&secondary));
    let mut conversation = vec![Turn::user("q")];

    let err = sel.dispatch(AgentRequest::new("s", "i"), &mut conversation, &RetryPolicy::default(), &RecordingSleeper::new())
                 .await
                 .unwrap_err();

    assert_eq!(err.kind, ErrorKind::ExternalServiceError);
    assert_eq!(err.details.as_ref().unwrap()["upstream_status"], 400);
    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 0);
    assert!(!sel.fallback_used());
    assert_eq!(conversation.len(), 1);
}

#[tokio::test]
async fn overload_without_fallback_propagates() {
    let primary = Scripted::new(ProviderId::Groq, vec![overloaded()]);
    let sel = selector(&primary, None);
    let mut conversation = vec![];

    let err = sel.dispatch(AgentRequest::new("s", "i"), &mut conversation, &RetryPolicy::new(1, 10, 2), &RecordingSleeper::new())
                 .await
                 .unwrap_err();

    assert!(err.message.contains("overloaded"));
    assert_eq!(primary.calls(), 2);
    assert!(conversation.is_empty());
}

#[tokio::test]
async fn recovered_primary_keeps_fallback_idle() {
    let primary = Scripted::new(ProviderId::OpenAi, vec![overloaded(), Ok(AgentResponse::text("ok"))]);
    let secondary = Scripted::new(ProviderId::Groq, vec![]);
    let sel = selector(&primary, Some(&secondary));
    let mut conversation = vec![];

    let resp = sel.dispatch(AgentRequest::new("s", "i"), &mut conversation, &RetryPolicy::default(), &RecordingSleeper::new())
                  .await
                  .unwrap();

    assert_eq!(resp.text_content(), Some("ok"));
    assert_eq!(secondary.calls(), 0);
    assert_eq!(primary.seen.lock().unwrap()[0].model, "gpt-4o-mini");

    sel.finalize("s").await;
    assert_eq!(primary.finalized.load(Ordering::SeqCst), 1);
    assert_eq!(secondary.finalized.load(Ordering::SeqCst), 1);
}
