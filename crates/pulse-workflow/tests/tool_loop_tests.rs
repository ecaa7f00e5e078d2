mod support;

use std::sync::Arc;

use pulse_providers::{AgentResponse, ProviderId, Role, ToolCall};
use support::{config, orchestrator, stage_of, FakeFactory, FakeProvider, Stage};

fn call(id: &str, name: &str, args: &str) -> ToolCall {
    ToolCall { call_id: id.into(),
               name: name.into(),
               arguments_json: args.into() }
}

#[tokio::test]
async fn tool_results_are_injected_before_next_call() {
    let openai = FakeProvider::new(ProviderId::OpenAi, |req| {
        if stage_of(req) == Stage::Realtime && !req.conversation.iter().any(|t| t.role == Role::Tool) {
            return Ok(AgentResponse::calls(vec![call("c1", "get_weather_aqi", r#"{"location":"Delhi"}"#),
                                                call("c2", "summon_drone", "{}")]));
        }
        Ok(AgentResponse::text(format!("{:?} ok", stage_of(req))))
    });
    let factory = Arc::new(FakeFactory::default().with(openai.clone()));
    let env = orchestrator(config(Some("sk-test"), None), factory).run_input("AQI in Delhi?").await;

    assert!(env.is_success());
    assert_eq!(env.meta().unwrap()["steps"][1]["status"], "ok");

    let requests = openai.requests.lock().unwrap();
    assert_eq!(requests[0].tools.len(), 3);
    let second = &requests[1].conversation;
    assert_eq!(second[1].role, Role::Assistant);
    assert_eq!(second[1].tool_calls.len(), 2);
    assert_eq!(second[2].tool_name.as_deref(), Some("get_weather_aqi"));
    assert_eq!(second[2].tool_call_id.as_deref(), Some("c1"));
    assert!(second[2].content.contains("\"aqi\""));
    assert_eq!(second[3].tool_call_id.as_deref(), Some("c2"));
    assert_eq!(second[3].content, "Tool not found");
}

#[tokio::test]
async fn exhausted_rounds_end_with_a_tool_free_call() {
    let openai = FakeProvider::new(ProviderId::OpenAi, |req| {
        if stage_of(req) == Stage::Realtime && !req.tools.is_empty() {
            return Ok(AgentResponse::calls(vec![call("c", "analyze_health_trends",
                                                     r#"{"keywords":["fever"],"region":"south"}"#)]));
        }
        Ok(AgentResponse::text(format!("{:?} ok", stage_of(req))))
    });
    let factory = Arc::new(FakeFactory::default().with(openai.clone()));
    let env = orchestrator(config(Some("sk-test"), None).with_max_tool_rounds(2), factory).run_input("fever?").await;

    assert!(env.is_success());
    assert_eq!(env.data().unwrap()["detailed_analysis"]["realtime_analysis"], "Realtime ok");
    let realtime: Vec<_> = openai.requests
                                 .lock()
                                 .unwrap()
                                 .iter()
                                 .filter(|r| stage_of(r) == Stage::Realtime)
                                 .map(|r| r.tools.len())
                                 .collect();
    assert_eq!(realtime, vec![3, 3, 0]);
}

#[tokio::test]
async fn empty_analysis_fails_the_step() {
    let openai = FakeProvider::new(ProviderId::OpenAi, |req| match stage_of(req) {
                                       Stage::Realtime => Ok(AgentResponse::text("   ")),
                                       other => Ok(AgentResponse::text(format!("{other:?} ok"))),
                                   });
    let factory = Arc::new(FakeFactory::default().with(openai));
    let env = orchestrator(config(Some("sk-test"), None), factory).run_input("q").await;

    let step = &env.meta().unwrap()["steps"][1];
    assert_eq!(step["status"], "error");
    assert_eq!(step["error"]["message"], "empty analysis");
}
