// HTTP surface: routing, status mapping and CORS

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use interpreter::actions::{ActionTiming, RecordingInputDevice};
use interpreter::agent::build_executor;
use interpreter::api::{create_router, AppState};
use interpreter::{AgentConfig, InstructionAgent};
use llm::StaticGenerator;
use serde_json::{json, Value};
use tower::ServiceExt;

const ORIGIN: &str = "http://localhost:3000";

fn app(model_answer: &str) -> Router {
    let config = AgentConfig {
        timing: ActionTiming::immediate(),
        dry_run: true,
        ..AgentConfig::default()
    };
    let (_, device) = RecordingInputDevice::shared();
    let agent = InstructionAgent::new(
        Arc::new(StaticGenerator::new(model_answer)),
        build_executor(&config, device, None),
    );
    create_router(AppState::new(agent), &config.server.allowed_origins)
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app("[]"), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
}

#[tokio::test]
async fn test_execute_runs_generated_plan() {
    let answer = "```json\n[\"typeText(\\\"hello\\\")\", \"unknownCmd()\"]\n```";
    let (status, body) = send(
        app(answer),
        post("/execute", r#"{"instruction": "say hello"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["plan"], json!(["typeText(\"hello\")", "unknownCmd()"]));

    let logs = body["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 4);
    assert_eq!(logs[1]["phase"], "succeeded");
    assert_eq!(logs[3]["phase"], "failed");
    assert_eq!(logs[3]["message"], "unknown command: unknownCmd()");
}

#[tokio::test]
async fn test_execute_rejects_blank_instruction() {
    for body in [
        r#"{"instruction": "   "}"#,
        r#"{"instruction": 42}"#,
        r#"{}"#,
    ] {
        let (status, response) = send(app("[\"wait(1)\"]"), post("/execute", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response,
            json!({
                "success": false,
                "error": "Invalid or missing instruction.",
                "code": "BAD_REQUEST",
            })
        );
    }
}

#[tokio::test]
async fn test_execute_rejects_malformed_json() {
    let (status, body) = send(app("[]"), post("/execute", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_execute_extraction_failure_is_server_error() {
    let (status, body) = send(
        app("Sorry, I can't do that."),
        post("/execute", r#"{"instruction": "do the thing"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "EXTRACTION_ERROR");
    assert_eq!(body["error"], "Extraction failed: no array found");
}

#[tokio::test]
async fn test_execute_empty_plan() {
    let (status, body) = send(app("[]"), post("/execute", r#"{"instruction": "x"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "LLM returned no commands. Please rephrase your instruction."
    );
}

#[tokio::test]
async fn test_plan_endpoint_skips_model() {
    let (status, body) = send(
        app("not used"),
        post("/plan", r#"{"plan": ["moveTo(1, 2)", "clickAt(1)"]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let logs = body["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 4);
    assert_eq!(logs[1]["phase"], "succeeded");
    assert_eq!(
        logs[3]["message"],
        "clickAt failed: invalid arguments: clickAt: missing number argument 2"
    );
}

#[tokio::test]
async fn test_plan_endpoint_rejects_non_array() {
    let (status, body) = send(app("[]"), post("/plan", r#"{"plan": "wait(1)"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PLAN");

    let (status, body) = send(app("[]"), post("/plan", r#"{"steps": []}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing plan.");
}

#[tokio::test]
async fn test_cors_allows_configured_origin_only() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, ORIGIN)
        .body(Body::empty())
        .unwrap();
    let response = app("[]").oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        ORIGIN
    );

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app("[]").oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_preflight() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/execute")
        .header(header::ORIGIN, ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app("[]").oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let methods = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("POST"));
}
