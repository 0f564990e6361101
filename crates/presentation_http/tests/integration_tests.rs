//! Integration tests for HTTP handlers
#![allow(clippy::expect_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use axum_test::TestServer;
use integration_tfl::{
    ArrivalPrediction, JourneyOption, LineStatus, StopMatch, TflConfig, TflError,
    TflGatewayClient, TransitGateway,
};
use presentation_http::{
    AppConfig, AppState, RequestIdLayer, create_router, middleware::REQUEST_ID_HEADER,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Canned answers for the mock gateway
#[derive(Clone, Copy, PartialEq, Eq)]
enum Behaviour {
    Healthy,
    NoMatches,
    UpstreamStatus(u16),
    Timeout,
}

/// Mock gateway that records the arguments it was called with
struct MockGateway {
    behaviour: Behaviour,
    calls: Mutex<Vec<String>>,
}

impl MockGateway {
    fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: String) -> Result<(), TflError> {
        self.calls.lock().expect("calls lock").push(call);
        match self.behaviour {
            Behaviour::Healthy | Behaviour::NoMatches => Ok(()),
            Behaviour::UpstreamStatus(status) => Err(TflError::UpstreamStatus { status }),
            Behaviour::Timeout => Err(TflError::Timeout { timeout_secs: 10 }),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl TransitGateway for MockGateway {
    async fn search_stop_point(&self, query: &str) -> Result<Vec<StopMatch>, TflError> {
        self.record(format!("search:{query}"))?;
        if self.behaviour == Behaviour::NoMatches {
            return Err(TflError::NoStopsFound);
        }
        Ok(vec![StopMatch {
            name: "Bank".to_string(),
            id: "HUBBAN".to_string(),
        }])
    }

    async fn get_bus_arrivals(&self, stop_id: &str) -> Result<Vec<ArrivalPrediction>, TflError> {
        self.record(format!("bus:{stop_id}"))?;
        Ok(vec![
            ArrivalPrediction::from_seconds("8".to_string(), "Bow".to_string(), 40),
            ArrivalPrediction::from_seconds("25".to_string(), "Ilford".to_string(), 125),
        ])
    }

    async fn get_line_status(&self) -> Result<LineStatus, TflError> {
        self.get_line_status_for_mode("tube").await
    }

    async fn get_line_status_for_mode(&self, mode: &str) -> Result<LineStatus, TflError> {
        self.record(format!("line_status:{mode}"))?;
        Ok([("Victoria".to_string(), "Good Service".to_string())]
            .into_iter()
            .collect())
    }

    async fn get_journey(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<JourneyOption>, TflError> {
        self.record(format!("journey:{origin}->{destination}"))?;
        Ok(vec![JourneyOption {
            journey: 1,
            duration_mins: 27,
            steps: vec!["Victoria line to Brixton".to_string()],
        }])
    }

    async fn is_healthy(&self) -> bool {
        self.behaviour == Behaviour::Healthy
    }
}

fn create_test_server(behaviour: Behaviour) -> (TestServer, Arc<MockGateway>) {
    let gateway = Arc::new(MockGateway::new(behaviour));
    let state = AppState::new(gateway.clone(), Arc::new(AppConfig::default()));
    let router = create_router(state).layer(RequestIdLayer::new());
    let server = TestServer::new(router).expect("Failed to create test server");
    (server, gateway)
}

// ============ Health Endpoint Tests ============

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let (server, _) = create_test_server(Behaviour::Healthy);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn readiness_endpoint_returns_ready_when_upstream_healthy() {
    let (server, _) = create_test_server(Behaviour::Healthy);

    let response = server.get("/ready").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["ready"], true);
    assert_eq!(body["upstream"]["healthy"], true);
    assert_eq!(body["upstream"]["base_url"], "https://api.tfl.gov.uk");
    assert_eq!(body["upstream"]["probe"], "/Line/Meta/Modes");
    assert_eq!(body["upstream"]["authenticated"], false);
    assert!(body["upstream"]["latency_ms"].is_u64());
}

#[tokio::test]
async fn readiness_endpoint_returns_unavailable_when_upstream_down() {
    let (server, _) = create_test_server(Behaviour::Timeout);

    let response = server.get("/ready").await;

    response.assert_status_service_unavailable();
    let body: serde_json::Value = response.json();
    assert_eq!(body["ready"], false);
}

// ============ Transit Endpoint Tests ============

#[tokio::test]
async fn search_returns_matches() {
    let (server, gateway) = create_test_server(Behaviour::Healthy);

    let response = server.get("/search/Bank").await;

    response.assert_status_ok();
    response.assert_json(&json!([{"name": "Bank", "id": "HUBBAN"}]));
    assert_eq!(gateway.calls(), vec!["search:Bank"]);
}

#[tokio::test]
async fn search_decodes_path_segment() {
    let (server, gateway) = create_test_server(Behaviour::Healthy);

    server.get("/search/Oxford%20Circus").await.assert_status_ok();
    assert_eq!(gateway.calls(), vec!["search:Oxford Circus"]);
}

#[tokio::test]
async fn search_without_matches_returns_error_object() {
    let (server, _) = create_test_server(Behaviour::NoMatches);

    let response = server.get("/search/Nowhere").await;

    response.assert_status_not_found();
    response.assert_json(&json!({"error": "No stops found"}));
}

#[tokio::test]
async fn bus_arrivals_are_returned_in_order() {
    let (server, gateway) = create_test_server(Behaviour::Healthy);

    let response = server.get("/bus/490008660N").await;

    response.assert_status_ok();
    response.assert_json(&json!([
        {"line": "8", "destination": "Bow", "arrival_mins": 0},
        {"line": "25", "destination": "Ilford", "arrival_mins": 2}
    ]));
    assert_eq!(gateway.calls(), vec!["bus:490008660N"]);
}

#[tokio::test]
async fn line_status_uses_default_mode() {
    let (server, gateway) = create_test_server(Behaviour::Healthy);

    let response = server.get("/line_status").await;

    response.assert_status_ok();
    response.assert_json(&json!({"Victoria": "Good Service"}));
    assert_eq!(gateway.calls(), vec!["line_status:tube"]);
}

#[tokio::test]
async fn line_status_for_explicit_mode() {
    let (server, gateway) = create_test_server(Behaviour::Healthy);

    server.get("/line_status/dlr").await.assert_status_ok();
    assert_eq!(gateway.calls(), vec!["line_status:dlr"]);
}

#[tokio::test]
async fn journey_returns_options() {
    let (server, gateway) = create_test_server(Behaviour::Healthy);

    let response = server.get("/journey/1000077/1000033").await;

    response.assert_status_ok();
    response.assert_json(&json!([
        {"journey": 1, "duration_mins": 27, "steps": ["Victoria line to Brixton"]}
    ]));
    assert_eq!(gateway.calls(), vec!["journey:1000077->1000033"]);
}

// ============ Error Mapping Tests ============

#[tokio::test]
async fn upstream_status_is_reported_verbatim() {
    let (server, _) = create_test_server(Behaviour::UpstreamStatus(500));

    for path in ["/search/Bank", "/bus/1", "/line_status", "/journey/a/b"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::BAD_GATEWAY);
        response.assert_json(&json!({"error": "API error 500"}));
    }
}

#[tokio::test]
async fn timeout_maps_to_gateway_timeout() {
    let (server, _) = create_test_server(Behaviour::Timeout);

    let response = server.get("/bus/1").await;

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Request timed out after 10 seconds");
}

#[tokio::test]
async fn unknown_route_returns_error_object() {
    let (server, gateway) = create_test_server(Behaviour::Healthy);

    let response = server.get("/trains/now").await;

    response.assert_status_not_found();
    response.assert_json(&json!({"error": "Not found: /trains/now"}));
    assert!(gateway.calls().is_empty());
}

// ============ Real Client Tests ============

/// Router backed by a real client pointed at `base_url`
fn router_for_upstream(base_url: &str) -> axum::Router {
    let config = AppConfig {
        tfl: TflConfig::for_testing(base_url),
        ..AppConfig::default()
    };
    let gateway = TflGatewayClient::new(&config.tfl).expect("valid test config");
    create_router(AppState::new(Arc::new(gateway), Arc::new(config)))
}

async fn call(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn encoded_dot_segments_are_rejected() {
    let upstream = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(0)
        .mount(&upstream)
        .await;

    for uri in ["/bus/%2E%2E", "/journey/%2E%2E/1000033", "/search/%2E"] {
        let (status, body) = call(router_for_upstream(&upstream.uri()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(
            body["error"]
                .as_str()
                .is_some_and(|e| e.starts_with("Invalid path segment")),
            "{uri}: {body}"
        );
    }
}

#[tokio::test]
async fn connection_failure_body_hides_credentials() {
    // Nothing listens on port 1
    let (status, body) = call(router_for_upstream("http://127.0.0.1:1"), "/line_status").await;

    assert!(matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT
    ));
    let message = body["error"].as_str().expect("error field");
    assert!(!message.contains("test-app-key"), "leaked: {message}");
    assert!(!message.contains("app_key"), "leaked: {message}");
}

// ============ Middleware Tests ============

#[tokio::test]
async fn request_id_is_echoed() {
    let (server, _) = create_test_server(Behaviour::Healthy);

    let response = server
        .get("/health")
        .add_header(REQUEST_ID_HEADER, "trace-me-123")
        .await;

    response.assert_status_ok();
    assert_eq!(response.header(REQUEST_ID_HEADER), "trace-me-123");
}

#[tokio::test]
async fn request_id_is_generated_when_missing() {
    let (server, _) = create_test_server(Behaviour::Healthy);

    let response = server.get("/health").await;

    let id = response.header(REQUEST_ID_HEADER);
    assert!(uuid::Uuid::parse_str(id.to_str().expect("ascii header")).is_ok());
}
