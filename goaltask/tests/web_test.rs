//! Integration tests for the goaltask web UI
//!
//! These drive the axum router in-process with a stubbed LLM client.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use regex::Regex;
use tower::ServiceExt;

use goaltask::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
use goaltask::service::{Backend, BreakdownService};
use goaltask::session::{SessionId, SessionStore};
use goaltask::web::{AppState, create_router};
use goaltask::{BreakdownGenerator, GeneratorConfig};

// =============================================================================
// Helpers
// =============================================================================

enum Reply {
    Text(String),
    ServerError(String),
    TimedOut(Duration),
}

/// LLM stand-in that always gives the same reply
struct StubClient {
    reply: Reply,
    calls: AtomicUsize,
}

impl StubClient {
    fn with_reply(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    fn replying(text: &str) -> Arc<Self> {
        Self::with_reply(Reply::Text(text.to_string()))
    }

    fn failing(message: &str) -> Arc<Self> {
        Self::with_reply(Reply::ServerError(message.to_string()))
    }

    fn timing_out(after: Duration) -> Arc<Self> {
        Self::with_reply(Reply::TimedOut(after))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for StubClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Text(text) => Ok(CompletionResponse::text(text.clone())),
            Reply::ServerError(message) => Err(LlmError::ApiError {
                status: 500,
                message: message.clone(),
            }),
            Reply::TimedOut(after) => Err(LlmError::Timeout(*after)),
        }
    }
}

fn app_with(client: Arc<StubClient>) -> (AppState, Router) {
    app_with_sessions(client, SessionStore::new())
}

fn app_with_sessions(client: Arc<StubClient>, sessions: SessionStore) -> (AppState, Router) {
    let generator = BreakdownGenerator::new(client, "SYSTEM", GeneratorConfig::default());
    let service = BreakdownService::new(Backend::Ready(generator), sessions);
    let state = AppState::new(service).expect("Failed to build app state");
    let router = create_router(state.clone());
    (state, router)
}

fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// `name=value` part of the response's session cookie
fn session_cookie(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("Expected a session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn session_id(cookie: &str) -> SessionId {
    SessionId::parse(cookie.split_once('=').unwrap().1).expect("Cookie should carry a session id")
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// =============================================================================
// End-to-end
// =============================================================================

#[tokio::test]
async fn test_generate_store_and_download() {
    let client = StubClient::replying("```html\n<!DOCTYPE html>...</html>\n```");
    let (state, router) = app_with(client.clone());

    let response = router
        .clone()
        .oneshot(form_post("/generate", "goal=Learn+Spanish+in+6+months", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let page = body_text(response).await;
    assert!(page.contains("Task breakdown generated successfully"));
    assert!(page.contains("/breakdown/preview"));
    assert_eq!(client.calls(), 1);

    // Stored breakdown is fence-free and trimmed
    let stored = state.service.sessions().breakdown(session_id(&cookie)).unwrap();
    assert_eq!(stored.html(), "<!DOCTYPE html>...</html>");
    assert_eq!(stored.goal().as_str(), "Learn Spanish in 6 months");

    let response = router
        .clone()
        .oneshot(get("/breakdown/download", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let disposition = response.headers()[CONTENT_DISPOSITION].to_str().unwrap().to_string();
    let pattern = Regex::new(r#"^attachment; filename="goal_breakdown_\d{8}_\d{6}\.html"$"#).unwrap();
    assert!(pattern.is_match(&disposition), "unexpected disposition {}", disposition);
    assert_eq!(body_text(response).await, "<!DOCTYPE html>...</html>");

    let response = router.oneshot(get("/breakdown/preview", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<!DOCTYPE html>...</html>");
}

#[tokio::test]
async fn test_breakdown_survives_page_reload() {
    let (_, router) = app_with(StubClient::replying("<!DOCTYPE html><html></html>"));

    let response = router
        .clone()
        .oneshot(form_post("/generate", "goal=Write+a+novel", None))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let response = router.oneshot(get("/", Some(&cookie))).await.unwrap();
    assert!(response.headers().get(SET_COOKIE).is_none());
    let page = body_text(response).await;
    assert!(page.contains("Your Task Breakdown"));
    assert!(page.contains("Write a novel"));
}

// =============================================================================
// Validation and failures
// =============================================================================

#[tokio::test]
async fn test_blank_goal_warns_and_skips_generation() {
    let client = StubClient::replying("<p>unused</p>");
    let (_, router) = app_with(client.clone());

    let response = router
        .clone()
        .oneshot(form_post("/generate", "goal=+++%0A%09", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let page = body_text(response).await;
    assert!(page.contains("Please enter a goal!"));
    assert!(page.contains("banner warning"));
    assert_eq!(client.calls(), 0);

    let response = router.oneshot(get("/breakdown/preview", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_goal_field_is_blank() {
    let client = StubClient::replying("<p>unused</p>");
    let (_, router) = app_with(client.clone());

    let response = router.oneshot(form_post("/generate", "", None)).await.unwrap();
    assert!(body_text(response).await.contains("Please enter a goal!"));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_generation_failure_shows_error() {
    let client = StubClient::failing("upstream exploded");
    let (state, router) = app_with(client.clone());

    let response = router
        .clone()
        .oneshot(form_post("/generate", "goal=Build+a+mobile+app", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let page = body_text(response).await;
    assert!(page.contains("❌ Error: API error 500: upstream exploded"));
    assert!(!page.contains("/breakdown/preview"));
    assert_eq!(client.calls(), 1);
    assert!(state.service.sessions().breakdown(session_id(&cookie)).is_none());

    let response = router.oneshot(get("/breakdown/download", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generation_timeout_shows_error() {
    let client = StubClient::timing_out(Duration::from_millis(200));
    let (state, router) = app_with(client.clone());

    let response = router
        .clone()
        .oneshot(form_post("/generate", "goal=Learn+Spanish+in+6+months", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let page = body_text(response).await;
    assert!(page.contains("❌ Error: Timeout after 200ms"));
    assert!(page.contains("banner error"));
    assert!(!page.contains("/breakdown/preview"));
    assert_eq!(client.calls(), 1);
    assert!(state.service.sessions().breakdown(session_id(&cookie)).is_none());

    let response = router.oneshot(get("/breakdown/download", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unconfigured_backend() {
    let service = BreakdownService::new(
        Backend::Unconfigured("OpenAI API key not found!".to_string()),
        SessionStore::new(),
    );
    let router = create_router(AppState::new(service).unwrap());

    let response = router.clone().oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("OpenAI API key not found!"));

    let response = router
        .oneshot(form_post("/generate", "goal=Write+a+novel", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("API key configuration error"));
}

// =============================================================================
// Examples and misc routes
// =============================================================================

#[tokio::test]
async fn test_example_prefills_form() {
    let (_, router) = app_with(StubClient::replying("<p>unused</p>"));

    let response = router
        .clone()
        .oneshot(form_post("/example", "index=1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
    let cookie = session_cookie(&response);

    let response = router.oneshot(get("/", Some(&cookie))).await.unwrap();
    let page = body_text(response).await;
    assert!(page.contains(">Start a YouTube channel</textarea>"));
}

#[tokio::test]
async fn test_cookieless_clicks_do_not_pile_up() {
    let sessions = SessionStore::with_ttl(Duration::from_millis(100));
    let (state, router) = app_with_sessions(StubClient::replying("<p>unused</p>"), sessions);

    for _ in 0..200 {
        let response = router
            .clone()
            .oneshot(form_post("/example", "index=0", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
    assert!(state.service.sessions().len() <= 200);

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(state.service.sessions().is_empty());
}

#[tokio::test]
async fn test_unknown_example_rejected() {
    let (_, router) = app_with(StubClient::replying("<p>unused</p>"));

    let response = router.oneshot(form_post("/example", "index=6", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_index_lists_examples() {
    let (_, router) = app_with(StubClient::replying("<p>unused</p>"));

    let response = router.oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(SET_COOKIE).is_some());
    let page = body_text(response).await;
    for goal in goaltask::EXAMPLE_GOALS {
        assert!(page.contains(goal), "missing example {}", goal);
    }
}

#[tokio::test]
async fn test_health() {
    let (_, router) = app_with(StubClient::replying("<p>unused</p>"));

    let response = router.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}
