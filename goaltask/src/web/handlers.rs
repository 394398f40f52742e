//! HTTP handlers

use axum::Form;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Local;
use serde::Deserialize;
use tracing::{debug, error, info};

use super::AppState;
use super::cookie::resolve_session;
use super::views::{Banner, PageContext};
use crate::domain::{HTML_MIME, download_filename};
use crate::service::{SubmitOutcome, SubmitRequest};

/// Goal form body
#[derive(Debug, Deserialize)]
pub struct GoalForm {
    #[serde(default)]
    pub goal: String,
}

/// Example shortcut form body
#[derive(Debug, Deserialize)]
pub struct ExampleForm {
    pub index: usize,
}

/// Attach the session cookie if this request started a new session
fn with_cookie(mut response: Response, cookie: Option<String>) -> Response {
    if let Some(cookie) = cookie
        && let Ok(value) = HeaderValue::from_str(&cookie)
    {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

fn render_page(state: &AppState, context: &PageContext) -> Response {
    match state.views.render_index(context) {
        Ok(html) => ([(CONTENT_TYPE, HTML_MIME)], html).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

/// `GET /` - the page in its current session state
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (session, cookie) = resolve_session(&headers);
    debug!(%session, "index: called");

    let snapshot = state.service.sessions().snapshot(session);
    let context = PageContext::new(snapshot.selected_goal.unwrap_or_default())
        .with_config_error(state.service.config_error())
        .with_breakdown(snapshot.breakdown.as_ref());

    with_cookie(render_page(&state, &context), cookie)
}

/// `POST /example` - pre-fill the form with an example goal
pub async fn select_example(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ExampleForm>,
) -> Response {
    let (session, cookie) = resolve_session(&headers);
    debug!(%session, index = form.index, "select_example: called");

    let response = match state.service.select_example(session, form.index) {
        Some(goal) => {
            info!(%session, %goal, "Example goal selected");
            (StatusCode::SEE_OTHER, [(LOCATION, "/")]).into_response()
        }
        None => (StatusCode::BAD_REQUEST, "Unknown example goal").into_response(),
    };

    with_cookie(response, cookie)
}

/// `POST /generate` - submit a goal and render the outcome
pub async fn generate(State(state): State<AppState>, headers: HeaderMap, Form(form): Form<GoalForm>) -> Response {
    let (session, cookie) = resolve_session(&headers);
    debug!(%session, "generate: called");

    let outcome = state
        .service
        .submit(SubmitRequest {
            session,
            goal_text: form.goal.clone(),
        })
        .await;

    let goal_text = match &outcome {
        SubmitOutcome::Generated(breakdown) => breakdown.goal().to_string(),
        _ => form.goal,
    };

    // A failed attempt leaves any earlier breakdown on screen
    let breakdown = state.service.sessions().breakdown(session);
    let context = PageContext::new(goal_text)
        .with_config_error(state.service.config_error())
        .with_banner(Banner::from_outcome(&outcome))
        .with_breakdown(breakdown.as_ref());

    with_cookie(render_page(&state, &context), cookie)
}

/// `GET /breakdown/preview` - the breakdown itself, for the preview frame
pub async fn preview(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (session, _) = resolve_session(&headers);
    debug!(%session, "preview: called");

    match state.service.sessions().breakdown(session) {
        Some(breakdown) => ([(CONTENT_TYPE, HTML_MIME)], breakdown.html().to_string()).into_response(),
        None => (StatusCode::NOT_FOUND, "No task breakdown yet").into_response(),
    }
}

/// `GET /breakdown/download` - the breakdown as an `.html` attachment
pub async fn download(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (session, _) = resolve_session(&headers);
    debug!(%session, "download: called");

    let Some(breakdown) = state.service.sessions().breakdown(session) else {
        return (StatusCode::NOT_FOUND, "No task breakdown yet").into_response();
    };

    let filename = download_filename(Local::now());
    info!(%session, %filename, "Serving breakdown download");
    (
        [
            (CONTENT_TYPE, HTML_MIME.to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        ],
        breakdown.html().to_string(),
    )
        .into_response()
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}
