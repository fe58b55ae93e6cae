//! HTTP Transport
//!
//! JSON-RPC over HTTP POST. Each request body carries one message and the
//! reply comes back in the response body. Sessions are tracked through the
//! `x-session-id` header: the first request without one opens a session and
//! the id is echoed on every response.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response as HttpResponse},
    routing::{get, post},
};

use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::config::HttpOptions;
use crate::errors::{Error, error_codes};
use crate::messages::{Message, error_response};
use crate::server::Dispatcher;

use super::session_manager::SessionManager;

pub const SESSION_HEADER: &str = "x-session-id";
pub const MCP_PATH: &str = "/mcp";
pub const HEALTH_PATH: &str = "/health";

const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(60);

/// Shared state handed to every route
#[derive(Clone)]
pub struct HttpState {
    dispatcher: Arc<Dispatcher>,
    sessions: SessionManager,
}

impl HttpState {
    pub fn new(dispatcher: Arc<Dispatcher>, sessions: SessionManager) -> Self {
        Self { dispatcher, sessions }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }
}

/// Build the router for the MCP endpoint and health check
pub fn router(state: HttpState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any)
        .expose_headers([HeaderName::from_static(SESSION_HEADER)]);

    Router::new()
        .route(MCP_PATH, post(handle_post).delete(handle_delete))
        .route(HEALTH_PATH, get(handle_health))
        .layer(cors)
        .with_state(state)
}

/// Bind the configured address and serve until the listener fails
pub async fn serve(dispatcher: Arc<Dispatcher>, options: &HttpOptions) -> Result<(), Error> {
    let sessions = SessionManager::new(options.session_timeout);
    let maintenance = sessions.spawn_maintenance(MAINTENANCE_INTERVAL);
    let app = router(HttpState::new(dispatcher, sessions));

    let address = options.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| Error::Transport(format!("Failed to bind to {}: {}", address, e)))?;
    info!("HTTP transport listening on http://{}{}", address, MCP_PATH);

    let result = axum::serve(listener, app.into_make_service())
        .await
        .map_err(|e| Error::Transport(format!("HTTP server error: {}", e)));

    maintenance.abort();
    result
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn with_session(mut response: HttpResponse, session_id: &str) -> HttpResponse {
    if let Ok(value) = HeaderValue::from_str(session_id) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

fn unknown_session(session_id: &str) -> HttpResponse {
    warn!("Request for unknown session {}", session_id);
    let body = error_response(
        None,
        error_codes::INVALID_REQUEST,
        &format!("Unknown session: {}", session_id),
        None,
    );
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

async fn handle_post(State(state): State<HttpState>, headers: HeaderMap, body: String) -> HttpResponse {
    let session_id = match session_id(&headers) {
        Some(id) if state.sessions.touch(&id).await => id,
        Some(id) => return unknown_session(&id),
        None => state.sessions.open().await,
    };

    let message = match serde_json::from_str::<Message>(&body) {
        Ok(message) => message,
        Err(e) => {
            debug!("Rejecting unparseable body: {}", e);
            let body = error_response(None, error_codes::PARSE_ERROR, &format!("Parse error: {}", e), None);
            return with_session((StatusCode::BAD_REQUEST, Json(body)).into_response(), &session_id);
        }
    };

    let response = match state.dispatcher.handle_message(message).await {
        Some(reply) => (StatusCode::OK, Json(reply)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    };
    with_session(response, &session_id)
}

async fn handle_delete(State(state): State<HttpState>, headers: HeaderMap) -> HttpResponse {
    match session_id(&headers) {
        Some(id) if state.sessions.close(&id).await => StatusCode::NO_CONTENT.into_response(),
        Some(id) => unknown_session(&id),
        None => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn handle_health(State(state): State<HttpState>) -> HttpResponse {
    Json(json!({
        "status": "ok",
        "sessions": state.sessions.count().await,
    }))
    .into_response()
}
