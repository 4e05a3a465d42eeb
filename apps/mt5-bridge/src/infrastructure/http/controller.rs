//! HTTP Controller
//!
//! Axum routes for the bridge API.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use tracing::Instrument;
use uuid::Uuid;

use super::auth::require_api_key;
use super::request::{CloseAllRequest, TradeCommand, TradeRequest};
use super::response::{
    CloseAllResponse, ErrorResponse, HealthResponse, StatusResponse, TradeResponse,
};
use crate::application::errors::TradeError;
use crate::application::ports::TerminalPort;
use crate::application::services::TerminalGate;
use crate::application::settings::TradeSettings;
use crate::application::use_cases::{
    AccountStatusUseCase, CloseAllUseCase, ClosePartialUseCase, ModifyPositionUseCase,
    OpenPositionUseCase,
};
use crate::domain::shared::Symbol;
use crate::infrastructure::config::ApiKey;
use crate::observability::{record_request_latency, record_trade_request};

/// Application state shared across handlers.
pub struct AppState<T: TerminalPort> {
    /// BUY / SELL.
    pub open_position: Arc<OpenPositionUseCase<T>>,
    /// CLOSE_PARTIAL.
    pub close_partial: Arc<ClosePartialUseCase<T>>,
    /// MODIFY.
    pub modify_position: Arc<ModifyPositionUseCase<T>>,
    /// `/close_all`.
    pub close_all: Arc<CloseAllUseCase<T>>,
    /// `/status`.
    pub account_status: Arc<AccountStatusUseCase<T>>,
    /// Terminal session gate.
    pub gate: Arc<TerminalGate<T>>,
    /// Symbol used when a request names none.
    pub default_symbol: Symbol,
    /// Service version reported by `/health`.
    pub version: String,
}

impl<T: TerminalPort> AppState<T> {
    /// Build every use case around one terminal gate.
    pub fn new(
        gate: Arc<TerminalGate<T>>,
        settings: &TradeSettings,
        default_symbol: Symbol,
    ) -> Self {
        Self {
            open_position: Arc::new(OpenPositionUseCase::new(
                Arc::clone(&gate),
                settings.clone(),
            )),
            close_partial: Arc::new(ClosePartialUseCase::new(
                Arc::clone(&gate),
                settings.clone(),
            )),
            modify_position: Arc::new(ModifyPositionUseCase::new(
                Arc::clone(&gate),
                settings.clone(),
            )),
            close_all: Arc::new(CloseAllUseCase::new(Arc::clone(&gate), settings.clone())),
            account_status: Arc::new(AccountStatusUseCase::new(Arc::clone(&gate))),
            gate,
            default_symbol,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl<T: TerminalPort> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            open_position: Arc::clone(&self.open_position),
            close_partial: Arc::clone(&self.close_partial),
            modify_position: Arc::clone(&self.modify_position),
            close_all: Arc::clone(&self.close_all),
            account_status: Arc::clone(&self.account_status),
            gate: Arc::clone(&self.gate),
            default_symbol: self.default_symbol.clone(),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router.
///
/// With `api_key` set, every route except `/health` requires `X-API-Key`.
pub fn create_router<T>(state: AppState<T>, api_key: Option<ApiKey>) -> Router
where
    T: TerminalPort + 'static,
{
    Router::new()
        .route("/health", get(health_check::<T>))
        .route("/trade", post(trade::<T>))
        .route("/status", get(status::<T>))
        .route("/close_all", post(close_all::<T>))
        .layer(middleware::from_fn_with_state(api_key, require_api_key))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<T: TerminalPort + 'static>(
    State(state): State<AppState<T>>,
) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        connected: state.gate.is_connected().await,
    })
}

/// Trade endpoint: BUY, SELL, CLOSE_PARTIAL and MODIFY.
///
/// The body is parsed as JSON whatever its content type.
async fn trade<T: TerminalPort + 'static>(
    State(state): State<AppState<T>>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4();

    let response = handle_trade(&state, &body)
        .instrument(tracing::info_span!("trade", %request_id))
        .await;

    record_request_latency("/trade", started.elapsed().as_secs_f64());
    response
}

async fn handle_trade<T: TerminalPort + 'static>(
    state: &AppState<T>,
    body: &[u8],
) -> Response {
    let request = match serde_json::from_slice::<TradeRequest>(body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed trade request");
            record_trade_request("invalid", "rejected");
            return error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse::message(format!("Invalid request body: {e}")),
            );
        }
    };

    let action = request.requested_action().map_or("invalid", |a| a.as_str());
    tracing::info!(
        action = %request.action,
        symbol = ?request.symbol,
        lot = ?request.lot,
        sl = ?request.sl,
        tp = ?request.tp,
        ticket = ?request.ticket,
        "Trade request received"
    );

    let outcome = match request.into_command(&state.default_symbol) {
        Ok(command) => execute_trade(state, command).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(response) => {
            record_trade_request(action, "success");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            record_trade_request(action, e.kind());
            trade_error_response(e)
        }
    }
}

async fn execute_trade<T: TerminalPort + 'static>(
    state: &AppState<T>,
    command: TradeCommand,
) -> Result<TradeResponse, TradeError> {
    match command {
        TradeCommand::Open(command) => state
            .open_position
            .execute(command)
            .await
            .map(TradeResponse::from),
        TradeCommand::ClosePartial(command) => state
            .close_partial
            .execute(command)
            .await
            .map(|result| TradeResponse::PartialClosed { result }),
        TradeCommand::Modify(command) => state
            .modify_position
            .execute(command)
            .await
            .map(|result| TradeResponse::Modified { result }),
    }
}

/// Account status endpoint.
async fn status<T: TerminalPort + 'static>(State(state): State<AppState<T>>) -> Response {
    let started = Instant::now();
    let account = state.account_status.execute().await;

    let code = if account.is_connected() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    record_request_latency("/status", started.elapsed().as_secs_f64());
    (code, Json(StatusResponse::from(account))).into_response()
}

/// Close every open position.
///
/// The body is optional; when present it must be a JSON object.
async fn close_all<T: TerminalPort + 'static>(
    State(state): State<AppState<T>>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4();

    let request = if body.iter().all(u8::is_ascii_whitespace) {
        CloseAllRequest::default()
    } else {
        match serde_json::from_slice::<CloseAllRequest>(&body) {
            Ok(request) => request,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::message(format!("Invalid request body: {e}")),
                );
            }
        }
    };

    let outcome = state
        .close_all
        .execute(request.account.as_deref())
        .instrument(tracing::info_span!("close_all", %request_id))
        .await;

    record_request_latency("/close_all", started.elapsed().as_secs_f64());
    match outcome {
        Ok(report) => (StatusCode::OK, Json(CloseAllResponse::from(report))).into_response(),
        Err(e) => trade_error_response(e),
    }
}

fn trade_error_response(err: TradeError) -> Response {
    let code = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let body = match err {
        TradeError::Execution {
            result: Some(result),
            ..
        } => ErrorResponse::details(result),
        other => {
            tracing::warn!(error = %other, status = code.as_u16(), "Request failed");
            ErrorResponse::message(other.to_string())
        }
    };
    error_response(code, body)
}

fn error_response(code: StatusCode, body: ErrorResponse) -> Response {
    (code, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockTerminalPort, TerminalLastError};
    use crate::application::use_cases::test_support::{
        connected_terminal, gate, gold_info, gold_tick, position, quoting_terminal, settings,
        trade_result,
    };
    use crate::domain::trading::{TradeRetcode, TradeSide};
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use tower::ServiceExt;

    fn router(terminal: MockTerminalPort, api_key: Option<&str>) -> Router {
        let state = AppState::new(gate(terminal), &settings(), Symbol::new("XAUUSD"));
        create_router(state, api_key.map(|k| ApiKey::new(k.to_string())))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_needs_no_key() {
        let app = router(MockTerminalPort::new(), Some("secret"));
        let (status, body) = send(app, get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["connected"], false);
    }

    #[tokio::test]
    async fn missing_key_is_unauthorized() {
        let app = router(MockTerminalPort::new(), Some("secret"));
        let (status, body) = send(app, get("/status")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn wrong_key_is_unauthorized() {
        let app = router(MockTerminalPort::new(), Some("secret"));
        let mut request = post_json("/trade", r#"{"action":"BUY","lot":0.1}"#);
        request
            .headers_mut()
            .insert(auth_header(), "guess".parse().unwrap());

        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    fn auth_header() -> axum::http::HeaderName {
        axum::http::HeaderName::from_static("x-api-key")
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let app = router(MockTerminalPort::new(), None);
        let (status, body) = send(app, post_json("/trade", "{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn trade_body_without_content_type_is_parsed() {
        let mut terminal = quoting_terminal();
        terminal
            .expect_order_send()
            .times(1)
            .returning(|_| Ok(Some(trade_result(TradeRetcode::DONE))));
        let request = Request::builder()
            .method("POST")
            .uri("/trade")
            .body(Body::from(r#"{"action":"BUY","lot":0.1}"#))
            .unwrap();

        let (status, body) = send(router(terminal, None), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn unknown_action_is_bad_request() {
        let app = router(MockTerminalPort::new(), None);
        let (status, body) = send(app, post_json("/trade", r#"{"action":"HOLD","lot":1}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Invalid action. Use BUY, SELL, CLOSE_PARTIAL, or MODIFY"
        );
    }

    #[tokio::test]
    async fn zero_lot_never_reaches_terminal() {
        let app = router(MockTerminalPort::new(), None);
        let (status, body) = send(app, post_json("/trade", r#"{"action":"buy","lot":"0"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Invalid value for 'lot': Volume must be positive, got 0"
        );
    }

    #[tokio::test]
    async fn modify_without_levels_never_reaches_terminal() {
        let app = router(MockTerminalPort::new(), None);
        let (status, body) = send(app, post_json("/trade", r#"{"action":"MODIFY","sl":0}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "MODIFY requires sl or tp");
    }

    #[tokio::test]
    async fn buy_returns_terminal_result() {
        let mut terminal = quoting_terminal();
        terminal
            .expect_order_send()
            .times(1)
            .returning(|_| Ok(Some(trade_result(TradeRetcode::DONE))));
        let app = router(terminal, Some("secret"));

        let mut request = post_json("/trade", r#"{"action":"BUY","lot":0.1,"sl":1990}"#);
        request
            .headers_mut()
            .insert(auth_header(), "secret".parse().unwrap());
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["fill_mode"], "FOK");
        assert_eq!(body["details"]["retcode"], 10009);
    }

    #[tokio::test]
    async fn rejection_returns_details_with_500() {
        let mut terminal = quoting_terminal();
        terminal
            .expect_order_send()
            .times(1)
            .returning(|_| Ok(Some(trade_result(TradeRetcode::NO_MONEY))));
        let app = router(terminal, None);

        let (status, body) = send(app, post_json("/trade", r#"{"action":"SELL","lot":1}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["details"]["retcode"], 10019);
    }

    #[tokio::test]
    async fn unknown_symbol_is_bad_request() {
        let mut terminal = connected_terminal();
        terminal.expect_symbol_info().returning(|_| Ok(None));
        let app = router(terminal, None);

        let (status, body) = send(
            app,
            post_json("/trade", r#"{"action":"BUY","symbol":"NOPE","lot":0.1}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Symbol NOPE not found");
    }

    #[tokio::test]
    async fn close_partial_reports_partial_closed() {
        let mut terminal = connected_terminal();
        terminal
            .expect_symbol_info()
            .returning(|_| Ok(Some(gold_info())));
        terminal
            .expect_symbol_info_tick()
            .returning(|_| Ok(Some(gold_tick())));
        terminal
            .expect_positions_get()
            .returning(|_| Ok(vec![position(42, TradeSide::Buy, dec!(0.5))]));
        terminal
            .expect_order_send()
            .withf(|r| r.position.is_some_and(|t| t.value() == 42))
            .times(1)
            .returning(|_| Ok(Some(trade_result(TradeRetcode::DONE))));
        let app = router(terminal, None);

        let (status, body) = send(
            app,
            post_json("/trade", r#"{"action":"CLOSE_PARTIAL","lot":"0.2"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "partial_closed");
        assert_eq!(body["result"]["deal"], 501);
    }

    #[tokio::test]
    async fn status_reports_disconnected_with_503() {
        let mut terminal = MockTerminalPort::new();
        terminal.expect_shutdown().returning(|| Ok(()));
        terminal.expect_initialize().returning(|| Ok(false));
        terminal.expect_last_error().returning(|| {
            Ok(TerminalLastError {
                code: -10003,
                message: "IPC initialize failed".to_string(),
            })
        });
        let app = router(terminal, None);

        let (status, body) = send(app, get("/status")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "disconnected");
        assert_eq!(body["error"], "(-10003, 'IPC initialize failed')");
    }

    #[tokio::test]
    async fn close_all_without_positions() {
        let mut terminal = connected_terminal();
        terminal.expect_positions_get().returning(|_| Ok(vec![]));
        let app = router(terminal, None);

        let request = Request::builder()
            .method("POST")
            .uri("/close_all")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "no_trades");
        assert_eq!(body["message"], "No open trades found.");
    }

    #[tokio::test]
    async fn close_all_rejects_invalid_body() {
        let app = router(MockTerminalPort::new(), None);
        let (status, _) = send(app, post_json("/close_all", "[1,2")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
