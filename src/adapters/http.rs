//! HTTP boundary for the fee engine.
//!
//! Structural problems with the body (missing fields, wrong JSON types,
//! unreadable or non-JSON payloads) are answered with 422. Semantic problems
//! found by the validator are answered with 400 and a joined `detail` string.

use crate::core::engine::FeeEngine;
use crate::core::{ConfigProvider, DeliveryFeeResponse, OrderRequest};
use crate::utils::error::{OrderValidationError, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub const DELIVERY_FEE_PATH: &str = "/delivery_fee";

#[derive(Debug, Clone)]
pub struct AppState {
    engine: Arc<FeeEngine>,
}

/// Router exposing `POST /delivery_fee`. Other methods on the path get 405.
pub fn create_router(engine: Arc<FeeEngine>) -> Router {
    Router::new()
        .route(DELIVERY_FEE_PATH, post(delivery_fee))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(AppState { engine })
}

async fn delivery_fee(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OrderRequest>, JsonRejection>,
) -> std::result::Result<Json<DeliveryFeeResponse>, ApiError> {
    let Json(request) = payload?;
    let response = state.engine.run(&request)?;
    Ok(Json(response))
}

#[derive(Debug)]
pub enum ApiError {
    InvalidOrder(OrderValidationError),
    UnprocessableBody(JsonRejection),
}

impl From<OrderValidationError> for ApiError {
    fn from(error: OrderValidationError) -> Self {
        Self::InvalidOrder(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::UnprocessableBody(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidOrder(error) => {
                let body = json!({ "detail": error.to_string() });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::UnprocessableBody(rejection) => {
                tracing::debug!("Request body rejected: {}", rejection.body_text());
                let body = json!({
                    "detail": [{
                        "loc": ["body"],
                        "msg": rejection.body_text(),
                        "type": rejection_type(&rejection),
                    }]
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

fn rejection_type(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::JsonDataError(_) => "json_data",
        JsonRejection::JsonSyntaxError(_) => "json_invalid",
        JsonRejection::MissingJsonContentType(_) => "missing_content_type",
        JsonRejection::BytesRejection(_) => "body_unreadable",
        _ => "invalid_body",
    }
}

/// Binds the configured address and serves until Ctrl-C or SIGTERM.
pub async fn run_server<C: ConfigProvider>(config: &C) -> Result<()> {
    let engine = Arc::new(FeeEngine::new(Arc::new(config.fee_config().clone())));
    let app = create_router(engine);

    let listener = tokio::net::TcpListener::bind((config.host(), config.port())).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
