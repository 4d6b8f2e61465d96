use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use orderflow_sales::OrderRequest;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Submit one order and return its decision.
///
/// Malformed bodies are reported the same way as invalid fields.
pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<OrderRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text());
        }
    };

    match services.workflow.submit(req).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}

/// Full Order Log, oldest first.
pub async fn list_orders(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.workflow.order_log().await {
        Ok(orders) => (StatusCode::OK, Json(dto::OrderLogResponse::from(orders))).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}
