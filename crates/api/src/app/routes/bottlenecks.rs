use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn list_bottlenecks(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.workflow.inspect_bottlenecks().await {
        Ok(found) => (StatusCode::OK, Json(dto::BottlenecksResponse::from(found))).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}
