use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::errors;
use crate::app::services::AppServices;

pub async fn daily_insight(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.workflow.daily_insight().await {
        Ok(insight) => (StatusCode::OK, Json(insight)).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}
