use axum::{Router, routing::get};

pub mod bottlenecks;
pub mod insight;
pub mod orders;
pub mod system;

/// Router for every endpoint except `/health`.
pub fn router() -> Router {
    Router::new()
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route("/bottlenecks", get(bottlenecks::list_bottlenecks))
        .route("/bottleneck", get(bottlenecks::list_bottlenecks))
        .route("/daily-insight", get(insight::daily_insight))
}
