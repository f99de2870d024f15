use std::sync::Arc;

use axum::{middleware, routing::get, routing::post, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        assistant::assistant_handler, invoices::invoices_handler, jobs::jobs_handler,
        payments::{payments_handler, stripe_webhook}, photos::photos_handler,
    },
    middleware::auth,
    AppState,
};

// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Payment routes: intent creation requires auth, the processor
    // webhook must stay public (authenticity comes from its signature)
    let payment_routes = Router::new()
        .merge(payments_handler().layer(middleware::from_fn(auth)))
        .route("/webhook", post(stripe_webhook));

    let api_route = Router::new()
        .nest(
            "/jobs",
            jobs_handler()
                .merge(photos_handler())
                .layer(middleware::from_fn(auth)),
        )
        .nest("/invoices", invoices_handler().layer(middleware::from_fn(auth)))
        .nest("/payments", payment_routes)
        .nest("/ai", assistant_handler().layer(middleware::from_fn(auth)))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
