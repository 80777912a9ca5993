use axum::Router;
use site_analytics::{configure_routes, Analytics, AnalyticsApiDoc, AppState};
use site_core::error_builder::not_found;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Analytics routes plus the Swagger UI, tracing and CORS layers.
pub fn build_application(analytics_service: Arc<dyn Analytics>) -> Router {
    let state = Arc::new(AppState { analytics_service });

    Router::new()
        .merge(configure_routes().with_state(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", AnalyticsApiDoc::openapi()))
        .fallback(|| async { not_found().detail("No such endpoint").build() })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
