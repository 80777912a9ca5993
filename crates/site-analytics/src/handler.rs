use crate::types::{requests::*, responses::*};
use crate::window::TimeWindow;
use crate::{Analytics, AnalyticsError, AnalyticsEvent, RecordEvent};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use site_core::error_builder::{bad_request, internal_server_error};
use site_core::problemdetails::{Problem, ProblemDetails};
use std::sync::Arc;
use utoipa::OpenApi;

pub struct AppState {
    pub analytics_service: Arc<dyn Analytics>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        record_event,
        get_events_by_category,
        get_page_views,
        get_dashboard,
        get_realtime,
        get_user_journey,
        get_conversion_funnel,
        cleanup_events,
    ),
    components(schemas(
        AnalyticsEvent,
        RecordEventRequest,
        RecordEventResponse,
        PageCount,
        ReferrerCount,
        DailyStat,
        HourlyStat,
        DashboardSummary,
        RealtimeSummary,
        ConversionFunnel,
        CleanupRequest,
        CleanupResult,
        ProblemDetails,
        // Query schemas
        WindowQuery,
        EventsByCategoryQuery,
        PageViewsQuery,
    )),
    info(
        title = "Analytics API",
        description = "Event ingestion for the site plus the aggregate views built on it: \
        dashboard totals, real-time activity, session journeys, the contact funnel and retention cleanup.",
        version = "1.0.0"
    )
)]
pub struct AnalyticsApiDoc;

pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/analytics/events",
            post(record_event).get(get_events_by_category),
        )
        .route("/analytics/page-views", get(get_page_views))
        .route("/analytics/dashboard", get(get_dashboard))
        .route("/analytics/realtime", get(get_realtime))
        .route(
            "/analytics/sessions/{session_id}/journey",
            get(get_user_journey),
        )
        .route("/analytics/funnel", get(get_conversion_funnel))
        .route("/analytics/cleanup", post(cleanup_events))
}

pub(crate) fn handle_analytics_error(error: AnalyticsError) -> Problem {
    match error {
        AnalyticsError::Validation(message) => bad_request().detail(message).build(),
        AnalyticsError::DatabaseError(e) => {
            tracing::error!("Database error: {}", e);
            internal_server_error()
                .detail("Database error while processing analytics data")
                .build()
        }
        AnalyticsError::Other(e) => {
            tracing::error!("Other error: {}", e);
            internal_server_error()
                .detail("Failed to process analytics data")
                .build()
        }
    }
}

/// JSON extraction failures as a problem 400.
fn invalid_body(rejection: JsonRejection) -> Problem {
    bad_request()
        .detail(format!("Invalid request body: {}", rejection.body_text()))
        .build()
}

/// Record a single analytics event
#[utoipa::path(
    tag = "Analytics",
    post,
    path = "/analytics/events",
    request_body = RecordEventRequest,
    responses(
        (status = 201, description = "Event recorded", body = RecordEventResponse),
        (status = 400, description = "Missing or blank category, or unreadable body", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn record_event(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<RecordEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, Problem> {
    let Json(request) = payload.map_err(invalid_body)?;
    let mut event = RecordEvent::from(request);
    if event.user_agent.is_none() {
        event.user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
    }

    match app_state.analytics_service.record_event(event).await {
        Ok(id) => Ok((StatusCode::CREATED, Json(RecordEventResponse { id }))),
        Err(e) => Err(handle_analytics_error(e)),
    }
}

#[utoipa::path(
    tag = "Analytics",
    get,
    path = "/analytics/events",
    params(
        ("category" = String, Query, description = "Event category, e.g. page_view"),
        ("start" = Option<i64>, Query, description = "Window start, epoch milliseconds (inclusive)"),
        ("end" = Option<i64>, Query, description = "Window end, epoch milliseconds (inclusive)"),
        ("limit" = Option<u64>, Query, description = "Maximum number of events to return")
    ),
    responses(
        (status = 200, description = "Events of the category, newest first", body = Vec<AnalyticsEvent>),
        (status = 400, description = "Missing category", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn get_events_by_category(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<EventsByCategoryQuery>,
) -> Result<impl IntoResponse, Problem> {
    let category = query.category.unwrap_or_default();
    let window = TimeWindow::new(query.start, query.end);

    match app_state
        .analytics_service
        .events_by_category(&category, window, query.limit)
        .await
    {
        Ok(events) => Ok(Json(events)),
        Err(e) => Err(handle_analytics_error(e)),
    }
}

#[utoipa::path(
    tag = "Analytics",
    get,
    path = "/analytics/page-views",
    params(
        ("path" = Option<String>, Query, description = "Only views of this exact path"),
        ("start" = Option<i64>, Query, description = "Window start, epoch milliseconds (inclusive)"),
        ("end" = Option<i64>, Query, description = "Window end, epoch milliseconds (inclusive)")
    ),
    responses(
        (status = 200, description = "Page views, newest first", body = Vec<AnalyticsEvent>),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn get_page_views(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<PageViewsQuery>,
) -> Result<impl IntoResponse, Problem> {
    let window = TimeWindow::new(query.start, query.end);

    match app_state
        .analytics_service
        .page_views(query.path.as_deref(), window)
        .await
    {
        Ok(events) => Ok(Json(events)),
        Err(e) => Err(handle_analytics_error(e)),
    }
}

/// Dashboard totals, rankings and the 30-day series
#[utoipa::path(
    tag = "Analytics",
    get,
    path = "/analytics/dashboard",
    params(
        ("start" = Option<i64>, Query, description = "Window start, epoch milliseconds (inclusive)"),
        ("end" = Option<i64>, Query, description = "Window end, epoch milliseconds (inclusive)")
    ),
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn get_dashboard(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, Problem> {
    match app_state.analytics_service.dashboard(query.into()).await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => Err(handle_analytics_error(e)),
    }
}

/// Activity of the last 24 hours
#[utoipa::path(
    tag = "Analytics",
    get,
    path = "/analytics/realtime",
    responses(
        (status = 200, description = "Real-time summary", body = RealtimeSummary),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn get_realtime(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, Problem> {
    match app_state.analytics_service.realtime().await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => Err(handle_analytics_error(e)),
    }
}

#[utoipa::path(
    tag = "Analytics",
    get,
    path = "/analytics/sessions/{session_id}/journey",
    params(
        ("session_id" = String, Path, description = "Browsing session identifier")
    ),
    responses(
        (status = 200, description = "Events of the session, oldest first", body = Vec<AnalyticsEvent>),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn get_user_journey(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, Problem> {
    match app_state.analytics_service.user_journey(&session_id).await {
        Ok(events) => Ok(Json(events)),
        Err(e) => Err(handle_analytics_error(e)),
    }
}

#[utoipa::path(
    tag = "Analytics",
    get,
    path = "/analytics/funnel",
    params(
        ("start" = Option<i64>, Query, description = "Window start, epoch milliseconds (inclusive)"),
        ("end" = Option<i64>, Query, description = "Window end, epoch milliseconds (inclusive)")
    ),
    responses(
        (status = 200, description = "Contact funnel counts and rates", body = ConversionFunnel),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn get_conversion_funnel(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, Problem> {
    match app_state
        .analytics_service
        .conversion_funnel(query.into())
        .await
    {
        Ok(funnel) => Ok(Json(funnel)),
        Err(e) => Err(handle_analytics_error(e)),
    }
}

/// Delete events older than the given number of days
#[utoipa::path(
    tag = "Analytics",
    post,
    path = "/analytics/cleanup",
    request_body = CleanupRequest,
    responses(
        (status = 200, description = "Number of deleted events", body = CleanupResult),
        (status = 400, description = "Missing or negative older_than_days", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn cleanup_events(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CleanupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, Problem> {
    let Json(request) = payload.map_err(invalid_body)?;
    let Some(older_than_days) = request.older_than_days else {
        return Err(bad_request()
            .detail("older_than_days is required")
            .build());
    };

    match app_state.analytics_service.cleanup(older_than_days).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => Err(handle_analytics_error(e)),
    }
}
