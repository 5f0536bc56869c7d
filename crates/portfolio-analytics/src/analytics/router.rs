use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::OrgId;
use super::provider::{ProviderError, RentAdvisor, SnapshotProvider};
use super::service::{AnalyticsError, AnalyticsService};

/// Router builder exposing the read-only analytics endpoints.
pub fn analytics_router<P, A>(service: Arc<AnalyticsService<P, A>>) -> Router
where
    P: SnapshotProvider + 'static,
    A: RentAdvisor + 'static,
{
    Router::new()
        .route(
            "/api/v1/portfolios/:org_id/payment-risk",
            get(payment_risk_handler::<P, A>),
        )
        .route(
            "/api/v1/portfolios/:org_id/health",
            get(portfolio_health_handler::<P, A>),
        )
        .route(
            "/api/v1/portfolios/:org_id/renewals",
            get(renewals_handler::<P, A>),
        )
        .route(
            "/api/v1/portfolios/:org_id/overview",
            get(overview_handler::<P, A>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnalyticsQuery {
    /// Evaluation date override (YYYY-MM-DD); defaults to the local date.
    pub(crate) today: Option<NaiveDate>,
    /// Renewal horizon override in days; defaults to the configured value.
    pub(crate) horizon_days: Option<u16>,
}

impl AnalyticsQuery {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

pub(crate) async fn payment_risk_handler<P, A>(
    State(service): State<Arc<AnalyticsService<P, A>>>,
    Path(org_id): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Response
where
    P: SnapshotProvider + 'static,
    A: RentAdvisor + 'static,
{
    match service
        .payment_risk(&OrgId(org_id), query.today())
        .await
    {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn portfolio_health_handler<P, A>(
    State(service): State<Arc<AnalyticsService<P, A>>>,
    Path(org_id): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Response
where
    P: SnapshotProvider + 'static,
    A: RentAdvisor + 'static,
{
    match service
        .portfolio_health(&OrgId(org_id), query.today())
        .await
    {
        Ok(health) => (StatusCode::OK, Json(health)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn renewals_handler<P, A>(
    State(service): State<Arc<AnalyticsService<P, A>>>,
    Path(org_id): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Response
where
    P: SnapshotProvider + 'static,
    A: RentAdvisor + 'static,
{
    match service
        .renewal_opportunities(&OrgId(org_id), query.horizon_days, query.today())
        .await
    {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn overview_handler<P, A>(
    State(service): State<Arc<AnalyticsService<P, A>>>,
    Path(org_id): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Response
where
    P: SnapshotProvider + 'static,
    A: RentAdvisor + 'static,
{
    match service
        .overview(&OrgId(org_id), query.horizon_days, query.today())
        .await
    {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AnalyticsError) -> Response {
    let status = match &error {
        AnalyticsError::Provider(ProviderError::UnknownOrganization(_)) => StatusCode::NOT_FOUND,
        AnalyticsError::Provider(ProviderError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        AnalyticsError::Advisor(_) | AnalyticsError::AdvisorTask(_) => StatusCode::BAD_GATEWAY,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
