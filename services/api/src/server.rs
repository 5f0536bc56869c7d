use crate::cli::ServeArgs;
use crate::demo::{seeded_advisor, seeded_provider, DEMO_ORG};
use crate::infra::AppState;
use crate::routes::with_analytics_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use portfolio_analytics::analytics::AnalyticsService;
use portfolio_analytics::config::AppConfig;
use portfolio_analytics::error::AppError;
use portfolio_analytics::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let today = Local::now().date_naive();
    let service = Arc::new(AnalyticsService::new(
        Arc::new(seeded_provider(today)),
        Arc::new(seeded_advisor()),
        config.analytics.clone(),
    ));

    let app = with_analytics_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, org = DEMO_ORG, "portfolio analytics service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
