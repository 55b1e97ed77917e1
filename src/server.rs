use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_advisory_routes;
use agri_advisor::advisory::AdvisoryService;
use agri_advisor::config::AppConfig;
use agri_advisor::error::AppError;
use agri_advisor::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    let engine = config.advisory.engine()?;
    let service = Arc::new(AdvisoryService::new(
        engine,
        config.advisory.simulated_latency,
    ));
    if let Some(path) = &config.advisory.rules_path {
        info!(rules = %path.display(), "loaded advisory rules override");
    }

    let app = with_advisory_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        latency_ms = config.advisory.simulated_latency.as_millis() as u64,
        "agri advisor ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
