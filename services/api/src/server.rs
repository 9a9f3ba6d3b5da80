use crate::cli::ServeArgs;
use crate::infra::{in_memory_desk, AppState};
use crate::routes::with_desk_routes;
use crate::scheduler::spawn_expiry_scheduler;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use showroom::config::AppConfig;
use showroom::error::AppError;
use showroom::telemetry;
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

    let desk = in_memory_desk();

    let scheduler = config
        .sweep
        .interval()
        .map(|every| spawn_expiry_scheduler(desk.clone(), every));

    let app = with_desk_routes(desk)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "sales desk service ready");

    axum::serve(listener, app).await?;

    if let Some(scheduler) = scheduler {
        scheduler.stop().await;
    }

    Ok(())
}
