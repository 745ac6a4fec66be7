use crate::cli::ServeArgs;
use crate::infra::{build_listing_state, AppState};
use crate::routes::with_listing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use brokerage_listings::config::AppConfig;
use brokerage_listings::error::AppError;
use brokerage_listings::listings::spawn_refresh_loop;
use brokerage_listings::telemetry;
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

    let listing_state = build_listing_state(&config)?;
    match config.sync.refresh_interval {
        Some(period) => {
            spawn_refresh_loop(listing_state.cache.clone(), period);
            info!(period_secs = period.as_secs(), "listing refresh timer started");
        }
        None => info!("listing refresh timer disabled; refreshing on stale reads only"),
    }

    let app = with_listing_routes(listing_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "brokerage listing service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
