use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Extension, Router,
};
use jex_messaging::{Dispatcher, MessageBus};
use jex_model::SubmissionSettings;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use url::Url;

use crate::gateway::{
    environment::JexConfig,
    handlers::{home_handler, launch_handler, preview_handler, stop_handler, RequestDeadline},
};

pub const HOME_ROUTE: &str = "/";
pub const STOP_ROUTE: &str = "/stop/:invocation_id";
pub const PREVIEW_ROUTE: &str = "/arg-preview";

/// Assemble the dispatch routes around a [Dispatcher] for `bus`.
pub fn router<B: MessageBus>(
    bus: B,
    submission: SubmissionSettings,
    request_timeout: Duration,
    cors_origin: Option<&Url>,
) -> Result<Router> {
    let mut cors = CorsLayer::new();

    if let Some(cors_origin) = cors_origin {
        cors = cors
            .allow_origin(
                cors_origin
                    .origin()
                    .unicode_serialization()
                    .as_str()
                    .parse::<HeaderValue>()?,
            )
            .allow_headers(Any)
            .allow_methods(vec![Method::GET, Method::POST, Method::DELETE]);
    }

    Ok(Router::new()
        .route(HOME_ROUTE, get(home_handler).post(launch_handler::<B>))
        .route(STOP_ROUTE, delete(stop_handler::<B>))
        .route(PREVIEW_ROUTE, post(preview_handler))
        .layer(Extension(Arc::new(Dispatcher::new(bus))))
        .layer(Extension(Arc::new(submission)))
        .layer(Extension(RequestDeadline(request_timeout)))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Serve dispatch requests on `listener` until the process is interrupted.
pub async fn serve<B: MessageBus>(
    listener: TcpListener,
    bus: B,
    config: &JexConfig,
    cors_origin: Option<&Url>,
) -> Result<()> {
    info!("Starting JEX gateway server...");
    debug!("Publishing to exchange {}", bus.exchange());
    debug!("Job log path: {:?}", config.log_path);
    debug!("Staging settings: {:?}", config.staging);

    let app = router(
        bus,
        config.submission.clone(),
        config.request_timeout,
        cors_origin,
    )?;

    info!("Server binding to {:?}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                error!("Could not listen for shutdown signal: {}", error);
                std::future::pending::<()>().await;
            }
            info!("Shutting down...");
        })
        .await?;

    Ok(())
}
