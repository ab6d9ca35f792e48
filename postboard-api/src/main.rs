use axum::http::{HeaderValue, Method, header, header::InvalidHeaderValue};
use postboard_api::{
    config::{EnvError, get_env},
    serve,
    server::app,
};
use postboard_store::store::Store;
use std::{net::SocketAddr, sync::Arc};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum InitError {
    #[error(transparent)]
    Env(#[from] EnvError),
    #[error("Invalid CORS origin: {0}")]
    CorsOrigin(#[from] InvalidHeaderValue),
    #[error("Error binding tcp listener: {0}")]
    TcpBind(std::io::Error),
    #[error("Error serving server: {0}")]
    TcpServe(std::io::Error),
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "postboard_api=debug,\
                postboard_store=debug,\
                tower_http=debug,axum::rejection=trace"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn shutdown_on_ctrl_c() -> CancellationToken {
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();

    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "Could not listen for ctrl-c");
            return;
        }
        info!("Shutting down");
        token.cancel();
    });

    shutdown
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;

    let cors = CorsLayer::new()
        .allow_origin(env.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let store = Arc::new(Store::seeded());
    let app = app(store, &env.api_prefix).layer(cors);

    let server_address = SocketAddr::new(env.server_address, env.server_port);
    let listener = tokio::net::TcpListener::bind(server_address)
        .await
        .map_err(InitError::TcpBind)?;
    info!(%server_address, api_prefix = %env.api_prefix, "Listening");

    serve(listener, app, shutdown_on_ctrl_c())
        .await
        .map_err(InitError::TcpServe)?;

    Ok(())
}
