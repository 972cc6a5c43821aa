use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_backend::{
    app::build_router,
    config::{redact_database_url, Config},
    db::connection::create_pool,
    state::AppState,
};

fn mask_secret(secret: Option<&str>) -> String {
    match secret {
        None => "<unset>".into(),
        Some(s) => {
            let prefix = s.chars().take(4).collect::<String>();
            format!("{}*** (len={})", prefix, s.len())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        database_url = %redact_database_url(&config.database_url),
        jwt_secret = %mask_secret(config.jwt_secret.as_deref()),
        production_mode = config.production_mode,
        bind_addr = %config.bind_addr,
        cors_allow_origins = ?config.cors_allow_origins,
        "Loaded configuration from environment/.env"
    );
    if config.jwt_secret.is_none() {
        tracing::error!("JWT_SECRET is not set; logins and admin routes will fail until it is configured");
    }

    // Initialize database
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = AppState::new(pool, config.clone());
    let sweeper = state
        .rate_limiter
        .spawn_cleanup(config.rate_limit_sweep_interval);

    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
