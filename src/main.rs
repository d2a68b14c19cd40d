use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use research_portal::adapters::auth::{JwtSessionValidator, SupabaseAuthClient};
use research_portal::adapters::http::{build_router, AppState, HttpSettings, Ports, RouterConfig};
use research_portal::adapters::postgres::{
    connect_lazy, PostgresCatalogReader, PostgresPrivacyRequestRepository,
    PostgresProfileRepository, PostgresReportReader, PostgresWaitlistRepository,
};
use research_portal::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use research_portal::config::AppConfig;
use research_portal::domain::billing::StripeWebhookVerifier;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    info!(
        "Starting research portal v{} ({:?})",
        env!("CARGO_PKG_VERSION"),
        config.server.environment
    );

    let pool = connect_lazy(&config.database)?;

    let ports = Ports {
        profiles: Arc::new(PostgresProfileRepository::new(pool.clone())),
        privacy_requests: Arc::new(PostgresPrivacyRequestRepository::new(pool.clone())),
        waitlist: Arc::new(PostgresWaitlistRepository::new(pool.clone())),
        reports: Arc::new(PostgresReportReader::new(pool.clone())),
        catalog: Arc::new(PostgresCatalogReader::new(pool)),
        payments: Arc::new(StripePaymentAdapter::new(StripeConfig::from_payment_config(
            &config.payment,
        ))),
        identity: Arc::new(SupabaseAuthClient::from_config(&config.auth)?),
        sessions: Arc::new(JwtSessionValidator::new(
            &config.auth.jwt_secret,
            &config.auth.jwt_audience,
        )),
    };

    let verifier = StripeWebhookVerifier::new(config.payment.stripe_webhook_secret.clone())
        .with_tolerance(config.payment.webhook_tolerance_secs);

    let state = AppState::new(
        ports,
        verifier,
        HttpSettings {
            site_url: config.server.site_url().to_string(),
            secure_cookies: config.secure_cookies(),
            require_livemode: config.payment.require_livemode,
        },
    );

    let app = build_router(
        state,
        RouterConfig {
            cors_origins: config.server.cors_origins_list(),
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        },
    );

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured level; production logs are JSON.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    info!("Shutdown signal received");
}
