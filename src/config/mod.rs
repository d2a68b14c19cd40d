//! Process configuration, read from the environment.
//!
//! Every key lives under `RESEARCH_PORTAL__`, with `__` between nesting
//! levels: `RESEARCH_PORTAL__PAYMENT__STRIPE_API_KEY` fills
//! `payment.stripe_api_key`. A `.env` file in the working directory is read
//! first when present.
//!
//! ```no_run
//! use research_portal::config::AppConfig;
//!
//! # fn main() -> Result<(), research_portal::config::ConfigError> {
//! let config = AppConfig::load()?;
//! config.validate()?;
//! println!("binding {}", config.server.socket_addr());
//! # Ok(())
//! # }
//! ```

mod auth;
mod database;
mod error;
mod payment;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

const ENV_PREFIX: &str = "RESEARCH_PORTAL";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub payment: PaymentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is normal outside local development.
        let _ = dotenvy::dotenv();

        let source = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__");

        Ok(config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?)
    }

    /// Checks each section in turn and reports the first bad setting.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.payment.validate()
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Whether session cookies are marked `Secure`.
    pub fn secure_cookies(&self) -> bool {
        self.auth.cookies_secure(&self.server.environment)
    }
}
