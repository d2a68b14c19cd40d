use serde::Deserialize;

use super::error::{require, ValidationError};

const MAX_POOL_SIZE: u32 = 100;

/// PostgreSQL pool settings. Only `url` has no default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            min_connections: 1,
            max_connections: 10,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        }
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("DATABASE__URL", &self.url)?;
        if !(self.url.starts_with("postgres://") || self.url.starts_with("postgresql://")) {
            return Err(ValidationError::invalid(
                "DATABASE__URL",
                "must be a postgres:// connection string",
            ));
        }
        if self.max_connections == 0 || self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::invalid(
                "DATABASE__MAX_CONNECTIONS",
                "must be between 1 and 100",
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ValidationError::invalid(
                "DATABASE__MIN_CONNECTIONS",
                "must not exceed max_connections",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn pooler_url_is_accepted() {
        assert!(with_url("postgresql://postgres:pw@db.internal:6543/postgres")
            .validate()
            .is_ok());
    }

    #[test]
    fn rest_endpoint_is_not_a_database_url() {
        assert!(with_url("https://project.supabase.co").validate().is_err());
        assert_eq!(
            DatabaseConfig::default().validate(),
            Err(ValidationError::Missing("DATABASE__URL"))
        );
    }

    #[test]
    fn pool_bounds() {
        let inverted = DatabaseConfig {
            min_connections: 20,
            max_connections: 5,
            ..with_url("postgres://localhost/test")
        };
        assert!(inverted.validate().is_err());

        let oversized = DatabaseConfig {
            max_connections: 500,
            ..with_url("postgres://localhost/test")
        };
        assert!(oversized.validate().is_err());
    }
}
