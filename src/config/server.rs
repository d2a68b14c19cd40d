use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use super::error::{require_url, ValidationError};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Listener, logging and public-URL settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// Comma-separated origins allowed to call the API cross-site.
    pub cors_origins: Option<String>,
    /// Public deployment URL. Checkout return links and auth emails point here.
    pub site_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::Development,
            log_level: "info,research_portal=debug,sqlx=warn".to_string(),
            request_timeout_secs: 30,
            cors_origins: None,
            site_url: String::new(),
        }
    }
}

impl ServerConfig {
    /// Unparseable hosts bind every interface.
    pub fn socket_addr(&self) -> SocketAddr {
        let ip = self
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        SocketAddr::new(ip, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn cors_origins_list(&self) -> Vec<String> {
        self.cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn site_url(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::invalid("SERVER__PORT", "must not be 0"));
        }
        if !(1..=300).contains(&self.request_timeout_secs) {
            return Err(ValidationError::invalid(
                "SERVER__REQUEST_TIMEOUT_SECS",
                "must be between 1 and 300",
            ));
        }
        require_url("SERVER__SITE_URL", &self.site_url, self.is_production())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> ServerConfig {
        ServerConfig {
            site_url: "http://localhost:3000/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn bind_address() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");

        let config = ServerConfig {
            host: "localhost".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn cors_list_skips_blanks() {
        let config = ServerConfig {
            cors_origins: Some(" https://app.research.example, ,http://localhost:5173,".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.cors_origins_list(),
            vec!["https://app.research.example", "http://localhost:5173"]
        );
        assert!(ServerConfig::default().cors_origins_list().is_empty());
    }

    #[test]
    fn site_url_is_required_and_trimmed() {
        assert_eq!(
            ServerConfig::default().validate(),
            Err(ValidationError::Missing("SERVER__SITE_URL"))
        );
        assert!(local().validate().is_ok());
        assert_eq!(local().site_url(), "http://localhost:3000");
    }

    #[test]
    fn production_needs_https_site() {
        let config = ServerConfig {
            environment: Environment::Production,
            ..local()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn timeout_bounds() {
        let config = ServerConfig {
            request_timeout_secs: 0,
            ..local()
        };
        assert!(config.validate().is_err());
    }
}
