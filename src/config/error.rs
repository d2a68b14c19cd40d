use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// A setting that is absent or unusable. Keys are given without the
/// `RESEARCH_PORTAL__` prefix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{key} {reason}")]
    Invalid {
        key: &'static str,
        reason: &'static str,
    },
}

impl ValidationError {
    pub(crate) fn invalid(key: &'static str, reason: &'static str) -> Self {
        Self::Invalid { key, reason }
    }
}

/// Fails with `Missing(key)` when `value` is blank.
pub(crate) fn require(key: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Missing(key))
    } else {
        Ok(())
    }
}

/// Accepts `http(s)://` URLs; production deployments must use HTTPS.
pub(crate) fn require_url(
    key: &'static str,
    value: &str,
    https_only: bool,
) -> Result<(), ValidationError> {
    require(key, value)?;
    if https_only && !value.starts_with("https://") {
        return Err(ValidationError::invalid(key, "must use https in production"));
    }
    if !value.starts_with("https://") && !value.starts_with("http://") {
        return Err(ValidationError::invalid(key, "must be an http(s) URL"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_rules() {
        assert_eq!(require_url("SITE", "", false), Err(ValidationError::Missing("SITE")));
        assert!(require_url("SITE", "ftp://x", false).is_err());
        assert!(require_url("SITE", "http://localhost:3000", false).is_ok());
        assert!(require_url("SITE", "http://localhost:3000", true).is_err());
        assert!(require_url("SITE", "https://research.example", true).is_ok());
    }

    #[test]
    fn messages_name_the_key() {
        assert_eq!(
            ValidationError::invalid("SERVER__PORT", "must not be 0").to_string(),
            "SERVER__PORT must not be 0"
        );
    }
}
