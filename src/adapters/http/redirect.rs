//! Redirect-with-message responses for form actions.
//!
//! Every form action answers with `303 See Other` to `{path}?error=...` or
//! `{path}?success=...`; the page renders the message.

use axum::body::Bytes;
use axum::response::Redirect;
use serde::de::DeserializeOwned;

/// Which query parameter carries the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Error,
    Success,
}

impl Flash {
    fn key(&self) -> &'static str {
        match self {
            Flash::Error => "error",
            Flash::Success => "success",
        }
    }
}

/// Builds `{path}?{error|success}={message}` with the message URL-encoded.
pub fn flash_location(path: &str, flash: Flash, message: &str) -> String {
    match serde_urlencoded::to_string([(flash.key(), message)]) {
        Ok(query) => {
            let separator = if path.contains('?') { '&' } else { '?' };
            format!("{}{}{}", path, separator, query)
        }
        Err(_) => path.to_string(),
    }
}

pub fn redirect_with(path: &str, flash: Flash, message: &str) -> Redirect {
    Redirect::to(&flash_location(path, flash, message))
}

pub fn redirect_error(path: &str, message: &str) -> Redirect {
    redirect_with(path, Flash::Error, message)
}

pub fn redirect_success(path: &str, message: &str) -> Redirect {
    redirect_with(path, Flash::Success, message)
}

pub const UNEXPECTED_FIELDS: &str = "The form contained unexpected fields.";
pub const MALFORMED_FORM: &str = "The form could not be read. Please try again.";

/// Decodes a urlencoded form body.
///
/// Unknown fields are refused so a tampered form never reaches a handler.
pub fn parse_form<T: DeserializeOwned>(body: &Bytes) -> Result<T, String> {
    serde_urlencoded::from_bytes(body).map_err(|e| {
        tracing::debug!(error = %e, "Form body rejected");
        if e.to_string().starts_with("unknown field") {
            UNEXPECTED_FIELDS.to_string()
        } else {
            MALFORMED_FORM.to_string()
        }
    })
}
