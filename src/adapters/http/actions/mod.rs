//! Same-origin form actions.
//!
//! Each action reads a urlencoded form, runs one command and answers with a
//! redirect carrying an `error` or `success` message (the data export answers
//! with a download instead).

pub mod account;
pub mod privacy;

use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

use super::redirect::redirect_error;
use super::state::AppState;

pub const SIGN_IN_PATH: &str = "/sign-in";
pub const ACCOUNT_PATH: &str = "/account";
pub const PRIVACY_PATH: &str = "/account/privacy";

pub(crate) fn sign_in_required() -> Response {
    redirect_error(SIGN_IN_PATH, "Please sign in to continue.").into_response()
}

/// Create the form-action router.
///
/// # Routes
/// - `POST /auth/sign-up`, `/auth/sign-in`, `/auth/sign-out`
/// - `POST /auth/forgot-password`, `/auth/reset-password`
/// - `POST /account/privacy/preferences`, `/account/privacy/export`,
///   `/account/privacy/deletion`
/// - `POST /waitlist`
pub fn action_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-up", post(account::sign_up))
        .route("/auth/sign-in", post(account::sign_in))
        .route("/auth/sign-out", post(account::sign_out))
        .route("/auth/forgot-password", post(account::forgot_password))
        .route("/auth/reset-password", post(account::reset_password))
        .route("/account/privacy/preferences", post(privacy::update_preferences))
        .route("/account/privacy/export", post(privacy::export_data))
        .route("/account/privacy/deletion", post(privacy::request_deletion))
        .route("/waitlist", post(privacy::join_waitlist))
}
