//! Account form actions: sign-up, sign-in, sign-out and password recovery.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::application::handlers::account::{
    AccountError, RequestPasswordResetCommand, ResetPasswordCommand, SignInCommand,
    SignOutCommand, SignUpCommand,
};
use crate::domain::account::{ForgotPasswordForm, ResetPasswordForm, SignInForm};
use crate::domain::profile::SignUpForm;

use super::super::middleware::{clear_session_cookies, set_session_cookies, SessionToken};
use super::super::redirect::{parse_form, redirect_error, redirect_success};
use super::super::state::AppState;
use super::{ACCOUNT_PATH, SIGN_IN_PATH};

const SIGN_UP_PATH: &str = "/sign-up";
const FORGOT_PASSWORD_PATH: &str = "/forgot-password";
const RESET_PASSWORD_PATH: &str = "/reset-password";

fn account_failure(path: &str, err: &AccountError) -> Response {
    if err.is_upstream_failure() {
        tracing::error!(error = %err, "Account action failed");
    }
    redirect_error(path, &err.user_message()).into_response()
}

/// POST /auth/sign-up
pub async fn sign_up(State(state): State<AppState>, jar: CookieJar, body: Bytes) -> Response {
    let form: SignUpForm = match parse_form(&body) {
        Ok(form) => form,
        Err(message) => return redirect_error(SIGN_UP_PATH, &message).into_response(),
    };

    let cmd = SignUpCommand {
        form,
        email_redirect_to: Some(state.site_link(SIGN_IN_PATH)),
    };

    match state.sign_up_handler().handle(cmd).await {
        Ok(result) => match result.session {
            Some(session) => {
                let jar = set_session_cookies(jar, &session, state.secure_cookies);
                (jar, redirect_success(ACCOUNT_PATH, "Welcome! Your account is ready.")).into_response()
            }
            None => redirect_success(
                SIGN_IN_PATH,
                "Check your email to confirm your account, then sign in.",
            )
            .into_response(),
        },
        Err(err) => account_failure(SIGN_UP_PATH, &err),
    }
}

/// POST /auth/sign-in
pub async fn sign_in(State(state): State<AppState>, jar: CookieJar, body: Bytes) -> Response {
    let form: SignInForm = match parse_form(&body) {
        Ok(form) => form,
        Err(message) => return redirect_error(SIGN_IN_PATH, &message).into_response(),
    };

    match state.sign_in_handler().handle(SignInCommand { form }).await {
        Ok(result) => {
            let jar = set_session_cookies(jar, &result.session, state.secure_cookies);
            let target = result.redirect_to.unwrap_or_else(|| ACCOUNT_PATH.to_string());
            (jar, axum::response::Redirect::to(&target)).into_response()
        }
        Err(err) => account_failure(SIGN_IN_PATH, &err),
    }
}

/// POST /auth/sign-out
///
/// Cookies are cleared even when the auth service cannot be reached.
pub async fn sign_out(
    State(state): State<AppState>,
    SessionToken(access_token): SessionToken,
    jar: CookieJar,
) -> Response {
    state
        .sign_out_handler()
        .handle(SignOutCommand { access_token })
        .await;

    let jar = clear_session_cookies(jar);
    (jar, redirect_success(SIGN_IN_PATH, "You have been signed out.")).into_response()
}

/// POST /auth/forgot-password
pub async fn forgot_password(State(state): State<AppState>, body: Bytes) -> Response {
    let form: ForgotPasswordForm = match parse_form(&body) {
        Ok(form) => form,
        Err(message) => return redirect_error(FORGOT_PASSWORD_PATH, &message).into_response(),
    };

    let cmd = RequestPasswordResetCommand {
        form,
        redirect_to: state.site_link(RESET_PASSWORD_PATH),
    };

    match state.request_password_reset_handler().handle(cmd).await {
        Ok(()) => redirect_success(
            FORGOT_PASSWORD_PATH,
            "If an account exists for that email, a reset link is on its way.",
        )
        .into_response(),
        Err(err) => account_failure(FORGOT_PASSWORD_PATH, &err),
    }
}

/// POST /auth/reset-password
///
/// Runs inside the recovery session opened by the emailed link.
pub async fn reset_password(
    State(state): State<AppState>,
    SessionToken(access_token): SessionToken,
    body: Bytes,
) -> Response {
    let Some(access_token) = access_token else {
        return redirect_error(
            FORGOT_PASSWORD_PATH,
            "Your reset link has expired. Please request a new one.",
        )
        .into_response();
    };

    let form: ResetPasswordForm = match parse_form(&body) {
        Ok(form) => form,
        Err(message) => return redirect_error(RESET_PASSWORD_PATH, &message).into_response(),
    };

    let cmd = ResetPasswordCommand { access_token, form };

    match state.reset_password_handler().handle(cmd).await {
        Ok(()) => redirect_success(ACCOUNT_PATH, "Your password has been updated.").into_response(),
        Err(err) => account_failure(RESET_PASSWORD_PATH, &err),
    }
}
