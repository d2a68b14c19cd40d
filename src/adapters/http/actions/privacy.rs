//! Privacy and waitlist form actions.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::privacy::{
    ExportDataCommand, RequestDeletionCommand, UpdatePrivacyPreferencesCommand,
};
use crate::application::handlers::waitlist::JoinWaitlistCommand;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::privacy::{DeletionRequestForm, PrivacyPreferencesForm};
use crate::domain::waitlist::WaitlistForm;

use super::super::middleware::OptionalAuth;
use super::super::redirect::{parse_form, redirect_error, redirect_success};
use super::super::state::AppState;
use super::{sign_in_required, PRIVACY_PATH};

const WAITLIST_PATH: &str = "/waitlist";

/// Validation messages are shown as-is; anything else is logged and replaced.
fn domain_failure(path: &str, err: &DomainError) -> Response {
    let message = match err.code {
        ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
            err.message.clone()
        }
        ErrorCode::ProfileNotFound => "We could not find your account profile.".to_string(),
        _ => {
            tracing::error!(error = %err, "Privacy action failed");
            "Something went wrong. Please try again.".to_string()
        }
    };
    redirect_error(path, &message).into_response()
}

/// POST /account/privacy/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    body: Bytes,
) -> Response {
    let Some(user) = user else {
        return sign_in_required();
    };
    let form: PrivacyPreferencesForm = match parse_form(&body) {
        Ok(form) => form,
        Err(message) => return redirect_error(PRIVACY_PATH, &message).into_response(),
    };

    let cmd = UpdatePrivacyPreferencesCommand {
        user_id: user.id,
        form,
    };
    match state.update_preferences_handler().handle(cmd).await {
        Ok(_) => redirect_success(PRIVACY_PATH, "Your privacy preferences have been saved.")
            .into_response(),
        Err(err) => domain_failure(PRIVACY_PATH, &err),
    }
}

/// POST /account/privacy/export
///
/// Answers with the export as a JSON download.
pub async fn export_data(State(state): State<AppState>, OptionalAuth(user): OptionalAuth) -> Response {
    let Some(user) = user else {
        return sign_in_required();
    };

    let export = match state
        .export_data_handler()
        .handle(ExportDataCommand { user_id: user.id })
        .await
    {
        Ok(export) => export,
        Err(err) => return domain_failure(PRIVACY_PATH, &err),
    };

    match serde_json::to_vec_pretty(&export) {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", export.file_name()),
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, user_id = %user.id, "Export serialization failed");
            redirect_error(PRIVACY_PATH, "Something went wrong. Please try again.").into_response()
        }
    }
}

/// POST /account/privacy/deletion
pub async fn request_deletion(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    body: Bytes,
) -> Response {
    let Some(user) = user else {
        return sign_in_required();
    };
    let form: DeletionRequestForm = match parse_form(&body) {
        Ok(form) => form,
        Err(message) => return redirect_error(PRIVACY_PATH, &message).into_response(),
    };

    let cmd = RequestDeletionCommand {
        user_id: user.id,
        form,
    };
    match state.request_deletion_handler().handle(cmd).await {
        Ok(_) => redirect_success(
            PRIVACY_PATH,
            "Your deletion request has been received. We will process it shortly.",
        )
        .into_response(),
        Err(err) => domain_failure(PRIVACY_PATH, &err),
    }
}

/// POST /waitlist
pub async fn join_waitlist(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    body: Bytes,
) -> Response {
    let Some(user) = user else {
        return sign_in_required();
    };
    let form: WaitlistForm = match parse_form(&body) {
        Ok(form) => form,
        Err(message) => return redirect_error(WAITLIST_PATH, &message).into_response(),
    };

    match state
        .join_waitlist_handler()
        .handle(JoinWaitlistCommand { user, form })
        .await
    {
        Ok(_) => redirect_success(WAITLIST_PATH, "You're on the list. We'll be in touch.")
            .into_response(),
        Err(err) => domain_failure(WAITLIST_PATH, &err),
    }
}
