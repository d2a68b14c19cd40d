//! Credential forms for sign-in and password recovery.

mod credentials;

pub use credentials::{
    ForgotPasswordForm, PasswordReset, PasswordResetRequest, ResetPasswordForm, SignIn, SignInForm,
};
pub(crate) use credentials::is_local_path;
