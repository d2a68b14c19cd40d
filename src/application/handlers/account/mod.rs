//! Account handlers.
//!
//! Sign-up, sign-in, sign-out and password recovery against the hosted
//! auth service. Each failure carries a message fit for a redirect.

mod error;
mod password_reset;
mod sign_in;
mod sign_up;

pub use error::AccountError;
pub use password_reset::{
    RequestPasswordResetCommand, RequestPasswordResetHandler, ResetPasswordCommand,
    ResetPasswordHandler,
};
pub use sign_in::{SignInCommand, SignInHandler, SignInResult, SignOutCommand, SignOutHandler};
pub use sign_up::{SignUpCommand, SignUpHandler, SignUpResult};
