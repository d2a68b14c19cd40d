//! Profile domain: the per-user record that billing, privacy and waitlist
//! actions all write to.

mod entitlements;
mod organization_type;
mod sign_up;
mod user_profile;

pub use entitlements::{Entitlements, PREMIUM};
pub use organization_type::OrganizationType;
pub use sign_up::{NewAccount, SignUpForm};
pub(crate) use sign_up::is_plausible_email;
pub use user_profile::{ProfileDetails, UserProfile};
