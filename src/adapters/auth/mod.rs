//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` and `IdentityProvider` ports:
//!
//! - `jwt` - local HS256 access-token validation
//! - `supabase` - hosted auth REST API client
//! - `mock` - test implementations that don't require external services

mod jwt;
mod mock;
mod supabase;

pub use jwt::JwtSessionValidator;
pub use mock::{MockIdentityProvider, MockSessionValidator};
pub use supabase::SupabaseAuthClient;

#[cfg(test)]
pub(crate) use jwt::test_tokens;
