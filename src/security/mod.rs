//! Authentication: who is calling.
//!
//! [`AuthenticationInterceptor`] turns a bearer token into a
//! [`UserAuthentication`] request extension; guards and handlers read it
//! from there. Authorization (what the caller may do) lives in
//! [`crate::guard`].

mod authentication;
mod filter;
mod password;
mod token;

pub use authentication::{Authority, UserAuthentication};
pub use filter::AuthenticationInterceptor;
pub use password::PasswordEncoder;
pub use token::TokenStore;
