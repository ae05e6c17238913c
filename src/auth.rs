//! Sign-in with the built-in demo accounts and the cookie session that
//! identifies the user on every request.

pub mod demo_auth;
#[cfg(feature = "ssr")]
pub mod middleware;
pub mod models;
