//! Auth module: credential encoding, login and token issuance.
//!
//! Sits in front of the identity registry; the registry never sees a
//! plaintext password.

pub mod domain;
pub mod errors;
pub mod service;

pub use service::{AuthConfig, AuthService};
