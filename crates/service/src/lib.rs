//! Service layer: the identity registry and the auth workflows built on it.
//! - `identity` owns user records and uniqueness rules behind a repository port.
//! - `auth` encodes credentials and issues tokens; it never touches storage directly.

pub mod identity;
pub mod auth;
#[cfg(test)]
pub mod test_support;
