//! Identity registry: user records and their email/phone uniqueness policy.
//!
//! Same three-layer split as `auth`: `domain` types, a `repository` port with
//! storage adapters under `repo`, and the `service` enforcing the rules.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use errors::{IdentityError, UniqueField};
pub use service::IdentityRegistry;
