use std::fmt;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Field guarded by a global uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UniqueField {
    Email,
    Phone,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Email => f.write_str("email"),
            UniqueField::Phone => f.write_str("phone"),
        }
    }
}

/// Outcomes the registry reports besides success
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0} already in use")]
    Conflict(UniqueField),
    #[error("repository error: {0}")]
    Repository(String),
}

impl IdentityError {
    pub fn user_email_not_found(email: &str) -> Self {
        Self::NotFound(format!("user with email {email} not found"))
    }

    pub fn user_id_not_found(id: Uuid) -> Self {
        Self::NotFound(format!("user with id {id} not found"))
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            IdentityError::NotFound(_) => 2001,
            IdentityError::Conflict(UniqueField::Email) => 2002,
            IdentityError::Conflict(UniqueField::Phone) => 2003,
            IdentityError::Repository(_) => 2200,
        }
    }
}
