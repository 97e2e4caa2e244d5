use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account verification state. Only moves forward, via confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Unverified,
    Verified,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Unverified => "UNVERIFIED",
            AccountStatus::Verified => "VERIFIED",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNVERIFIED" => Ok(AccountStatus::Unverified),
            "VERIFIED" => Ok(AccountStatus::Verified),
            other => Err(format!("unknown account status: {other}")),
        }
    }
}

/// Stored user record. `password` is an opaque, already-encoded credential
/// and must not cross the transport edge; use [`PublicUser`] there.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub phone: String,
    pub name: String,
    pub password: String,
    pub email_confirmed: bool,
    pub phone_confirmed: bool,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration candidate handed to the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub phone: String,
    pub name: String,
    pub password: String,
}

/// Partial update. `password` is accepted on the wire but always dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UserPatch {
    pub fn without_credentials(mut self) -> Self {
        self.password = None;
        self
    }

    /// Copy every non-credential field that is present onto `user`.
    pub fn apply_to(self, user: &mut User) {
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(name) = self.name {
            user.name = name;
        }
    }
}

/// File reference owned by a user. Lifecycle lives with the file store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub key: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Transport view of a user (no credential)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub phone: String,
    pub name: String,
    pub email_confirmed: bool,
    pub phone_confirmed: bool,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            phone: u.phone.clone(),
            name: u.name.clone(),
            email_confirmed: u.email_confirmed,
            phone_confirmed: u.phone_confirmed,
            status: u.status,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self { PublicUser::from(&u) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_its_wire_name() {
        assert_eq!("VERIFIED".parse::<AccountStatus>().unwrap(), AccountStatus::Verified);
        assert_eq!(AccountStatus::Unverified.to_string(), "UNVERIFIED");
        assert_eq!(serde_json::to_value(AccountStatus::Verified).unwrap(), serde_json::json!("VERIFIED"));
        assert!("verified".parse::<AccountStatus>().is_err());
    }

    #[test]
    fn public_user_has_no_credential() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            phone: "+1".into(),
            name: "A".into(),
            password: "secret-hash".into(),
            email_confirmed: false,
            phone_confirmed: false,
            status: AccountStatus::Unverified,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(PublicUser::from(&user)).unwrap();
        assert!(json.get("password").is_none());
        assert!(!json.to_string().contains("secret-hash"));
        assert_eq!(json["status"], "UNVERIFIED");
    }

    #[test]
    fn patch_drops_password() {
        let patch = UserPatch { password: Some("x".into()), name: Some("y".into()), ..Default::default() };
        let stripped = patch.without_credentials();
        assert!(stripped.password.is_none());
        assert_eq!(stripped.name.as_deref(), Some("y"));
    }
}
