use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryFilter, QueryOrder};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user_file;

pub const STATUS_UNVERIFIED: &str = "UNVERIFIED";
pub const STATUS_VERIFIED: &str = "VERIFIED";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub phone: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email_confirmed: bool,
    pub phone_confirmed: bool,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Files,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Files => Entity::has_many(user_file::Entity).into() }
    }
}

impl Related<user_file::Entity> for Entity {
    fn to() -> RelationDef { Relation::Files.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && trimmed.len() <= 255 => Ok(()),
        _ => Err(ModelError::Validation("invalid email".into())),
    }
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() { return Err(ModelError::Validation("name required".into())); }
    if name.len() > 128 { return Err(ModelError::Validation("name too long (<=128)".into())); }
    Ok(())
}

/// Accepts an optional leading `+` followed by digits, spaces or dashes.
pub fn validate_phone(phone: &str) -> Result<(), ModelError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let well_formed = digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
        && phone.len() <= 32;
    if !well_formed { return Err(ModelError::Validation("invalid phone number".into())); }
    Ok(())
}

/// Insert a new unverified user. `password` is stored as given.
pub async fn create(db: &DatabaseConnection, email: &str, phone: &str, name: &str, password: &str) -> Result<Model, ModelError> {
    validate_email(email)?;
    validate_phone(phone)?;
    validate_name(name)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        phone: Set(phone.to_string()),
        name: Set(name.to_string()),
        password: Set(password.to_string()),
        email_confirmed: Set(false),
        phone_confirmed: Set(false),
        status: Set(STATUS_UNVERIFIED.into()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email)).one(db).await?)
}

pub async fn find_by_phone(db: &DatabaseConnection, phone: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Phone.eq(phone)).one(db).await?)
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::CreatedAt).all(db).await?)
}

/// Delete by email, returning the number of removed rows.
pub async fn delete_by_email(db: &DatabaseConnection, email: &str) -> Result<u64, ModelError> {
    let res = Entity::delete_many().filter(Column::Email.eq(email)).exec(db).await?;
    Ok(res.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_needs_local_and_domain_parts() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("plain").is_err());
    }

    #[test]
    fn phone_accepts_short_international_form() {
        assert!(validate_phone("+1").is_ok());
        assert!(validate_phone("+49 170-1234567").is_ok());
        assert!(validate_phone("+").is_err());
        assert!(validate_phone("12a4").is_err());
    }

    #[test]
    fn name_must_not_be_blank() {
        assert!(validate_name("Ada").is_ok());
        assert!(validate_name("   ").is_err());
    }
}
