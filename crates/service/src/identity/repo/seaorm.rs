use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set, SqlErr};
use uuid::Uuid;

use models::errors::ModelError;
use models::{user, user_file};

use crate::identity::domain::{NewUser, User, UserFile};
use crate::identity::errors::{IdentityError, UniqueField};
use crate::identity::repository::UserRepository;

/// PostgreSQL-backed repository. Unique-index violations come back as
/// [`IdentityError::Conflict`], naming the column from the index name.
pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn map_db_err(e: DbErr) -> IdentityError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            let field = if detail.contains("phone") { UniqueField::Phone } else { UniqueField::Email };
            IdentityError::Conflict(field)
        }
        _ => IdentityError::Repository(e.to_string()),
    }
}

fn map_model_err(e: ModelError) -> IdentityError {
    match e {
        ModelError::Db(db) => map_db_err(db),
        ModelError::Validation(msg) => IdentityError::Repository(format!("rejected by model: {msg}")),
    }
}

fn to_domain(m: user::Model) -> Result<User, IdentityError> {
    Ok(User {
        id: m.id,
        status: m.status.parse().map_err(IdentityError::Repository)?,
        email: m.email,
        phone: m.phone,
        name: m.name,
        password: m.password,
        email_confirmed: m.email_confirmed,
        phone_confirmed: m.phone_confirmed,
        created_at: m.created_at.into(),
        updated_at: m.updated_at.into(),
    })
}

fn file_to_domain(f: user_file::Model) -> UserFile {
    UserFile {
        id: f.id,
        user_id: f.user_id,
        file_name: f.file_name,
        key: f.key,
        url: f.url,
        created_at: f.created_at.into(),
    }
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, IdentityError> {
        let found = user::Entity::find_by_id(id).one(&self.db).await.map_err(map_db_err)?;
        found.map(to_domain).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError> {
        let found = user::find_by_email(&self.db, email).await.map_err(map_model_err)?;
        found.map(to_domain).transpose()
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, IdentityError> {
        let found = user::find_by_phone(&self.db, phone).await.map_err(map_model_err)?;
        found.map(to_domain).transpose()
    }

    async fn find_files(&self, user_id: Uuid) -> Result<Option<Vec<UserFile>>, IdentityError> {
        let owner = user::Entity::find_by_id(user_id).one(&self.db).await.map_err(map_db_err)?;
        if owner.is_none() {
            return Ok(None);
        }
        let files = user_file::list_by_user(&self.db, user_id).await.map_err(map_model_err)?;
        Ok(Some(files.into_iter().map(file_to_domain).collect()))
    }

    async fn list(&self) -> Result<Vec<User>, IdentityError> {
        let all = user::list_all(&self.db).await.map_err(map_model_err)?;
        all.into_iter().map(to_domain).collect()
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, IdentityError> {
        let created = user::create(&self.db, &new_user.email, &new_user.phone, &new_user.name, &new_user.password)
            .await
            .map_err(map_model_err)?;
        to_domain(created)
    }

    async fn save(&self, u: User) -> Result<User, IdentityError> {
        let am = user::ActiveModel {
            id: Set(u.id),
            email: Set(u.email),
            phone: Set(u.phone),
            name: Set(u.name),
            password: Set(u.password),
            email_confirmed: Set(u.email_confirmed),
            phone_confirmed: Set(u.phone_confirmed),
            status: Set(u.status.as_str().to_string()),
            created_at: Set(u.created_at.into()),
            updated_at: Set(u.updated_at.into()),
        };
        let saved = am.update(&self.db).await.map_err(map_db_err)?;
        to_domain(saved)
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, IdentityError> {
        user::delete_by_email(&self.db, email).await.map_err(map_model_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{IdentityRegistry, domain::{AccountStatus, UserPatch}};
    use crate::test_support::get_db;
    use std::sync::Arc;

    fn unique_phone() -> String {
        format!("+{}", Uuid::new_v4().as_u128() % 10_000_000_000_000)
    }

    #[tokio::test]
    async fn registry_over_postgres() -> Result<(), anyhow::Error> {
        if !models::db::db_tests_enabled() { return Ok(()); }
        let db = get_db().await?;
        let registry = IdentityRegistry::new(Arc::new(SeaOrmUserRepository::new(db.clone())));

        let email = format!("repo_{}@example.com", Uuid::new_v4());
        let phone = unique_phone();
        let u = registry
            .register(NewUser { email: email.clone(), phone: phone.clone(), name: "Repo".into(), password: "hash".into() })
            .await?;
        assert_eq!(registry.get(&email).await?.id, u.id);

        let dup = registry
            .register(NewUser { email: format!("other_{}@example.com", Uuid::new_v4()), phone: phone.clone(), name: "X".into(), password: "h".into() })
            .await;
        assert!(matches!(dup, Err(IdentityError::Conflict(UniqueField::Phone))));

        let patched = registry.update(&email, UserPatch { name: Some("Renamed".into()), password: Some("nope".into()), ..Default::default() }).await?;
        assert_eq!(patched.name, "Renamed");
        assert_eq!(patched.password, "hash");

        let confirmed = registry.confirm_email(&email).await?;
        assert_eq!(confirmed.status, AccountStatus::Verified);

        user_file::create(&db, u.id, "doc.pdf", "private/doc.pdf", "/files/doc.pdf").await?;
        assert_eq!(registry.list_private_files(u.id).await?.len(), 1);

        registry.delete(&email).await?;
        assert!(matches!(registry.get(&email).await, Err(IdentityError::NotFound(_))));
        assert!(matches!(registry.list_private_files(u.id).await, Err(IdentityError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn unique_index_surfaces_as_conflict() -> Result<(), anyhow::Error> {
        if !models::db::db_tests_enabled() { return Ok(()); }
        let db = get_db().await?;
        let repo = SeaOrmUserRepository::new(db);
        let email = format!("race_{}@example.com", Uuid::new_v4());
        repo.insert(NewUser { email: email.clone(), phone: unique_phone(), name: "A".into(), password: "h".into() }).await?;
        // bypass the registry pre-check entirely
        let res = repo.insert(NewUser { email, phone: unique_phone(), name: "B".into(), password: "h".into() }).await;
        assert!(matches!(res, Err(IdentityError::Conflict(UniqueField::Email))));
        Ok(())
    }
}
