use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{AccountStatus, NewUser, User, UserFile, UserPatch};
use super::errors::{IdentityError, UniqueField};
use super::repository::UserRepository;

/// Owns user records and their uniqueness invariants, independent of web
/// framework and storage engine.
///
/// Every operation is a few lookups followed by at most one write through the
/// repository port.
pub struct IdentityRegistry<R: UserRepository + ?Sized = dyn UserRepository> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> Clone for IdentityRegistry<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: UserRepository + ?Sized> IdentityRegistry<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Register a new identity. Email is checked before phone.
    ///
    /// # Examples
    /// ```
    /// use service::identity::{IdentityRegistry, domain::NewUser, repository::mock::MockUserRepository};
    /// use std::sync::Arc;
    /// let registry = IdentityRegistry::new(Arc::new(MockUserRepository::default()));
    /// let user = tokio_test::block_on(registry.register(NewUser {
    ///     email: "a@x.com".into(), phone: "+1".into(), name: "Ada".into(), password: "hash".into(),
    /// })).unwrap();
    /// assert_eq!(user.email, "a@x.com");
    /// assert!(!user.email_confirmed);
    /// ```
    #[instrument(skip(self, candidate), fields(email = %candidate.email))]
    pub async fn register(&self, candidate: NewUser) -> Result<User, IdentityError> {
        if let Some(existing) = self.repo.find_by_email(&candidate.email).await? {
            debug!(user_id = %existing.id, "email already registered");
            return Err(IdentityError::Conflict(UniqueField::Email));
        }
        if let Some(existing) = self.repo.find_by_phone(&candidate.phone).await? {
            debug!(user_id = %existing.id, "phone already registered");
            return Err(IdentityError::Conflict(UniqueField::Phone));
        }
        let user = self.repo.insert(candidate).await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(user)
    }

    pub async fn get(&self, email: &str) -> Result<User, IdentityError> {
        self.repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| IdentityError::user_email_not_found(email))
    }

    pub async fn list_all(&self) -> Result<Vec<User>, IdentityError> {
        self.repo.list().await
    }

    /// Apply a patch to the user registered under `email`.
    ///
    /// A new email or phone that already belongs to this same user is not a
    /// conflict. Any password in the patch is discarded.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, email: &str, patch: UserPatch) -> Result<User, IdentityError> {
        let patch = patch.without_credentials();
        let mut user = self.get(email).await?;

        if let Some(new_email) = patch.email.as_deref() {
            if let Some(other) = self.repo.find_by_email(new_email).await? {
                if other.id != user.id {
                    return Err(IdentityError::Conflict(UniqueField::Email));
                }
            }
        }
        if let Some(new_phone) = patch.phone.as_deref() {
            if let Some(other) = self.repo.find_by_phone(new_phone).await? {
                if other.id != user.id {
                    return Err(IdentityError::Conflict(UniqueField::Phone));
                }
            }
        }

        patch.apply_to(&mut user);
        user.updated_at = Utc::now();
        let saved = self.repo.save(user).await?;
        info!(user_id = %saved.id, "user_updated");
        Ok(saved)
    }

    /// Replace the stored credential. The value is stored as given; encoding
    /// it is the caller's job.
    #[instrument(skip(self, new_password))]
    pub async fn change_password(&self, email: &str, new_password: String) -> Result<User, IdentityError> {
        let mut user = self.get(email).await?;
        user.password = new_password;
        user.updated_at = Utc::now();
        let saved = self.repo.save(user).await?;
        info!(user_id = %saved.id, "password_changed");
        Ok(saved)
    }

    /// Mark the email confirmed and the account verified. Idempotent.
    #[instrument(skip(self))]
    pub async fn confirm_email(&self, email: &str) -> Result<User, IdentityError> {
        let mut user = self.get(email).await?;
        user.email_confirmed = true;
        user.status = AccountStatus::Verified;
        user.updated_at = Utc::now();
        self.repo.save(user).await
    }

    /// Mark the phone confirmed and the account verified. Idempotent.
    #[instrument(skip(self))]
    pub async fn confirm_phone(&self, email: &str) -> Result<User, IdentityError> {
        let mut user = self.get(email).await?;
        user.phone_confirmed = true;
        user.status = AccountStatus::Verified;
        user.updated_at = Utc::now();
        self.repo.save(user).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, email: &str) -> Result<(), IdentityError> {
        let affected = self.repo.delete_by_email(email).await?;
        if affected == 0 {
            return Err(IdentityError::user_email_not_found(email));
        }
        info!(email = %email, "user_deleted");
        Ok(())
    }

    pub async fn list_private_files(&self, user_id: Uuid) -> Result<Vec<UserFile>, IdentityError> {
        self.repo
            .find_files(user_id)
            .await?
            .ok_or_else(|| IdentityError::user_id_not_found(user_id))
    }
}
