use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewUser, User, UserFile};
use super::errors::IdentityError;

/// Persistence port for the identity registry.
///
/// Lookups are exact-match on a single field. `insert` and `save` must reject
/// a duplicate email/phone with [`IdentityError::Conflict`]; that storage-side
/// check is what decides races between two writers that both passed the
/// registry's pre-check.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, IdentityError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, IdentityError>;
    /// Files of a user, or `None` when the user itself does not exist.
    async fn find_files(&self, user_id: Uuid) -> Result<Option<Vec<UserFile>>, IdentityError>;
    async fn list(&self) -> Result<Vec<User>, IdentityError>;

    /// Persist a new record; the store assigns id and timestamps.
    async fn insert(&self, new_user: NewUser) -> Result<User, IdentityError>;
    /// Overwrite the record with the same id.
    async fn save(&self, user: User) -> Result<User, IdentityError>;
    /// Returns the number of deleted records.
    async fn delete_by_email(&self, email: &str) -> Result<u64, IdentityError>;
}

/// Simple in-memory repository for tests, benches and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use tokio::sync::RwLock;

    use crate::identity::domain::AccountStatus;
    use crate::identity::errors::UniqueField;

    #[derive(Default)]
    struct Tables {
        users: Vec<User>,
        files: Vec<UserFile>,
    }

    impl Tables {
        fn taken(&self, field: UniqueField, value: &str, except: Option<Uuid>) -> bool {
            self.users.iter().any(|u| {
                Some(u.id) != except
                    && match field {
                        UniqueField::Email => u.email == value,
                        UniqueField::Phone => u.phone == value,
                    }
            })
        }

        fn check_unique(&self, email: &str, phone: &str, except: Option<Uuid>) -> Result<(), IdentityError> {
            if self.taken(UniqueField::Email, email, except) {
                return Err(IdentityError::Conflict(UniqueField::Email));
            }
            if self.taken(UniqueField::Phone, phone, except) {
                return Err(IdentityError::Conflict(UniqueField::Phone));
            }
            Ok(())
        }
    }

    /// Keeps users in insertion order and enforces the same unique
    /// constraints as the database schema.
    #[derive(Default)]
    pub struct MockUserRepository {
        tables: RwLock<Tables>,
    }

    impl MockUserRepository {
        /// Attach a file reference to an existing user, as the file store would.
        pub async fn attach_file(&self, user_id: Uuid, file_name: &str, key: &str, url: &str) -> Result<UserFile, IdentityError> {
            let mut tables = self.tables.write().await;
            if !tables.users.iter().any(|u| u.id == user_id) {
                return Err(IdentityError::Repository(format!("foreign key violation: user {user_id}")));
            }
            let file = UserFile {
                id: Uuid::new_v4(),
                user_id,
                file_name: file_name.to_string(),
                key: key.to_string(),
                url: url.to_string(),
                created_at: Utc::now(),
            };
            tables.files.push(file.clone());
            Ok(file)
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, IdentityError> {
            let tables = self.tables.read().await;
            Ok(tables.users.iter().find(|u| u.id == id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError> {
            let tables = self.tables.read().await;
            Ok(tables.users.iter().find(|u| u.email == email).cloned())
        }

        async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, IdentityError> {
            let tables = self.tables.read().await;
            Ok(tables.users.iter().find(|u| u.phone == phone).cloned())
        }

        async fn find_files(&self, user_id: Uuid) -> Result<Option<Vec<UserFile>>, IdentityError> {
            let tables = self.tables.read().await;
            if !tables.users.iter().any(|u| u.id == user_id) {
                return Ok(None);
            }
            Ok(Some(tables.files.iter().filter(|f| f.user_id == user_id).cloned().collect()))
        }

        async fn list(&self) -> Result<Vec<User>, IdentityError> {
            Ok(self.tables.read().await.users.clone())
        }

        async fn insert(&self, new_user: NewUser) -> Result<User, IdentityError> {
            let mut tables = self.tables.write().await;
            tables.check_unique(&new_user.email, &new_user.phone, None)?;
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4(),
                email: new_user.email,
                phone: new_user.phone,
                name: new_user.name,
                password: new_user.password,
                email_confirmed: false,
                phone_confirmed: false,
                status: AccountStatus::Unverified,
                created_at: now,
                updated_at: now,
            };
            tables.users.push(user.clone());
            Ok(user)
        }

        async fn save(&self, user: User) -> Result<User, IdentityError> {
            let mut tables = self.tables.write().await;
            tables.check_unique(&user.email, &user.phone, Some(user.id))?;
            let slot = tables
                .users
                .iter_mut()
                .find(|u| u.id == user.id)
                .ok_or_else(|| IdentityError::Repository(format!("record {} not updated", user.id)))?;
            *slot = user.clone();
            Ok(user)
        }

        async fn delete_by_email(&self, email: &str) -> Result<u64, IdentityError> {
            let mut tables = self.tables.write().await;
            let Tables { users, files } = &mut *tables;
            let before = users.len();
            let removed: Vec<Uuid> = users.iter().filter(|u| u.email == email).map(|u| u.id).collect();
            users.retain(|u| u.email != email);
            files.retain(|f| !removed.contains(&f.user_id));
            Ok((before - users.len()) as u64)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn candidate(email: &str, phone: &str) -> NewUser {
            NewUser { email: email.into(), phone: phone.into(), name: "N".into(), password: "p".into() }
        }

        #[tokio::test]
        async fn insert_enforces_unique_columns() {
            let repo = MockUserRepository::default();
            repo.insert(candidate("a@x.com", "+1")).await.unwrap();
            let dup_email = repo.insert(candidate("a@x.com", "+2")).await;
            assert!(matches!(dup_email, Err(IdentityError::Conflict(UniqueField::Email))));
            let dup_phone = repo.insert(candidate("b@x.com", "+1")).await;
            assert!(matches!(dup_phone, Err(IdentityError::Conflict(UniqueField::Phone))));
        }

        #[tokio::test]
        async fn save_enforces_unique_columns_except_own_row() {
            let repo = MockUserRepository::default();
            repo.insert(candidate("a@x.com", "+1")).await.unwrap();
            let mut b = repo.insert(candidate("b@x.com", "+2")).await.unwrap();

            // own values are fine
            repo.save(b.clone()).await.unwrap();

            b.email = "a@x.com".into();
            assert!(matches!(repo.save(b.clone()).await, Err(IdentityError::Conflict(UniqueField::Email))));
            b.email = "b@x.com".into();
            b.phone = "+1".into();
            assert!(matches!(repo.save(b).await, Err(IdentityError::Conflict(UniqueField::Phone))));
            assert_eq!(repo.find_by_email("b@x.com").await.unwrap().unwrap().phone, "+2");
        }

        #[tokio::test]
        async fn delete_cascades_to_files() {
            let repo = MockUserRepository::default();
            let u = repo.insert(candidate("a@x.com", "+1")).await.unwrap();
            repo.attach_file(u.id, "a.txt", "k", "/f/a.txt").await.unwrap();
            assert_eq!(repo.delete_by_email("a@x.com").await.unwrap(), 1);
            assert!(repo.find_files(u.id).await.unwrap().is_none());
            assert_eq!(repo.delete_by_email("a@x.com").await.unwrap(), 0);
        }

        #[tokio::test]
        async fn attach_file_requires_owner() {
            let repo = MockUserRepository::default();
            assert!(repo.attach_file(Uuid::new_v4(), "a", "k", "u").await.is_err());
        }
    }
}
