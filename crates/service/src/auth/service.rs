use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};

use super::domain::{AuthSession, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use crate::identity::domain::{NewUser, User, UserPatch};
use crate::identity::repository::UserRepository;
use crate::identity::{IdentityError, IdentityRegistry};

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: i64,
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: None, token_ttl_hours: 12, min_password_len: 8 }
    }
}

impl From<&configs::AuthSettings> for AuthConfig {
    fn from(s: &configs::AuthSettings) -> Self {
        let secret = s.jwt_secret.trim();
        Self {
            jwt_secret: (!secret.is_empty()).then(|| secret.to_string()),
            token_ttl_hours: s.token_ttl_hours,
            min_password_len: s.min_password_len,
        }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: UserRepository + ?Sized = dyn UserRepository> {
    registry: IdentityRegistry<R>,
    cfg: AuthConfig,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    pub fn new(registry: IdentityRegistry<R>, cfg: AuthConfig) -> Self { Self { registry, cfg } }

    pub fn registry(&self) -> &IdentityRegistry<R> { &self.registry }

    fn check_password_policy(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.cfg.min_password_len {
            return Err(AuthError::Validation(format!("password too short (>={})", self.cfg.min_password_len)));
        }
        Ok(())
    }

    fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string())
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, domain::RegisterInput};
    /// use service::identity::{IdentityRegistry, repository::mock::MockUserRepository};
    /// use std::sync::Arc;
    /// let registry = IdentityRegistry::new(Arc::new(MockUserRepository::default()));
    /// let svc = AuthService::new(registry, AuthConfig::default());
    /// let input = RegisterInput { email: "user@example.com".into(), phone: "+15550100".into(), name: "Test".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// assert_ne!(user.password, "Secret123");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        models::user::validate_email(&input.email)?;
        models::user::validate_phone(&input.phone)?;
        models::user::validate_name(&input.name)?;
        self.check_password_policy(&input.password)?;

        let password = Self::hash_password(&input.password)?;
        let user = self
            .registry
            .register(NewUser { email: input.email, phone: input.phone, name: input.name, password })
            .await?;
        Ok(user)
    }

    /// Verify email + password against the stored credential.
    ///
    /// Unknown email and wrong password both yield `Unauthorized`.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = match self.registry.get(email).await {
            Ok(u) => u,
            Err(IdentityError::NotFound(_)) => return Err(AuthError::Unauthorized),
            Err(e) => return Err(e.into()),
        };
        let parsed = PasswordHash::new(&user.password).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(password.as_bytes(), &parsed).is_err() {
            debug!(user_id = %user.id, "password mismatch");
            return Err(AuthError::Unauthorized);
        }
        Ok(user)
    }

    /// Authenticate a user and optionally issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, domain::{RegisterInput, LoginInput}};
    /// use service::identity::{IdentityRegistry, repository::mock::MockUserRepository};
    /// use std::sync::Arc;
    /// let registry = IdentityRegistry::new(Arc::new(MockUserRepository::default()));
    /// let svc = AuthService::new(registry, AuthConfig { jwt_secret: Some("secret".into()), ..AuthConfig::default() });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), phone: "+1".into(), name: "N".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(session.token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.verify_credentials(&input.email, &input.password).await?;

        let token = match &self.cfg.jwt_secret {
            Some(secret) => Some(self.issue_token(&user, secret)?),
            None => None,
        };
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user: user.into(), token })
    }

    fn issue_token(&self, user: &User, secret: &str) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let exp = (now + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize;
        let claims = Claims { sub: user.email.clone(), uid: user.id.to_string(), iat: now.timestamp() as usize, exp };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Decode and validate (signature, expiry) a token issued by [`login`](Self::login).
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let secret = self
            .cfg
            .jwt_secret
            .as_deref()
            .ok_or_else(|| AuthError::TokenError("no signing secret configured".into()))?;
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::Unauthorized)
    }

    /// Apply a profile patch after checking each field it carries with the
    /// same rules as registration.
    #[instrument(skip(self, patch))]
    pub async fn update_profile(&self, email: &str, patch: UserPatch) -> Result<User, AuthError> {
        if let Some(new_email) = patch.email.as_deref() {
            models::user::validate_email(new_email)?;
        }
        if let Some(new_phone) = patch.phone.as_deref() {
            models::user::validate_phone(new_phone)?;
        }
        if let Some(new_name) = patch.name.as_deref() {
            models::user::validate_name(new_name)?;
        }
        Ok(self.registry.update(email, patch).await?)
    }

    /// Hash `new_password` and store it as the user's credential.
    #[instrument(skip(self, new_password))]
    pub async fn change_password(&self, email: &str, new_password: &str) -> Result<User, AuthError> {
        self.check_password_policy(new_password)?;
        let hash = Self::hash_password(new_password)?;
        Ok(self.registry.change_password(email, hash).await?)
    }
}
