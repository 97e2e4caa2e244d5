use std::sync::Arc;

use service::auth::{AuthConfig, AuthService};
use service::identity::{repository::UserRepository, IdentityRegistry};

/// Shared handler state. Both services point at the same repository.
#[derive(Clone)]
pub struct ServerState {
    pub registry: IdentityRegistry,
    pub auth: Arc<AuthService>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn UserRepository>, auth_cfg: AuthConfig) -> Self {
        let registry = IdentityRegistry::new(repo);
        let auth = Arc::new(AuthService::new(registry.clone(), auth_cfg));
        Self { registry, auth }
    }
}
