use std::sync::Arc;

use common::NameRegistry;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<NameRegistry>,
    pub config: AppConfig,
}

impl AppState {
    /// Plain string comparison against the configured shared secret.
    pub fn password_matches(&self, password: &str) -> bool {
        password == self.config.auth.admin_password
    }
}
