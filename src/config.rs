use std::env;

use crate::models::Role;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub credential_db: String,
    pub request_timeout_secs: Option<u64>,
    pub chat_role: Role,
    pub login_email: Option<String>,
    pub login_password: Option<String>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            credential_db: env::var("CREDENTIAL_DB")
                .unwrap_or_else(|_| "clinic_client.db".to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
            chat_role: env::var("CHAT_ROLE")
                .map(|v| Role::parse(&v))
                .unwrap_or(Role::Patient),
            login_email: env::var("CLINIC_EMAIL").ok().filter(|v| !v.is_empty()),
            login_password: env::var("CLINIC_PASSWORD").ok().filter(|v| !v.is_empty()),
        }
    }

    pub fn login_credentials(&self) -> Option<(&str, &str)> {
        match (&self.login_email, &self.login_password) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        }
    }
}
