use reqwest::Method;

use crate::errors::ApiError;
use crate::models::{Identity, LoginResponse, RegisterRequest, RegisteredUser};
use crate::services::transport::{HttpTransport, RequestBody};

#[derive(Clone)]
pub struct AuthApi {
    transport: HttpTransport,
}

impl AuthApi {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    // Form-encoded; the backend calls the email field `username`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let form = vec![
            ("username".to_string(), email.to_string()),
            ("password".to_string(), password.to_string()),
        ];
        let resp: LoginResponse = self
            .transport
            .request_json(Method::POST, "/auth/login", RequestBody::Form(form))
            .await?;

        self.transport.auth().store_token(&resp.access_token)?;
        tracing::info!(role = ?resp.role, "logged in");
        Ok(resp)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.transport.auth().clear()?;
        tracing::info!("logged out");
        Ok(())
    }

    pub async fn register(&self, user: &RegisterRequest) -> Result<RegisteredUser, ApiError> {
        let body = serde_json::to_value(user)?;
        self.transport
            .request_json(Method::POST, "/auth/register", RequestBody::Json(body))
            .await
    }

    pub async fn get_me(&self) -> Result<Identity, ApiError> {
        self.transport.get_json("/auth/me").await
    }
}
