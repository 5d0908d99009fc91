use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ApiError;
use crate::services::credentials::AuthContext;

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    auth: AuthContext,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, auth: AuthContext, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            client: builder.build()?,
        })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // 401 is reported, never acted on: the credential stays as it is.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        headers: Option<HeaderMap>,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method.clone(), &url);

        if let Some(token) = self.auth.bearer_token() {
            req = req.bearer_auth(token);
        }
        if let Some(headers) = headers {
            req = req.headers(headers);
        }
        req = match body {
            RequestBody::Empty => req,
            RequestBody::Json(value) => req.json(&value),
            RequestBody::Form(fields) => req.form(&fields),
        };

        tracing::debug!(%method, path, "dispatching request");
        let resp = req.send().await?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(path, "backend rejected credential");
            return Err(ApiError::AuthExpired);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(path, status = status.as_u16(), "request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp)
    }

    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<T, ApiError> {
        let resp = self.request(method, path, body, None).await?;
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json(Method::GET, path, RequestBody::Empty).await
    }
}
