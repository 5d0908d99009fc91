use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::errors::ApiError;
use crate::models::{AgentReply, AgentRequest, Role};
use crate::services::transport::{HttpTransport, RequestBody};

#[async_trait]
pub trait AgentBackend: Send + Sync {
    async fn execute(&self, request: &AgentRequest) -> Result<AgentReply, ApiError>;
}

#[derive(Clone)]
pub struct AgentApi {
    transport: HttpTransport,
}

impl AgentApi {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub async fn send_message(
        &self,
        query: &str,
        context: Value,
        role: Role,
    ) -> Result<AgentReply, ApiError> {
        self.execute(&AgentRequest::query(query, role, context)).await
    }

    pub async fn book_slot(
        &self,
        slot_id: &str,
        patient_id: &str,
        date: Option<&str>,
    ) -> Result<AgentReply, ApiError> {
        self.execute(&AgentRequest::book_slot(slot_id, patient_id, date)).await
    }

    pub async fn view_slots(
        &self,
        date: Option<&str>,
        doctor_id: Option<&str>,
    ) -> Result<AgentReply, ApiError> {
        self.execute(&AgentRequest::view_slots(date, doctor_id)).await
    }

    pub async fn ask_doctor_assistant(&self, query: &str) -> Result<AgentReply, ApiError> {
        self.execute(&AgentRequest::doctor_assistant(query)).await
    }
}

#[async_trait]
impl AgentBackend for AgentApi {
    async fn execute(&self, request: &AgentRequest) -> Result<AgentReply, ApiError> {
        let body = serde_json::to_value(request)?;
        let value: Value = self
            .transport
            .request_json(Method::POST, "/agent/execute", RequestBody::Json(body))
            .await?;
        Ok(AgentReply::from_value(&value))
    }
}
