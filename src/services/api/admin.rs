use reqwest::Method;

use crate::errors::ApiError;
use crate::models::{
    AdminStats, PendingDoctor, PendingHospital, VerifyDecision, VerifyEntity, VerifyResult,
};
use crate::services::transport::{HttpTransport, RequestBody};

#[derive(Clone)]
pub struct AdminApi {
    transport: HttpTransport,
}

impl AdminApi {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub async fn get_dashboard_stats(&self) -> Result<AdminStats, ApiError> {
        self.transport.get_json("/admin/dashboard/stats").await
    }

    pub async fn get_pending_doctors(&self) -> Result<Vec<PendingDoctor>, ApiError> {
        self.transport.get_json("/admin/doctors/pending").await
    }

    pub async fn get_pending_hospitals(&self) -> Result<Vec<PendingHospital>, ApiError> {
        self.transport.get_json("/admin/hospitals/pending").await
    }

    pub async fn verify_doctor(&self, id: &str, decision: VerifyDecision) -> Result<VerifyResult, ApiError> {
        self.verify(VerifyEntity::Doctor, id, decision).await
    }

    pub async fn verify_hospital(&self, id: &str, decision: VerifyDecision) -> Result<VerifyResult, ApiError> {
        self.verify(VerifyEntity::Hospital, id, decision).await
    }

    async fn verify(
        &self,
        entity: VerifyEntity,
        id: &str,
        decision: VerifyDecision,
    ) -> Result<VerifyResult, ApiError> {
        let path = format!(
            "/admin/verify/{}/{}?action={}",
            entity.as_str(),
            urlencoding::encode(id),
            decision.as_str()
        );
        self.transport
            .request_json(Method::POST, &path, RequestBody::Empty)
            .await
    }
}
