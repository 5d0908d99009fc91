use reqwest::Method;
use serde_json::Value;

use crate::errors::ApiError;
use crate::models::{DashboardStats, InventoryItem, PatientSummary, ScheduleConfig};
use crate::services::transport::{HttpTransport, RequestBody};

#[derive(Clone)]
pub struct DoctorApi {
    transport: HttpTransport,
}

impl DoctorApi {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub async fn get_dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.transport.get_json("/doctor/dashboard").await
    }

    pub async fn get_patients(&self) -> Result<Vec<PatientSummary>, ApiError> {
        self.transport.get_json("/doctor/patients").await
    }

    pub async fn get_inventory_memory(&self) -> Result<Vec<InventoryItem>, ApiError> {
        self.transport.get_json("/agent/memory/inventory").await
    }

    pub async fn update_config(&self, config: &ScheduleConfig) -> Result<Value, ApiError> {
        config.validate()?;
        let body = serde_json::to_value(config)?;
        self.transport
            .request_json(Method::PUT, "/doctor/config", RequestBody::Json(body))
            .await
    }
}
