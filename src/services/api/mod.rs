pub mod admin;
pub mod agent;
pub mod auth;
pub mod doctor;

use crate::services::transport::HttpTransport;

pub use admin::AdminApi;
pub use agent::{AgentApi, AgentBackend};
pub use auth::AuthApi;
pub use doctor::DoctorApi;

#[derive(Clone)]
pub struct ClinicApi {
    pub auth: AuthApi,
    pub agent: AgentApi,
    pub doctor: DoctorApi,
    pub admin: AdminApi,
}

impl ClinicApi {
    pub fn new(transport: HttpTransport) -> Self {
        Self {
            auth: AuthApi::new(transport.clone()),
            agent: AgentApi::new(transport.clone()),
            doctor: DoctorApi::new(transport.clone()),
            admin: AdminApi::new(transport),
        }
    }
}
