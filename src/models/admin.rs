use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminStats {
    pub total_users: UserTotals,
    pub action_items: ActionItems,
    pub financials: Financials,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserTotals {
    pub doctors: u32,
    pub patients: u32,
    pub hospitals: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActionItems {
    pub pending_doctors: u32,
    pub pending_hospitals: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Financials {
    pub revenue: f64,
    pub appointments: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PendingDoctor {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub joined_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PendingHospital {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyEntity {
    Doctor,
    Hospital,
}

impl VerifyEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyEntity::Doctor => "doctor",
            VerifyEntity::Hospital => "hospital",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyDecision {
    Approve,
    Reject,
}

impl VerifyDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyDecision::Approve => "approve",
            VerifyDecision::Reject => "reject",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResult {
    pub status: String,
    #[serde(default)]
    pub message: String,
}
