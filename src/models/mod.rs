pub mod admin;
pub mod agent;
pub mod auth;
pub mod doctor;
pub mod message;

pub use admin::{AdminStats, PendingDoctor, PendingHospital, VerifyDecision, VerifyEntity, VerifyResult};
pub use agent::{ActionTaken, AgentReply, AgentRequest, AgentType, Intent, Role, SlotDescriptor};
pub use auth::{Identity, LoginResponse, RegisterRequest, RegisteredUser, UserRole};
pub use doctor::{DashboardStats, InventoryAlert, InventoryItem, PatientSummary, ScheduleConfig, ScheduleEntry};
pub use message::{Action, Message, MessageRole};
