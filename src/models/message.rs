use serde::{Deserialize, Serialize};

use super::agent::{ActionTaken, AgentReply, SlotDescriptor};

pub const NO_TEXT_FALLBACK: &str = "I processed that, but have no text response.";
pub const CONNECTIVITY_APOLOGY: &str =
    "Sorry, I couldn't reach the clinic assistant. Please check your connection and try again.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Agent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    BookingSuggestion {
        label: String,
        slots: Vec<SlotDescriptor>,
    },
    Link {
        label: String,
        href: String,
    },
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::BookingSuggestion { .. } => "booking_suggestion",
            Action::Link { .. } => "link",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Action::BookingSuggestion { label, .. } | Action::Link { label, .. } => label,
        }
    }

    // `slots` is read independently of `action_taken`.
    pub fn from_reply(reply: &AgentReply) -> Option<Self> {
        match reply.action_taken.as_ref()? {
            taken if taken.signals_booking() => Some(Action::BookingSuggestion {
                label: "Book an appointment".to_string(),
                slots: reply.slots.clone().unwrap_or_default(),
            }),
            ActionTaken::BookingConfirmed => Some(Action::Link {
                label: "View my appointments".to_string(),
                href: "/patient/appointments".to_string(),
            }),
            ActionTaken::EscalateEmergency => Some(Action::Link {
                label: "Emergency guidance".to_string(),
                href: "/emergency".to_string(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

impl Message {
    pub fn user(content: &str) -> Self {
        Self::new(MessageRole::User, content.to_string(), None)
    }

    pub fn from_reply(reply: &AgentReply) -> Self {
        let content = reply
            .response_text
            .clone()
            .unwrap_or_else(|| NO_TEXT_FALLBACK.to_string());
        Self::new(MessageRole::Agent, content, Action::from_reply(reply))
    }

    pub fn no_text_fallback() -> Self {
        Self::new(MessageRole::Agent, NO_TEXT_FALLBACK.to_string(), None)
    }

    pub fn connectivity_apology() -> Self {
        Self::new(MessageRole::Agent, CONNECTIVITY_APOLOGY.to_string(), None)
    }

    fn new(role: MessageRole, content: String, action: Option<Action>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content,
            action,
        }
    }
}
