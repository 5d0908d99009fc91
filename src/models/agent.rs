use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "doctor" => Role::Doctor,
            _ => Role::Patient,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Appointment,
    Router,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Book,
    ViewSlots,
}

/// `agent_type` is always serialized: the backend routes on an explicit
/// `null` differently from a missing key.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentRequest {
    pub user_query: String,
    pub role: Role,
    pub agent_type: Option<AgentType>,
    pub context: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl AgentRequest {
    pub fn query(user_query: &str, role: Role, context: Value) -> Self {
        Self {
            user_query: user_query.to_string(),
            role,
            agent_type: None,
            context,
            intent: None,
            slot_id: None,
            patient_id: None,
            doctor_id: None,
            date: None,
        }
    }

    // Slot ids carry only the time of day; without `date` the backend books today.
    pub fn book_slot(slot_id: &str, patient_id: &str, date: Option<&str>) -> Self {
        Self {
            agent_type: Some(AgentType::Appointment),
            intent: Some(Intent::Book),
            slot_id: Some(slot_id.to_string()),
            patient_id: Some(patient_id.to_string()),
            date: date.map(str::to_string),
            ..Self::query(&format!("Book slot {slot_id}"), Role::Patient, empty_context())
        }
    }

    pub fn view_slots(date: Option<&str>, doctor_id: Option<&str>) -> Self {
        Self {
            agent_type: Some(AgentType::Appointment),
            intent: Some(Intent::ViewSlots),
            date: date.map(str::to_string),
            doctor_id: doctor_id.map(str::to_string),
            ..Self::query("Show available slots", Role::Patient, empty_context())
        }
    }

    pub fn doctor_assistant(user_query: &str) -> Self {
        Self {
            agent_type: Some(AgentType::Router),
            ..Self::query(user_query, Role::Doctor, empty_context())
        }
    }
}

pub fn empty_context() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTaken {
    BookingIntent,
    ShowSlots,
    BookingConfirmed,
    EscalateEmergency,
    None,
    Other(String),
}

impl ActionTaken {
    pub fn parse(s: &str) -> Self {
        match s {
            "booking_intent" => ActionTaken::BookingIntent,
            "show_slots" => ActionTaken::ShowSlots,
            "booking_confirmed" => ActionTaken::BookingConfirmed,
            "escalate_emergency" => ActionTaken::EscalateEmergency,
            "" | "none" => ActionTaken::None,
            other => ActionTaken::Other(other.to_string()),
        }
    }

    pub fn signals_booking(&self) -> bool {
        matches!(self, ActionTaken::BookingIntent | ActionTaken::ShowSlots)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotDescriptor {
    pub slot_id: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub doctor_id: Option<String>,
}

impl SlotDescriptor {
    pub fn display_time(&self) -> &str {
        self.time
            .as_deref()
            .or(self.start.as_deref())
            .unwrap_or(&self.slot_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentReply {
    pub response_text: Option<String>,
    pub action_taken: Option<ActionTaken>,
    pub slots: Option<Vec<SlotDescriptor>>,
    pub agent_used: Option<String>,
}

impl AgentReply {
    pub fn from_value(value: &Value) -> Self {
        let response_text = value
            .get("response_text")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);

        let action_taken = value
            .get("action_taken")
            .and_then(Value::as_str)
            .map(ActionTaken::parse);

        let slots = ["/slots", "/available_slots", "/data/available_slots"]
            .iter()
            .find_map(|p| value.pointer(p).and_then(Value::as_array))
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| match serde_json::from_value(e.clone()) {
                        Ok(slot) => Some(slot),
                        Err(err) => {
                            tracing::warn!(error = %err, "dropping malformed slot entry");
                            None
                        }
                    })
                    .collect()
            });

        let agent_used = value
            .get("agent_used")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            response_text,
            action_taken,
            slots,
            agent_used,
        }
    }
}
