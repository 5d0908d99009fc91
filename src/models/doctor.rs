use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub doctor_name: String,
    pub today_count: u32,
    pub next_appointment: String,
    pub total_patients: u32,
    pub monthly_revenue: f64,
    pub schedule: Vec<ScheduleEntry>,
    pub inventory_alerts: Vec<InventoryAlert>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScheduleEntry {
    pub id: String,
    pub time: String,
    pub patient_name: String,
    #[serde(rename = "type")]
    pub visit_type: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventoryAlert {
    pub name: String,
    pub qty: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub stock: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub slot_duration: u32,
    pub break_duration: u32,
    #[serde(with = "hhmm")]
    pub work_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub work_end: NaiveTime,
}

impl ScheduleConfig {
    pub fn new(
        slot_duration: u32,
        break_duration: u32,
        work_start: NaiveTime,
        work_end: NaiveTime,
    ) -> Result<Self, ApiError> {
        let config = Self {
            slot_duration,
            break_duration,
            work_start,
            work_end,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.slot_duration == 0 {
            return Err(ApiError::InvalidInput(
                "slot_duration must be at least one minute".to_string(),
            ));
        }
        if self.work_end <= self.work_start {
            return Err(ApiError::InvalidInput(format!(
                "work_end {} must be after work_start {}",
                self.work_end.format("%H:%M"),
                self.work_start.format("%H:%M"),
            )));
        }
        Ok(())
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
