use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::utils::locale;

/// The two alternating punch kinds. Wire values follow the stored ledger
/// format ("entrada" / "saida").
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
pub enum PunchType {
    #[serde(rename = "entrada")]
    #[strum(serialize = "entrada")]
    Entry,
    #[serde(rename = "saida")]
    #[strum(serialize = "saida")]
    Exit,
}

impl PunchType {
    pub fn opposite(self) -> Self {
        match self {
            PunchType::Entry => PunchType::Exit,
            PunchType::Exit => PunchType::Entry,
        }
    }

    /// Label shown to the employee, e.g. "Entrada registrada com sucesso!".
    pub fn label(self) -> &'static str {
        match self {
            PunchType::Entry => "Entrada",
            PunchType::Exit => "Saída",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "6f1c2a8e-3f57-4a53-9a3b-0d8c5b0e7a11",
    "employeeId": "123",
    "employeeName": "Ana",
    "timestamp": "2026-10-18T11:02:05Z",
    "type": "entrada",
    "date": "18/10/2026",
    "time": "08:02:05"
}))]
pub struct PunchRecord {
    /// opaque unique token
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    #[schema(example = "2026-10-18T11:02:05Z", format = "date-time", value_type = String)]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub punch_type: PunchType,
    /// dd/mm/yyyy in the device's local zone
    pub date: String,
    /// HH:MM:SS in the device's local zone
    pub time: String,
}

impl PunchRecord {
    /// Builds a record stamped at `now`. Name and id must already be trimmed.
    pub fn new(
        employee_name: &str,
        employee_id: &str,
        punch_type: PunchType,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            employee_id: employee_id.to_string(),
            employee_name: employee_name.to_string(),
            timestamp: now.with_timezone(&Utc),
            punch_type,
            date: locale::short_date(&now),
            time: locale::time(&now),
        }
    }

    pub fn to_row(&self) -> PunchRow {
        PunchRow {
            date: self.date.clone(),
            time: self.time.clone(),
            punch_type: self.punch_type.to_string(),
            employee_name: self.employee_name.clone(),
            employee_id: self.employee_id.clone(),
        }
    }
}

/// Flat, string-only view of a record used for listing and CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PunchRow {
    #[schema(example = "18/10/2026")]
    pub date: String,
    #[schema(example = "08:02:05")]
    pub time: String,
    #[schema(example = "entrada")]
    #[serde(rename = "type")]
    pub punch_type: String,
    #[schema(example = "Ana")]
    pub employee_name: String,
    #[schema(example = "123")]
    pub employee_id: String,
}

impl PunchRow {
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.date,
            &self.time,
            &self.punch_type,
            &self.employee_name,
            &self.employee_id,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn punch_type_wire_names() {
        assert_eq!(PunchType::Entry.to_string(), "entrada");
        assert_eq!(PunchType::Exit.as_ref(), "saida");
        assert_eq!(PunchType::from_str("saida").unwrap(), PunchType::Exit);
        assert_eq!(
            serde_json::to_string(&PunchType::Entry).unwrap(),
            "\"entrada\""
        );
    }

    #[test]
    fn record_loads_browser_stored_json() {
        let raw = r#"{
            "id": "_k2j4h5l6m",
            "employeeId": "42",
            "employeeName": "Ana",
            "timestamp": "2025-03-10T11:00:00.000Z",
            "type": "saida",
            "date": "10/03/2025",
            "time": "08:00:00"
        }"#;
        let record: PunchRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.id, "_k2j4h5l6m");
        assert_eq!(record.punch_type, PunchType::Exit);
        assert_eq!(record.to_row().fields(), ["10/03/2025", "08:00:00", "saida", "Ana", "42"]);
    }

    #[test]
    fn new_record_derives_display_strings_from_local_time() {
        let now = Local.with_ymd_and_hms(2026, 10, 18, 8, 2, 5).unwrap();
        let record = PunchRecord::new("Ana", "123", PunchType::Entry, now);
        assert_eq!(record.date, "18/10/2026");
        assert_eq!(record.time, "08:02:05");
        assert_eq!(record.timestamp, now.with_timezone(&Utc));
        assert!(!record.id.is_empty());
    }
}
