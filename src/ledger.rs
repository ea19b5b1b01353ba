use chrono::{DateTime, Local};

use crate::error::TimeClockError;
use crate::model::punch::{PunchRecord, PunchRow, PunchType};

/// Append-only sequence of punches plus the alternation cursor.
///
/// The cursor always holds the type the next punch will get. It starts at
/// Entry (an implicit prior Exit) and flips on every successful register.
#[derive(Debug, Clone)]
pub struct Ledger {
    records: Vec<PunchRecord>,
    next: PunchType,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next: PunchType::Entry,
        }
    }
}

impl Ledger {
    /// Rebuilds a ledger from persisted records. The cursor is derived from
    /// the last record, Entry when there is none.
    pub fn from_records(records: Vec<PunchRecord>) -> Self {
        let next = records
            .last()
            .map(|last| last.punch_type.opposite())
            .unwrap_or(PunchType::Entry);
        Self { records, next }
    }

    pub fn register(&mut self, name: &str, id: &str) -> Result<PunchRecord, TimeClockError> {
        self.register_at(name, id, Local::now())
    }

    pub fn register_at(
        &mut self,
        name: &str,
        id: &str,
        now: DateTime<Local>,
    ) -> Result<PunchRecord, TimeClockError> {
        let (name, id) = validate_identity(name, id)?;

        let record = PunchRecord::new(name, id, self.next, now);
        self.records.push(record.clone());
        self.next = self.next.opposite();

        Ok(record)
    }

    /// Takes back the newest punch and the cursor flip it caused. Used when
    /// the punch could not be saved.
    pub fn undo_last(&mut self) -> Option<PunchRecord> {
        let record = self.records.pop()?;
        self.next = record.punch_type;
        Some(record)
    }

    /// Drops every record and resets the cursor. Confirmation is up to the caller.
    pub fn clear(&mut self) {
        self.records.clear();
        self.next = PunchType::Entry;
    }

    pub fn next_type(&self) -> PunchType {
        self.next
    }

    pub fn records(&self) -> &[PunchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Newest first, for the history list.
    pub fn display_rows(&self) -> Vec<PunchRow> {
        self.records.iter().rev().map(PunchRecord::to_row).collect()
    }

    /// Chronological, for CSV export.
    pub fn export_rows(&self) -> Vec<PunchRow> {
        self.records.iter().map(PunchRecord::to_row).collect()
    }
}

/// Trims name and id; both must be non-empty.
pub fn validate_identity<'a>(
    name: &'a str,
    id: &'a str,
) -> Result<(&'a str, &'a str), TimeClockError> {
    let (name, id) = (name.trim(), id.trim());
    if name.is_empty() || id.is_empty() {
        return Err(TimeClockError::validation(
            "Por favor, preencha seu nome e ID antes de registrar o ponto",
        ));
    }
    Ok((name, id))
}
