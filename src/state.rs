use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::TimeClockError;
use crate::geofence::{Geofence, LocationProvider};
use crate::ledger::{Ledger, validate_identity};
use crate::model::profile::EmployeeProfile;
use crate::model::punch::{PunchRecord, PunchType};
use crate::store::{EMPLOYEE_ID_KEY, EMPLOYEE_NAME_KEY, KeyValueStore, RECORDS_KEY};

/// Ledger, profile and the store they live in. Every mutation is saved
/// before it is reported; a failed save is rolled back in memory.
pub struct TimeClock {
    ledger: Ledger,
    profile: EmployeeProfile,
    store: Box<dyn KeyValueStore>,
}

impl TimeClock {
    pub fn load(store: Box<dyn KeyValueStore>) -> Result<Self, TimeClockError> {
        let records: Vec<PunchRecord> = match store.get(RECORDS_KEY) {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw).map_err(|e| {
                TimeClockError::Storage(format!("stored records are unreadable: {}", e))
            })?,
            _ => Vec::new(),
        };

        let profile = EmployeeProfile {
            employee_name: store.get(EMPLOYEE_NAME_KEY).unwrap_or_default(),
            employee_id: store.get(EMPLOYEE_ID_KEY).unwrap_or_default(),
        };

        let ledger = Ledger::from_records(records);
        tracing::info!(
            records = ledger.len(),
            next = %ledger.next_type(),
            "Time clock state loaded"
        );

        Ok(Self {
            ledger,
            profile,
            store,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn profile(&self) -> &EmployeeProfile {
        &self.profile
    }

    /// Saves the form values as typed. No validation: partial input is kept too.
    pub fn update_profile(&mut self, profile: EmployeeProfile) -> Result<(), TimeClockError> {
        self.store.set_many(&[
            (EMPLOYEE_NAME_KEY, profile.employee_name.clone()),
            (EMPLOYEE_ID_KEY, profile.employee_id.clone()),
        ])?;
        self.profile = profile;
        Ok(())
    }

    /// Appends a punch for `profile` and persists ledger and profile together.
    pub fn register_at(
        &mut self,
        profile: EmployeeProfile,
        now: DateTime<Local>,
    ) -> Result<PunchRecord, TimeClockError> {
        let record = self
            .ledger
            .register_at(&profile.employee_name, &profile.employee_id, now)?;

        if let Err(e) = self.persist(&profile) {
            self.ledger.undo_last();
            return Err(e);
        }
        self.profile = profile;
        Ok(record)
    }

    pub fn clear(&mut self) -> Result<usize, TimeClockError> {
        let removed = self.ledger.len();
        self.store.remove(RECORDS_KEY)?;
        self.ledger.clear();
        Ok(removed)
    }

    fn persist(&mut self, profile: &EmployeeProfile) -> Result<(), TimeClockError> {
        let records = serde_json::to_string(self.ledger.records())
            .map_err(|e| TimeClockError::Storage(e.to_string()))?;

        self.store.set_many(&[
            (RECORDS_KEY, records),
            (EMPLOYEE_NAME_KEY, profile.employee_name.clone()),
            (EMPLOYEE_ID_KEY, profile.employee_id.clone()),
        ])
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Registration {
    pub record: PunchRecord,
    /// Distance to the workplace, present when the geofence is enabled
    #[schema(example = 42.0, nullable = true)]
    pub distance_meters: Option<f64>,
}

/// What the handlers share: the clock behind one lock plus the optional gate.
pub struct AppState {
    clock: Mutex<TimeClock>,
    geofence: Option<Geofence>,
}

impl AppState {
    pub fn new(clock: TimeClock, geofence: Option<Geofence>) -> Self {
        Self {
            clock: Mutex::new(clock),
            geofence,
        }
    }

    pub fn geofence(&self) -> Option<&Geofence> {
        self.geofence.as_ref()
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, TimeClock>, TimeClockError> {
        self.clock
            .lock()
            .map_err(|_| TimeClockError::Storage("time clock state lock poisoned".into()))
    }

    /// Full registration flow: identity check, position, geofence, append, save.
    ///
    /// `name`/`id` fall back to the stored profile when absent. The lock is
    /// not held while the position is being acquired.
    pub async fn register<P: LocationProvider>(
        &self,
        name: Option<&str>,
        id: Option<&str>,
        location: &P,
    ) -> Result<Registration, TimeClockError> {
        let profile = {
            let clock = self.lock()?;
            EmployeeProfile {
                employee_name: name
                    .map(str::to_string)
                    .unwrap_or_else(|| clock.profile().employee_name.clone()),
                employee_id: id
                    .map(str::to_string)
                    .unwrap_or_else(|| clock.profile().employee_id.clone()),
            }
        };
        validate_identity(&profile.employee_name, &profile.employee_id)?;

        let distance_meters = match &self.geofence {
            Some(fence) => {
                let position = location.current_position().await?;
                Some(fence.check(position)?)
            }
            None => None,
        };

        let record = self.lock()?.register_at(profile, Local::now())?;
        Ok(Registration {
            record,
            distance_meters,
        })
    }

    pub fn next_type(&self) -> Result<PunchType, TimeClockError> {
        Ok(self.lock()?.ledger().next_type())
    }
}
