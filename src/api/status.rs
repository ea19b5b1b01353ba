use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::api::log_failure;
use crate::model::profile::EmployeeProfile;
use crate::model::punch::PunchType;
use crate::state::AppState;
use crate::utils::locale;

#[derive(Serialize, ToSchema)]
pub struct ClockDisplay {
    #[schema(example = "domingo, 18 de outubro de 2026")]
    pub date: String,
    #[schema(example = "08:02:05")]
    pub time: String,
}

#[derive(Serialize, ToSchema)]
pub struct GeofenceInfo {
    #[schema(example = json!(-27.623424))]
    pub latitude: f64,
    #[schema(example = json!(-48.5359616))]
    pub longitude: f64,
    #[schema(example = 1000.0)]
    pub radius_meters: f64,
}

#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "entrada")]
    pub next_type: PunchType,
    /// e.g. "Registrar Entrada"
    #[schema(example = "Registrar Entrada")]
    pub action_label: String,
    #[schema(example = 0)]
    pub record_count: usize,
    pub profile: EmployeeProfile,
    /// false until both name and id are filled in
    pub can_register: bool,
    /// export and clear are only offered when true
    pub has_records: bool,
    #[schema(nullable = true)]
    pub geofence: Option<GeofenceInfo>,
    pub clock: ClockDisplay,
}

/// Widget state: next punch type, counters, stored profile and local clock
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Current widget state", body = StatusResponse)
    ),
    tag = "Status"
)]
pub async fn get_status(state: web::Data<AppState>) -> actix_web::Result<impl Responder> {
    let clock = state.lock().map_err(|e| log_failure("status", e))?;
    let ledger = clock.ledger();
    let next_type = ledger.next_type();
    let now = Local::now();

    Ok(HttpResponse::Ok().json(StatusResponse {
        next_type,
        action_label: format!("Registrar {}", next_type.label()),
        record_count: ledger.len(),
        profile: clock.profile().clone(),
        can_register: clock.profile().is_complete(),
        has_records: !ledger.is_empty(),
        geofence: state.geofence().map(|fence| GeofenceInfo {
            latitude: fence.reference.latitude,
            longitude: fence.reference.longitude,
            radius_meters: fence.radius_meters,
        }),
        clock: ClockDisplay {
            date: locale::long_date(&now),
            time: locale::time(&now),
        },
    }))
}

/// Save the last-known employee name and id (form input)
#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = EmployeeProfile,
    responses(
        (status = 200, description = "Profile saved", body = Object, example = json!({
            "message": "Perfil salvo",
            "can_register": true
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Status"
)]
#[instrument(skip(state, payload))]
pub async fn update_profile(
    state: web::Data<AppState>,
    payload: web::Json<EmployeeProfile>,
) -> actix_web::Result<impl Responder> {
    let profile = payload.into_inner();
    let can_register = profile.is_complete();

    state
        .lock()
        .and_then(|mut clock| clock.update_profile(profile))
        .map_err(|e| log_failure("update_profile", e))?;

    debug!(can_register, "Profile saved");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Perfil salvo",
        "can_register": can_register
    })))
}
