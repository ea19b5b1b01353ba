use crate::api::punch::{PunchListResponse, RegisterPunch};
use crate::api::status::{ClockDisplay, GeofenceInfo, StatusResponse};
use crate::model::geo::GeoPoint;
use crate::model::profile::EmployeeProfile;
use crate::model::punch::{PunchRecord, PunchRow, PunchType};
use crate::state::Registration;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Time Clock API",
        version = "1.0.0",
        description = r#"
## Employee Time Clock (registro de ponto)

Local service behind the time-clock widget. An employee fills in name and ID
and registers punches that alternate between **entrada** (entry) and
**saida** (exit).

### 🔹 Key Features
- **Punch registration**
  - The first punch is always an entry, then entry/exit alternate
  - Optional geofence: the device must be within the configured radius of the workplace
- **History**
  - Newest first listing, bulk clear
- **Export**
  - CSV download (`Data,Hora,Tipo,Funcionário,ID`), oldest first

### 📍 Location
The client acquires the position itself and sends it with the registration.
Leaving it out means the location is unavailable and the punch is refused
while the geofence is enabled.

---
Built with **Rust**, **Actix Web** and **Utoipa**.
"#,
    ),
    paths(
        crate::api::punch::register_punch,
        crate::api::punch::list_punches,
        crate::api::punch::clear_punches,
        crate::api::punch::export_punches,

        crate::api::status::get_status,
        crate::api::status::update_profile
    ),
    components(
        schemas(
            RegisterPunch,
            PunchListResponse,
            PunchRecord,
            PunchRow,
            PunchType,
            GeoPoint,
            EmployeeProfile,
            Registration,
            StatusResponse,
            ClockDisplay,
            GeofenceInfo
        )
    ),
    tags(
        (name = "Punches", description = "Register, list, clear and export punches"),
        (name = "Status", description = "Widget state and employee profile"),
    )
)]
pub struct ApiDoc;
