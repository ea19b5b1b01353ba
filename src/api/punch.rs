use actix_web::{HttpResponse, Responder, http::header, web};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::api::log_failure;
use crate::error::TimeClockError;
use crate::geofence::ReportedPosition;
use crate::model::geo::GeoPoint;
use crate::model::punch::{PunchRow, PunchType};
use crate::state::AppState;
use crate::utils::csv_export::{export_file_name, to_csv};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterPunch {
    /// Falls back to the stored profile when absent
    #[schema(example = "Ana", nullable = true)]
    pub employee_name: Option<String>,
    /// Falls back to the stored profile when absent
    #[schema(example = "123", nullable = true)]
    pub employee_id: Option<String>,
    /// Device position; leave out when geolocation was denied or unsupported
    #[schema(nullable = true)]
    pub position: Option<GeoPoint>,
}

#[derive(Serialize, ToSchema)]
pub struct PunchListResponse {
    /// newest first
    pub data: Vec<PunchRow>,
    #[schema(example = 2)]
    pub total: usize,
    #[schema(example = "entrada")]
    pub next_type: PunchType,
}

/// Register the next punch (entry or exit)
#[utoipa::path(
    post,
    path = "/api/punches",
    request_body = RegisterPunch,
    responses(
        (status = 201, description = "Punch registered", body = Object, example = json!({
            "message": "Entrada registrada com sucesso!",
            "record": {
                "id": "6f1c2a8e-3f57-4a53-9a3b-0d8c5b0e7a11",
                "employeeId": "123",
                "employeeName": "Ana",
                "timestamp": "2026-10-18T11:02:05Z",
                "type": "entrada",
                "date": "18/10/2026",
                "time": "08:02:05"
            },
            "distance_meters": 42.0,
            "next_type": "saida"
        })),
        (status = 400, description = "Name or ID missing", body = Object, example = json!({
            "error": "validation_error",
            "message": "Por favor, preencha seu nome e ID antes de registrar o ponto"
        })),
        (status = 403, description = "Outside the permitted area", body = Object, example = json!({
            "error": "out_of_range",
            "message": "Você está fora da área permitida para bater o ponto (1534 m do local de trabalho, limite 1000 m)",
            "distance_meters": 1534.0,
            "radius_meters": 1000.0
        })),
        (status = 422, description = "Location not available", body = Object, example = json!({
            "error": "location_unavailable",
            "message": "Não foi possível obter a localização. Permita o acesso à localização."
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Punches"
)]
#[instrument(skip(state, payload), fields(has_position = payload.position.is_some()))]
pub async fn register_punch(
    state: web::Data<AppState>,
    payload: web::Json<RegisterPunch>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let location = ReportedPosition(payload.position);

    let done = state
        .register(
            payload.employee_name.as_deref(),
            payload.employee_id.as_deref(),
            &location,
        )
        .await
        .map_err(|e| log_failure("register", e))?;

    let punch_type = done.record.punch_type;
    info!(
        record_id = %done.record.id,
        employee_id = %done.record.employee_id,
        punch_type = %punch_type,
        distance_meters = ?done.distance_meters,
        "Punch registered"
    );

    Ok(HttpResponse::Created().json(json!({
        "message": format!("{} registrada com sucesso!", punch_type.label()),
        "record": done.record,
        "distance_meters": done.distance_meters,
        "next_type": punch_type.opposite(),
    })))
}

/// List punches, newest first
#[utoipa::path(
    get,
    path = "/api/punches",
    responses(
        (status = 200, description = "Punch history", body = PunchListResponse)
    ),
    tag = "Punches"
)]
pub async fn list_punches(state: web::Data<AppState>) -> actix_web::Result<impl Responder> {
    let clock = state.lock().map_err(|e| log_failure("list", e))?;
    let ledger = clock.ledger();

    Ok(HttpResponse::Ok().json(PunchListResponse {
        data: ledger.display_rows(),
        total: ledger.len(),
        next_type: ledger.next_type(),
    }))
}

/// Delete every punch and start over with an entry
#[utoipa::path(
    delete,
    path = "/api/punches",
    responses(
        (status = 200, description = "Ledger cleared", body = Object, example = json!({
            "message": "Todos os registros foram apagados",
            "removed": 4
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Punches"
)]
#[instrument(skip(state))]
pub async fn clear_punches(state: web::Data<AppState>) -> actix_web::Result<impl Responder> {
    let removed = state
        .lock()
        .and_then(|mut clock| clock.clear())
        .map_err(|e| log_failure("clear", e))?;

    info!(removed, "Ledger cleared");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Todos os registros foram apagados",
        "removed": removed
    })))
}

/// Download the punches as CSV, oldest first
#[utoipa::path(
    get,
    path = "/api/punches/export",
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 404, description = "Nothing to export", body = Object, example = json!({
            "error": "nothing_to_export",
            "message": "Não há registros para exportar"
        }))
    ),
    tag = "Punches"
)]
#[instrument(skip(state))]
pub async fn export_punches(state: web::Data<AppState>) -> actix_web::Result<impl Responder> {
    let rows = state
        .lock()
        .map(|clock| clock.ledger().export_rows())
        .map_err(|e| log_failure("export", e))?;

    if rows.is_empty() {
        return Err(TimeClockError::NothingToExport.into());
    }

    let file_name = export_file_name(&Local::now());
    info!(rows = rows.len(), file_name = %file_name, "Punches exported");

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ))
        .body(to_csv(&rows)))
}

#[cfg(test)]
mod tests {
    use crate::api::tests::{test_app, workplace};
    use actix_web::{http::StatusCode, test};
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn register_alternates_and_lists_newest_first() {
        let app = test::init_service(test_app(true)).await;

        for expected in ["entrada", "saida", "entrada"] {
            let req = test::TestRequest::post()
                .uri("/api/punches")
                .set_json(json!({
                    "employee_name": " Ana ",
                    "employee_id": "123",
                    "position": workplace()
                }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["record"]["type"], expected);
            assert_eq!(body["record"]["employeeName"], "Ana");
            let label = if expected == "entrada" { "Entrada" } else { "Saída" };
            assert_eq!(body["message"], format!("{label} registrada com sucesso!"));
        }

        let req = test::TestRequest::get().uri("/api/punches").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["next_type"], "saida");
        assert_eq!(body["data"][0]["type"], "entrada");
        assert_eq!(body["data"][1]["type"], "saida");
    }

    #[actix_web::test]
    async fn register_reports_each_failure_kind() {
        let app = test::init_service(test_app(true)).await;

        let cases = [
            (json!({"employee_name": "", "employee_id": "123"}), StatusCode::BAD_REQUEST, "validation_error"),
            (json!({"employee_name": "Ana", "employee_id": "123"}), StatusCode::UNPROCESSABLE_ENTITY, "location_unavailable"),
            (
                json!({
                    "employee_name": "Ana",
                    "employee_id": "123",
                    "position": {"latitude": -27.5845, "longitude": -48.5284}
                }),
                StatusCode::FORBIDDEN,
                "out_of_range",
            ),
        ];

        for (payload, status, kind) in cases {
            let req = test::TestRequest::post()
                .uri("/api/punches")
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), status);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], kind);
        }

        let req = test::TestRequest::get().uri("/api/punches").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 0);
    }

    #[actix_web::test]
    async fn export_and_clear() {
        let app = test::init_service(test_app(false)).await;

        let req = test::TestRequest::get().uri("/api/punches/export").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Não há registros para exportar");

        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/api/punches")
                .set_json(json!({"employee_name": "Ana", "employee_id": "123"}))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get().uri("/api/punches/export").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("registro_ponto_"));

        let csv = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Data,Hora,Tipo,Funcionário,ID");
        assert!(lines[1].ends_with(",entrada,Ana,123"));
        assert!(lines[2].ends_with(",saida,Ana,123"));

        let req = test::TestRequest::delete().uri("/api/punches").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["removed"], 2);
        assert_eq!(body["message"], "Todos os registros foram apagados");

        let req = test::TestRequest::post()
            .uri("/api/punches")
            .set_json(json!({"employee_name": "Ana", "employee_id": "123"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["record"]["type"], "entrada");
    }
}
