use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Recoverable failures of the time clock. None of them touches the ledger.
/// Messages are shown to the employee as-is, in pt-BR like the rest of the widget.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum TimeClockError {
    /// Missing employee name/id or malformed request data
    #[display(fmt = "{}", _0)]
    Validation(String),

    /// Geolocation denied, unsupported or simply not reported by the client
    #[display(fmt = "Não foi possível obter a localização. Permita o acesso à localização.")]
    LocationUnavailable,

    #[display(
        fmt = "Você está fora da área permitida para bater o ponto ({:.0} m do local de trabalho, limite {:.0} m)",
        distance,
        radius
    )]
    OutOfRange { distance: f64, radius: f64 },

    #[display(fmt = "Não há registros para exportar")]
    NothingToExport,

    #[display(fmt = "Storage error: {}", _0)]
    Storage(String),
}

impl std::error::Error for TimeClockError {}

impl TimeClockError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TimeClockError::Validation(msg.into())
    }

    /// Short machine readable kind, sent next to the human message.
    pub fn kind(&self) -> &'static str {
        match self {
            TimeClockError::Validation(_) => "validation_error",
            TimeClockError::LocationUnavailable => "location_unavailable",
            TimeClockError::OutOfRange { .. } => "out_of_range",
            TimeClockError::NothingToExport => "nothing_to_export",
            TimeClockError::Storage(_) => "storage_error",
        }
    }
}

impl ResponseError for TimeClockError {
    fn status_code(&self) -> StatusCode {
        match self {
            TimeClockError::Validation(_) => StatusCode::BAD_REQUEST,
            TimeClockError::LocationUnavailable => StatusCode::UNPROCESSABLE_ENTITY,
            TimeClockError::OutOfRange { .. } => StatusCode::FORBIDDEN,
            TimeClockError::NothingToExport => StatusCode::NOT_FOUND,
            TimeClockError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            TimeClockError::OutOfRange { distance, radius } => json!({
                "error": self.kind(),
                "message": self.to_string(),
                "distance_meters": distance.round(),
                "radius_meters": radius,
            }),
            // details stay in the log
            TimeClockError::Storage(_) => json!({
                "error": self.kind(),
                "message": "Algo deu errado, contate o administrador do sistema"
            }),
            _ => json!({
                "error": self.kind(),
                "message": self.to_string()
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
