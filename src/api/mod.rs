pub mod punch;
pub mod status;

use tracing::{error, warn};

use crate::error::TimeClockError;

/// Logs a failed operation at the right level and hands the error back.
pub(crate) fn log_failure(operation: &str, err: TimeClockError) -> TimeClockError {
    match &err {
        TimeClockError::Storage(detail) => {
            error!(operation, error = %detail, "Time clock operation failed")
        }
        _ => warn!(operation, kind = err.kind(), reason = %err, "Time clock operation rejected"),
    }
    err
}

#[cfg(test)]
pub(crate) mod tests {
    use actix_web::{
        App, Error,
        body::MessageBody,
        dev::{ServiceFactory, ServiceRequest, ServiceResponse},
        web,
    };

    use crate::config::Config;
    use crate::model::geo::GeoPoint;
    use crate::routes;
    use crate::state::{AppState, TimeClock, tests::MemoryStore};

    pub(crate) fn workplace() -> GeoPoint {
        GeoPoint::new(-27.623424, -48.5359616)
    }

    /// Full app over an in-memory store, rate limiting off.
    pub(crate) fn test_app(
        geofence_enabled: bool,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = Error,
            InitError = (),
        >,
    > {
        test_app_with(Config {
            geofence_enabled,
            rate_register_per_min: 0,
            ..Config::default()
        })
    }

    pub(crate) fn test_app_with(
        config: Config,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = Error,
            InitError = (),
        >,
    > {
        let clock = TimeClock::load(Box::new(MemoryStore::default())).unwrap();
        let state = web::Data::new(AppState::new(clock, config.geofence()));

        App::new()
            .app_data(state)
            .configure(|cfg| routes::configure(cfg, &config))
    }
}
