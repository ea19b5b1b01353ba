use crate::{
    api::{punch, status},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{guard, middleware::Condition, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    // Per-route limiter; 0 requests/min switches it off
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        // per_ms and burst are both non-zero here, which is all finish() checks
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap_or_default();
        Governor::new(&cfg)
    }

    let register_limiter = Condition::new(
        config.rate_register_per_min > 0,
        build_limiter(config.rate_register_per_min),
    );

    cfg.service(
        web::scope(&config.api_prefix)
            // /status
            .service(web::resource("/status").route(web::get().to(status::get_status)))
            // /profile
            .service(web::resource("/profile").route(web::put().to(status::update_profile)))
            .service(
                web::scope("/punches")
                    // /punches/export
                    .service(
                        web::resource("/export").route(web::get().to(punch::export_punches)),
                    )
                    // POST /punches, the only rate-limited route
                    .service(
                        web::resource("")
                            .guard(guard::Post())
                            .wrap(register_limiter)
                            .route(web::post().to(punch::register_punch)),
                    )
                    // /punches
                    .service(
                        web::resource("")
                            .route(web::get().to(punch::list_punches))
                            .route(web::delete().to(punch::clear_punches)),
                    ),
            ),
    );
}

// POST   /punches        register (geofence gated)
// GET    /punches        history, newest first
// DELETE /punches        clear, next punch is an entry
// GET    /punches/export CSV, oldest first

#[cfg(test)]
mod tests {
    use crate::api::tests::test_app_with;
    use crate::config::Config;
    use actix_web::{http::StatusCode, test};
    use serde_json::json;
    use std::net::SocketAddr;

    fn peer() -> SocketAddr {
        "10.0.0.1:40000".parse().unwrap()
    }

    fn limited_config() -> Config {
        Config {
            geofence_enabled: false,
            rate_register_per_min: 2,
            ..Config::default()
        }
    }

    fn punch() -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/punches")
            .set_json(json!({"employee_name": "Ana", "employee_id": "1"}))
    }

    fn history() -> test::TestRequest {
        test::TestRequest::get().uri("/api/punches")
    }

    fn clear() -> test::TestRequest {
        test::TestRequest::delete().uri("/api/punches")
    }

    // the limiter answers with an error carrying the 429 response
    macro_rules! status_of {
        ($app:expr, $req:expr) => {
            match test::try_call_service(&$app, $req.peer_addr(peer()).to_request()).await {
                Ok(resp) => resp.status(),
                Err(err) => err.error_response().status(),
            }
        };
    }

    #[actix_web::test]
    async fn reads_and_clears_do_not_use_the_register_quota() {
        let app = test::init_service(test_app_with(limited_config())).await;

        for _ in 0..5 {
            assert_eq!(status_of!(app, history()), StatusCode::OK);
        }
        assert_eq!(status_of!(app, clear()), StatusCode::OK);

        assert_eq!(status_of!(app, punch()), StatusCode::CREATED);
        assert_eq!(status_of!(app, punch()), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn registrations_beyond_burst_are_refused() {
        let app = test::init_service(test_app_with(limited_config())).await;

        assert_eq!(status_of!(app, punch()), StatusCode::CREATED);
        assert_eq!(status_of!(app, punch()), StatusCode::CREATED);
        assert_eq!(status_of!(app, punch()), StatusCode::TOO_MANY_REQUESTS);

        // history and clear stay available while registration is throttled
        for _ in 0..3 {
            assert_eq!(status_of!(app, history()), StatusCode::OK);
        }
        assert_eq!(status_of!(app, clear()), StatusCode::OK);
    }
}
