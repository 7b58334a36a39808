use crate::{
    api::{employee, hours_bank, import, paid_day_off, period, time},
    config::Config,
    model::period::PeriodKind,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::anyhow;

type LimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter settings, built once at startup and shared by every worker.
#[derive(Clone)]
pub struct RateLimits {
    api: LimiterConfig,
    import: LimiterConfig,
}

impl RateLimits {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            api: build_limiter(config.rate_api_per_min)?,
            import: build_limiter(config.rate_import_per_min)?,
        })
    }
}

fn build_limiter(requests_per_min: u32) -> anyhow::Result<LimiterConfig> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min} requests per minute"))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limits: &RateLimits) {
    // the import scope must come first, `{prefix}` would swallow it otherwise
    cfg.service(
        web::scope(&format!("{}/import", config.api_prefix))
            .wrap(Governor::new(&limits.import))
            .configure(register_import),
    );

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Governor::new(&limits.api))
            .configure(register_api),
    );
}

/// Bulk import, mounted under `{prefix}/import`.
pub fn register_import(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/employees").route(web::post().to(import::import_employees)))
        .service(
            web::resource("/employees/text").route(web::post().to(import::import_employees_text)),
        );
}

/// Everything else, mounted under `{prefix}`.
pub fn register_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/employees")
            // /employees
            .service(
                web::resource("")
                    .route(web::post().to(employee::create_employee))
                    .route(web::get().to(employee::list_employees)),
            )
            // /employees/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(employee::get_employee))
                    .route(web::put().to(employee::update_employee))
                    .route(web::delete().to(employee::delete_employee)),
            )
            // /employees/{id}/hours
            .service(
                web::resource("/{id}/hours")
                    .route(web::get().to(hours_bank::hours_statement))
                    .route(web::post().to(hours_bank::add_hours_entry)),
            )
            // /employees/{id}/paid-days-off
            .service(
                web::resource("/{id}/paid-days-off")
                    .route(web::get().to(paid_day_off::paid_day_off_statement))
                    .route(web::post().to(paid_day_off::add_paid_day_off)),
            ),
    )
    .service(
        web::scope("/hours").service(
            web::resource("/{id}")
                .route(web::get().to(hours_bank::get_hours_entry))
                .route(web::delete().to(hours_bank::delete_hours_entry)),
        ),
    )
    .service(
        web::scope("/vacations")
            .app_data(web::Data::new(PeriodKind::Vacation))
            .configure(register_periods),
    )
    .service(
        web::scope("/leaves")
            .app_data(web::Data::new(PeriodKind::Leave))
            .configure(register_periods),
    )
    .service(
        web::scope("/paid-days-off").service(
            web::resource("/{id}")
                .route(web::get().to(paid_day_off::get_paid_day_off))
                .route(web::put().to(paid_day_off::update_paid_day_off))
                .route(web::delete().to(paid_day_off::delete_paid_day_off)),
        ),
    )
    .service(
        web::scope("/time")
            .service(web::resource("/parse").route(web::get().to(time::parse_time)))
            .service(web::resource("/format").route(web::get().to(time::format_time))),
    );
}

/// Shared by `/vacations` and `/leaves`; the scope supplies the `PeriodKind`.
fn register_periods(cfg: &mut web::ServiceConfig) {
    cfg
        // ""
        .service(
            web::resource("")
                .route(web::get().to(period::list_periods))
                .route(web::post().to(period::create_period)),
        )
        // /{id}
        .service(
            web::resource("/{id}")
                .route(web::get().to(period::get_period))
                .route(web::put().to(period::update_period))
                .route(web::delete().to(period::delete_period)),
        )
        // /{id}/approve
        .service(web::resource("/{id}/approve").route(web::put().to(period::approve_period)))
        // /{id}/reject
        .service(web::resource("/{id}/reject").route(web::put().to(period::reject_period)));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::service::test_support::{date, fixed_clock};
    use crate::state::AppState;
    use crate::store::InMemoryStore;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = AppState::new(
            Arc::new(InMemoryStore::new()),
            fixed_clock(date(2026, 3, 10)),
        );
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/import").configure(register_import))
            .service(web::scope("/api").configure(register_api))
    }

    async fn send<S>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let response = actix_test::call_service(app, req).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("json body")
        };
        (status, value)
    }

    async fn create_employee<S>(app: &S, name: &str, registration: &str) -> String
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let req = actix_test::TestRequest::post()
            .uri("/api/employees")
            .set_json(json!({
                "full_name": name,
                "registration_number": registration,
                "position": "Analyst"
            }))
            .to_request();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().expect("employee id").to_string()
    }

    #[actix_web::test]
    async fn employee_is_created_with_sanitized_registration() {
        let app = actix_test::init_service(test_app()).await;
        let id = create_employee(&app, "Maria Souza", "123.456-7").await;

        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/employees/{id}"))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["registration_number"], "1234567");
    }

    #[actix_web::test]
    async fn duplicate_registration_is_a_conflict() {
        let app = actix_test::init_service(test_app()).await;
        create_employee(&app, "Maria Souza", "1234567").await;

        let req = actix_test::TestRequest::post()
            .uri("/api/employees")
            .set_json(json!({
                "full_name": "Other",
                "registration_number": "123 456 7",
                "position": "Dev"
            }))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn last_possible_page_lists_nothing() {
        let app = actix_test::init_service(test_app()).await;
        create_employee(&app, "Ana", "1").await;

        let req = actix_test::TestRequest::get()
            .uri("/api/employees?page=4294967295&per_page=100")
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"], json!([]));
    }

    #[actix_web::test]
    async fn missing_position_names_the_field() {
        let app = actix_test::init_service(test_app()).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/employees")
            .set_json(json!({
                "full_name": "Ana",
                "registration_number": "1",
                "position": "  "
            }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "position");
    }

    #[actix_web::test]
    async fn deleting_an_employee_removes_dependents() {
        let app = actix_test::init_service(test_app()).await;
        let id = create_employee(&app, "Ana", "1").await;

        let req = actix_test::TestRequest::post()
            .uri(&format!("/api/employees/{id}/hours"))
            .set_json(json!({"month": 3, "year": 2026, "hours": "02:00"}))
            .to_request();
        let (status, entry) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);

        let req = actix_test::TestRequest::post()
            .uri("/api/leaves")
            .set_json(json!({
                "employee_id": id,
                "start_date": "2026-04-01",
                "end_date": "2026-04-02"
            }))
            .to_request();
        let (status, leave) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/employees/{id}"))
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::OK);

        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/employees/{id}/hours"))
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::NOT_FOUND);

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/hours/{}", entry["id"].as_str().unwrap()))
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::NOT_FOUND);

        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/leaves/{}", leave["id"].as_str().unwrap()))
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case::already_started("2026-03-01", "approved")]
    #[case::starts_today("2026-03-10", "approved")]
    #[case::starts_tomorrow("2026-03-11", "pending")]
    #[actix_web::test]
    async fn vacation_status_follows_the_start_date(
        #[case] start: &str,
        #[case] expected: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;
        let id = create_employee(&app, "Ana", "1").await;

        let req = actix_test::TestRequest::post()
            .uri("/api/vacations")
            .set_json(json!({
                "employee_id": id,
                "start_date": start,
                "end_date": "2026-12-31"
            }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], expected);
    }

    #[actix_web::test]
    async fn pending_leave_can_be_decided_once() {
        let app = actix_test::init_service(test_app()).await;
        let id = create_employee(&app, "Ana", "1").await;

        let req = actix_test::TestRequest::post()
            .uri("/api/leaves")
            .set_json(json!({
                "employee_id": id,
                "start_date": "2026-05-01",
                "end_date": "2026-05-03"
            }))
            .to_request();
        let (_, leave) = send(&app, req).await;
        let leave_id = leave["id"].as_str().unwrap().to_string();

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/leaves/{leave_id}/reject"))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "rejected");

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/leaves/{leave_id}/approve"))
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::CONFLICT);

        // vacations and leaves never share ids
        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/vacations/{leave_id}"))
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn text_import_reports_skipped_rows() {
        let app = actix_test::init_service(test_app()).await;
        create_employee(&app, "Existing", "999").await;

        let req = actix_test::TestRequest::post()
            .uri("/api/import/employees/text")
            .set_json(json!({
                "content": "name,registration,position\nA,111-22,Dev\nB,11122,QA\nC,9.9.9,Ops\nonly,two",
                "has_header": true
            }))
            .to_request();
        let (status, report) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["total_rows"], 3);
        assert_eq!(report["created"], 1);
        assert_eq!(report["duplicates"][0]["row"], 2);
        assert_eq!(report["duplicates"][0]["reason"], "registration already exists");
        assert_eq!(report["duplicates"][1]["registration_number"], "9.9.9");

        let req = actix_test::TestRequest::get()
            .uri("/api/employees?search=111")
            .to_request();
        let (_, list) = send(&app, req).await;
        assert_eq!(list["total"], 1);
    }

    #[actix_web::test]
    async fn paid_day_off_statement_defaults_to_clock_year() {
        let app = actix_test::init_service(test_app()).await;
        let id = create_employee(&app, "Ana", "1").await;

        for (day, hours, initial) in [
            ("2026-01-05", "08:00", Some("40:00")),
            ("2026-02-05", "04:00", None),
            ("2025-06-05", "08:00", Some("16:00")),
        ] {
            let req = actix_test::TestRequest::post()
                .uri(&format!("/api/employees/{id}/paid-days-off"))
                .set_json(json!({"date": day, "hours": hours, "initial_hours": initial}))
                .to_request();
            assert_eq!(send(&app, req).await.0, StatusCode::CREATED);
        }

        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/employees/{id}/paid-days-off"))
            .to_request();
        let (status, statement) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(statement["year"], 2026);
        assert_eq!(statement["balance"], "28:00");
    }

    #[rstest]
    #[case("/api/time/parse?text=0730", json!({"minutes": 450, "valid": false, "formatted": "07:30"}))]
    #[case("/api/time/parse?text=-1:05&allow_negative=true", json!({"minutes": -65, "valid": true, "formatted": "-01:05"}))]
    #[case("/api/time/format?minutes=-65", json!({"text": "-01:05"}))]
    #[actix_web::test]
    async fn time_helpers(#[case] uri: &str, #[case] expected: Value) {
        let app = actix_test::init_service(test_app()).await;
        let req = actix_test::TestRequest::get().uri(uri).to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, expected);
    }

    #[test]
    fn zero_rate_limit_still_builds() {
        assert!(build_limiter(0).is_ok());
        assert!(build_limiter(1000).is_ok());
    }
}
