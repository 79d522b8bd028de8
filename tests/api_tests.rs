// HTTP API tests over the in-memory store

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use local_jobs::core::{DistanceEngine, DistanceMethod, JobMatcher, ServiceArea};
use local_jobs::models::{Actor, Address, Location, Role};
use local_jobs::routes::{self, AppState, TokenVerifier};
use local_jobs::services::{Geocoded, Geocoder, JobBoard, MemoryStore, UnresolvedReason};

const SECRET: &[u8] = b"api-test-secret";

/// Resolves every street except "Unknown Street" to central Lagos
struct LagosGeocoder;

#[async_trait]
impl Geocoder for LagosGeocoder {
    async fn geocode(&self, address: &Address) -> Geocoded {
        if address.street == "Unknown Street" {
            Geocoded::Unresolved(UnresolvedReason::NoMatch)
        } else {
            Geocoded::Resolved(Location { latitude: 6.5244, longitude: 3.3792 })
        }
    }
}

fn token(user_id: i64, role: Role) -> String {
    let expires = (chrono::Utc::now().timestamp() + 3600) as usize;
    let jwt = TokenVerifier::new(SECRET)
        .issue(Actor::new(user_id, role), expires)
        .unwrap();
    format!("Bearer {}", jwt)
}

fn configure_app(cfg: &mut web::ServiceConfig) {
    let center = Location::new(6.5244, 3.3792).unwrap();
    let area = ServiceArea::new(center, 50.0).unwrap();
    let matcher = JobMatcher::new(DistanceEngine::new(area, DistanceMethod::Geodesic));
    let board = JobBoard::new(Arc::new(MemoryStore::new()), Arc::new(LagosGeocoder), matcher);

    cfg.app_data(web::Data::new(AppState {
        board: Arc::new(board),
    }))
    .app_data(web::Data::new(TokenVerifier::new(SECRET)))
    .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
    .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error));

    routes::configure_routes(cfg);
}

fn job_body(street: &str) -> Value {
    json!({
        "title": "Dispatch Rider",
        "description": "Deliver parcels on the island",
        "category": "transportation",
        "employmentType": "full_time",
        "salaryMin": 70000,
        "streetAddress": street,
        "city": "Lagos",
        "postalCode": "101241"
    })
}

#[actix_web::test]
async fn test_health_is_public() {
    let app = test::init_service(App::new().configure(configure_app)).await;
    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_missing_token_is_unauthorized() {
    let app = test::init_service(App::new().configure(configure_app)).await;
    let req = test::TestRequest::get().uri("/api/v1/jobs/search").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["status_code"], 401);
}

#[actix_web::test]
async fn test_seeker_cannot_post_jobs() {
    let app = test::init_service(App::new().configure(configure_app)).await;
    let req = test::TestRequest::post()
        .uri("/api/v1/jobs")
        .insert_header(("Authorization", token(5, Role::JobSeeker)))
        .set_json(job_body("1 Marina"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_unresolved_address_is_unprocessable() {
    let app = test::init_service(App::new().configure(configure_app)).await;
    let req = test::TestRequest::post()
        .uri("/api/v1/jobs")
        .insert_header(("Authorization", token(1, Role::Employer)))
        .set_json(job_body("Unknown Street"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "address_unresolved");
}

#[actix_web::test]
async fn test_malformed_payloads_use_error_shape() {
    let app = test::init_service(App::new().configure(configure_app)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/jobs")
        .insert_header(("Authorization", token(1, Role::Employer)))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");

    let req = test::TestRequest::get()
        .uri("/api/v1/jobs/search?radius=far")
        .insert_header(("Authorization", token(5, Role::JobSeeker)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_query");
}

#[actix_web::test]
async fn test_post_search_apply_flow() {
    let app = test::init_service(App::new().configure(configure_app)).await;
    let employer = token(1, Role::Employer);
    let seeker = token(5, Role::JobSeeker);

    let req = test::TestRequest::post()
        .uri("/api/v1/jobs")
        .insert_header(("Authorization", employer.clone()))
        .set_json(job_body("1 Marina"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let job: Value = test::read_body_json(resp).await;
    let job_id = job["id"].as_i64().unwrap();
    assert_eq!(job["status"], "active");

    let req = test::TestRequest::put()
        .uri("/api/v1/profile/location")
        .insert_header(("Authorization", seeker.clone()))
        .set_json(json!({"streetAddress": "4 Broad Street", "city": "Lagos", "postalCode": "102273"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/jobs/search?keyword=rider&radius=10")
        .insert_header(("Authorization", seeker.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let results: Value = test::read_body_json(resp).await;
    assert_eq!(results["totalResults"], 1);
    assert_eq!(results["jobs"][0]["job"]["id"], job_id);
    assert_eq!(results["jobs"][0]["distanceKm"], 0.0);

    let apply_uri = format!("/api/v1/jobs/{}/applications", job_id);
    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri(&apply_uri)
            .insert_header(("Authorization", seeker.clone()))
            .set_json(json!({"coverLetter": "I know the island well"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/employer/analytics")
        .insert_header(("Authorization", employer.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let snapshot: Value = test::read_body_json(resp).await;
    assert_eq!(snapshot["totalApplications"], 1);
    assert_eq!(snapshot["mostPopularJob"]["title"], "Dispatch Rider");

    let req = test::TestRequest::get()
        .uri(&apply_uri)
        .insert_header(("Authorization", token(2, Role::Employer)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
