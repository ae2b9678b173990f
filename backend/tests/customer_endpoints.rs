//! End-to-end HTTP tests for the customer API over the in-memory store.

mod support;

use std::sync::Arc;

use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::{Value, json};

use customer_api::domain::ports::FixtureLocationLookup;
use customer_api::inbound::http::health::HealthState;
use support::{IBM_ID, MICROSOFT_ID, init_app, send, violation_fields};

const UNKNOWN_ID: &str = "00000000-0000-0000-0000-000000000001";
const NIL_ID: &str = "00000000-0000-0000-0000-000000000000";

fn acme() -> Value {
    json!({
        "name": "Acme",
        "address": "1 Main St",
        "city": "Springfield",
        "region": "",
        "postalCode": "00000",
        "country": "USA"
    })
}

#[rstest]
#[actix_web::test]
async fn create_returns_enriched_customer_with_fresh_id() {
    let app = init_app(false, Arc::new(HealthState::new())).await;

    let created = send(
        &app,
        TestRequest::post()
            .uri("/customers")
            .set_json(acme())
            .to_request(),
    )
    .await;

    assert_eq!(created.status, 200);
    assert_eq!(created.body["name"], "Acme");
    assert_eq!(created.body["region"], FixtureLocationLookup::REGION);
    assert_eq!(created.body["country"], FixtureLocationLookup::COUNTRY);
    assert!(created.body.get("state").is_none());
    let id = created.body["id"].as_str().expect("id").to_owned();
    assert_ne!(id, NIL_ID);

    let fetched = send(
        &app,
        TestRequest::get()
            .uri(&format!("/customers/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.body, created.body);
}

#[rstest]
#[actix_web::test]
async fn create_ids_are_unique() {
    let app = init_app(false, Arc::new(HealthState::new())).await;
    let mut ids = Vec::new();
    for _ in 0..3 {
        let created = send(
            &app,
            TestRequest::post()
                .uri("/customers")
                .set_json(acme())
                .to_request(),
        )
        .await;
        ids.push(created.body["id"].as_str().expect("id").to_owned());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[rstest]
#[actix_web::test]
async fn create_with_missing_fields_fails_validation() {
    let app = init_app(false, Arc::new(HealthState::new())).await;

    let res = send(
        &app,
        TestRequest::post()
            .uri("/customers")
            .set_json(json!({ "name": "Acme" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.content_type.as_deref(), Some("application/problem+json"));
    assert_eq!(res.body["title"], "One or more validation errors occurred");
    assert_eq!(violation_fields(&res.body), ["address", "city", "postalCode"]);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let app = init_app(false, Arc::new(HealthState::new())).await;

    let res = send(
        &app,
        TestRequest::post()
            .uri("/customers")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(res.status, 400);
    assert_eq!(
        res.body["type"],
        "https://example.com/problem-types/invalid_request"
    );
}

#[rstest]
#[actix_web::test]
async fn get_unknown_customer_is_not_found_and_mentions_id() {
    let app = init_app(true, Arc::new(HealthState::new())).await;

    let res = send(
        &app,
        TestRequest::get()
            .uri(&format!("/customers/{UNKNOWN_ID}"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status, 404);
    assert!(
        res.body["detail"]
            .as_str()
            .expect("detail")
            .contains(UNKNOWN_ID)
    );
    assert_eq!(res.body["instance"], format!("/customers/{UNKNOWN_ID}"));
    assert_eq!(
        res.body["extensions"]["trace"].as_str(),
        res.trace_id.as_deref()
    );
}

#[rstest]
#[case("/customers/not-a-uuid")]
#[case("/customers/00000000-0000-0000-0000-000000000000")]
#[actix_web::test]
async fn malformed_or_nil_ids_are_bad_requests(#[case] uri: &str) {
    let app = init_app(true, Arc::new(HealthState::new())).await;
    let res = send(&app, TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status, 400);
}

#[rstest]
#[case("offset=-1", "offset")]
#[case("count=0", "count")]
#[actix_web::test]
async fn list_bounds_are_validated(#[case] query: &str, #[case] field: &str) {
    let app = init_app(true, Arc::new(HealthState::new())).await;

    let res = send(
        &app,
        TestRequest::get()
            .uri(&format!("/customers?{query}"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status, 400);
    assert_eq!(violation_fields(&res.body), [field]);
}

#[rstest]
#[actix_web::test]
async fn list_returns_seeded_customers_in_order() {
    let app = init_app(true, Arc::new(HealthState::new())).await;

    let res = send(
        &app,
        TestRequest::get()
            .uri("/customers?offset=0&count=10")
            .to_request(),
    )
    .await;

    assert_eq!(res.status, 200);
    let ids: Vec<&str> = res
        .body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|customer| customer["id"].as_str())
        .collect();
    assert_eq!(ids, [IBM_ID, MICROSOFT_ID]);
}

#[rstest]
#[actix_web::test]
async fn empty_store_lists_as_no_content() {
    let app = init_app(false, Arc::new(HealthState::new())).await;
    let res = send(&app, TestRequest::get().uri("/customers").to_request()).await;
    assert_eq!(res.status, 204);
    assert_eq!(res.body, Value::Null);
}

#[rstest]
#[actix_web::test]
async fn update_replaces_fields() {
    let app = init_app(true, Arc::new(HealthState::new())).await;

    let res = send(
        &app,
        TestRequest::put()
            .uri(&format!("/customers/{IBM_ID}"))
            .set_json(json!({
                "id": IBM_ID,
                "name": "International Business Machines",
                "address": "1 New Orchard Rd",
                "city": "Armonk",
                "region": "NorthEast",
                "postalCode": "10504",
                "country": "USA"
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["id"], IBM_ID);
    assert_eq!(res.body["name"], "International Business Machines");
    assert_eq!(res.body["postalCode"], "10504");
}

#[rstest]
#[actix_web::test]
async fn update_of_unknown_id_fails_validation_and_changes_nothing() {
    let app = init_app(true, Arc::new(HealthState::new())).await;

    let mut body = acme();
    body["id"] = json!(UNKNOWN_ID);
    let res = send(
        &app,
        TestRequest::put()
            .uri(&format!("/customers/{UNKNOWN_ID}"))
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status, 400);
    assert_eq!(violation_fields(&res.body), ["id"]);

    let list = send(&app, TestRequest::get().uri("/customers").to_request()).await;
    assert_eq!(list.body.as_array().map(Vec::len), Some(2));
}

#[rstest]
#[actix_web::test]
async fn delete_of_unknown_id_with_nil_body_reports_both_violations() {
    let app = init_app(true, Arc::new(HealthState::new())).await;

    let res = send(
        &app,
        TestRequest::delete()
            .uri(&format!("/customers/{UNKNOWN_ID}"))
            .set_json(json!({ "customerId": NIL_ID }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status, 400);
    assert_eq!(violation_fields(&res.body), ["id", "customerId"]);
}

#[rstest]
#[actix_web::test]
async fn delete_returns_customer_then_rejects_repeat() {
    let app = init_app(true, Arc::new(HealthState::new())).await;
    let delete = || {
        TestRequest::delete()
            .uri(&format!("/customers/{MICROSOFT_ID}"))
            .set_json(json!({ "customerId": MICROSOFT_ID }))
            .to_request()
    };

    let first = send(&app, delete()).await;
    assert_eq!(first.status, 200);
    assert_eq!(first.body["name"], "Microsoft");

    let second = send(&app, delete()).await;
    assert_eq!(second.status, 400);
    assert_eq!(violation_fields(&second.body), ["id"]);

    let list = send(&app, TestRequest::get().uri("/customers").to_request()).await;
    assert_eq!(list.body.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn unknown_paths_and_verbs_are_not_found_problems() {
    let app = init_app(true, Arc::new(HealthState::new())).await;

    let unknown_path = send(&app, TestRequest::get().uri("/orders").to_request()).await;
    assert_eq!(unknown_path.status, 404);
    assert_eq!(
        unknown_path.content_type.as_deref(),
        Some("application/problem+json")
    );

    let unknown_verb = send(&app, TestRequest::patch().uri("/customers").to_request()).await;
    assert_eq!(unknown_verb.status, 404);
}

#[rstest]
#[actix_web::test]
async fn readiness_tracks_health_state() {
    let health = Arc::new(HealthState::new());
    let app = init_app(false, Arc::clone(&health)).await;

    let before = send(&app, TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(before.status, 503);

    health.mark_ready();
    let after = send(&app, TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(after.status, 200);
    assert_eq!(after.body["status"], "ok");

    let live = send(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(live.status, 200);
}

#[rstest]
#[actix_web::test]
async fn inbound_trace_id_is_echoed_on_problems() {
    let app = init_app(true, Arc::new(HealthState::new())).await;
    let trace = "9b2f6a52-8a4e-4a3f-9d0c-0b8f2f4d1e11";

    let res = send(
        &app,
        TestRequest::get()
            .uri(&format!("/customers/{UNKNOWN_ID}"))
            .insert_header(("trace-id", trace))
            .to_request(),
    )
    .await;

    assert_eq!(res.trace_id.as_deref(), Some(trace));
    assert_eq!(res.body["extensions"]["trace"], trace);
}
