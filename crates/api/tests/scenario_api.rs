//! HTTP-level integration tests for the scenario API.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_scenario, delete, get, post, post_json, put_json,
    seed_project, seed_resource, seed_role, seed_skill,
};
use serde_json::json;
use sqlx::PgPool;

fn allocation_body(resource_id: i64, project_id: i64, utilization: i64) -> serde_json::Value {
    json!({
        "resource_id": resource_id,
        "allocation_data": {
            "project_id": project_id,
            "start_date": "2024-01-01",
            "end_date": "2024-01-31",
            "utilization": utilization,
        }
    })
}

// ---------------------------------------------------------------------------
// Scenario CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_scenario_returns_201(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/scenarios",
        json!({
            "name": "  Hire two devs ",
            "description": "Q3 staffing",
            "start_date": "2024-07-01",
            "end_date": "2024-09-30",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Hire two devs");
    assert_eq!(json["data"]["scenario_type"], "WHATIF");
    assert_eq!(json["data"]["is_active"], true);
    assert!(json["data"]["metrics_data"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_scenario_missing_fields_returns_400(pool: PgPool) {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/scenarios",
        json!({ "start_date": "2024-01-01", "end_date": "2024-02-01" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/scenarios",
        json!({ "name": "No dates" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        build_test_app(pool),
        "/api/v1/scenarios",
        json!({ "name": "Backwards", "start_date": "2024-02-01", "end_date": "2024-01-01" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_unknown_base_returns_404(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/scenarios",
        json!({
            "name": "Orphan",
            "base_scenario_id": 999_999,
            "start_date": "2024-01-01",
            "end_date": "2024-12-31",
            "clone_from_base_scenario": true,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_clone_from_base_scenario(pool: PgPool) {
    let alice = seed_resource(&pool, "Alice", None, Some(50.0), None).await;
    let apollo = seed_project(&pool, "Apollo").await;
    let base = create_scenario(&pool, "Base").await;
    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/scenarios/{base}/resources"),
        allocation_body(alice, apollo, 60),
    )
    .await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/scenarios",
        json!({
            "name": "Clone",
            "base_scenario_id": base,
            "start_date": "2024-01-01",
            "end_date": "2024-12-31",
            "clone_from_base_scenario": true,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let clone = body_json(response).await["data"]["id"].as_i64().unwrap();

    let json = body_json(
        get(
            build_test_app(pool),
            &format!("/api/v1/scenarios/{clone}/allocations"),
        )
        .await,
    )
    .await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["resource_id"], alice);
    assert_eq!(rows[0]["project_id"], apollo);
    assert_eq!(rows[0]["utilization"], 60);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_scenario_detail_and_list(pool: PgPool) {
    let apollo = seed_project(&pool, "Apollo").await;
    let id = create_scenario(&pool, "Detail").await;
    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/scenarios/{id}/projects/{apollo}/timeline"),
        json!({ "new_start_date": "2024-02-01", "new_end_date": "2024-07-31" }),
    )
    .await;

    let response = get(build_test_app(pool.clone()), &format!("/api/v1/scenarios/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Detail");
    assert_eq!(json["data"]["allocations"], json!([]));
    assert_eq!(json["data"]["timeline_changes"].as_array().unwrap().len(), 1);
    assert_eq!(
        json["data"]["timeline_changes"][0]["original_start_date"],
        "2024-01-01"
    );

    let json = body_json(get(build_test_app(pool), "/api/v1/scenarios").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detail_tolerates_missing_change_table(pool: PgPool) {
    let id = create_scenario(&pool, "Partial schema").await;
    sqlx::query("DROP TABLE scenario_resource_changes")
        .execute(&pool)
        .await
        .unwrap();

    let response = get(build_test_app(pool), &format!("/api/v1/scenarios/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["resource_changes"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete_scenario(pool: PgPool) {
    let id = create_scenario(&pool, "Editable").await;

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/scenarios/{id}"),
        json!({ "description": "revised", "end_date": "2024-10-31" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["description"], "revised");
    assert_eq!(json["data"]["end_date"], "2024-10-31");

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/scenarios/{id}"),
        json!({ "end_date": "2023-01-01" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete(build_test_app(pool.clone()), &format!("/api/v1/scenarios/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(build_test_app(pool), &format!("/api/v1/scenarios/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Allocations and resource changes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_allocation_upsert_update_and_delete(pool: PgPool) {
    let alice = seed_resource(&pool, "Alice", None, None, None).await;
    let apollo = seed_project(&pool, "Apollo").await;
    let id = create_scenario(&pool, "Allocations").await;
    let uri = format!("/api/v1/scenarios/{id}/resources");

    let first = body_json(
        post_json(build_test_app(pool.clone()), &uri, allocation_body(alice, apollo, 60)).await,
    )
    .await;
    let second = body_json(
        post_json(build_test_app(pool.clone()), &uri, allocation_body(alice, apollo, 75)).await,
    )
    .await;
    assert_eq!(first["data"]["id"], second["data"]["id"]);
    assert_eq!(second["data"]["utilization"], 75);

    let allocation_id = second["data"]["id"].as_i64().unwrap();
    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/scenarios/{id}/allocations/{allocation_id}"),
        json!({ "utilization": 30, "required_skills": [{"id": 1}, "Rust"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["utilization"], 30);
    assert_eq!(json["data"]["required_skills"], json!([{"id": 1}, "Rust"]));

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/scenarios/{id}/allocations/{allocation_id}"),
        json!({ "utilization": 130 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/scenarios/{id}/allocations/{allocation_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(
        build_test_app(pool),
        &format!("/api/v1/scenarios/{id}/allocations/{allocation_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_allocation_for_unknown_resource_returns_404(pool: PgPool) {
    let apollo = seed_project(&pool, "Apollo").await;
    let id = create_scenario(&pool, "Ghost").await;

    let response = post_json(
        build_test_app(pool),
        &format!("/api/v1/scenarios/{id}/resources"),
        allocation_body(424_242, apollo, 50),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resource_changes_recorded_and_listed(pool: PgPool) {
    let engineer = seed_role(&pool, "Engineer").await;
    let alice = seed_resource(&pool, "Alice", Some(engineer), Some(50.0), Some(90.0)).await;
    let id = create_scenario(&pool, "Pool changes").await;
    let uri = format!("/api/v1/scenarios/{id}/resources");

    let response = post_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "change_type": "ADD", "name": "Dana", "role_id": engineer, "skills": ["Rust"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let add = body_json(response).await;
    assert_eq!(add["data"]["change_type"], "ADD");
    assert!(add["data"]["resource_id"].is_null());

    let response = post_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "change_type": "modify", "resource_id": alice, "hourly_rate": 60.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "change_type": "REMOVE" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "change_type": "RENAME", "resource_id": alice }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "change_type": "ADD", "name": "Eve", "role_id": engineer, "skills": [42] }),
    )
    .await;
    assert!(response.status().is_client_error());

    let json = body_json(
        get(
            build_test_app(pool.clone()),
            &format!("/api/v1/scenarios/{id}/resource-changes"),
        )
        .await,
    )
    .await;
    let changes = json["data"].as_array().unwrap();
    assert_eq!(changes.len(), 2);

    let change_id = changes[0]["id"].as_i64().unwrap();
    let response = delete(
        build_test_app(pool),
        &format!("/api/v1/scenarios/{id}/resource-changes/{change_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_timeline_for_unknown_project_returns_404(pool: PgPool) {
    let id = create_scenario(&pool, "Timeline").await;

    let response = post_json(
        build_test_app(pool),
        &format!("/api/v1/scenarios/{id}/projects/999999/timeline"),
        json!({ "new_start_date": "2024-02-01", "new_end_date": "2024-07-31" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_calculate_metrics_sums_utilization(pool: PgPool) {
    let engineer = seed_role(&pool, "Engineer").await;
    let rust = seed_skill(&pool, "Rust").await;
    let alice = seed_resource(&pool, "Alice", Some(engineer), None, None).await;
    let apollo = seed_project(&pool, "Apollo").await;
    let gemini = seed_project(&pool, "Gemini").await;
    let id = create_scenario(&pool, "Overbooked").await;
    let uri = format!("/api/v1/scenarios/{id}/resources");

    let mut first = allocation_body(alice, apollo, 60);
    first["allocation_data"]["hourly_rate"] = json!(50.0);
    first["allocation_data"]["required_skills"] = json!([{ "id": rust }]);
    post_json(build_test_app(pool.clone()), &uri, first).await;
    post_json(build_test_app(pool.clone()), &uri, allocation_body(alice, gemini, 50)).await;

    let response = post(
        build_test_app(pool.clone()),
        &format!("/api/v1/scenarios/{id}/calculate-metrics"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let metrics = &json["data"];

    assert_eq!(metrics["utilization"]["overall"], 110.0);
    let by_alice = &metrics["utilization"]["by_resource"][alice.to_string()];
    assert_eq!(by_alice["total_utilization"], 110.0);
    assert_eq!(by_alice["resource_name"], "Alice");
    assert_eq!(by_alice["role_name"], "Engineer");

    // 30 days -> 21 workdays; 21 * 8 * 0.6 = 100.8 hours at 50/h.
    let cost = metrics["costs"]["by_project"][apollo.to_string()]["cost"]
        .as_f64()
        .unwrap();
    assert!((cost - 5040.0).abs() < 1e-6, "unexpected cost {cost}");
    assert_eq!(metrics["costs"]["margin"], -100.0);
    assert_eq!(metrics["skills"]["coverage_percentage"], 100.0);

    let stored = body_json(
        get(
            build_test_app(pool),
            &format!("/api/v1/scenarios/{id}/metrics"),
        )
        .await,
    )
    .await;
    assert_eq!(stored["data"]["utilization"]["overall"], 110.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stored_metrics_missing_returns_404(pool: PgPool) {
    let id = create_scenario(&pool, "Fresh").await;
    let response = get(build_test_app(pool), &format!("/api/v1/scenarios/{id}/metrics")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_calculate_metrics_unknown_scenario_returns_404(pool: PgPool) {
    let response = post(
        build_test_app(pool),
        "/api/v1/scenarios/999999/calculate-metrics",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

async fn calculated_scenario(pool: &PgPool, name: &str, utilization: i64) -> i64 {
    let resource = seed_resource(pool, name, None, Some(40.0), Some(80.0)).await;
    let project = seed_project(pool, &format!("{name} project")).await;
    let id = create_scenario(pool, name).await;
    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/scenarios/{id}/resources"),
        allocation_body(resource, project, utilization),
    )
    .await;
    let response = post(
        build_test_app(pool.clone()),
        &format!("/api/v1/scenarios/{id}/calculate-metrics"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ephemeral_comparison(pool: PgPool) {
    let a = calculated_scenario(&pool, "A", 40).await;
    let b = calculated_scenario(&pool, "B", 90).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/compare",
        json!({ "scenario_ids": [b, a], "metrics": ["utilization", "costs"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];

    assert_eq!(data["id"], -1);
    let utilization = data["comparison"]["utilization"].as_array().unwrap();
    assert_eq!(utilization.len(), 2);
    assert_eq!(utilization[0]["scenario_id"], b);
    assert_eq!(utilization[0]["overall"], 90.0);
    assert_eq!(utilization[1]["overall"], 40.0);
    assert_eq!(data["comparison"]["costs"].as_array().unwrap().len(), 2);
    assert!(data["comparison"].get("skills").is_none());

    let json = body_json(get(build_test_app(pool), "/api/v1/comparisons").await).await;
    assert_eq!(json["data"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_named_comparison_is_persisted(pool: PgPool) {
    let a = calculated_scenario(&pool, "A", 40).await;
    let b = calculated_scenario(&pool, "B", 90).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/compare",
        json!({ "scenario_ids": [a, b], "metrics": ["skills"], "name": "A vs B" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    assert!(id > 0);

    let json = body_json(
        get(
            build_test_app(pool.clone()),
            &format!("/api/v1/comparisons/{id}"),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["name"], "A vs B");
    assert_eq!(json["data"]["comparison"]["skills"].as_array().unwrap().len(), 2);

    // Comparisons never show up as what-if scenarios.
    let json = body_json(get(build_test_app(pool.clone()), "/api/v1/scenarios").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = post(
        build_test_app(pool),
        &format!("/api/v1/scenarios/{id}/promote"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_compare_rejects_invalid_requests(pool: PgPool) {
    let a = calculated_scenario(&pool, "A", 40).await;
    let uncalculated = create_scenario(&pool, "Raw").await;

    let cases = [
        (json!([a]), json!(["costs"]), StatusCode::BAD_REQUEST),
        (json!([a, a]), json!(["costs"]), StatusCode::BAD_REQUEST),
        (json!([a, uncalculated]), json!([]), StatusCode::BAD_REQUEST),
        (json!([a, uncalculated]), json!(["costs"]), StatusCode::BAD_REQUEST),
        (json!([a, 999_999]), json!(["costs"]), StatusCode::NOT_FOUND),
    ];

    for (ids, metrics, expected) in cases {
        let body = json!({ "scenario_ids": ids, "metrics": metrics, "name": "Rejected" });
        let response = post_json(build_test_app(pool.clone()), "/api/v1/compare", body.clone()).await;
        assert_eq!(response.status(), expected, "request {body}");
    }

    let json = body_json(get(build_test_app(pool.clone()), "/api/v1/comparisons").await).await;
    assert_eq!(json["data"], json!([]));

    let (stored,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM scenarios WHERE scenario_type = 'COMPARISON'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, 0);
}

// ---------------------------------------------------------------------------
// Promotion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_promote_scenario_then_reject_second_promotion(pool: PgPool) {
    let alice = seed_resource(&pool, "Alice", None, Some(50.0), None).await;
    let bob = seed_resource(&pool, "Bob", None, Some(45.0), None).await;
    let apollo = seed_project(&pool, "Apollo").await;
    let id = create_scenario(&pool, "Go live").await;
    let uri = format!("/api/v1/scenarios/{id}/resources");

    post_json(build_test_app(pool.clone()), &uri, allocation_body(alice, apollo, 60)).await;
    post_json(build_test_app(pool.clone()), &uri, allocation_body(bob, apollo, 40)).await;
    post_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "change_type": "REMOVE", "resource_id": bob }),
    )
    .await;
    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/scenarios/{id}/projects/{apollo}/timeline"),
        json!({ "new_start_date": "2024-03-01", "new_end_date": "2024-08-31" }),
    )
    .await;

    let response = post(
        build_test_app(pool.clone()),
        &format!("/api/v1/scenarios/{id}/promote"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["scenario_id"], id);
    assert_eq!(json["data"]["timeline_updates"], 1);
    assert_eq!(json["data"]["allocations_inserted"], 1);
    assert_eq!(json["data"]["allocations_skipped"], 1);

    let (live,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM allocations WHERE project_id = $1")
        .bind(apollo)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(live, 1);

    let json = body_json(get(build_test_app(pool.clone()), &format!("/api/v1/scenarios/{id}")).await).await;
    assert_eq!(json["data"]["is_active"], false);

    let response = post(
        build_test_app(pool),
        &format!("/api/v1/scenarios/{id}/promote"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_promote_unknown_scenario_returns_404(pool: PgPool) {
    let response = post(build_test_app(pool), "/api/v1/scenarios/999999/promote").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
