//! Integration tests for alert acknowledgement.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_acknowledge_is_idempotent() {
    let app = helpers::TestApp::new().await;
    let rule_id = app
        .create_rule("ack rule", "gross_revenue", "gt", 500.0, None)
        .await;
    let alert_id = app.insert_alert(rule_id, "brand-ack").await;

    let path = format!("/api/watchtower/alerts/{alert_id}/acknowledge");
    let body = serde_json::json!({ "acknowledged_by": "ops" });

    let first = app.request("PUT", &path, Some(body.clone())).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(
        first.body["data"]["is_acknowledged"],
        serde_json::json!(true)
    );
    let first_acknowledged_at = first.body["data"]["acknowledged_at"].clone();

    // The second acknowledge succeeds and changes nothing.
    let second = app.request("PUT", &path, Some(body)).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(
        second.body["data"]["is_acknowledged"],
        serde_json::json!(true)
    );
    assert_eq!(
        second.body["data"]["acknowledged_at"],
        first_acknowledged_at
    );
}
