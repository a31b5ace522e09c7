//! Integration tests for the cron trigger endpoint.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_cron_trigger_requires_the_shared_key() {
    let app = helpers::TestApp::new().await;
    let rule_id = app
        .create_rule("cron rule", "gross_revenue", "gt", 500.0, None)
        .await;
    app.insert_finance_row("brand-cron", 900.0).await;

    let denied = app
        .request("GET", "/api/watchtower/cron?schedule=daily&key=wrong", None)
        .await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.count_alerts(rule_id).await, 0);

    let path = format!(
        "/api/watchtower/cron?schedule=daily&key={}",
        app.cron_key
    );
    let allowed = app.request("GET", &path, None).await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(
        allowed.body["data"]["alerts_created"],
        serde_json::json!(1)
    );
    assert_eq!(app.count_alerts(rule_id).await, 1);
}
