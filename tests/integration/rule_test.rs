//! Integration tests for rule group deletion.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_deleting_a_parent_rule_removes_children_but_keeps_alerts() {
    let app = helpers::TestApp::new().await;
    let parent = app
        .create_rule("parent rule", "gross_revenue", "gt", 500.0, None)
        .await;
    let child = app
        .create_rule("child rule", "net_revenue", "lt", 100.0, Some(parent))
        .await;
    app.insert_alert(parent, "brand-cascade").await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/watchtower/rules/{parent}"),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // The whole group is gone; the historical alert survives orphaned.
    assert!(!app.rule_exists(parent).await);
    assert!(!app.rule_exists(child).await);
    assert_eq!(app.count_alerts(parent).await, 1);
}
