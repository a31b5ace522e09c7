//! Integration tests for the evaluation job's alert deduplication.

mod helpers;

use watchtower_entity::rule::Schedule;

#[tokio::test]
async fn test_rerun_over_unchanged_data_creates_no_duplicate_alerts() {
    let app = helpers::TestApp::new().await;
    let rule_id = app
        .create_rule("revenue spike", "gross_revenue", "gt", 500.0, None)
        .await;
    app.insert_finance_row("brand-dedup", 900.0).await;

    let first = app
        .state
        .evaluation_job
        .run(Schedule::Daily)
        .await
        .expect("first run failed");
    assert_eq!(first.rules_processed, 1);
    assert_eq!(first.alerts_created, 1);
    assert_eq!(app.count_alerts(rule_id).await, 1);

    // Unchanged data and an open alert for the pair: nothing new.
    let second = app
        .state
        .evaluation_job
        .run(Schedule::Daily)
        .await
        .expect("second run failed");
    assert_eq!(second.alerts_created, 0);
    assert_eq!(app.count_alerts(rule_id).await, 1);

    // Acknowledging the alert reopens the (rule, entity) pair.
    let alert_id = app.latest_alert_id(rule_id).await;
    sqlx::query(
        "UPDATE alerts SET is_acknowledged = TRUE, acknowledged_at = NOW() WHERE id = $1",
    )
    .bind(alert_id)
    .execute(&app.db_pool)
    .await
    .expect("Failed to acknowledge alert");

    let third = app
        .state
        .evaluation_job
        .run(Schedule::Daily)
        .await
        .expect("third run failed");
    assert_eq!(third.alerts_created, 1);
    assert_eq!(app.count_alerts(rule_id).await, 2);
}
