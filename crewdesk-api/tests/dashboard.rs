/// Dashboard statistics tests
///
/// Covers the admin and member shapes, zero-filled status buckets, the
/// due-today window, and the appended unread counter.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn admin_stats_cover_the_whole_system() {
    let ctx = TestContext::new();
    let (admin, _) = common::signup(&ctx.app, "admin@example.com", "Admin", "admin").await;
    let (a_token, a) = common::signup(&ctx.app, "a@example.com", "A", "team_member").await;
    let project_id = common::create_project(&ctx.app, &admin, "Apollo", &[a]).await;

    let t1 = common::create_task(&ctx.app, &admin, project_id, "one", None).await;
    common::create_task(&ctx.app, &admin, project_id, "two", None).await;
    common::put(
        &ctx.app,
        &format!("/api/tasks/{t1}"),
        Some(admin.as_str()),
        Some(json!({ "status": "done" })),
    )
    .await;

    let (status, body) = common::get(&ctx.app, "/api/dashboard/stats", Some(admin.as_str())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_projects"], 1);
    assert_eq!(body["total_tasks"], 2);
    assert_eq!(body["total_users"], 2);
    // All three buckets present, zero-filled where empty.
    assert_eq!(
        body["tasks_by_status"],
        json!({ "todo": 1, "in_progress": 0, "done": 1 })
    );
    assert_eq!(body["tasks_due_today"], 0);
    assert_eq!(body["unread_notifications"], 0);

    // The status change above notified A, not the admin actor.
    let (_, member_view) = common::get(&ctx.app, "/api/dashboard/stats", Some(a_token.as_str())).await;
    assert_eq!(member_view["unread_notifications"], 2);
}

#[tokio::test]
async fn member_stats_are_scoped_to_their_work() {
    let ctx = TestContext::new();
    let (admin, _) = common::signup(&ctx.app, "admin@example.com", "Admin", "admin").await;
    let (a_token, a) = common::signup(&ctx.app, "a@example.com", "A", "team_member").await;
    let (_, b) = common::signup(&ctx.app, "b@example.com", "B", "team_member").await;
    let mine = common::create_project(&ctx.app, &admin, "Mine", &[a, b]).await;
    common::create_project(&ctx.app, &admin, "Not mine", &[b]).await;

    common::create_task(&ctx.app, &admin, mine, "assigned to a", Some(a)).await;
    common::create_task(&ctx.app, &admin, mine, "someone else's", Some(b)).await;

    let (status, body) = common::get(&ctx.app, "/api/dashboard/stats", Some(a_token.as_str())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["my_projects"], 1);
    assert_eq!(body["my_total_tasks"], 1);
    assert_eq!(
        body["my_tasks_by_status"],
        json!({ "todo": 1, "in_progress": 0, "done": 0 })
    );
    // The member shape never carries admin totals.
    assert!(body.get("total_users").is_none());
}

#[tokio::test]
async fn due_today_counts_open_tasks_in_the_utc_day() {
    let ctx = TestContext::new();
    let (admin, _) = common::signup(&ctx.app, "admin@example.com", "Admin", "admin").await;
    let (a_token, a) = common::signup(&ctx.app, "a@example.com", "A", "team_member").await;
    let project_id = common::create_project(&ctx.app, &admin, "Apollo", &[a]).await;

    let make_task = |title: &str, due: chrono::DateTime<Utc>, assignee: uuid::Uuid| {
        json!({
            "title": title,
            "description": "",
            "project_id": project_id.to_string(),
            "assigned_to": assignee.to_string(),
            "due_date": due.to_rfc3339(),
        })
    };

    let (status, due_now) = common::post(
        &ctx.app,
        "/api/tasks",
        Some(admin.as_str()),
        make_task("due now", Utc::now(), a),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    common::post(
        &ctx.app,
        "/api/tasks",
        Some(admin.as_str()),
        make_task("due next week", Utc::now() + Duration::days(7), a),
    )
    .await;

    let (_, body) = common::get(&ctx.app, "/api/dashboard/stats", Some(admin.as_str())).await;
    assert_eq!(body["tasks_due_today"], 1);

    let (_, body) = common::get(&ctx.app, "/api/dashboard/stats", Some(a_token.as_str())).await;
    assert_eq!(body["my_tasks_due_today"], 1);

    // Done tasks drop out of the due-today count.
    let task_id = due_now["id"].as_str().unwrap();
    common::put(
        &ctx.app,
        &format!("/api/tasks/{task_id}"),
        Some(admin.as_str()),
        Some(json!({ "status": "done" })),
    )
    .await;

    let (_, body) = common::get(&ctx.app, "/api/dashboard/stats", Some(admin.as_str())).await;
    assert_eq!(body["tasks_due_today"], 0);
}
