/// Comment tests
///
/// Covers posting, ordered listing with author details, stakeholder
/// fanout, and delete permissions.

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;
use uuid::Uuid;

async fn setup() -> (TestContext, String, String, String, Uuid) {
    let ctx = TestContext::new();
    let (admin, _) = common::signup(&ctx.app, "admin@example.com", "Admin", "admin").await;
    let (a_token, a) = common::signup(&ctx.app, "a@example.com", "Ada Lovelace", "team_member").await;
    let (b_token, b) = common::signup(&ctx.app, "b@example.com", "B", "team_member").await;
    let project_id = common::create_project(&ctx.app, &admin, "Apollo", &[a, b]).await;
    let task_id = common::create_task(&ctx.app, &admin, project_id, "Ship", None).await;
    (ctx, admin, a_token, b_token, task_id)
}

#[tokio::test]
async fn comments_list_in_posting_order_with_authors() {
    let (ctx, _, a_token, b_token, task_id) = setup().await;

    for (token, text) in [(&a_token, "first"), (&b_token, "second"), (&a_token, "third")] {
        let (status, _) = common::post(
            &ctx.app,
            "/api/comments",
            Some(token.as_str()),
            json!({ "task_id": task_id.to_string(), "content": text }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) =
        common::get(&ctx.app, &format!("/api/comments/{task_id}"), Some(a_token.as_str())).await;
    assert_eq!(status, StatusCode::OK);
    let comments = body.as_array().unwrap();
    assert_eq!(comments.len(), 3);
    assert_eq!(comments[0]["content"], "first");
    assert_eq!(comments[1]["content"], "second");
    assert_eq!(comments[2]["content"], "third");
    assert_eq!(comments[0]["author_details"]["full_name"], "Ada Lovelace");
    assert_eq!(comments[1]["author_details"]["email"], "b@example.com");
}

#[tokio::test]
async fn commenting_notifies_stakeholders_but_not_the_author() {
    let (ctx, admin, a_token, b_token, task_id) = setup().await;

    let (status, _) = common::post(
        &ctx.app,
        "/api/comments",
        Some(a_token.as_str()),
        json!({ "task_id": task_id.to_string(), "content": "heads up" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for token in [&admin, &b_token] {
        let commented: Vec<_> = common::notifications_of(&ctx.app, token)
            .await
            .into_iter()
            .filter(|n| n["type"] == "comment_added")
            .collect();
        assert_eq!(commented.len(), 1);
        assert_eq!(
            commented[0]["message"],
            "Ada Lovelace commented on task \"Ship\""
        );
    }

    let own = common::notifications_of(&ctx.app, &a_token)
        .await
        .into_iter()
        .filter(|n| n["type"] == "comment_added")
        .count();
    assert_eq!(own, 0);
}

#[tokio::test]
async fn outsiders_cannot_comment_or_read_comments() {
    let (ctx, _, _, _, task_id) = setup().await;
    let (outsider, _) = common::signup(&ctx.app, "out@example.com", "Out", "team_member").await;

    let (status, body) = common::post(
        &ctx.app,
        "/api/comments",
        Some(outsider.as_str()),
        json!({ "task_id": task_id.to_string(), "content": "hi" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied to comment on this task");

    let (status, body) =
        common::get(&ctx.app, &format!("/api/comments/{task_id}"), Some(outsider.as_str())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied to view comments on this task");
}

#[tokio::test]
async fn empty_comment_is_rejected() {
    let (ctx, _, a_token, _, task_id) = setup().await;
    let (status, _) = common::post(
        &ctx.app,
        "/api/comments",
        Some(a_token.as_str()),
        json!({ "task_id": task_id.to_string(), "content": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_author_or_an_admin_deletes() {
    let (ctx, admin, a_token, b_token, task_id) = setup().await;

    let (_, created) = common::post(
        &ctx.app,
        "/api/comments",
        Some(a_token.as_str()),
        json!({ "task_id": task_id.to_string(), "content": "mine" }),
    )
    .await;
    let comment_id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/comments/{comment_id}");

    let (status, body) = common::delete(&ctx.app, &uri, Some(b_token.as_str())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Permission denied to delete this comment");

    let (status, _) = common::delete(&ctx.app, &uri, Some(a_token.as_str())).await;
    assert_eq!(status, StatusCode::OK);

    // Admin can delete someone else's comment.
    let (_, created) = common::post(
        &ctx.app,
        "/api/comments",
        Some(b_token.as_str()),
        json!({ "task_id": task_id.to_string(), "content": "b's" }),
    )
    .await;
    let comment_id = created["id"].as_str().unwrap().to_string();
    let (status, _) =
        common::delete(&ctx.app, &format!("/api/comments/{comment_id}"), Some(admin.as_str())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::delete(
        &ctx.app,
        &format!("/api/comments/{}", Uuid::new_v4()),
        Some(admin.as_str()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
