//! Dependency-checked resident deletion.

use salvo::http::StatusCode;
use serde_json::json;

use courtyard_test::component::catalog::CatalogStore;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn blocked_deletion_lists_every_kind_of_content() {
    let app = TestApp::new().await;

    let body = app
        .send(TestRequest::delete(&format!("/admin/residents/{MODERATOR}")).actor(ADMIN))
        .await
        .assert_status(StatusCode::PRECONDITION_FAILED)
        .json();

    assert_eq!(
        body["blocked"],
        json!([{
            "resident_id": MODERATOR,
            "counts": {"publications": 2, "listings": 0, "news": 1}
        }])
    );
}

#[tokio::test]
async fn bulk_delete_reports_all_blockers_and_keeps_everyone() {
    let app = TestApp::new().await;

    let body = app
        .send(
            TestRequest::post("/admin/residents/bulk-delete")
                .actor(ADMIN)
                .json(&json!({"ids": [IDLE, AUTHOR, MODERATOR]})),
        )
        .await
        .assert_status(StatusCode::PRECONDITION_FAILED)
        .json();

    assert_eq!(body["blocked"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        body["blocked"][0]["counts"],
        json!({"publications": 3, "listings": 1, "news": 0})
    );
    assert!(app.store.resident(IDLE).await.unwrap().is_some());
}

#[tokio::test]
async fn idle_resident_is_deleted_once() {
    let app = TestApp::new().await;

    let body = app
        .send(
            TestRequest::post("/admin/residents/bulk-delete")
                .actor(ADMIN)
                .json(&json!({"ids": [IDLE]})),
        )
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["deleted"][0]["display_name"], "Deniz");

    app.send(TestRequest::delete(&format!("/admin/residents/{IDLE}")).actor(ADMIN))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_actor_loses_access() {
    let app = TestApp::new().await;

    app.send(TestRequest::delete(&format!("/admin/residents/{IDLE}")).actor(ADMIN))
        .await
        .assert_status(StatusCode::OK);

    app.send(
        TestRequest::post(&format!("/publications/{ASSEMBLY}/moderation"))
            .actor(IDLE)
            .json(&json!({"action": "withdraw"})),
    )
    .await
    .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_admins_cannot_delete() {
    let app = TestApp::new().await;

    app.send(TestRequest::delete(&format!("/admin/residents/{IDLE}")).actor(MODERATOR))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    app.send(TestRequest::delete(&format!("/admin/residents/{IDLE}")))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.send(TestRequest::delete(&format!("/admin/residents/{ADMIN}")).actor(ADMIN))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
