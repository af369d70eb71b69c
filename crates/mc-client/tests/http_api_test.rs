//! Integration tests driving `ApiClient` against a real axum server bound to
//! an ephemeral port.

use std::net::SocketAddr;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::json;

use mc_api_types::{NewTask, ReviewRequest, ReviewVerdict, TaskPatch, TaskStatus};
use mc_client::{ApiClient, ClientError, MissionApi};

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn task_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("task {id}"),
        "status": status,
        "priority": "NORMAL",
        "tags": [],
        "comments": [],
        "deliverables": [],
        "created_at": "2024-01-01T00:00:00",
        "updated_at": "2024-01-01T00:00:00",
    })
}

#[tokio::test]
async fn test_fetch_tasks_decodes_collection() {
    let app = Router::new().route(
        "/api/tasks",
        get(|| async { Json(json!([task_json("t1", "INBOX"), task_json("t2", "REVIEW")])) }),
    );
    let addr = serve(app).await;
    let client = ApiClient::new(&format!("http://{addr}"));

    let tasks = client.fetch_tasks().await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, "t1");
    assert_eq!(tasks[1].status, TaskStatus::Review);
}

#[tokio::test]
async fn test_error_detail_is_surfaced() {
    let app = Router::new().route(
        "/api/agents",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"detail": "OpenClaw config not found"})),
            )
        }),
    );
    let addr = serve(app).await;
    let client = ApiClient::new(&format!("http://{addr}"));

    let err = client.fetch_agents().await.unwrap_err();
    match err {
        ClientError::Api { status, detail } => {
            assert_eq!(status, 404);
            assert_eq!(detail, "OpenClaw config not found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_without_detail_falls_back_to_status() {
    let app = Router::new().route(
        "/api/chat",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let addr = serve(app).await;
    let client = ApiClient::new(&format!("http://{addr}"));

    let err = client.fetch_chat().await.unwrap_err();
    match err {
        ClientError::Api { status, detail } => {
            assert_eq!(status, 500);
            assert_eq!(detail, "HTTP 500");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_and_patch_round_trip_bodies() {
    let app = Router::new()
        .route(
            "/api/tasks",
            post(|Json(body): Json<serde_json::Value>| async move {
                // Echo the submitted title back so the test can see what was
                // actually sent over the wire.
                assert_eq!(body.get("priority").unwrap(), "URGENT");
                assert!(body.get("description").is_none());
                Json(task_json(body["title"].as_str().unwrap(), "INBOX"))
            }),
        )
        .route(
            "/api/tasks/{id}",
            patch(
                |Path(id): Path<String>, Json(body): Json<serde_json::Value>| async move {
                    assert_eq!(body, json!({"status": "ASSIGNED"}));
                    Json(task_json(&id, "ASSIGNED"))
                },
            ),
        );
    let addr = serve(app).await;
    let client = ApiClient::new(&format!("http://{addr}"));

    let created = client
        .create_task(&NewTask {
            title: "t-echo".into(),
            priority: mc_api_types::Priority::Urgent,
            ..NewTask::default()
        })
        .await
        .unwrap();
    assert_eq!(created.id, "t-echo");

    let patched = client
        .update_task("t1", &TaskPatch::status(TaskStatus::Assigned))
        .await
        .unwrap();
    assert_eq!(patched.status, TaskStatus::Assigned);
}

#[tokio::test]
async fn test_review_and_delete() {
    let app = Router::new()
        .route(
            "/api/tasks/{id}/review",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["action"], "approve");
                Json(json!({"ok": true, "status": "DONE"}))
            }),
        )
        .route(
            "/api/tasks/{id}",
            delete(|| async { Json(json!({"ok": true})) }),
        );
    let addr = serve(app).await;
    let client = ApiClient::new(&format!("http://{addr}"));

    client
        .review_task(
            "t1",
            &ReviewRequest {
                action: ReviewVerdict::Approve,
                reviewer: None,
                feedback: None,
            },
        )
        .await
        .unwrap();
    client.delete_task("t1").await.unwrap();
}

#[tokio::test]
async fn test_transport_error_has_no_status() {
    // Nothing is listening here.
    let client = ApiClient::new("http://127.0.0.1:1");
    let err = client.fetch_stats().await.unwrap_err();
    assert!(err.status().is_none());
}
