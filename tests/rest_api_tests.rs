//! End-to-end tests of the HTTP routes
//!
//! Requests go through the full router (including tracing and CORS layers)
//! with `tower::ServiceExt::oneshot`; no socket is opened.

use axum::body::{Body, to_bytes};
use axum::Router;
use axum::http::{Method, Request, StatusCode};
use carepanel::prelude::*;
use serde_json::{Value, json};
use tower::ServiceExt;

fn order(id: &str, number: &str, patient: &str, status: OrderStatus) -> Order {
    Order::new(
        id,
        status,
        number.to_string(),
        patient.to_string(),
        "patient@example.com".to_string(),
        Some("Dr. Lee".to_string()),
        "Protein Blend".to_string(),
        1,
        29.99,
    )
}

fn plan(id: &str, name: &str) -> SubscriptionPlan {
    SubscriptionPlan::new(id, PlanStatus::Draft, name.to_string(), None, 49.0, "monthly".to_string())
}

fn app() -> Router {
    builder().build().unwrap()
}

fn builder() -> ServerBuilder {
    let orders = vec![
        order("1", "ORD-1", "Sarah Johnson", OrderStatus::Pending),
        order("2", "ORD-2", "Mike Chen", OrderStatus::Shipped),
    ];
    ServerBuilder::new()
        .with_event_bus(16)
        .register_collection(orders)
        .unwrap()
        .register_collection(vec![plan("p-1", "Basic"), plan("p-2", "Plus")])
        .unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// =============================================================================
// Read routes
// =============================================================================

mod read_tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_list_with_search() {
        let (status, body) = send(app(), Method::GET, "/orders?q=sarah", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_filtered_count"], 1);
        assert_eq!(body["visible_records"][0]["order_number"], "ORD-1");
        assert_eq!(body["visible_records"][0]["badge"]["label"], "Pending");
        assert_eq!(body["pagination"]["total_pages"], 1);
    }

    #[tokio::test]
    async fn test_list_with_status_filter() {
        let (status, body) = send(app(), Method::GET, "/orders?status=shipped", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_filtered_count"], 1);
        assert_eq!(body["visible_records"][0]["id"], "2");
    }

    #[tokio::test]
    async fn test_list_clamps_page() {
        let (status, body) = send(app(), Method::GET, "/orders?page=9&page_size=1", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_page"], 2);
        assert_eq!(body["total_pages"], 2);
        assert_eq!(body["pagination"]["has_next"], false);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_page() {
        let (status, body) = send(app(), Method::GET, "/orders?page=abc", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_record() {
        let (status, body) = send(app(), Method::GET, "/orders/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["patient_name"], "Mike Chen");

        let (status, body) = send(app(), Method::GET, "/orders/404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "RECORD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_transitions() {
        let (status, body) = send(app(), Method::GET, "/orders/1/transitions", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "pending");
        assert_eq!(body["allowed"], json!(["confirmed", "cancelled"]));
    }
}

// =============================================================================
// Write routes
// =============================================================================

mod write_tests {
    use super::*;

    #[tokio::test]
    async fn test_status_change_lifecycle() {
        let app = app();

        let (status, body) = send(
            app.clone(),
            Method::POST,
            "/orders/1/status",
            Some(json!({ "status": "confirmed" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "confirmed");

        let (status, body) = send(app.clone(), Method::GET, "/orders/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "confirmed");

        let (status, body) = send(
            app,
            Method::POST,
            "/orders/1/status",
            Some(json!({ "status": "delivered" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "INVALID_TRANSITION");
        assert_eq!(body["details"]["allowed"], json!(["processing", "cancelled"]));
    }

    #[tokio::test]
    async fn test_unknown_status_is_bad_request() {
        let (status, body) = send(
            app(),
            Method::POST,
            "/orders/1/status",
            Some(json!({ "status": "all" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "UNKNOWN_STATUS");
    }

    #[tokio::test]
    async fn test_malformed_body_is_validation_error() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/orders/1/status")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"status": "#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_validation_error() {
        let (status, body) = send(app(), Method::POST, "/orders/1/status", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_status_change_on_unknown_id() {
        let (status, _) = send(
            app(),
            Method::POST,
            "/orders/nope/status",
            Some(json!({ "status": "confirmed" })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_plan_is_idempotent() {
        let app = app();

        let (status, _) = send(app.clone(), Method::DELETE, "/subscription-plans/p-1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(app.clone(), Method::DELETE, "/subscription-plans/p-1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(app, Method::GET, "/subscription-plans", None).await;
        assert_eq!(body["total_filtered_count"], 1);
    }

    #[tokio::test]
    async fn test_delete_order_not_allowed() {
        let (status, body) = send(app(), Method::DELETE, "/orders/1", None).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["code"], "DELETE_NOT_SUPPORTED");
    }

    #[tokio::test]
    async fn test_events_are_published() {
        let builder = builder();
        let mut events = builder.event_bus().unwrap().subscribe();
        let app = builder.build().unwrap();

        send(
            app.clone(),
            Method::POST,
            "/subscription-plans/p-2/status",
            Some(json!({ "status": "active" })),
        )
        .await;
        send(app, Method::DELETE, "/subscription-plans/p-1", None).await;

        let first = events.recv().await.unwrap();
        assert_eq!(
            first.event,
            RecordEvent::StatusChanged {
                resource: "subscription-plans".to_string(),
                id: "p-2".to_string(),
                from: "draft".to_string(),
                to: "active".to_string(),
            }
        );

        let second = events.recv().await.unwrap();
        assert_eq!(second.event.action(), "deleted");
        assert_eq!(second.event.record_id(), "p-1");
    }
}

// =============================================================================
// Persistence
// =============================================================================

mod persister_tests {
    use super::*;

    struct OfflinePersister;

    #[async_trait]
    impl RecordPersister<Order> for OfflinePersister {
        async fn persist(&self, _record: Order) -> Result<Order> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn test_persister_failure_keeps_status() {
        let app = ServerBuilder::new()
            .register_collection_with_persister(
                vec![order("1", "ORD-1", "Sarah Johnson", OrderStatus::Pending)],
                OfflinePersister,
            )
            .unwrap()
            .build()
            .unwrap();

        let (status, body) = send(
            app.clone(),
            Method::POST,
            "/orders/1/status",
            Some(json!({ "status": "confirmed" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "PERSISTENCE_FAILED");

        let (_, body) = send(app, Method::GET, "/orders/1", None).await;
        assert_eq!(body["status"], "pending");
    }

    struct RenamingPersister;

    #[async_trait]
    impl RecordPersister<Order> for RenamingPersister {
        async fn persist(&self, record: Order) -> Result<Order> {
            Ok(Order {
                id: "server-99".into(),
                ..record
            })
        }
    }

    #[tokio::test]
    async fn test_persister_rename_is_rejected() {
        let app = ServerBuilder::new()
            .register_collection_with_persister(
                vec![order("1", "ORD-1", "Sarah Johnson", OrderStatus::Pending)],
                RenamingPersister,
            )
            .unwrap()
            .build()
            .unwrap();

        let (status, body) = send(
            app.clone(),
            Method::POST,
            "/orders/1/status",
            Some(json!({ "status": "confirmed" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "PERSISTENCE_FAILED");

        let (_, body) = send(app.clone(), Method::GET, "/orders/1", None).await;
        assert_eq!(body["status"], "pending");
        let (status, _) = send(app, Method::GET, "/orders/server-99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_persister_receives_change() {
        let persister = InMemoryPersister::<Order>::new();
        let app = ServerBuilder::new()
            .register_collection_with_persister(
                vec![order("1", "ORD-1", "Sarah Johnson", OrderStatus::Pending)],
                persister.clone(),
            )
            .unwrap()
            .build()
            .unwrap();

        let (status, _) = send(
            app,
            Method::POST,
            "/orders/1/status",
            Some(json!({ "status": "cancelled" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(persister.get("1").unwrap().unwrap().status, OrderStatus::Cancelled);
    }
}
