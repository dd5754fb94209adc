//! Integration tests for the API server.

use std::sync::OnceLock;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use document_store::{DocumentId, InMemoryDocumentStore};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    setup_with_store().0
}

fn setup_with_store() -> (axum::Router, InMemoryDocumentStore) {
    let store = InMemoryDocumentStore::new();
    let state = api::create_state(store.clone());
    let app = api::create_app(state, get_metrics_handle(), Duration::from_secs(5));
    (app, store)
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn create_widget(app: &axum::Router) -> String {
    let response = send(
        app,
        "POST",
        "/products",
        Some(json!({"name": "Widget", "price": 9.99})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["message"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_root_and_health() {
    let app = setup();

    let response = send(&app, "GET", "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "E-commerce API running"
    );

    let response = send(&app, "GET", "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_product_lifecycle() {
    let app = setup();
    let id = create_widget(&app).await;
    assert!(id.parse::<DocumentId>().is_ok());

    // Get
    let response = send(&app, "GET", &format!("/products/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let product = body_json(response).await;
    assert_eq!(product["id"], id.as_str());
    assert_eq!(product["name"], "Widget");
    assert_eq!(product["price"], 9.99);
    assert_eq!(product["in_stock"], true);
    assert_eq!(product["description"], "");
    assert_eq!(product["created_at"], product["updated_at"]);

    // Update
    tokio::time::sleep(Duration::from_millis(5)).await;
    let response = send(
        &app,
        "PUT",
        &format!("/products/{id}"),
        Some(json!({"name": "Widget", "price": 12.99})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "updated");

    let product = body_json(send(&app, "GET", &format!("/products/{id}"), None).await).await;
    assert_eq!(product["price"], 12.99);
    assert_ne!(product["created_at"], product["updated_at"]);

    // Delete
    let response = send(&app, "DELETE", &format!("/products/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "deleted");

    let response = send(&app, "GET", &format!("/products/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_products() {
    let app = setup();
    create_widget(&app).await;
    create_widget(&app).await;

    let response = send(&app, "GET", "/products", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let products = body_json(response).await;
    let products = products.as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p["id"].is_string()));
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let app = setup();
    let missing = DocumentId::new();

    for (method, body) in [
        ("GET", None),
        ("PUT", Some(json!({"name": "Widget", "price": 1.0}))),
        ("DELETE", None),
    ] {
        let response = send(&app, method, &format!("/products/{missing}"), body).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method}");
        assert!(body_json(response).await["error"].is_string());
    }
}

#[tokio::test]
async fn test_malformed_product_id_is_400() {
    let app = setup();

    for method in ["GET", "DELETE"] {
        let response = send(&app, method, "/products/not-an-id", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method}");
    }
}

#[tokio::test]
async fn test_invalid_product_is_422() {
    let (app, store) = setup_with_store();

    let response = send(
        &app,
        "POST",
        "/products",
        Some(json!({"name": "", "price": 1.0})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = send(
        &app,
        "POST",
        "/products",
        Some(json!({"name": "Widget", "price": -1.0})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Missing required field is rejected by the JSON extractor
    let response = send(&app, "POST", "/products", Some(json!({"name": "Widget"}))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(response).await["error"].is_string());

    assert_eq!(store.document_count("product").await, 0);
}

#[tokio::test]
async fn test_cart_merge_scenario() {
    let (app, store) = setup_with_store();

    let response = send(
        &app,
        "POST",
        "/cart/s1/items",
        Some(json!({"product_id": "p1", "quantity": 1})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert!(
        created["message"]
            .as_str()
            .unwrap()
            .parse::<DocumentId>()
            .is_ok()
    );

    let response = send(
        &app,
        "POST",
        "/cart/s1/items",
        Some(json!({"product_id": "p1", "quantity": 2})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "added");

    let cart = body_json(send(&app, "GET", "/cart/s1", None).await).await;
    assert_eq!(
        cart,
        json!({"session_id": "s1", "items": [{"product_id": "p1", "quantity": 3}]})
    );
    assert_eq!(store.document_count("cart").await, 1);
}

#[tokio::test]
async fn test_empty_cart_for_unknown_session() {
    let (app, store) = setup_with_store();

    let response = send(&app, "GET", "/cart/nobody", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"session_id": "nobody", "items": []})
    );
    assert_eq!(store.document_count("cart").await, 0);
}

#[tokio::test]
async fn test_cart_rejects_zero_quantity() {
    let (app, store) = setup_with_store();

    let response = send(
        &app,
        "POST",
        "/cart/s1/items",
        Some(json!({"product_id": "p1", "quantity": 0})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(store.document_count("cart").await, 0);
}

#[tokio::test]
async fn test_rejected_bodies_use_error_shape() {
    let (app, store) = setup_with_store();

    let response = send(
        &app,
        "POST",
        "/cart/s1/items",
        Some(json!({"product_id": "p1", "quantity": -1})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(response).await["error"].is_string());

    let request = Request::builder()
        .method("POST")
        .uri("/orders")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());

    let request = Request::builder()
        .method("POST")
        .uri("/products")
        .body(Body::from(r#"{"name": "Widget", "price": 1.0}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body_json(response).await["error"].is_string());

    assert_eq!(store.document_count("cart").await, 0);
    assert_eq!(store.document_count("order").await, 0);
}

#[tokio::test]
async fn test_create_and_list_orders() {
    let app = setup();

    let response = send(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "session_id": "s1",
            "items": [{"product_id": "p1", "quantity": 2, "price_each": 9.99}],
            "total": 19.98
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let id = body_json(response).await["message"]
        .as_str()
        .unwrap()
        .to_string();

    let orders = body_json(send(&app, "GET", "/orders", None).await).await;
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], id.as_str());
    assert_eq!(orders[0]["status"], "pending");
    assert_eq!(orders[0]["total"], 19.98);
    assert_eq!(orders[0]["items"][0]["price_each"], 9.99);
}

#[tokio::test]
async fn test_invalid_order_is_422() {
    let app = setup();

    let response = send(
        &app,
        "POST",
        "/orders",
        Some(json!({"session_id": "s1", "items": [], "total": -5.0})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = setup();

    let response = send(&app, "GET", "/nowhere", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();
    create_widget(&app).await;

    let response = send(&app, "GET", "/metrics", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
