use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_root_endpoint() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], true);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], false);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_bookings_without_token_is_unauthorized() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/bookings")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "vehicle_id": "550e8400-e29b-41d4-a716-446655440000",
                        "rent_start_date": "2999-01-01",
                        "rent_end_date": "2999-01-04"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// App de test con la misma forma del router real: raíz + fallback + un
// guard de auth mínimo sobre /api/v1/bookings
fn create_test_app() -> axum::Router {
    axum::Router::new()
        .route(
            "/",
            axum::routing::get(|| async {
                axum::Json(json!({ "status": true, "message": "Welcome to the Vehicle Rental API!" }))
            }),
        )
        .route(
            "/api/v1/bookings",
            axum::routing::post(|headers: axum::http::HeaderMap| async move {
                if headers.get("authorization").is_none() {
                    return (
                        StatusCode::UNAUTHORIZED,
                        axum::Json(json!({ "success": false })),
                    );
                }
                (StatusCode::OK, axum::Json(json!({ "success": true })))
            }),
        )
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                axum::Json(json!({ "status": false, "error": "Route not found" })),
            )
        })
}
