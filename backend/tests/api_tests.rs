//! HTTP surface tests
//!
//! Exercises the router with in-process requests; the weather provider is a
//! throwaway local server so no real upstream is contacted.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use tropometrics_backend::config::{
    AuthConfig, Config, FeatureConfig, ServerConfig, SmtpConfig, WeatherConfig,
};
use tropometrics_backend::{create_app, AppState};

/// Serve a fixed response on an ephemeral port, standing in for Open-Meteo
async fn spawn_upstream(status: StatusCode, body: Value) -> String {
    let app = Router::new().route(
        "/",
        get(move || {
            let body = body.clone();
            async move { (status, Json(body)).into_response() }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn forecast_body() -> Value {
    json!({
        "current": { "time": "2026-08-29T12:00", "temperature_2m": 21.4 },
        "daily": {
            "time": ["2026-08-29", "2026-08-30"],
            "temperature_2m_max": [24.0, 26.5],
            "temperature_2m_min": [15.0, 14.2],
            "daylight_duration": [36000.0, 36100.0]
        },
        "hourly": {
            "precipitation": vec![1.0; 144],
            "relative_humidity_2m": vec![65.0; 144],
            "soil_moisture_27_to_81cm": vec![0.10; 144]
        }
    })
}

fn test_config(upstream: &str, smtp_configured: bool) -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
        },
        smtp: SmtpConfig {
            server: "localhost:2525".to_string(),
            username: smtp_configured.then(|| "mailer@example.com".to_string()),
            password: smtp_configured.then(|| "hunter2".to_string()),
        },
        weather: WeatherConfig {
            base_url: upstream.to_string(),
            latitude: -5.013,
            longitude: -58.381,
            timezone: "Europe/Amsterdam".to_string(),
        },
        auth: AuthConfig {
            api_keys: vec!["demo".to_string()],
        },
        features: FeatureConfig {
            weather: true,
            email: true,
        },
    }
}

fn test_app(config: Config) -> Router {
    create_app(AppState::from_config(config).unwrap())
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn api_without_key_is_unauthorized() {
    let app = test_app(test_config("http://127.0.0.1:9", false));
    let response = app
        .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_string(response).await;
    assert!(body.contains("Missing API key"));
}

#[tokio::test]
async fn api_with_wrong_key_is_unauthorized() {
    let app = test_app(test_config("http://127.0.0.1:9", false));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api?api_key=wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_string(response).await;
    assert!(body.contains("Invalid API key"));
}

#[tokio::test]
async fn api_with_valid_key_returns_full_report() {
    let upstream = spawn_upstream(StatusCode::OK, forecast_body()).await;
    let app = test_app(test_config(&upstream, false));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api?api_key=demo")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    for section in [
        "\"metadata\"",
        "\"current\"",
        "\"daily\"",
        "\"moisture\"",
        "\"irrigation\"",
        "\"forecast\"",
        "\"raw_data\"",
    ] {
        assert!(body.contains(section), "missing section {section}");
    }
    // Soil moisture 0.10 is at or below the threshold
    assert!(body.contains("Geef water"));
}

#[tokio::test]
async fn api_upstream_failure_maps_to_service_unavailable() {
    let upstream = spawn_upstream(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"reason": "boom"}),
    )
    .await;
    let app = test_app(test_config(&upstream, false));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api?api_key=demo")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_string(response).await;
    assert!(body.contains("Failed to fetch weather data"));
    assert!(body.contains("\"error\":true"));
}

#[tokio::test]
async fn root_reports_configuration_state() {
    let app = test_app(test_config("http://127.0.0.1:9", false));
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    // One service now fronts both route groups, so the root banner carries the
    // unified name rather than a per-feature one
    assert_eq!(body["service"], "TropoMetrics Weather API");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["configured"], false);
}

#[tokio::test]
async fn health_depends_only_on_mail_credentials() {
    // Unconfigured relay: 503 even though no upstream is reachable either way
    let app = test_app(test_config("http://127.0.0.1:9", false));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Configured relay: healthy
    let app = test_app(test_config("http://127.0.0.1:9", true));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["Backend"], "Online");
}

fn email_request(to: &str) -> Request<Body> {
    let payload = json!({
        "to": to,
        "subject": "Greetings",
        "body": "Hello there",
    });
    Request::builder()
        .method("POST")
        .uri("/api/send-email")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn send_email_rejects_invalid_recipient_before_relay() {
    // The relay target does not exist; validation must fail first
    let app = test_app(test_config("http://127.0.0.1:9", true));
    let response = app.oneshot(email_request("not-an-address")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_string(response).await;
    assert!(body.contains("Invalid email request"));
}

#[tokio::test]
async fn send_email_requires_configured_relay() {
    let app = test_app(test_config("http://127.0.0.1:9", false));
    let response = app
        .oneshot(email_request("farmer@example.com"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_string(response).await;
    assert!(body.contains("Email service not configured"));
}

#[tokio::test]
async fn feature_toggles_remove_route_groups() {
    let mut config = test_config("http://127.0.0.1:9", false);
    config.features.weather = false;
    let app = test_app(config);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api?api_key=demo")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Email capability still present
    let response = app
        .oneshot(email_request("farmer@example.com"))
        .await
        .unwrap();
    assert_ne!(response.status(), StatusCode::NOT_FOUND);
}
