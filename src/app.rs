use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{logs, plans, profile};

pub fn build_app(state: AppState) -> Router {
    let upload_limit = state.config.upload_limit_bytes();
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(profile::router())
                .merge(plans::router())
                .merge(logs::router(upload_limit))
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod app_tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::ai::fake::{Call, FakeAi};
    use crate::plans::services::YogaOutcome;

    fn profile_json() -> Value {
        json!({
            "name": "Priya",
            "age": 25,
            "height": 180.0,
            "weight": 75.0,
            "country": "India",
            "state": "Kerala",
            "goal": "maintain"
        })
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn json_body(raw: &[u8]) -> Value {
        serde_json::from_slice(raw).unwrap()
    }

    fn put_profile(body: Value) -> Request<Body> {
        Request::put("/api/v1/profile")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn multipart_photo(uri: &str, bytes: &[u8], content_type: &str) -> Request<Body> {
        let boundary = "nutrisnap-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"meal.jpg\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        Request::post(uri)
            .header("content-type", format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = build_app(AppState::fake());
        let (status, body) = send(&app, get("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn nothing_exists_before_setup() {
        let app = build_app(AppState::fake());
        assert_eq!(send(&app, get("/api/v1/profile")).await.0, StatusCode::NOT_FOUND);
        assert_eq!(send(&app, get("/api/v1/plan")).await.0, StatusCode::NOT_FOUND);
        assert_eq!(send(&app, get("/api/v1/progress")).await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn profile_setup_returns_meal_plan_then_yoga_arrives() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let ai = Arc::new(FakeAi {
            yoga_gate: Some(gate.clone()),
            ..FakeAi::default()
        });
        let state = AppState::with_ai(ai.clone());
        let app = build_app(state.clone());

        let req = put_profile(profile_json());
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        let plan = json_body(&body);
        assert_eq!(plan["dailyCalorieGoal"], 2299);
        assert_eq!(plan["weeklyPlan"].as_array().unwrap().len(), 7);
        assert_eq!(plan["yogaPlan"], Value::Null);
        assert_eq!(plan["yogaStatus"], "pending");

        let (_, body) = send(&app, get("/api/v1/plan")).await;
        assert_eq!(json_body(&body)["yogaStatus"], "pending");

        gate.notify_one();
        for _ in 0..50 {
            let (_, body) = send(&app, get("/api/v1/plan")).await;
            if json_body(&body)["yogaStatus"] == "ready" {
                assert_eq!(json_body(&body)["yogaPlan"].as_array().unwrap().len(), 7);
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("yoga plan never arrived");
    }

    #[tokio::test]
    async fn api_key_header_reaches_the_ai() {
        let ai = Arc::new(FakeAi::default());
        let app = build_app(AppState::with_ai(ai.clone()));
        let mut req = put_profile(profile_json());
        req.headers_mut().insert("x-api-key", "user-key".parse().unwrap());

        assert_eq!(send(&app, req).await.0, StatusCode::CREATED);
        assert!(matches!(
            &ai.calls()[0],
            Call::Weekly { api_key: Some(k), .. } if k == "user-key"
        ));
    }

    #[tokio::test]
    async fn invalid_profile_is_unprocessable() {
        let app = build_app(AppState::fake());
        let mut profile = profile_json();
        profile["age"] = json!(5);
        let (status, body) = send(&app, put_profile(profile)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(String::from_utf8(body).unwrap().contains("Age must be between 12 and 100."));
    }

    #[tokio::test]
    async fn meal_plan_failure_leaves_no_profile() {
        let app = build_app(AppState::with_ai(FakeAi::failing_weekly()));
        let (status, _) = send(&app, put_profile(profile_json())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(send(&app, get("/api/v1/profile")).await.0, StatusCode::NOT_FOUND);
        assert_eq!(send(&app, get("/api/v1/plan")).await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn goals_preview_needs_no_ai() {
        let ai = Arc::new(FakeAi::default());
        let app = build_app(AppState::with_ai(ai.clone()));
        let uri = "/api/v1/goals/preview?name=Priya&age=25&height=180&weight=75&country=India&state=Kerala&goal=lose";
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["dailyCalorieGoal"], 1799);
        assert!(ai.calls().is_empty());
    }

    #[tokio::test]
    async fn photo_log_shows_up_in_log_and_progress() {
        let state = AppState::fake();
        let app = build_app(state.clone());
        let (status, _) = send(&app, put_profile(profile_json())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, multipart_photo("/api/v1/logs/lunch/photo", b"jpeg", "image/jpeg")).await;
        assert_eq!(status, StatusCode::CREATED);
        let item = json_body(&body);
        assert_eq!(item["name"], "Masala dosa");
        assert_eq!(item["image"], "data:image/jpeg;base64,anBlZw==");
        assert_eq!(item["analysis"]["calories"], 350);

        let (_, body) = send(&app, get("/api/v1/logs")).await;
        let log = json_body(&body);
        assert_eq!(log["meals"]["lunch"]["items"][0]["id"], item["id"]);

        let (status, body) = send(&app, get("/api/v1/progress")).await;
        assert_eq!(status, StatusCode::OK);
        let progress = json_body(&body);
        assert_eq!(progress["totals"]["calories"], 350);
        assert_eq!(progress["meals"][1]["meal"], "lunch");
        assert_eq!(progress["meals"][1]["totals"]["protein"], 20);
    }

    #[tokio::test]
    async fn text_log_and_analysis_failure() {
        let app = build_app(AppState::fake());
        let req = Request::post("/api/v1/logs/dinner/text")
            .header("content-type", "application/json")
            .body(Body::from(json!({"description": "rice and fish curry"}).to_string()))
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(json_body(&body).get("image").is_none());

        let failing = build_app(AppState::with_ai(FakeAi::failing_analysis()));
        let (status, body) = send(&failing, multipart_photo("/api/v1/logs/lunch/photo", b"jpeg", "image/jpeg")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(String::from_utf8(body).unwrap().starts_with("Analysis Failed"));
    }

    #[tokio::test]
    async fn bad_uploads_and_dates_are_rejected() {
        let app = build_app(AppState::fake());
        let (status, body) = send(&app, multipart_photo("/api/v1/logs/lunch/photo", b"", "image/jpeg")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(String::from_utf8(body).unwrap().starts_with("File Error"));

        let (status, _) = send(&app, multipart_photo("/api/v1/logs/brunch/photo", b"jpeg", "image/jpeg")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, get("/api/v1/logs?date=yesterday")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, get("/api/v1/logs?date=2024-03-07")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["date"], "2024-03-07");
    }

    #[tokio::test]
    async fn logout_clears_profile_plan_and_logs() {
        let state = AppState::fake();
        let app = build_app(state.clone());
        let setup = crate::profile::services::setup_profile(
            &state,
            serde_json::from_value(profile_json()).unwrap(),
            Default::default(),
        )
        .await
        .unwrap();
        assert_eq!(setup.yoga_task.await.unwrap(), YogaOutcome::Merged);
        send(&app, multipart_photo("/api/v1/logs/breakfast/photo", b"jpeg", "image/png")).await;

        let req = Request::delete("/api/v1/profile").body(Body::empty()).unwrap();
        assert_eq!(send(&app, req).await.0, StatusCode::NO_CONTENT);

        assert_eq!(send(&app, get("/api/v1/profile")).await.0, StatusCode::NOT_FOUND);
        assert_eq!(send(&app, get("/api/v1/plan")).await.0, StatusCode::NOT_FOUND);
        let (_, body) = send(&app, get("/api/v1/logs")).await;
        assert!(json_body(&body)["meals"]["breakfast"]["items"].as_array().unwrap().is_empty());
    }
}
