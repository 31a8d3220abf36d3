//! HTTP facade for the Artifex registry.
//!
//! Translates REST requests into registry operations: route parameters
//! become artifact names and deployment coordinates, the overwrite request
//! header becomes the store's overwrite flag, and declined writes are
//! reported as structured `{"result": false, ...}` bodies rather than
//! transport errors. The facade sits behind a trusted boundary and carries
//! no authentication.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{WriteReply, OVERWRITE_HEADER};
pub use router::build_router;
pub use server::ArtifexServer;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn test_app() -> Router {
        let server = ArtifexServer::new(ServerConfig::default()).unwrap();
        server.router()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: &Value, overwrite: bool) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if overwrite {
            builder = builder.header(OVERWRITE_HEADER, "true");
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = test_app();
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn info_endpoint() {
        let app = test_app();
        let (status, body) = send(&app, get("/info")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "artifex-server");
    }

    #[tokio::test]
    async fn missing_link_reads_as_empty_mapping() {
        let app = test_app();
        let (status, body) = send(&app, get("/api/links/NeverLinked")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn link_write_decline_overwrite_cycle() {
        let app = test_app();

        let (status, body) = send(&app, post("/api/links/FirstLink", &json!({"a": 1}), false)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(true));
        assert_eq!(body["body"], json!({"a": 1}));

        // Declined: 200 with result=false, not a transport error.
        let (status, body) = send(&app, post("/api/links/FirstLink", &json!({"c": 3}), false)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(false));
        assert!(body["error"].is_string());

        let (_, body) = send(&app, get("/api/links/FirstLink")).await;
        assert_eq!(body, json!({"a": 1}));

        // Overwrite header flips the outcome.
        let (status, body) = send(&app, post("/api/links/FirstLink", &json!({"d": 4}), true)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(true));

        let (_, body) = send(&app, get("/api/links/FirstLink")).await;
        assert_eq!(body, json!({"d": 4}));
    }

    #[tokio::test]
    async fn links_collection_aggregates_names() {
        let app = test_app();
        send(&app, post("/api/links/FirstLink", &json!({"a": 1}), false)).await;
        send(&app, post("/api/links/SecondLink", &json!({"b": 2}), false)).await;

        let (_, body) = send(&app, get("/api/links")).await;
        assert_eq!(body, json!({"FirstLink": {"a": 1}, "SecondLink": {"b": 2}}));
    }

    #[tokio::test]
    async fn compiles_collection_after_posting() {
        let app = test_app();
        let (_, body) = send(&app, get("/api/compiles")).await;
        assert_eq!(body, json!({}));

        send(&app, post("/api/compiles/FirstContract", &json!({}), false)).await;
        send(&app, post("/api/compiles/SecondContract", &json!({}), false)).await;

        let (_, body) = send(&app, get("/api/compiles")).await;
        assert_eq!(body, json!({"FirstContract": {}, "SecondContract": {}}));
    }

    #[tokio::test]
    async fn deploy_routes_current_and_forks_are_isolated() {
        let app = test_app();

        let (status, body) = send(
            &app,
            post("/api/deploys/1337/FirstDeploy/deploy", &json!({"z": 22}), false),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(true));

        // Two forks of the same name.
        send(
            &app,
            post(
                "/api/deploys/1337/FirstDeploy/forks/1565912200000",
                &json!({"old": 1}),
                false,
            ),
        )
        .await;
        send(
            &app,
            post(
                "/api/deploys/1337/FirstDeploy/forks/1565912300000",
                &json!({"old": 2}),
                false,
            ),
        )
        .await;

        let (_, body) = send(&app, get("/api/deploys/1337/FirstDeploy/deploy")).await;
        assert_eq!(body, json!({"z": 22}));
        let (_, body) = send(&app, get("/api/deploys/1337/FirstDeploy/forks/1565912200000")).await;
        assert_eq!(body, json!({"old": 1}));
        let (_, body) = send(&app, get("/api/deploys/1337/FirstDeploy/forks/1565912300000")).await;
        assert_eq!(body, json!({"old": 2}));

        // The name-level record shows the current deploy plus every fork.
        let (_, body) = send(&app, get("/api/deploys/1337/FirstDeploy")).await;
        assert_eq!(
            body,
            json!({
                "deploy": {"z": 22},
                "1565912200000": {"old": 1},
                "1565912300000": {"old": 2},
            })
        );
    }

    #[tokio::test]
    async fn deploy_overwrite_replaces_current_record() {
        let app = test_app();
        send(
            &app,
            post("/api/deploys/1337/FirstDeploy/deploy", &json!({"z": 22}), false),
        )
        .await;

        let (status, body) = send(
            &app,
            post("/api/deploys/1337/FirstDeploy/deploy", &json!({"x": 21}), false),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(false));

        send(
            &app,
            post("/api/deploys/1337/FirstDeploy/deploy", &json!({"x": 4}), true),
        )
        .await;
        let (_, body) = send(&app, get("/api/deploys/1337/FirstDeploy/deploy")).await;
        assert_eq!(body, json!({"x": 4}));
    }

    #[tokio::test]
    async fn chain_collections_group_by_chain_and_name() {
        let app = test_app();
        send(&app, post("/api/deploys/1337/First/deploy", &json!({"a": 1}), false)).await;
        send(&app, post("/api/deploys/2020/First/deploy", &json!({"b": 2}), false)).await;

        let (_, body) = send(&app, get("/api/deploys/1337")).await;
        assert_eq!(body, json!({"First": {"deploy": {"a": 1}}}));

        let (_, body) = send(&app, get("/api/deploys")).await;
        assert_eq!(
            body,
            json!({
                "1337": {"First": {"deploy": {"a": 1}}},
                "2020": {"First": {"deploy": {"b": 2}}},
            })
        );
    }

    #[tokio::test]
    async fn malformed_chain_id_is_bad_request() {
        let app = test_app();
        let (status, body) = send(&app, get("/api/deploys/not%20a%20chain")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["result"], json!(false));
    }

    #[tokio::test]
    async fn reserved_fork_literal_is_bad_request() {
        let app = test_app();
        let (status, _) = send(
            &app,
            post("/api/deploys/1337/First/forks/deploy", &json!({}), false),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn key_dump_pass_through() {
        let app = test_app();
        let dump = json!({"cipher": "aes-128-ctr", "payload": "ab"});

        let (status, body) = send(&app, post("/api/keys/1/0xdeadbeef", &dump, false)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(true));

        let (_, body) = send(&app, get("/api/keys/1/0xdeadbeef")).await;
        assert_eq!(body, dump);
    }

    #[tokio::test]
    async fn test_space_round_trip() {
        let app = test_app();
        let (status, body) = send(&app, post("/api/test/builds", &json!({"a": 42}), false)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(true));

        let (_, body) = send(&app, get("/api/test/builds")).await;
        assert_eq!(body, json!({"a": 42}));
    }
}
