use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use artifex_registry::ArtifactRegistry;

use crate::config::ServerConfig;
use crate::handler::{self, OVERWRITE_HEADER};

/// Build the axum router with all registry endpoints.
pub fn build_router(registry: Arc<ArtifactRegistry>, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route(
            "/sourcesFlattened/:name",
            get(handler::get_flattened_source).post(handler::post_flattened_source),
        )
        .route(
            "/compileOutputs/:name",
            get(handler::get_compile_output).post(handler::post_compile_output),
        )
        .route("/compiles", get(handler::get_all_compiles))
        .route(
            "/compiles/:name",
            get(handler::get_compile).post(handler::post_compile),
        )
        .route("/links", get(handler::get_all_links))
        .route(
            "/links/:name",
            get(handler::get_link).post(handler::post_link),
        )
        .route("/deploys", get(handler::get_all_deploys))
        .route("/deploys/:chainId", get(handler::get_chain_deploys))
        .route("/deploys/:chainId/:name", get(handler::get_deploy_record))
        .route(
            "/deploys/:chainId/:name/deploy",
            get(handler::get_deploy).post(handler::post_deploy),
        )
        .route(
            "/deploys/:chainId/:name/forks/:forkTime",
            get(handler::get_deploy_fork).post(handler::post_deploy_fork),
        )
        .route(
            "/keys/:chainId/:address",
            get(handler::get_key_dump).post(handler::post_key_dump),
        )
        .route(
            "/test/:space",
            get(handler::get_test_space).post(handler::post_test_space),
        );

    let mut router = Router::new()
        .nest("/api", api)
        .route("/health", get(handler::health))
        .route("/info", get(handler::info))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http());

    if config.allow_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([CONTENT_TYPE, HeaderName::from_static(OVERWRITE_HEADER)]),
        );
    }

    router.with_state(registry)
}
