//! Request handlers.
//!
//! Every write route reads the overwrite opt-in from the
//! [`OVERWRITE_HEADER`] request header and reports a declined write as an
//! ordinary `{"result": false, ...}` body with a 200 status. A non-2xx
//! status always means a malformed request or a fault, never a declined
//! write.

use std::sync::Arc;

use axum::extract::{Path as RoutePath, State};
use axum::http::HeaderMap;
use axum::response::Json;
use serde::Serialize;
use serde_json::json;

use artifex_registry::ArtifactRegistry;
use artifex_types::{ChainId, Document, ForkTime};

use crate::error::ServerResult;

/// Request header carrying the overwrite opt-in. Present and set to `true`
/// (case-insensitive) enables replacement of an existing record.
pub const OVERWRITE_HEADER: &str = "artifex-overwrite";

fn overwrite_requested(headers: &HeaderMap) -> bool {
    headers
        .get(OVERWRITE_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

/// Body of every write response.
#[derive(Debug, Serialize)]
pub struct WriteReply {
    pub result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WriteReply {
    fn from_outcome(stored: bool, body: Document) -> Self {
        if stored {
            Self {
                result: true,
                body: Some(body),
                error: None,
            }
        } else {
            Self {
                result: false,
                body: None,
                error: Some(format!(
                    "entry exists; pass the {OVERWRITE_HEADER} header to replace it"
                )),
            }
        }
    }
}

// ---- Flattened sources ----

pub async fn get_flattened_source(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath(name): RoutePath<String>,
) -> ServerResult<Json<Document>> {
    Ok(Json(registry.read_flattened_source(&name)?))
}

pub async fn post_flattened_source(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath(name): RoutePath<String>,
    headers: HeaderMap,
    Json(body): Json<Document>,
) -> ServerResult<Json<WriteReply>> {
    let stored = registry.write_flattened_source(&name, body.clone(), overwrite_requested(&headers))?;
    Ok(Json(WriteReply::from_outcome(stored, body)))
}

// ---- Compiler outputs ----

pub async fn get_compile_output(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath(name): RoutePath<String>,
) -> ServerResult<Json<Document>> {
    Ok(Json(registry.read_compile_output(&name)?))
}

pub async fn post_compile_output(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath(name): RoutePath<String>,
    headers: HeaderMap,
    Json(body): Json<Document>,
) -> ServerResult<Json<WriteReply>> {
    let stored = registry.write_compile_output(&name, body.clone(), overwrite_requested(&headers))?;
    Ok(Json(WriteReply::from_outcome(stored, body)))
}

// ---- Compiled contracts ----

pub async fn get_all_compiles(
    State(registry): State<Arc<ArtifactRegistry>>,
) -> ServerResult<Json<Document>> {
    Ok(Json(registry.read_all_compiles()?))
}

pub async fn get_compile(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath(name): RoutePath<String>,
) -> ServerResult<Json<Document>> {
    Ok(Json(registry.read_compile(&name)?))
}

pub async fn post_compile(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath(name): RoutePath<String>,
    headers: HeaderMap,
    Json(body): Json<Document>,
) -> ServerResult<Json<WriteReply>> {
    let stored = registry.write_compile(&name, body.clone(), overwrite_requested(&headers))?;
    Ok(Json(WriteReply::from_outcome(stored, body)))
}

// ---- Links ----

pub async fn get_all_links(
    State(registry): State<Arc<ArtifactRegistry>>,
) -> ServerResult<Json<Document>> {
    Ok(Json(registry.read_all_links()?))
}

pub async fn get_link(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath(name): RoutePath<String>,
) -> ServerResult<Json<Document>> {
    Ok(Json(registry.read_link(&name)?))
}

pub async fn post_link(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath(name): RoutePath<String>,
    headers: HeaderMap,
    Json(body): Json<Document>,
) -> ServerResult<Json<WriteReply>> {
    let stored = registry.write_link(&name, body.clone(), overwrite_requested(&headers))?;
    Ok(Json(WriteReply::from_outcome(stored, body)))
}

// ---- Deploys ----

pub async fn get_all_deploys(
    State(registry): State<Arc<ArtifactRegistry>>,
) -> ServerResult<Json<Document>> {
    Ok(Json(registry.read_all_deploys()?))
}

pub async fn get_chain_deploys(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath(chain): RoutePath<String>,
) -> ServerResult<Json<Document>> {
    let chain: ChainId = chain.parse()?;
    Ok(Json(registry.read_deploys_for_chain(&chain)?))
}

pub async fn get_deploy_record(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath((chain, name)): RoutePath<(String, String)>,
) -> ServerResult<Json<Document>> {
    let chain: ChainId = chain.parse()?;
    Ok(Json(registry.read_deploy_record(&chain, &name)?))
}

pub async fn get_deploy(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath((chain, name)): RoutePath<(String, String)>,
) -> ServerResult<Json<Document>> {
    let chain: ChainId = chain.parse()?;
    Ok(Json(registry.read_deploy(&chain, &name, None)?))
}

pub async fn post_deploy(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath((chain, name)): RoutePath<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Document>,
) -> ServerResult<Json<WriteReply>> {
    let chain: ChainId = chain.parse()?;
    let stored =
        registry.write_deploy(&chain, &name, body.clone(), overwrite_requested(&headers), None)?;
    Ok(Json(WriteReply::from_outcome(stored, body)))
}

pub async fn get_deploy_fork(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath((chain, name, fork)): RoutePath<(String, String, String)>,
) -> ServerResult<Json<Document>> {
    let chain: ChainId = chain.parse()?;
    let fork: ForkTime = fork.parse()?;
    Ok(Json(registry.read_deploy(&chain, &name, Some(&fork))?))
}

pub async fn post_deploy_fork(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath((chain, name, fork)): RoutePath<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Document>,
) -> ServerResult<Json<WriteReply>> {
    let chain: ChainId = chain.parse()?;
    let fork: ForkTime = fork.parse()?;
    let stored = registry.write_deploy(
        &chain,
        &name,
        body.clone(),
        overwrite_requested(&headers),
        Some(&fork),
    )?;
    Ok(Json(WriteReply::from_outcome(stored, body)))
}

// ---- Key dumps ----

pub async fn get_key_dump(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath((chain, address)): RoutePath<(String, String)>,
) -> ServerResult<Json<Document>> {
    let chain: ChainId = chain.parse()?;
    Ok(Json(registry.read_key_dump(&chain, &address)?))
}

pub async fn post_key_dump(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath((chain, address)): RoutePath<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Document>,
) -> ServerResult<Json<WriteReply>> {
    let chain: ChainId = chain.parse()?;
    let stored =
        registry.write_key_dump(&chain, &address, body.clone(), overwrite_requested(&headers))?;
    Ok(Json(WriteReply::from_outcome(stored, body)))
}

// ---- Test scratch space ----

pub async fn get_test_space(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath(space): RoutePath<String>,
) -> ServerResult<Json<Document>> {
    Ok(Json(registry.read_test_space(&space)?))
}

pub async fn post_test_space(
    State(registry): State<Arc<ArtifactRegistry>>,
    RoutePath(space): RoutePath<String>,
    headers: HeaderMap,
    Json(body): Json<Document>,
) -> ServerResult<Json<WriteReply>> {
    let stored = registry.write_test_space(&space, body.clone(), overwrite_requested(&headers))?;
    Ok(Json(WriteReply::from_outcome(stored, body)))
}

// ---- Liveness ----

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn info() -> Json<serde_json::Value> {
    Json(json!({
        "name": "artifex-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
