//! HTTP API over [`SparkService`].
//!
//! Provides [`router`] (used directly by tests) and [`serve`], which wires the
//! configured collaborators and an in-memory store into a running axum server.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::config::SparkConfig;
use crate::enrichment::ApifyClient;
use crate::error::SparkError;
use crate::generation;
use crate::record::types::{KnownFields, Record};
use crate::record::MemoryRecordStore;
use crate::spark::{SparkRequest, SparkService};

#[derive(Debug, Deserialize)]
pub struct SparkBody {
    pub scene: String,
    pub context: String,
    #[serde(flatten)]
    pub known: KnownFields,
    #[serde(default)]
    pub person_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct EnrichBody {
    pub linkedin_url: String,
    #[serde(default)]
    pub person_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PhotoBody {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

impl IntoResponse for SparkError {
    fn into_response(self) -> Response {
        let status = match &self {
            SparkError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            SparkError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SparkError::Collaborator(_)
            | SparkError::EnrichmentSubmission(_)
            | SparkError::EnrichmentJob(_) => StatusCode::BAD_GATEWAY,
            SparkError::StorePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = serde_json::json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

// Extractor rejections answer with the same JSON error body as service errors.
macro_rules! rejection_is_bad_request {
    ($($rejection:ty),*) => {$(
        impl From<$rejection> for SparkError {
            fn from(rejection: $rejection) -> Self {
                SparkError::InvalidRequest(rejection.body_text())
            }
        }
    )*};
}

rejection_is_bad_request!(JsonRejection, PathRejection, QueryRejection);

type ApiResult<T> = std::result::Result<Json<T>, SparkError>;
type Body<T> = std::result::Result<Json<T>, JsonRejection>;
type Id = std::result::Result<Path<u64>, PathRejection>;

async fn create_spark(
    State(service): State<SparkService>,
    body: Body<SparkBody>,
) -> ApiResult<Record> {
    let Json(body) = body?;
    let request = SparkRequest {
        scene: body.scene,
        context: body.context,
        known: body.known,
        id: body.person_id,
    };
    Ok(Json(service.spark(request).await?))
}

async fn enrich_linkedin(
    State(service): State<SparkService>,
    body: Body<EnrichBody>,
) -> ApiResult<Record> {
    let Json(body) = body?;
    Ok(Json(service.enrich(&body.linkedin_url, body.person_id).await?))
}

async fn list_people(State(service): State<SparkService>) -> ApiResult<Vec<Record>> {
    Ok(Json(service.list_records()?))
}

async fn get_person(
    State(service): State<SparkService>,
    id: Id,
) -> ApiResult<Record> {
    let Path(id) = id?;
    Ok(Json(service.get_record(id)?))
}

async fn search_people(
    State(service): State<SparkService>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Vec<Record>> {
    let Query(params) = params?;
    Ok(Json(service.search_records(&params.q)?))
}

async fn attach_photo(
    State(service): State<SparkService>,
    id: Id,
    body: Body<PhotoBody>,
) -> ApiResult<Record> {
    let Path(id) = id?;
    let Json(body) = body?;
    Ok(Json(service.attach_photo(id, &body.url)?))
}

/// Build the API router.
pub fn router(service: SparkService) -> Router {
    Router::new()
        .route("/api/spark", post(create_spark))
        .route("/api/enrich_linkedin", post(enrich_linkedin))
        .route("/api/people", get(list_people))
        .route("/api/people/{id}", get(get_person))
        .route("/api/people/{id}/photos", post(attach_photo))
        .route("/api/search", get(search_people))
        .with_state(service)
}

/// Shared setup: create collaborators and the record store.
fn build_service(config: &SparkConfig) -> Result<SparkService> {
    let generator: Arc<dyn generation::TextGenerator> =
        Arc::from(generation::create_generator(&config.generation)?);
    tracing::info!(
        provider = %config.generation.provider,
        model = %config.generation.model,
        "text generator ready"
    );

    let scraper = Arc::new(ApifyClient::new(&config.scraper)?);
    tracing::info!(actor = %config.scraper.actor_id, "scrape client ready");

    let store = Arc::new(MemoryRecordStore::new());

    Ok(SparkService::new(generator, scraper, store)
        .with_tag_caps(config.tags.caps())
        .with_poll_settings(config.enrichment.poll_settings()))
}

/// Start the HTTP API.
pub async fn serve(config: SparkConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    tracing::info!(addr = %bind_addr, "starting Relationship Spark API");

    let service = build_service(&config)?;
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "API listening at http://{bind_addr}/api");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down API server");
        })
        .await?;

    Ok(())
}
