//! Error taxonomy for the core service.
//!
//! Parser anomalies never show up here: the extraction parser always recovers
//! locally through its fallback chain. Everything else propagates to the caller
//! as a [`SparkError`].

use thiserror::Error;

use crate::enrichment::scraper::ScrapeError;
use crate::generation::GenerationError;

pub type Result<T> = std::result::Result<T, SparkError>;

#[derive(Debug, Error)]
pub enum SparkError {
    /// The text-generation collaborator call failed.
    #[error("text generation failed: {0}")]
    Collaborator(#[from] GenerationError),

    /// The remote scraping job could not be started.
    #[error("could not start enrichment job: {0}")]
    EnrichmentSubmission(#[source] ScrapeError),

    /// The remote job did not succeed, returned nothing, or could not be observed.
    #[error("enrichment job failed: {0}")]
    EnrichmentJob(String),

    /// An update-mode call referenced an identity absent from the store.
    #[error("record not found: {0}")]
    RecordNotFound(u64),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("record store lock poisoned")]
    StorePoisoned,
}

impl SparkError {
    /// Stable machine-readable code, used by the HTTP layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Collaborator(_) => "COLLABORATOR_FAILURE",
            Self::EnrichmentSubmission(_) => "ENRICHMENT_SUBMISSION_FAILURE",
            Self::EnrichmentJob(_) => "ENRICHMENT_JOB_FAILURE",
            Self::RecordNotFound(_) => "RECORD_NOT_FOUND",
            Self::InvalidRequest(_) => "BAD_REQUEST",
            Self::StorePoisoned => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound(_))
    }
}
