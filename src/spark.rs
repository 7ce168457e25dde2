//! Use-case entry points.
//!
//! [`SparkService`] runs collaborator → parser → known-field override → store for
//! the spark path, and job poller → profile extraction → tag merger → store for
//! the enrichment path. It holds no lock across an await point: the store is only
//! touched after every long-latency call has completed.

use std::sync::Arc;

use crate::enrichment::{self, poller, PollSettings, ScrapeService};
use crate::error::{Result, SparkError};
use crate::extraction::{apply_known_fields, parse_reply, prompt};
use crate::generation::TextGenerator;
use crate::record::tags::{normalize_tags, TagCaps};
use crate::record::types::{KnownFields, Record, RecordFields, TagCategory};
use crate::record::RecordStore;

/// Input of a spark call.
#[derive(Debug, Clone, Default)]
pub struct SparkRequest {
    pub scene: String,
    pub context: String,
    pub known: KnownFields,
    /// Record to update; `None` creates a new one.
    pub id: Option<u64>,
}

#[derive(Clone)]
pub struct SparkService {
    generator: Arc<dyn TextGenerator>,
    scraper: Arc<dyn ScrapeService>,
    store: Arc<dyn RecordStore>,
    caps: TagCaps,
    poll: PollSettings,
}

impl SparkService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        scraper: Arc<dyn ScrapeService>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            generator,
            scraper,
            store,
            caps: TagCaps::default(),
            poll: PollSettings::default(),
        }
    }

    pub fn with_tag_caps(mut self, caps: TagCaps) -> Self {
        self.caps = caps;
        self
    }

    pub fn with_poll_settings(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Extract a person from free text and create or update their record.
    pub async fn spark(&self, request: SparkRequest) -> Result<Record> {
        if request.context.trim().is_empty() {
            return Err(SparkError::InvalidRequest("context must not be empty".into()));
        }
        if let Some(id) = request.id {
            self.require(id)?;
        }

        tracing::info!(
            scene = %request.scene,
            context_len = request.context.len(),
            known_fields = request.known.declared().len(),
            record_id = ?request.id,
            "spark called"
        );

        let user_prompt = prompt::build_user_prompt(&request.scene, &request.context, &request.known);
        let reply = self
            .generator
            .generate(prompt::SYSTEM_PROMPT, &user_prompt)
            .await
            .inspect_err(|e| tracing::error!(generator = self.generator.name(), error = %e, "text generation failed"))?;

        let mut profile = parse_reply(&reply);
        apply_known_fields(&mut profile, &request.known);

        let mut fields = RecordFields::from_profile(&request.scene, &request.context, profile);
        for category in TagCategory::ALL {
            let tags = fields.tags_mut(category);
            *tags = normalize_tags(tags, self.caps.cap(category));
        }

        let record = self.store.create_or_update(request.id, fields)?;
        tracing::info!(record_id = record.id, card_title = %record.card_title, "spark record stored");
        Ok(record)
    }

    /// Enrich a record (or create one) from a scraped professional profile.
    pub async fn enrich(&self, profile_reference: &str, id: Option<u64>) -> Result<Record> {
        let reference = profile_reference.trim();
        if reference.is_empty() {
            return Err(SparkError::InvalidRequest("profile reference must not be empty".into()));
        }
        if let Some(id) = id {
            self.require(id)?;
        }

        tracing::info!(reference, record_id = ?id, "enrichment started");

        let payload = poller::run_job(self.scraper.as_ref(), reference, &self.poll).await?;
        let info = enrichment::extract_profile_info(&payload);
        tracing::debug!(
            career_candidates = info.career_tags.len(),
            interest_candidates = info.interest_tags.len(),
            "profile extracted"
        );

        let record = match id {
            Some(id) => self.store.update_with(id, &mut |fields| {
                enrichment::merge_into_existing(fields, &info, reference, &self.caps)
            })?,
            None => {
                let fields = enrichment::fields_for_new_record(&info, reference, &self.caps);
                self.store.create_or_update(None, fields)?
            }
        };

        tracing::info!(record_id = record.id, "enrichment applied");
        Ok(record)
    }

    /// All records, most recently created first.
    pub fn list_records(&self) -> Result<Vec<Record>> {
        self.store.list()
    }

    /// Case-insensitive keyword search. A blank query yields nothing.
    pub fn search_records(&self, query: &str) -> Result<Vec<Record>> {
        let results = self.store.search(query)?;
        tracing::debug!(query, matches = results.len(), "search");
        Ok(results)
    }

    pub fn get_record(&self, id: u64) -> Result<Record> {
        self.require(id)
    }

    pub fn attach_photo(&self, id: u64, reference: &str) -> Result<Record> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(SparkError::InvalidRequest("photo reference must not be empty".into()));
        }
        self.store.attach_photo(id, reference)
    }

    fn require(&self, id: u64) -> Result<Record> {
        self.store.find(id)?.ok_or(SparkError::RecordNotFound(id))
    }
}
