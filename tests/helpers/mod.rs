#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use relationship_spark::enrichment::{JobHandle, JobStatus, PollSettings, ScrapeError, ScrapeService};
use relationship_spark::generation::{GenerationError, TextGenerator};
use relationship_spark::record::MemoryRecordStore;
use relationship_spark::spark::SparkService;

/// Returns scripted replies in order and records every prompt it was given.
pub struct MockGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_replies(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, _system: &str, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Network("no more scripted replies".into())))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A scrape service whose job reports `Running` for `running_polls` checks and
/// then `terminal`, serving `results` from its dataset.
pub struct MockScraper {
    pub running_polls: usize,
    pub terminal: JobStatus,
    pub results: Vec<serde_json::Value>,
    pub reject_start: bool,
    pub status_error: bool,
    pub fetch_error: bool,
    pub started: AtomicUsize,
    pub polls: AtomicUsize,
}

impl MockScraper {
    pub fn succeeding(profile: serde_json::Value) -> Self {
        Self {
            running_polls: 1,
            terminal: JobStatus::Succeeded,
            results: vec![profile],
            reject_start: false,
            status_error: false,
            fetch_error: false,
            started: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
        }
    }

    pub fn ending_with(terminal: JobStatus) -> Self {
        Self {
            terminal,
            ..Self::succeeding(serde_json::json!({}))
        }
    }

    pub fn never_finishing() -> Self {
        Self {
            running_polls: usize::MAX,
            ..Self::succeeding(serde_json::json!({}))
        }
    }

    pub fn unused() -> Self {
        Self::ending_with(JobStatus::Failed)
    }
}

#[async_trait]
impl ScrapeService for MockScraper {
    async fn start_job(&self, target_reference: &str) -> Result<JobHandle, ScrapeError> {
        if self.reject_start {
            return Err(ScrapeError::Api(402, "quota exceeded".into()));
        }
        let n = self.started.fetch_add(1, Ordering::SeqCst);
        Ok(JobHandle {
            job_id: format!("run-{n}-{target_reference}"),
            result_location: format!("ds-{n}"),
        })
    }

    async fn get_status(&self, _job_id: &str) -> Result<JobStatus, ScrapeError> {
        let n = self.polls.fetch_add(1, Ordering::SeqCst);
        if self.status_error {
            return Err(ScrapeError::Network("connection reset".into()));
        }
        Ok(if n < self.running_polls {
            JobStatus::Running
        } else {
            self.terminal
        })
    }

    async fn fetch_results(&self, _location: &str) -> Result<Vec<serde_json::Value>, ScrapeError> {
        if self.fetch_error {
            return Err(ScrapeError::Api(500, "dataset unavailable".into()));
        }
        Ok(self.results.clone())
    }
}

/// Fast polling for tests that run on the real clock.
pub fn fast_polling() -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(5),
        deadline: Duration::from_millis(200),
    }
}

pub fn service(generator: Arc<MockGenerator>, scraper: Arc<MockScraper>) -> SparkService {
    SparkService::new(generator, scraper, Arc::new(MemoryRecordStore::new()))
        .with_poll_settings(fast_polling())
}

pub const LIN_REPLY: &str = "\
Name: Lin Wei
Main contact: lin@example.com
Relationship to me: Lab mate
How we met: HCI seminar
Location: Shanghai
Last contact: last week

Personality tags: curious, patient, curious
Goal tags: finish PhD
Interest tags: music, AI music
Career tags: HCI background, PhD student

Card title: AI music hacker classmate
Suggestion: Send her the playlist you talked about.
Summary: A thoughtful lab mate who mixes music and ML.";

pub fn sample_profile() -> serde_json::Value {
    serde_json::json!({
        "fullName": "Lin Wei",
        "headline": "PhD candidate in HCI",
        "location": "Shanghai, China",
        "summary": "Researching music interfaces.",
        "experience": [
            {"title": "Research Intern", "companyName": "Spotify"},
            {"title": "PhD Student", "companyName": "Tongji University"}
        ],
        "skills": [{"name": "Max/MSP"}, {"name": "music"}, "Python"],
        "education": [{"schoolName": "Tongji University"}]
    })
}
