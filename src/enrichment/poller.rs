//! Drives a remote scraping job to a terminal state under a deadline.
//!
//! `SUBMITTED -> (wait, poll)* -> SUCCEEDED | FAILED | ABORTED | TIMED_OUT`, or a
//! local deadline failure. The wait is the only suspension point besides the
//! remote round-trips themselves. The remote job is never cancelled.

use std::time::Duration;

use tokio::time::{sleep, timeout_at, Instant};

use crate::enrichment::scraper::{JobHandle, JobStatus, ScrapeService};
use crate::error::{Result, SparkError};

/// Default wait between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Default overall deadline for a job.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub deadline: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            deadline: DEFAULT_DEADLINE,
        }
    }
}

/// Start the remote job.
pub async fn submit(service: &dyn ScrapeService, target_reference: &str) -> Result<JobHandle> {
    let handle = service
        .start_job(target_reference)
        .await
        .map_err(SparkError::EnrichmentSubmission)?;
    tracing::info!(
        job_id = %handle.job_id,
        result_location = %handle.result_location,
        "enrichment job started"
    );
    Ok(handle)
}

/// One status check.
pub async fn poll(service: &dyn ScrapeService, handle: &JobHandle) -> Result<JobStatus> {
    service
        .get_status(&handle.job_id)
        .await
        .map_err(|e| SparkError::EnrichmentJob(format!("status check failed: {e}")))
}

/// Wait-then-poll until the job reaches a terminal status.
///
/// Fails once `settings.deadline` has elapsed without a terminal status. A slow
/// status round-trip is cut off at deadline + one interval, so the call never
/// outlives that bound.
pub async fn wait_for_terminal(
    service: &dyn ScrapeService,
    handle: &JobHandle,
    settings: &PollSettings,
) -> Result<JobStatus> {
    let started = Instant::now();
    let hard_stop = started + settings.deadline + settings.interval;
    let timed_out = || {
        SparkError::EnrichmentJob(format!(
            "job {} did not finish within {}s",
            handle.job_id,
            settings.deadline.as_secs()
        ))
    };

    loop {
        sleep(settings.interval).await;

        let status = timeout_at(hard_stop, poll(service, handle))
            .await
            .map_err(|_| timed_out())??;
        tracing::debug!(
            job_id = %handle.job_id,
            status = %status,
            elapsed_secs = started.elapsed().as_secs(),
            "enrichment job status"
        );

        if status.is_terminal() {
            return Ok(status);
        }
        if started.elapsed() >= settings.deadline {
            tracing::warn!(job_id = %handle.job_id, "enrichment job deadline exceeded, leaving it running");
            return Err(timed_out());
        }
    }
}

/// Run a job end to end and return its first result item.
///
/// Any terminal status other than `SUCCEEDED`, and an empty result set, are
/// failures.
pub async fn run_job(
    service: &dyn ScrapeService,
    target_reference: &str,
    settings: &PollSettings,
) -> Result<serde_json::Value> {
    let handle = submit(service, target_reference).await?;
    let status = wait_for_terminal(service, &handle, settings).await?;

    if status != JobStatus::Succeeded {
        tracing::warn!(job_id = %handle.job_id, status = %status, "enrichment job did not succeed");
        return Err(SparkError::EnrichmentJob(format!(
            "job {} ended with status {status}",
            handle.job_id
        )));
    }

    let items = service
        .fetch_results(&handle.result_location)
        .await
        .map_err(|e| SparkError::EnrichmentJob(format!("fetching results failed: {e}")))?;

    let Some(first) = items.into_iter().next() else {
        tracing::warn!(job_id = %handle.job_id, "enrichment job succeeded with an empty result set");
        return Err(SparkError::EnrichmentJob(format!(
            "job {} returned no results",
            handle.job_id
        )));
    };

    Ok(first)
}
