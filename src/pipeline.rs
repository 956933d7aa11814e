//! Sequential fetch-or-record passes over a sequence of locators.

use std::{collections::HashSet, path::PathBuf};

use chrono::NaiveDateTime;
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::{
    cli::create_progress_bar,
    download::{Destination, Fetcher},
    locator::{Locator, TimeRange, UrlTemplate},
};

/// What one pass wrote and what it could not retrieve.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    /// Written paths in attempt order. Collapsed locators repeat a path.
    pub fetched: Vec<PathBuf>,
    pub missing: Vec<NaiveDateTime>,
}

/// Everything a job needs, validated before any request is made.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub range: TimeRange,
    pub template: UrlTemplate,
    /// Template for the fallback pass. `None` disables it.
    pub fallback: Option<UrlTemplate>,
    pub destination: Destination,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub primary: PassOutcome,
    pub fallback: Option<PassOutcome>,
}

impl JobReport {
    /// Timestamps no pass could retrieve.
    pub fn unresolved(&self) -> &[NaiveDateTime] {
        match &self.fallback {
            Some(fallback) => &fallback.missing,
            None => &self.primary.missing,
        }
    }

    /// Number of distinct files written across both passes.
    pub fn files_written(&self) -> usize {
        let fallback = self.fallback.iter().flat_map(|f| f.fetched.iter());
        self.primary
            .fetched
            .iter()
            .chain(fallback)
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Attempts every locator once, in order. A timestamp whose fetch or write
/// fails is recorded as missing and the pass moves on.
pub async fn fetch_pass<F, I>(
    fetcher: &F,
    destination: &Destination,
    locators: I,
    progress: &ProgressBar,
) -> PassOutcome
where
    F: Fetcher,
    I: IntoIterator<Item = Locator>,
{
    let mut outcome = PassOutcome::default();

    for locator in locators {
        match fetcher.fetch(&locator.url).await {
            Ok(content) => match destination.store(&locator.file_name, &content) {
                Ok(path) => {
                    debug!(url = %locator.url, bytes = content.len(), "fetched");
                    outcome.fetched.push(path);
                }
                Err(e) => {
                    let error = format!("{:#}", e);
                    warn!(file = %locator.file_name, %error, "write failed");
                    outcome.missing.push(locator.timestamp);
                }
            },
            Err(e) => {
                debug!(url = %locator.url, error = %e, "missing");
                outcome.missing.push(locator.timestamp);
            }
        }
        progress.inc(1);
    }

    outcome
}

/// Retries each missing timestamp against `template`. Timestamps that render
/// to the same locator are attempted once each; the file is simply rewritten.
pub async fn fallback_pass<F: Fetcher>(
    fetcher: &F,
    destination: &Destination,
    missing: &[NaiveDateTime],
    template: &UrlTemplate,
    progress: &ProgressBar,
) -> PassOutcome {
    let locators = missing.iter().map(|timestamp| template.locate(*timestamp));

    fetch_pass(fetcher, destination, locators, progress).await
}

/// Runs the primary pass over the whole range, then the fallback pass if enabled.
pub async fn run_job<F: Fetcher>(fetcher: &F, config: &JobConfig) -> JobReport {
    let range = &config.range;
    info!(
        start = %range.start(),
        end = %range.end(),
        step_seconds = range.step().num_seconds(),
        destination = %config.destination.path().display(),
        "starting download"
    );

    let pb = create_progress_bar(range.len() as u64, "Downloading...".to_string());
    let primary = fetch_pass(
        fetcher,
        &config.destination,
        range.locators(&config.template),
        &pb,
    )
    .await;
    pb.finish_with_message("Download complete");
    info!(
        fetched = primary.fetched.len(),
        missing = primary.missing.len(),
        "primary pass finished"
    );

    let fallback = match &config.fallback {
        Some(template) if !primary.missing.is_empty() => {
            let pb = create_progress_bar(
                primary.missing.len() as u64,
                "Retrying missing with fallback...".to_string(),
            );
            let outcome =
                fallback_pass(fetcher, &config.destination, &primary.missing, template, &pb)
                    .await;
            pb.finish_with_message("Fallback complete");
            info!(
                fetched = outcome.fetched.len(),
                missing = outcome.missing.len(),
                "fallback pass finished"
            );
            Some(outcome)
        }
        Some(_) => Some(PassOutcome::default()),
        None => None,
    };

    let report = JobReport { primary, fallback };
    for timestamp in report.unresolved() {
        warn!(%timestamp, "not retrieved");
    }

    report
}

// -- Tests -------------------------------------------------------------------
