pub mod precip_rate;
pub mod radar_only;

use std::{
    path::{Path, PathBuf},
    time::Duration as StdDuration,
};

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::info;

pub use precip_rate::precip_rate;
pub use radar_only::radar_only;

use crate::{
    cli::JobArgs,
    download::{Destination, HttpFetcher},
    locator::TimeRange,
    pipeline::{run_job, JobConfig, JobReport},
    product::Product,
};

/// Built-in settings of one product's job, overridable from the command line.
pub struct JobDefaults {
    pub product: Product,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub step: Duration,
    pub destination_name: &'static str,
}

/// Validates the arguments and runs the job against the archive.
pub async fn run(defaults: JobDefaults, args: &JobArgs) -> Result<(PathBuf, JobReport)> {
    let config = make_job_config(&defaults, args)?;
    info!(product = defaults.product.name(), fallback = args.fallback, "job configured");
    let fetcher = HttpFetcher::new(StdDuration::from_secs(args.timeout.max(1)))?;

    let report = run_job(&fetcher, &config).await;

    Ok((config.destination.path().to_path_buf(), report))
}

/// Resolves defaults and checks everything that can fail before any request.
pub fn make_job_config(defaults: &JobDefaults, args: &JobArgs) -> Result<JobConfig> {
    let range = TimeRange::new(
        args.start.unwrap_or(defaults.start),
        args.end.unwrap_or(defaults.end),
        args.step.unwrap_or(defaults.step),
    )?;
    let template = defaults.product.template(&args.host)?;
    let fallback = if args.fallback {
        Some(Product::RadarOnlyQpe01H.template(&args.host)?)
    } else {
        None
    };

    let destination_dir = match &args.destination {
        Some(dir) => dir.clone(),
        None => make_destination_dir(defaults.destination_name)?,
    };
    let destination = Destination::open(&destination_dir)?;

    Ok(JobConfig {
        range,
        template,
        fallback,
        destination,
    })
}

pub fn make_destination_dir(name: &str) -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(name))
        .ok_or_else(|| anyhow!("Could not locate home directory; pass --destination"))
}

pub(crate) fn midnight(year: i32, month: u32, day: u32) -> Result<NaiveDateTime> {
    at(year, month, day, 0, 0)
}

pub(crate) fn at(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| {
            anyhow!(
                "Invalid timestamp {}-{:02}-{:02} {:02}:{:02}",
                year,
                month,
                day,
                hour,
                minute
            )
        })
}

/// Formats the summary line printed after a job.
pub fn summarise(destination: &Path, report: &JobReport) -> String {
    let unresolved = report.unresolved().len();
    let mut summary = format!(
        "{} files saved to `{}`",
        report.files_written(),
        destination.display()
    );
    if let Some(fallback) = &report.fallback {
        summary.push_str(&format!(
            ", {} recovered by fallback",
            report.primary.missing.len().saturating_sub(fallback.missing.len())
        ));
    }
    summary.push_str(&format!(", {} missing", unresolved));

    summary
}

// -- Tests -------------------------------------------------------------------
