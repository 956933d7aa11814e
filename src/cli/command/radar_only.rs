//! Hourly radar-only QPE job.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Duration;

use crate::{cli::JobArgs, pipeline::JobReport, product::Product};

use super::{midnight, run, JobDefaults};

pub fn defaults() -> Result<JobDefaults> {
    Ok(JobDefaults {
        product: Product::RadarOnlyQpe01H,
        start: midnight(2023, 4, 30)?,
        end: midnight(2023, 10, 2)?,
        step: Duration::hours(1),
        destination_name: "MRMS_2023_radaronly",
    })
}

pub async fn radar_only(args: &JobArgs) -> Result<(PathBuf, JobReport)> {
    run(defaults()?, args).await
}

// -- Tests -------------------------------------------------------------------
