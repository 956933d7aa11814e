//! Two-minute precipitation rate job.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Duration;

use crate::{cli::JobArgs, pipeline::JobReport, product::Product};

use super::{at, midnight, run, JobDefaults};

pub fn defaults() -> Result<JobDefaults> {
    Ok(JobDefaults {
        product: Product::PrecipRate,
        start: midnight(2023, 4, 30)?,
        end: at(2023, 10, 2, 23, 58)?,
        step: Duration::minutes(2),
        destination_name: "MRMS_2023_preciprate",
    })
}

pub async fn precip_rate(args: &JobArgs) -> Result<(PathBuf, JobReport)> {
    run(defaults()?, args).await
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::locator::TimeRange;

    #[test]
    fn should_cover_every_two_minutes_through_last_day() {
        let d = defaults().unwrap();
        let range = TimeRange::new(d.start, d.end, d.step).unwrap();

        assert_eq!(range.len(), 156 * 24 * 30);
        assert_eq!(range.timestamps().last(), Some(d.end));
    }
}
