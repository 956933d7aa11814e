//! Enumerates the remote files expected for a time range.

use std::fmt::Write;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::ConfigError;

/// An inclusive range of timestamps walked at a fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
    step: Duration,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, step: Duration) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::EmptyRange { start, end });
        }
        if step.num_milliseconds() <= 0 {
            return Err(ConfigError::NonPositiveStep);
        }

        Ok(TimeRange { start, end, step })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Number of timestamps in the range, `end` included only when it lands on a step.
    pub fn len(&self) -> usize {
        steps_between(self.start, self.end, self.step)
    }

    pub fn timestamps(&self) -> Timestamps {
        Timestamps {
            next: Some(self.start),
            end: self.end,
            step: self.step,
        }
    }

    pub fn locators<'a>(&self, template: &'a UrlTemplate) -> Locators<'a> {
        Locators {
            timestamps: self.timestamps(),
            template,
        }
    }
}

fn steps_between(from: NaiveDateTime, to: NaiveDateTime, step: Duration) -> usize {
    if from > to {
        return 0;
    }
    let span = (to - from).num_milliseconds();
    (span / step.num_milliseconds()) as usize + 1
}

/// Lazy walk over the timestamps of a [`TimeRange`].
#[derive(Debug, Clone)]
pub struct Timestamps {
    next: Option<NaiveDateTime>,
    end: NaiveDateTime,
    step: Duration,
}

impl Iterator for Timestamps {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|t| *t <= self.end)?;
        self.next = current.checked_add_signed(self.step);

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(next) => steps_between(next, self.end, self.step),
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Timestamps {}

/// Archive host plus a strftime path pattern (`%Y`, `%m`, `%d`, `%H`, `%M`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    host: String,
    pattern: String,
}

impl UrlTemplate {
    pub fn new(host: &str, pattern: &str) -> Result<Self, ConfigError> {
        let probe = NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| ConfigError::BadTemplate(pattern.to_string()))?;

        // Unknown or timezone slots only fail when rendered
        let mut rendered = String::new();
        if write!(rendered, "{}", probe.format(pattern)).is_err() {
            return Err(ConfigError::BadTemplate(pattern.to_string()));
        }

        Ok(UrlTemplate {
            host: host.trim_end_matches('/').to_string(),
            pattern: pattern.trim_start_matches('/').to_string(),
        })
    }

    /// Renders the locator for a timestamp.
    pub fn locate(&self, timestamp: NaiveDateTime) -> Locator {
        let url = format!("{}/{}", self.host, timestamp.format(&self.pattern));
        let file_name = url.rsplit('/').next().unwrap_or_default().to_string();

        Locator {
            timestamp,
            url,
            file_name,
        }
    }
}

/// One expected remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub timestamp: NaiveDateTime,
    pub url: String,
    pub file_name: String,
}

/// Lazy, restartable sequence of locators in increasing timestamp order.
#[derive(Debug, Clone)]
pub struct Locators<'a> {
    timestamps: Timestamps,
    template: &'a UrlTemplate,
}

impl Iterator for Locators<'_> {
    type Item = Locator;

    fn next(&mut self) -> Option<Self::Item> {
        self.timestamps.next().map(|t| self.template.locate(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.timestamps.size_hint()
    }
}

impl ExactSizeIterator for Locators<'_> {}

// -- Tests -------------------------------------------------------------------
