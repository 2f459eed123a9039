//! Per-record derived fields computed before filtering.
//!
//! A [`FeatureDeriver`] runs an ordered list of [`Derivation`] steps over
//! every record. Steps only read the source record and features written by
//! earlier steps, so the order matters where text is cleaned: counts taken
//! after [`Derivation::StripWordsContaining`] see the cleaned text.

use chrono::{Datelike, NaiveDateTime, Timelike};
use chrono_tz::Tz;
use serde::Serialize;
use tdash_common::{parse_percentage, strip_words_containing, word_count, Record};
use tracing::{debug, instrument};

/// Calendar components of a record's time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Monday is 0, Sunday is 6.
    pub weekday: u32,
    pub hour: u32,
}

impl CalendarParts {
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            weekday: dt.weekday().num_days_from_monday(),
            hour: dt.hour(),
        }
    }
}

/// Fields derived from a record. `None` means not derived or undefined.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Features {
    pub cleaned_text: Option<String>,
    pub word_count: Option<usize>,
    pub char_count: Option<usize>,
    pub engagement_rate: Option<f64>,
    pub has_media: Option<bool>,
    pub has_app_opens: Option<bool>,
    pub calendar: Option<CalendarParts>,
    pub engagement_score: Option<f64>,
    /// Label assigned by [`crate::aggregator::categorize`].
    pub category: Option<&'static str>,
}

/// A record together with its derived features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub record: Record,
    pub features: Features,
}

impl FeatureRow {
    pub fn new(record: Record) -> Self {
        Self {
            record,
            features: Features::default(),
        }
    }

    /// Cleaned text if a cleaning step ran, otherwise the raw text.
    /// Missing text reads as empty.
    pub fn working_text(&self) -> &str {
        self.features
            .cleaned_text
            .as_deref()
            .or(self.record.text.as_deref())
            .unwrap_or("")
    }
}

/// One derivation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Derivation {
    /// Drop words containing the letter, case-insensitively.
    StripWordsContaining(char),
    WordCount,
    /// Characters of the working text.
    CharCount,
    /// `engagements / views * 100`; undefined when views are zero or missing.
    EngagementRate,
    /// Parse the engagement rate column as a percentage.
    ParsePercentage,
    /// Media views above zero.
    HasMedia,
    /// App opens above zero.
    HasAppOpens,
    /// Split the time into calendar parts, converting to `convert_to` first
    /// when given. Naive times are taken as UTC for that conversion.
    Calendar { convert_to: Option<Tz> },
    /// `retweets + likes`
    EngagementScore,
}

impl Derivation {
    pub fn apply(&self, row: &mut FeatureRow) {
        match self {
            Derivation::StripWordsContaining(letter) => {
                let cleaned = strip_words_containing(row.working_text(), *letter);
                row.features.cleaned_text = Some(cleaned);
            }
            Derivation::WordCount => {
                row.features.word_count = Some(word_count(row.working_text()));
            }
            Derivation::CharCount => {
                row.features.char_count = Some(row.working_text().chars().count());
            }
            Derivation::EngagementRate => {
                row.features.engagement_rate = match (row.record.engagements, row.record.views) {
                    (Some(engagements), Some(views)) if views != 0.0 => {
                        Some(engagements / views * 100.0)
                    }
                    _ => None,
                };
            }
            Derivation::ParsePercentage => {
                row.features.engagement_rate =
                    row.record.engagement_rate_raw.as_deref().and_then(parse_percentage);
            }
            Derivation::HasMedia => {
                row.features.has_media = Some(row.record.media_views.is_some_and(|v| v > 0.0));
            }
            Derivation::HasAppOpens => {
                row.features.has_app_opens = Some(row.record.app_opens.is_some_and(|v| v > 0.0));
            }
            Derivation::Calendar { convert_to } => {
                row.features.calendar = row.record.time.as_ref().map(|time| {
                    let local = match convert_to {
                        Some(tz) => time.in_timezone(tz),
                        None => time.wall_clock(),
                    };
                    CalendarParts::from_datetime(local)
                });
            }
            Derivation::EngagementScore => {
                row.features.engagement_score = match (row.record.retweets, row.record.likes) {
                    (Some(retweets), Some(likes)) => Some(retweets + likes),
                    _ => None,
                };
            }
        }
    }
}

/// Ordered derivation steps applied to every record.
#[derive(Debug, Clone, Default)]
pub struct FeatureDeriver {
    steps: Vec<Derivation>,
}

impl FeatureDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, step: Derivation) -> Self {
        self.steps.push(step);
        self
    }

    #[instrument(skip_all, fields(records = records.len(), steps = self.steps.len()))]
    pub fn derive(&self, records: Vec<Record>) -> Vec<FeatureRow> {
        let rows: Vec<FeatureRow> = records
            .into_iter()
            .map(|record| {
                let mut row = FeatureRow::new(record);
                for step in &self.steps {
                    step.apply(&mut row);
                }
                row
            })
            .collect();
        debug!("Derived features for {} records", rows.len());
        rows
    }
}
