//! Record, column and dataset types shared by every tdash crate.

use crate::error::{Result, TDashError};
use crate::utils::{parse_number, parse_optional_text};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// A column of the tweet analytics export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Tweet identifier.
    Id,
    /// Tweet body.
    Text,
    /// Posting timestamp.
    Time,
    /// Day-of-month number carried as its own column.
    TweetDate,
    /// Impressions.
    Impressions,
    /// Engagements.
    Engagements,
    /// Engagement rate, usually a percentage string.
    EngagementRate,
    /// Retweets.
    Retweets,
    /// Replies.
    Replies,
    /// Likes.
    Likes,
    /// User profile clicks.
    UserProfileClicks,
    /// URL clicks.
    UrlClicks,
    /// Hashtag clicks.
    HashtagClicks,
    /// App opens.
    AppOpens,
    /// Media views.
    MediaViews,
    /// Media engagements.
    MediaEngagements,
    /// Views.
    Views,
}

impl Column {
    /// Every known column, in export order.
    pub const ALL: [Column; 17] = [
        Column::Id,
        Column::Text,
        Column::Time,
        Column::TweetDate,
        Column::Impressions,
        Column::Engagements,
        Column::EngagementRate,
        Column::Retweets,
        Column::Replies,
        Column::Likes,
        Column::UserProfileClicks,
        Column::UrlClicks,
        Column::HashtagClicks,
        Column::AppOpens,
        Column::MediaViews,
        Column::MediaEngagements,
        Column::Views,
    ];

    /// Canonical CSV header.
    pub const fn header(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Text => "Tweet",
            Column::Time => "time",
            Column::TweetDate => "tweet_date",
            Column::Impressions => "impressions",
            Column::Engagements => "engagements",
            Column::EngagementRate => "engagement rate",
            Column::Retweets => "retweets",
            Column::Replies => "replies",
            Column::Likes => "likes",
            Column::UserProfileClicks => "user profile clicks",
            Column::UrlClicks => "url clicks",
            Column::HashtagClicks => "hashtag clicks",
            Column::AppOpens => "app opens",
            Column::MediaViews => "media views",
            Column::MediaEngagements => "media engagements",
            Column::Views => "views",
        }
    }

    /// Alternative headers accepted for this column.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::Text => &["tweet_text", "text"],
            Column::EngagementRate => &["engagement_rate"],
            Column::UserProfileClicks => &["user_profile_clicks"],
            Column::UrlClicks => &["url_clicks"],
            Column::HashtagClicks => &["hashtag_clicks"],
            Column::AppOpens => &["app_opens"],
            Column::MediaViews => &["media_views"],
            Column::MediaEngagements => &["media_engagements"],
            _ => &[],
        }
    }

    /// Resolve a CSV header; matching ignores case and surrounding whitespace.
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL.into_iter().find(|column| {
            column.header().eq_ignore_ascii_case(header)
                || column
                    .aliases()
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(header))
        })
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// A posting time, with or without an explicit UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timestamp {
    /// No offset in the source text.
    Naive(NaiveDateTime),
    /// Offset carried by the source text.
    Zoned(DateTime<FixedOffset>),
}

const ZONED_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M %z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%z",
];

const NAIVE_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

impl Timestamp {
    /// Parse a timestamp, returning `None` for anything unrecognised.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Some(Self::Zoned(dt));
        }
        for format in ZONED_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(input, format) {
                return Some(Self::Zoned(dt));
            }
        }
        for format in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
                return Some(Self::Naive(dt));
            }
        }
        ["%Y-%m-%d", "%m/%d/%Y"]
            .into_iter()
            .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
            .map(|date| Self::Naive(date.and_time(NaiveTime::MIN)))
    }

    /// Local wall-clock reading exactly as written in the source.
    pub fn wall_clock(&self) -> NaiveDateTime {
        match self {
            Self::Naive(dt) => *dt,
            Self::Zoned(dt) => dt.naive_local(),
        }
    }

    /// Wall-clock reading in `tz`; naive values are taken to be UTC.
    pub fn in_timezone(&self, tz: &Tz) -> NaiveDateTime {
        match self {
            Self::Naive(dt) => Utc.from_utc_datetime(dt).with_timezone(tz).naive_local(),
            Self::Zoned(dt) => dt.with_timezone(tz).naive_local(),
        }
    }
}

/// One row of the dataset: a tweet and its metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Option<String>,
    pub text: Option<String>,
    pub time: Option<Timestamp>,
    pub tweet_date: Option<f64>,
    pub engagement_rate_raw: Option<String>,
    pub impressions: Option<f64>,
    pub engagements: Option<f64>,
    pub retweets: Option<f64>,
    pub replies: Option<f64>,
    pub likes: Option<f64>,
    pub user_profile_clicks: Option<f64>,
    pub url_clicks: Option<f64>,
    pub hashtag_clicks: Option<f64>,
    pub app_opens: Option<f64>,
    pub media_views: Option<f64>,
    pub media_engagements: Option<f64>,
    pub views: Option<f64>,
}

impl Record {
    /// Numeric value of a column; non-numeric columns yield `None`.
    pub fn metric(&self, column: Column) -> Option<f64> {
        match column {
            Column::TweetDate => self.tweet_date,
            Column::Impressions => self.impressions,
            Column::Engagements => self.engagements,
            Column::Retweets => self.retweets,
            Column::Replies => self.replies,
            Column::Likes => self.likes,
            Column::UserProfileClicks => self.user_profile_clicks,
            Column::UrlClicks => self.url_clicks,
            Column::HashtagClicks => self.hashtag_clicks,
            Column::AppOpens => self.app_opens,
            Column::MediaViews => self.media_views,
            Column::MediaEngagements => self.media_engagements,
            Column::Views => self.views,
            Column::Id | Column::Text | Column::Time | Column::EngagementRate => None,
        }
    }

    /// Mutable slot for a numeric column.
    pub fn metric_mut(&mut self, column: Column) -> Option<&mut Option<f64>> {
        let slot = match column {
            Column::TweetDate => &mut self.tweet_date,
            Column::Impressions => &mut self.impressions,
            Column::Engagements => &mut self.engagements,
            Column::Retweets => &mut self.retweets,
            Column::Replies => &mut self.replies,
            Column::Likes => &mut self.likes,
            Column::UserProfileClicks => &mut self.user_profile_clicks,
            Column::UrlClicks => &mut self.url_clicks,
            Column::HashtagClicks => &mut self.hashtag_clicks,
            Column::AppOpens => &mut self.app_opens,
            Column::MediaViews => &mut self.media_views,
            Column::MediaEngagements => &mut self.media_engagements,
            Column::Views => &mut self.views,
            Column::Id | Column::Text | Column::Time | Column::EngagementRate => return None,
        };
        Some(slot)
    }

    /// Store a raw CSV cell, coercing malformed values to missing.
    pub fn set_field(&mut self, column: Column, raw: &str) {
        match column {
            Column::Id => self.id = parse_optional_text(raw),
            Column::Text => self.text = parse_optional_text(raw),
            Column::Time => self.time = Timestamp::parse(raw),
            Column::EngagementRate => self.engagement_rate_raw = parse_optional_text(raw),
            numeric => {
                if let Some(slot) = self.metric_mut(numeric) {
                    *slot = parse_number(raw);
                }
            }
        }
    }
}

/// An immutable, ordered collection of records plus the columns its source carried.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    source: Option<PathBuf>,
    columns: BTreeSet<Column>,
    records: Vec<Record>,
}

impl Dataset {
    /// Create a dataset from records and the set of columns they were read with.
    pub fn new(columns: impl IntoIterator<Item = Column>, records: Vec<Record>) -> Self {
        Self {
            source: None,
            columns: columns.into_iter().collect(),
            records,
        }
    }

    /// Attach the path the dataset was read from.
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// Path the dataset was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Columns present in the source.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.iter().copied()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Record that a column is now populated (used after synthesizing values).
    pub fn mark_present(&mut self, column: Column) {
        self.columns.insert(column);
    }

    /// Columns from `required` that the dataset lacks.
    pub fn missing_columns(&self, required: &[Column]) -> Vec<Column> {
        required
            .iter()
            .copied()
            .filter(|column| !self.has_column(*column))
            .collect()
    }

    /// Schema check: fail with the first absent column.
    pub fn require(&self, required: &[Column], task: &str) -> Result<()> {
        match self.missing_columns(required).first() {
            Some(column) => Err(TDashError::missing_column(column.header(), task)),
            None => Ok(()),
        }
    }
}
