//! Test utilities and shared test helpers for tdash.
//!
//! Fixtures here are used by unit and integration tests across the
//! workspace; enable the `testing` feature to reach them from other crates.

use crate::types::{Column, Dataset, Record, Timestamp};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Fluent builder for test records.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.record.id = Some(id.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.record.text = Some(text.into());
        self
    }

    /// Set the timestamp from text; panics on unparsable input.
    pub fn time(mut self, time: &str) -> Self {
        self.record.time = Some(Timestamp::parse(time).expect("test timestamp must parse"));
        self
    }

    pub fn engagement_rate(mut self, raw: impl Into<String>) -> Self {
        self.record.engagement_rate_raw = Some(raw.into());
        self
    }

    /// Set any numeric column.
    pub fn metric(mut self, column: Column, value: f64) -> Self {
        if let Some(slot) = self.record.metric_mut(column) {
            *slot = Some(value);
        }
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}

/// Text with exactly `words` tokens, none containing the letters c, d or s.
pub fn filler_text(words: usize) -> String {
    vec!["lorem"; words].join(" ")
}

/// A dataset that claims every known column.
pub fn dataset_with_all_columns(records: Vec<Record>) -> Dataset {
    Dataset::new(Column::ALL, records)
}

/// Proptest strategies for dataset values.
pub mod strategies {
    use proptest::prelude::*;

    /// Percentage strings such as `"12.5%"` together with their value.
    pub fn percentage() -> impl Strategy<Value = (String, f64)> {
        (0u32..10_000).prop_map(|hundredths| {
            let value = f64::from(hundredths) / 100.0;
            (format!("{value}%"), value)
        })
    }

    /// Optional click counts, with gaps.
    pub fn optional_count() -> impl Strategy<Value = Option<f64>> {
        prop::option::of((0u32..500).prop_map(f64::from))
    }
}
