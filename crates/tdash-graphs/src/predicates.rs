//! Ordered row filters.
//!
//! Predicates run in sequence and each one sees only the rows that survived
//! the previous ones. Comparisons against a missing value never match.

use crate::features::FeatureRow;
use serde::Serialize;
use std::fmt;
use tdash_common::{median, Column};
use tracing::{debug, instrument};

/// A numeric view of a row: a raw metric or a derived feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Field {
    Metric(Column),
    WordCount,
    CharCount,
    EngagementRate,
    EngagementScore,
    HasMedia,
    HasAppOpens,
    Year,
    Month,
    Day,
    Weekday,
    Hour,
}

impl Field {
    /// Value of the field for a row; flags read as 0 or 1.
    pub fn value(self, row: &FeatureRow) -> Option<f64> {
        let features = &row.features;
        let calendar = features.calendar.as_ref();
        match self {
            Field::Metric(column) => row.record.metric(column),
            Field::WordCount => features.word_count.map(|n| n as f64),
            Field::CharCount => features.char_count.map(|n| n as f64),
            Field::EngagementRate => features.engagement_rate,
            Field::EngagementScore => features.engagement_score,
            Field::HasMedia => features.has_media.map(f64::from),
            Field::HasAppOpens => features.has_app_opens.map(f64::from),
            Field::Year => calendar.map(|c| f64::from(c.year)),
            Field::Month => calendar.map(|c| f64::from(c.month)),
            Field::Day => calendar.map(|c| f64::from(c.day)),
            Field::Weekday => calendar.map(|c| f64::from(c.weekday)),
            Field::Hour => calendar.map(|c| f64::from(c.hour)),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Metric(column) => write!(f, "{column}"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparison {
    Gt,
    Lt,
    Eq,
}

impl Comparison {
    fn holds(self, left: f64, right: f64) -> bool {
        match self {
            Comparison::Gt => left > right,
            Comparison::Lt => left < right,
            Comparison::Eq => left == right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Parity {
    Even,
    Odd,
}

/// A single row filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Predicate {
    Compare {
        field: Field,
        op: Comparison,
        value: f64,
    },
    /// `start <= value < end`
    InRange { field: Field, start: f64, end: f64 },
    /// Integer parity; fractional values are neither even nor odd.
    Parity { field: Field, parity: Parity },
    /// Strictly above the median of the rows reaching this predicate.
    AboveMedian(Field),
    /// At least one field above zero.
    AnyPositive(Vec<Field>),
}

impl Predicate {
    pub fn gt(field: Field, value: f64) -> Self {
        Self::Compare {
            field,
            op: Comparison::Gt,
            value,
        }
    }

    pub fn lt(field: Field, value: f64) -> Self {
        Self::Compare {
            field,
            op: Comparison::Lt,
            value,
        }
    }

    pub fn equals(field: Field, value: f64) -> Self {
        Self::Compare {
            field,
            op: Comparison::Eq,
            value,
        }
    }

    pub fn in_range(field: Field, start: f64, end: f64) -> Self {
        Self::InRange { field, start, end }
    }

    pub fn even(field: Field) -> Self {
        Self::Parity {
            field,
            parity: Parity::Even,
        }
    }

    pub fn odd(field: Field) -> Self {
        Self::Parity {
            field,
            parity: Parity::Odd,
        }
    }

    pub fn above_median(field: Field) -> Self {
        Self::AboveMedian(field)
    }

    pub fn any_positive(fields: &[Field]) -> Self {
        Self::AnyPositive(fields.to_vec())
    }

    /// Median threshold over `rows` for [`Predicate::AboveMedian`], else `None`.
    fn threshold(&self, rows: &[FeatureRow]) -> Option<f64> {
        match self {
            Predicate::AboveMedian(field) => {
                median(rows.iter().filter_map(|row| field.value(row)).collect())
            }
            _ => None,
        }
    }

    fn matches(&self, row: &FeatureRow, threshold: Option<f64>) -> bool {
        match self {
            Predicate::Compare { field, op, value } => field
                .value(row)
                .is_some_and(|actual| op.holds(actual, *value)),
            Predicate::InRange { field, start, end } => field
                .value(row)
                .is_some_and(|actual| *start <= actual && actual < *end),
            Predicate::Parity { field, parity } => field.value(row).is_some_and(|actual| {
                match (actual.fract() == 0.0, actual.rem_euclid(2.0) == 0.0, parity) {
                    (false, _, _) => false,
                    (true, even, Parity::Even) => even,
                    (true, even, Parity::Odd) => !even,
                }
            }),
            Predicate::AboveMedian(field) => match (field.value(row), threshold) {
                (Some(actual), Some(median)) => actual > median,
                _ => false,
            },
            Predicate::AnyPositive(fields) => fields
                .iter()
                .any(|field| field.value(row).is_some_and(|v| v > 0.0)),
        }
    }
}

/// Predicates applied in order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PredicateChain {
    predicates: Vec<Predicate>,
}

impl PredicateChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn apply(&self, mut rows: Vec<FeatureRow>) -> Vec<FeatureRow> {
        for predicate in &self.predicates {
            let threshold = predicate.threshold(&rows);
            rows.retain(|row| predicate.matches(row, threshold));
            debug!(?predicate, remaining = rows.len(), "Applied predicate");
        }
        rows
    }
}
