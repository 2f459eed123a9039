//! Aggregation of filtered rows into chart-ready summaries

use crate::features::FeatureRow;
use crate::predicates::Field;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Mean of a field within one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean<K> {
    pub key: K,
    pub mean: f64,
    /// Rows that contributed a defined value
    pub count: usize,
}

/// Per-field sums within one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSum<K> {
    pub key: K,
    /// One sum per requested field, in request order
    pub sums: Vec<f64>,
    pub count: usize,
}

/// A row picked by [`top_n`] with its score and input position
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked {
    pub row: FeatureRow,
    pub score: f64,
    pub position: usize,
}

/// Category label assigned when `field` is above zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    pub label: &'static str,
    pub field: Field,
}

/// Mean of `field` per group, ordered by key. Missing values are skipped and
/// groups without any defined value are omitted.
#[instrument(skip_all, fields(rows = rows.len(), %field))]
pub fn group_mean<K, F>(rows: &[FeatureRow], key: F, field: Field) -> Vec<GroupMean<K>>
where
    K: Ord + Clone,
    F: Fn(&FeatureRow) -> Option<K>,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let (Some(group), Some(value)) = (key(row), field.value(row)) else {
            continue;
        };
        let entry = groups.entry(group).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    let means: Vec<GroupMean<K>> = groups
        .into_iter()
        .map(|(key, (total, count))| GroupMean {
            key,
            mean: total / count as f64,
            count,
        })
        .collect();
    debug!("Aggregated {} groups", means.len());
    means
}

/// Sums of `fields` per group, ordered by key. Missing values add zero.
#[instrument(skip_all, fields(rows = rows.len()))]
pub fn group_sum<K, F>(rows: &[FeatureRow], key: F, fields: &[Field]) -> Vec<GroupSum<K>>
where
    K: Ord + Clone,
    F: Fn(&FeatureRow) -> Option<K>,
{
    let mut groups: BTreeMap<K, (Vec<f64>, usize)> = BTreeMap::new();
    for row in rows {
        let Some(group) = key(row) else {
            continue;
        };
        let entry = groups
            .entry(group)
            .or_insert_with(|| (vec![0.0; fields.len()], 0));
        for (sum, field) in entry.0.iter_mut().zip(fields) {
            *sum += field.value(row).unwrap_or(0.0);
        }
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(key, (sums, count))| GroupSum { key, sums, count })
        .collect()
}

/// Column totals over all rows. Missing values add zero; empty input sums to zero.
pub fn sum_fields(rows: &[FeatureRow], fields: &[Field]) -> Vec<f64> {
    fields
        .iter()
        .map(|field| rows.iter().filter_map(|row| field.value(row)).sum())
        .collect()
}

/// The `n` rows with the largest `field`, best first. Ties keep input order;
/// rows without a value are never picked.
#[instrument(skip_all, fields(rows = rows.len(), n = n))]
pub fn top_n(rows: Vec<FeatureRow>, field: Field, n: usize) -> Vec<Ranked> {
    let mut scored: Vec<Ranked> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(position, row)| {
            field.value(&row).map(|score| Ranked {
                row,
                score,
                position,
            })
        })
        .collect();
    // stable sort keeps the earlier row ahead on equal scores
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(n);
    scored
}

/// Label each row with the first rule whose field is above zero, storing the
/// label in [`Features::category`](crate::features::Features::category). Rows
/// no rule matches are dropped.
pub fn categorize(rows: Vec<FeatureRow>, rules: &[CategoryRule]) -> Vec<FeatureRow> {
    rows.into_iter()
        .filter_map(|mut row| {
            let rule = rules
                .iter()
                .find(|rule| rule.field.value(&row).is_some_and(|v| v > 0.0))?;
            row.features.category = Some(rule.label);
            Some(row)
        })
        .collect()
}
