//! Demo data for datasets that lack the scatter chart's columns.
//!
//! Only used when `data.synthesize_missing` is enabled. Reply, engagement
//! and view counts come from a fixed seed so repeated runs agree; tweet
//! dates and filler text are unseeded.

use fastrand::Rng;
use tdash_common::{Column, Dataset};
use tracing::warn;

/// Seed for the reproducible numeric columns.
pub const DEMO_SEED: u64 = 0;

/// Fill each absent column in `wanted` with synthetic values and mark it
/// present. Returns the columns that were synthesized.
pub fn synthesize_missing(dataset: &mut Dataset, wanted: &[Column]) -> Vec<Column> {
    let missing = dataset.missing_columns(wanted);
    if missing.is_empty() {
        return missing;
    }
    warn!(columns = ?missing, "Synthesizing demo values for absent columns");

    let mut seeded = Rng::with_seed(DEMO_SEED);
    let mut unseeded = Rng::new();
    let mut filled = Vec::new();

    for column in missing {
        let generated = match column {
            Column::Replies => fill_counts(dataset, column, || f64::from(seeded.u32(0..50))),
            Column::Engagements => fill_counts(dataset, column, || f64::from(seeded.u32(10..1000))),
            Column::Views => fill_counts(dataset, column, || f64::from(seeded.u32(100..10000))),
            Column::TweetDate => fill_counts(dataset, column, || f64::from(unseeded.u32(1..32))),
            Column::Text => {
                for record in dataset.records_mut() {
                    let words = unseeded.usize(30..100);
                    record.text = Some(vec!["word"; words].join(" "));
                }
                true
            }
            _ => false,
        };
        if generated {
            dataset.mark_present(column);
            filled.push(column);
        }
    }
    filled
}

fn fill_counts(dataset: &mut Dataset, column: Column, mut next: impl FnMut() -> f64) -> bool {
    for record in dataset.records_mut() {
        if let Some(slot) = record.metric_mut(column) {
            *slot = Some(next());
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdash_common::{word_count, Record};

    fn bare(n: usize) -> Dataset {
        Dataset::new([Column::Id], vec![Record::default(); n])
    }

    const SCATTER_COLUMNS: [Column; 5] = [
        Column::Replies,
        Column::Engagements,
        Column::Views,
        Column::TweetDate,
        Column::Text,
    ];

    #[test]
    fn test_fills_every_wanted_column_in_range() {
        let mut dataset = bare(50);
        let filled = synthesize_missing(&mut dataset, &SCATTER_COLUMNS);
        assert_eq!(filled.len(), 5);
        assert!(dataset.missing_columns(&SCATTER_COLUMNS).is_empty());

        for record in dataset.records() {
            let replies = record.replies.unwrap();
            assert!((0.0..50.0).contains(&replies));
            let views = record.views.unwrap();
            assert!((100.0..10000.0).contains(&views));
            let day = record.tweet_date.unwrap();
            assert!((1.0..=31.0).contains(&day));
            let words = word_count(record.text.as_deref().unwrap());
            assert!((30..100).contains(&words));
        }
    }

    #[test]
    fn test_seeded_columns_are_reproducible() {
        let mut a = bare(20);
        let mut b = bare(20);
        synthesize_missing(&mut a, &SCATTER_COLUMNS);
        synthesize_missing(&mut b, &SCATTER_COLUMNS);
        let counts = |d: &Dataset| -> Vec<(Option<f64>, Option<f64>, Option<f64>)> {
            d.records()
                .iter()
                .map(|r| (r.replies, r.engagements, r.views))
                .collect()
        };
        assert_eq!(counts(&a), counts(&b));
    }

    #[test]
    fn test_present_columns_are_untouched() {
        let mut record = Record::default();
        record.views = Some(5.0);
        let mut dataset = Dataset::new([Column::Views], vec![record]);

        let filled = synthesize_missing(&mut dataset, &[Column::Views, Column::Replies]);
        assert_eq!(filled, vec![Column::Replies]);
        assert_eq!(dataset.records()[0].views, Some(5.0));
    }
}
