//! Task 4: monthly average engagement rate, with and without media.

use super::{DashboardTask, TaskContext, TaskId};
use crate::aggregator::{group_mean, GroupMean};
use crate::features::{Derivation, FeatureDeriver, FeatureRow};
use crate::predicates::{Field, Predicate, PredicateChain};
use crate::time_gate::HourWindow;
use crate::types::{Chart, ChartBody, DataPoint, DataSet, GraphConfig, GraphType};
use tdash_common::{Column, Dataset, Result};

const EXCLUDED_LETTER: char = 'c';
const MIN_CHARS: f64 = 20.0;

const REQUIRED: &[Column] = &[
    Column::Time,
    Column::Text,
    Column::EngagementRate,
    Column::Engagements,
    Column::MediaViews,
];

pub(crate) const WINDOWS: &[HourWindow] = &[HourWindow::new(15, 17), HourWindow::new(7, 11)];

pub struct EngagementTrendTask;

pub(crate) fn deriver() -> FeatureDeriver {
    FeatureDeriver::new()
        .then(Derivation::StripWordsContaining(EXCLUDED_LETTER))
        .then(Derivation::CharCount)
        .then(Derivation::ParsePercentage)
        .then(Derivation::HasMedia)
        .then(Derivation::Calendar { convert_to: None })
}

pub(crate) fn predicates() -> PredicateChain {
    PredicateChain::new()
        .with(Predicate::gt(Field::CharCount, MIN_CHARS))
        .with(Predicate::even(Field::Metric(Column::Engagements)))
        .with(Predicate::odd(Field::Day))
}

/// Mean rate keyed by `(month, has_media)`.
pub(crate) fn aggregate(rows: &[FeatureRow]) -> Vec<GroupMean<(u32, bool)>> {
    group_mean(
        rows,
        |row| {
            let month = row.features.calendar.map(|c| c.month)?;
            Some((month, row.features.has_media.unwrap_or(false)))
        },
        Field::EngagementRate,
    )
}

impl DashboardTask for EngagementTrendTask {
    fn id(&self) -> TaskId {
        TaskId::EngagementTrend
    }

    fn tab_title(&self) -> &'static str {
        "Task 4: Engagement Trend"
    }

    fn required_columns(&self) -> &'static [Column] {
        REQUIRED
    }

    fn render_windows(&self) -> &'static [HourWindow] {
        WINDOWS
    }

    fn build(&self, dataset: Dataset, ctx: &TaskContext) -> Result<Chart> {
        let rows = predicates().apply(deriver().derive(dataset.into_records()));
        let means = aggregate(&rows);

        let datasets = [(false, "No Media"), (true, "With Media")]
            .into_iter()
            .map(|(media, name)| DataSet {
                name: name.to_string(),
                data: means
                    .iter()
                    .filter(|m| m.key.1 == media)
                    .map(|m| DataPoint::new(f64::from(m.key.0), m.mean))
                    .collect(),
                color: None,
            })
            .filter(|ds| !ds.data.is_empty())
            .collect();

        let config = GraphConfig::new(
            GraphType::Line,
            "Monthly Average Engagement Rate Trend (With vs Without Media)",
        )
        .with_labels("Month", "Average Engagement Rate (%)")
        .with_size(ctx.width, ctx.height)
        .with_grid(true);

        Ok(Chart {
            config,
            body: ChartBody::Points { datasets },
            records: rows.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::test_support::ist_context;
    use tdash_common::test_utils::{filler_text, RecordBuilder};
    use tdash_common::Record;

    fn tweet(time: &str, text: &str, engagements: f64, media: f64, rate: &str) -> Record {
        RecordBuilder::new()
            .time(time)
            .text(text)
            .metric(Column::Engagements, engagements)
            .metric(Column::MediaViews, media)
            .engagement_rate(rate)
            .build()
    }

    #[test]
    fn test_char_count_uses_cleaned_text() {
        // 25 characters before cleaning, 17 after dropping "account"
        let text = "lorem ipsum account dolor";
        let rows = deriver().derive(vec![tweet("2020-01-01 00:00:00", text, 2.0, 0.0, "1%")]);
        assert_eq!(rows[0].features.char_count, Some(17));
        assert!(predicates().apply(rows).is_empty());
    }

    #[test]
    fn test_grouping_by_month_and_media() {
        let text = filler_text(10);
        let rows = predicates().apply(deriver().derive(vec![
            tweet("2020-01-01 08:00:00", &text, 2.0, 0.0, "2%"),
            tweet("2020-01-03 08:00:00", &text, 4.0, 0.0, "4%"),
            tweet("2020-01-05 08:00:00", &text, 4.0, 9.0, "10%"),
            tweet("2020-02-07 08:00:00", &text, 4.0, 0.0, "garbage"),
            tweet("2020-02-09 08:00:00", &text, 3.0, 0.0, "50%"),
        ]));
        let means = aggregate(&rows);
        assert_eq!(
            means,
            vec![
                GroupMean {
                    key: (1, false),
                    mean: 3.0,
                    count: 2
                },
                GroupMean {
                    key: (1, true),
                    mean: 10.0,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_build_skips_empty_series() {
        let text = filler_text(10);
        let dataset = Dataset::new(
            REQUIRED.iter().copied(),
            vec![tweet("2020-03-01 08:00:00", &text, 2.0, 0.0, "5%")],
        );
        let chart = EngagementTrendTask.build(dataset, &ist_context()).unwrap();
        let ChartBody::Points { datasets } = chart.body else {
            panic!("expected points");
        };
        assert_eq!(datasets.len(), 1);
        assert_eq!(datasets[0].name, "No Media");
        assert_eq!(datasets[0].data, vec![DataPoint::new(3.0, 5.0)]);
    }
}
