//! Task 6: average engagement rate of tweets with and without app opens.

use super::{DashboardTask, TaskContext, TaskId};
use crate::aggregator::{group_mean, GroupMean};
use crate::features::{Derivation, FeatureDeriver, FeatureRow};
use crate::predicates::{Field, Predicate, PredicateChain};
use crate::time_gate::HourWindow;
use crate::types::{BarSeries, Chart, ChartBody, ColorScheme, GraphConfig, GraphType};
use tdash_common::{Column, Dataset, Result};

const EXCLUDED_LETTER: char = 'd';
const MIN_CHARS: f64 = 30.0;
const FIRST_WEEKEND_DAY: f64 = 5.0;
/// Posting hours as written in the data, no zone conversion.
const POSTED_FROM: f64 = 9.0;
const POSTED_UNTIL: f64 = 17.0;

const REQUIRED: &[Column] = &[
    Column::Time,
    Column::Text,
    Column::Impressions,
    Column::EngagementRate,
    Column::AppOpens,
];

const WINDOWS: &[HourWindow] = &[HourWindow::new(12, 18), HourWindow::new(7, 11)];

pub struct AppOpensTask;

pub(crate) fn deriver() -> FeatureDeriver {
    FeatureDeriver::new()
        .then(Derivation::StripWordsContaining(EXCLUDED_LETTER))
        .then(Derivation::CharCount)
        .then(Derivation::Calendar { convert_to: None })
        .then(Derivation::ParsePercentage)
        .then(Derivation::HasAppOpens)
}

pub(crate) fn predicates() -> PredicateChain {
    PredicateChain::new()
        .with(Predicate::gt(Field::CharCount, MIN_CHARS))
        .with(Predicate::even(Field::Metric(Column::Impressions)))
        .with(Predicate::odd(Field::Day))
        .with(Predicate::lt(Field::Weekday, FIRST_WEEKEND_DAY))
        .with(Predicate::in_range(Field::Hour, POSTED_FROM, POSTED_UNTIL))
}

pub(crate) fn aggregate(rows: &[FeatureRow]) -> Vec<GroupMean<bool>> {
    group_mean(rows, |row| row.features.has_app_opens, Field::EngagementRate)
}

fn group_label(has_app_opens: bool) -> &'static str {
    if has_app_opens {
        "With App Opens"
    } else {
        "No App Opens"
    }
}

impl DashboardTask for AppOpensTask {
    fn id(&self) -> TaskId {
        TaskId::AppOpens
    }

    fn tab_title(&self) -> &'static str {
        "Task 6: App Opens Comparison"
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

        let config = GraphConfig::new(
            GraphType::Bar,
            "Average Engagement Rate: Tweets With vs Without App Opens",
        )
        .with_labels("Has App Opens", "Average Engagement Rate (%)")
        .with_size(ctx.width, ctx.height)
        .with_color_scheme(ColorScheme::Set2);

        Ok(Chart {
            config,
            body: ChartBody::Bars {
                categories: means.iter().map(|m| group_label(m.key).to_string()).collect(),
                series: vec![BarSeries {
                    name: "Average Engagement Rate".to_string(),
                    values: means.iter().map(|m| m.mean).collect(),
                }],
            },
            records: rows.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::test_support::ist_context;
    use tdash_common::test_utils::{dataset_with_all_columns, filler_text, RecordBuilder};
    use tdash_common::Record;

    /// 2024-01-03 is a Wednesday.
    fn tweet(time: &str, impressions: f64, app_opens: f64, rate: &str) -> Record {
        RecordBuilder::new()
            .time(time)
            .text(filler_text(10))
            .metric(Column::Impressions, impressions)
            .metric(Column::AppOpens, app_opens)
            .engagement_rate(rate)
            .build()
    }

    #[test]
    fn test_hour_window_uses_wall_clock() {
        let rows = deriver().derive(vec![
            tweet("2024-01-03 08:59:00", 2.0, 0.0, "1%"),
            tweet("2024-01-03 09:00:00", 2.0, 0.0, "1%"),
            tweet("2024-01-03 16:59:00", 2.0, 0.0, "1%"),
            tweet("2024-01-03 17:00:00", 2.0, 0.0, "1%"),
        ]);
        assert_eq!(predicates().apply(rows).len(), 2);
    }

    #[test]
    fn test_words_with_d_are_removed() {
        let mut record = tweet("2024-01-03 10:00:00", 2.0, 0.0, "1%");
        record.text = Some(format!("{} dashboard data", filler_text(5)));
        let rows = deriver().derive(vec![record]);
        assert_eq!(rows[0].features.char_count, Some(29));
        assert!(predicates().apply(rows).is_empty());
    }

    #[test]
    fn test_build_groups_by_app_opens() {
        let dataset = dataset_with_all_columns(vec![
            tweet("2024-01-03 10:00:00", 2.0, 0.0, "2%"),
            tweet("2024-01-03 11:00:00", 4.0, 0.0, "4"),
            tweet("2024-01-03 12:00:00", 6.0, 3.0, "12.5%"),
            // Saturday
            tweet("2024-01-13 12:00:00", 6.0, 3.0, "90%"),
        ]);
        let chart = AppOpensTask.build(dataset, &ist_context()).unwrap();
        assert_eq!(chart.records, 3);
        let ChartBody::Bars { categories, series } = chart.body else {
            panic!("expected bars");
        };
        assert_eq!(categories, vec!["No App Opens", "With App Opens"]);
        assert_eq!(series[0].values, vec![3.0, 12.5]);
    }
}
