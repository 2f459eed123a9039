//! Task 3: the ten best-engaging weekday afternoon tweets.

use super::{DashboardTask, TaskContext, TaskId};
use crate::aggregator::{top_n, Ranked};
use crate::features::{Derivation, FeatureDeriver, FeatureRow};
use crate::predicates::{Field, Predicate, PredicateChain};
use crate::time_gate::HourWindow;
use crate::types::{Chart, ChartBody, ColorScheme, GraphConfig, GraphType, RankedBar};
use chrono_tz::Tz;
use tdash_common::{Column, Dataset, Result};

const TOP: usize = 10;
const MAX_WORDS: f64 = 30.0;
/// Local posting hours kept, `[start, end)`.
const POSTED_FROM: f64 = 15.0;
const POSTED_UNTIL: f64 = 17.0;
/// Monday to Friday are weekdays 0 through 4.
const FIRST_WEEKEND_DAY: f64 = 5.0;

const REQUIRED: &[Column] = &[
    Column::Id,
    Column::Time,
    Column::Text,
    Column::Impressions,
    Column::Retweets,
    Column::Likes,
];

const WINDOWS: &[HourWindow] = &[HourWindow::new(15, 17)];

pub struct TopTweetsTask;

pub(crate) fn deriver(timezone: Tz) -> FeatureDeriver {
    FeatureDeriver::new()
        .then(Derivation::Calendar {
            convert_to: Some(timezone),
        })
        .then(Derivation::WordCount)
        .then(Derivation::EngagementScore)
}

pub(crate) fn predicates() -> PredicateChain {
    PredicateChain::new()
        .with(Predicate::in_range(Field::Hour, POSTED_FROM, POSTED_UNTIL))
        .with(Predicate::lt(Field::Weekday, FIRST_WEEKEND_DAY))
        .with(Predicate::even(Field::Metric(Column::Impressions)))
        .with(Predicate::odd(Field::Day))
        .with(Predicate::lt(Field::WordCount, MAX_WORDS))
}

pub(crate) fn aggregate(rows: Vec<FeatureRow>) -> Vec<Ranked> {
    top_n(rows, Field::EngagementScore, TOP)
}

fn bar_label(ranked: &Ranked) -> String {
    ranked
        .row
        .record
        .id
        .clone()
        .unwrap_or_else(|| format!("row {}", ranked.position + 1))
}

impl DashboardTask for TopTweetsTask {
    fn id(&self) -> TaskId {
        TaskId::TopTweets
    }

    fn tab_title(&self) -> &'static str {
        "Task 3: Top 10 Tweets"
    }

    fn required_columns(&self) -> &'static [Column] {
        REQUIRED
    }

    fn render_windows(&self) -> &'static [HourWindow] {
        WINDOWS
    }

    fn build(&self, dataset: Dataset, ctx: &TaskContext) -> Result<Chart> {
        let rows = predicates().apply(deriver(ctx.timezone).derive(dataset.into_records()));
        let records = rows.len();
        let bars = aggregate(rows)
            .iter()
            .map(|ranked| RankedBar {
                label: bar_label(ranked),
                value: ranked.score,
            })
            .collect();

        let title = format!(
            "Top 10 Tweets by Engagement (Weekdays, 3-5PM {}, Even Impressions, Odd Date, <30 Words)",
            ctx.zone_label
        );
        let config = GraphConfig::new(GraphType::HorizontalBar, title)
            .with_labels("Retweets + Likes", "Tweet ID")
            .with_size(ctx.width, ctx.height)
            .with_color_scheme(ColorScheme::Custom(vec!["#87CEEB".to_string()]));

        Ok(Chart {
            config,
            body: ChartBody::Ranked { bars },
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::test_support::ist_context;
    use chrono_tz::Asia::Kolkata;
    use tdash_common::test_utils::{filler_text, RecordBuilder};
    use tdash_common::Record;

    /// 2024-01-03 is a Wednesday; 10:00 UTC is 15:30 IST.
    fn tweet(id: &str, time: &str, impressions: f64, retweets: f64, likes: f64) -> Record {
        RecordBuilder::new()
            .id(id)
            .time(time)
            .text(filler_text(10))
            .metric(Column::Impressions, impressions)
            .metric(Column::Retweets, retweets)
            .metric(Column::Likes, likes)
            .build()
    }

    #[test]
    fn test_hours_are_read_in_target_zone() {
        let rows = deriver(Kolkata).derive(vec![
            tweet("utc-morning", "2024-01-03 10:00:00", 2.0, 1.0, 1.0),
            tweet("utc-afternoon", "2024-01-03 15:30:00", 2.0, 1.0, 1.0),
            tweet("zoned", "2024-01-03T15:10:00+05:30", 2.0, 1.0, 1.0),
        ]);
        let kept: Vec<String> = predicates()
            .apply(rows)
            .into_iter()
            .filter_map(|r| r.record.id)
            .collect();
        assert_eq!(kept, vec!["utc-morning", "zoned"]);
    }

    #[test]
    fn test_weekend_and_parity_filters() {
        let rows = deriver(Kolkata).derive(vec![
            // Saturday
            tweet("sat", "2024-01-13 10:00:00", 2.0, 1.0, 1.0),
            tweet("odd-impressions", "2024-01-03 10:00:00", 3.0, 1.0, 1.0),
            // 2024-01-04 is an even date
            tweet("even-date", "2024-01-04 10:00:00", 2.0, 1.0, 1.0),
            tweet("keep", "2024-01-05 10:00:00", 4.0, 1.0, 1.0),
        ]);
        let kept = predicates().apply(rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].record.id.as_deref(), Some("keep"));
    }

    #[test]
    fn test_build_ranks_best_first() {
        let records = (0..12)
            .map(|i| tweet(&format!("t{i}"), "2024-01-03 10:00:00", 2.0, f64::from(i), 1.0))
            .collect();
        let dataset = Dataset::new(REQUIRED.iter().copied(), records);
        let chart = TopTweetsTask.build(dataset, &ist_context()).unwrap();

        assert_eq!(chart.records, 12);
        assert!(chart.config.title.contains("3-5PM IST"));
        let ChartBody::Ranked { bars } = chart.body else {
            panic!("expected ranked bars");
        };
        assert_eq!(bars.len(), 10);
        assert_eq!(bars[0].label, "t11");
        assert_eq!(bars[0].value, 12.0);
        assert_eq!(bars[9].label, "t2");
    }
}
