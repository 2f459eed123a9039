//! Task 5: replies, retweets and likes of above-median media tweets from summer 2020.

use super::{DashboardTask, TaskContext, TaskId};
use crate::aggregator::sum_fields;
use crate::features::{Derivation, FeatureDeriver, FeatureRow};
use crate::predicates::{Field, Predicate, PredicateChain};
use crate::time_gate::HourWindow;
use crate::types::{BarSeries, Chart, ChartBody, ColorScheme, GraphConfig, GraphType};
use tdash_common::{Column, Dataset, Result};

const EXCLUDED_LETTER: char = 's';
const MIN_CHARS: f64 = 20.0;
const YEAR: f64 = 2020.0;
/// June through August, `[start, end)`.
const FIRST_MONTH: f64 = 6.0;
const END_MONTH: f64 = 9.0;

const REQUIRED: &[Column] = &[
    Column::Time,
    Column::Text,
    Column::MediaViews,
    Column::MediaEngagements,
    Column::Replies,
    Column::Retweets,
    Column::Likes,
];

const TOTALS: [Column; 3] = [Column::Replies, Column::Retweets, Column::Likes];

const WINDOWS: &[HourWindow] = &[HourWindow::new(15, 17), HourWindow::new(7, 11)];

pub struct MediaInteractionsTask;

pub(crate) fn deriver() -> FeatureDeriver {
    FeatureDeriver::new()
        .then(Derivation::StripWordsContaining(EXCLUDED_LETTER))
        .then(Derivation::CharCount)
        .then(Derivation::Calendar { convert_to: None })
}

/// The median cut runs last, over the rows every other predicate kept.
pub(crate) fn predicates() -> PredicateChain {
    PredicateChain::new()
        .with(Predicate::gt(Field::CharCount, MIN_CHARS))
        .with(Predicate::even(Field::Metric(Column::MediaViews)))
        .with(Predicate::odd(Field::Day))
        .with(Predicate::equals(Field::Year, YEAR))
        .with(Predicate::in_range(Field::Month, FIRST_MONTH, END_MONTH))
        .with(Predicate::above_median(Field::Metric(Column::MediaEngagements)))
}

/// Totals of replies, retweets and likes.
pub(crate) fn aggregate(rows: &[FeatureRow]) -> Vec<f64> {
    let fields: Vec<Field> = TOTALS.iter().map(|&c| Field::Metric(c)).collect();
    sum_fields(rows, &fields)
}

impl DashboardTask for MediaInteractionsTask {
    fn id(&self) -> TaskId {
        TaskId::MediaInteractions
    }

    fn tab_title(&self) -> &'static str {
        "Task 5: Replies/Retweets/Likes"
    }

    fn required_columns(&self) -> &'static [Column] {
        REQUIRED
    }

    fn render_windows(&self) -> &'static [HourWindow] {
        WINDOWS
    }

    fn build(&self, dataset: Dataset, ctx: &TaskContext) -> Result<Chart> {
        let rows = predicates().apply(deriver().derive(dataset.into_records()));
        let totals = aggregate(&rows);

        let config = GraphConfig::new(
            GraphType::Bar,
            "Replies, Retweets, and Likes for Tweets (Media Engagements > Median, Jun-Aug 2020, \
             Odd Date, Even Media Views, Char Count > 20, No 'S' Words)",
        )
        .with_labels("Metric", "Count")
        .with_size(ctx.width, ctx.height)
        .with_color_scheme(ColorScheme::Viridis);

        Ok(Chart {
            config,
            body: ChartBody::Bars {
                categories: TOTALS.iter().map(|c| c.header().to_string()).collect(),
                series: vec![BarSeries {
                    name: "Count".to_string(),
                    values: totals,
                }],
            },
            records: rows.len(),
        })
    }
}
