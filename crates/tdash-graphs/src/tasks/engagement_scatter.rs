//! Task 1: engagements against views, with high-rate tweets highlighted.

use super::{DashboardTask, TaskContext, TaskId};
use crate::features::{Derivation, FeatureDeriver, FeatureRow};
use crate::predicates::{Field, Predicate, PredicateChain};
use crate::time_gate::HourWindow;
use crate::types::{Chart, ChartBody, DataPoint, DataSet, GraphConfig, GraphType};
use tdash_common::{Column, Dataset, Result};
use tracing::debug;

const MIN_REPLIES: f64 = 10.0;
const MIN_WORDS: f64 = 50.0;
/// Engagement rate (percent) above which a tweet is highlighted.
const HIGH_RATE: f64 = 5.0;

const REQUIRED: &[Column] = &[
    Column::Replies,
    Column::Engagements,
    Column::Views,
    Column::TweetDate,
    Column::Text,
];

const WINDOWS: &[HourWindow] = &[HourWindow::new(18, 23)];

pub struct EngagementScatterTask;

pub(crate) fn deriver() -> FeatureDeriver {
    FeatureDeriver::new()
        .then(Derivation::WordCount)
        .then(Derivation::EngagementRate)
}

pub(crate) fn predicates() -> PredicateChain {
    PredicateChain::new()
        .with(Predicate::gt(Field::Metric(Column::Replies), MIN_REPLIES))
        .with(Predicate::odd(Field::Metric(Column::TweetDate)))
        .with(Predicate::gt(Field::WordCount, MIN_WORDS))
}

/// Split rows into the normal and highlighted series. Rows with an
/// undefined rate are plotted as normal; rows lacking either axis are skipped.
pub(crate) fn aggregate(rows: &[FeatureRow]) -> (Vec<DataPoint>, Vec<DataPoint>) {
    let mut normal = Vec::new();
    let mut high = Vec::new();
    for row in rows {
        let (Some(views), Some(engagements)) = (row.record.views, row.record.engagements) else {
            continue;
        };
        let point = DataPoint::new(views, engagements);
        if row.features.engagement_rate.is_some_and(|rate| rate > HIGH_RATE) {
            high.push(point);
        } else {
            normal.push(point);
        }
    }
    (normal, high)
}

impl DashboardTask for EngagementScatterTask {
    fn id(&self) -> TaskId {
        TaskId::EngagementScatter
    }

    fn tab_title(&self) -> &'static str {
        "Task 1: Scatter Chart"
    }

    fn required_columns(&self) -> &'static [Column] {
        REQUIRED
    }

    fn render_windows(&self) -> &'static [HourWindow] {
        WINDOWS
    }

    fn unavailable_prefix(&self) -> &'static str {
        "Scatter plot is only available"
    }

    fn accepts_synthetic_data(&self) -> bool {
        true
    }

    fn build(&self, dataset: Dataset, ctx: &TaskContext) -> Result<Chart> {
        let rows = predicates().apply(deriver().derive(dataset.into_records()));
        let (normal, high) = aggregate(&rows);
        debug!(normal = normal.len(), high = high.len(), "Scatter series built");

        let config = GraphConfig::new(GraphType::Scatter, "Engagements vs Views (Filtered Tweets)")
            .with_labels("Media Views", "Media Engagements")
            .with_size(ctx.width, ctx.height)
            .with_grid(true);

        Ok(Chart {
            config,
            body: ChartBody::Points {
                datasets: vec![
                    DataSet {
                        name: format!("Engagement Rate \u{2264} {HIGH_RATE}%"),
                        data: normal,
                        color: None,
                    },
                    DataSet {
                        name: format!("Engagement Rate > {HIGH_RATE}%"),
                        data: high,
                        color: Some("#FF0000".to_string()),
                    },
                ],
            },
            records: rows.len(),
        })
    }
}
