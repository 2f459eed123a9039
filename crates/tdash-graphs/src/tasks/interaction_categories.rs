//! Task 2: click interactions summed per tweet category.

use super::{DashboardTask, TaskContext, TaskId};
use crate::aggregator::{categorize, group_sum, CategoryRule, GroupSum};
use crate::features::{Derivation, FeatureDeriver, FeatureRow};
use crate::predicates::{Field, Predicate, PredicateChain};
use crate::time_gate::HourWindow;
use crate::types::{BarSeries, Chart, ChartBody, ColorScheme, GraphConfig, GraphType};
use tdash_common::{Column, Dataset, Result};

const MIN_WORDS: f64 = 40.0;

const REQUIRED: &[Column] = &[
    Column::Time,
    Column::Text,
    Column::UrlClicks,
    Column::UserProfileClicks,
    Column::HashtagClicks,
    Column::MediaViews,
];

const CLICKS: [Column; 3] = [
    Column::UrlClicks,
    Column::UserProfileClicks,
    Column::HashtagClicks,
];

const CLICK_FIELDS: [Field; 3] = [
    Field::Metric(CLICKS[0]),
    Field::Metric(CLICKS[1]),
    Field::Metric(CLICKS[2]),
];

/// First match wins.
const CATEGORIES: [CategoryRule; 3] = [
    CategoryRule {
        label: "With Media",
        field: Field::Metric(Column::MediaViews),
    },
    CategoryRule {
        label: "With Link",
        field: Field::Metric(Column::UrlClicks),
    },
    CategoryRule {
        label: "With Hashtag",
        field: Field::Metric(Column::HashtagClicks),
    },
];

const WINDOWS: &[HourWindow] = &[HourWindow::new(15, 17)];

pub struct InteractionCategoriesTask;

pub(crate) fn deriver() -> FeatureDeriver {
    FeatureDeriver::new()
        .then(Derivation::Calendar { convert_to: None })
        .then(Derivation::WordCount)
}

pub(crate) fn predicates() -> PredicateChain {
    PredicateChain::new()
        .with(Predicate::even(Field::Day))
        .with(Predicate::gt(Field::WordCount, MIN_WORDS))
        .with(Predicate::any_positive(&CLICK_FIELDS))
}

/// Click sums per category, categories in label order.
pub(crate) fn aggregate(rows: Vec<FeatureRow>) -> Vec<GroupSum<&'static str>> {
    let labelled = categorize(rows, &CATEGORIES);
    group_sum(&labelled, |row| row.features.category, &CLICK_FIELDS)
}

impl DashboardTask for InteractionCategoriesTask {
    fn id(&self) -> TaskId {
        TaskId::InteractionCategories
    }

    fn tab_title(&self) -> &'static str {
        "Task 2: Clustered Bar"
    }

    fn required_columns(&self) -> &'static [Column] {
        REQUIRED
    }

    fn render_windows(&self) -> &'static [HourWindow] {
        WINDOWS
    }

    fn build(&self, dataset: Dataset, ctx: &TaskContext) -> Result<Chart> {
        let rows = predicates().apply(deriver().derive(dataset.into_records()));
        let records = rows.len();
        let groups = aggregate(rows);

        let categories = groups.iter().map(|g| g.key.to_string()).collect();
        let series = CLICKS
            .iter()
            .enumerate()
            .map(|(i, column)| BarSeries {
                name: column.header().to_string(),
                values: groups.iter().map(|g| g.sums[i]).collect(),
            })
            .collect();

        let config = GraphConfig::new(
            GraphType::ClusteredBar,
            "Sum of Interactions by Tweet Category (Filtered)",
        )
        .with_labels("Tweet Category", "Sum of Clicks")
        .with_size(ctx.width, ctx.height)
        .with_color_scheme(ColorScheme::Default);

        Ok(Chart {
            config,
            body: ChartBody::Bars { categories, series },
            records,
        })
    }
}
