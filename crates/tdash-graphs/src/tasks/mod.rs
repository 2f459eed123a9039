//! The six dashboard charts.
//!
//! Each task owns its required columns, feature steps, predicate chain,
//! aggregation and render windows. The stages are exposed as separate
//! functions in each module so they can be checked in isolation.

mod app_opens;
mod engagement_scatter;
mod engagement_trend;
mod interaction_categories;
mod media_interactions;
mod top_tweets;

pub use app_opens::AppOpensTask;
pub use engagement_scatter::EngagementScatterTask;
pub use engagement_trend::EngagementTrendTask;
pub use interaction_categories::InteractionCategoriesTask;
pub use media_interactions::MediaInteractionsTask;
pub use top_tweets::TopTweetsTask;

use crate::time_gate::HourWindow;
use crate::types::Chart;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use tdash_common::{Column, Dataset, Result};

/// Identifies a dashboard task by its tab number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskId {
    EngagementScatter,
    InteractionCategories,
    TopTweets,
    EngagementTrend,
    MediaInteractions,
    AppOpens,
}

impl TaskId {
    pub const ALL: [TaskId; 6] = [
        TaskId::EngagementScatter,
        TaskId::InteractionCategories,
        TaskId::TopTweets,
        TaskId::EngagementTrend,
        TaskId::MediaInteractions,
        TaskId::AppOpens,
    ];

    /// Tab number, 1 through 6.
    pub const fn number(self) -> u8 {
        match self {
            TaskId::EngagementScatter => 1,
            TaskId::InteractionCategories => 2,
            TaskId::TopTweets => 3,
            TaskId::EngagementTrend => 4,
            TaskId::MediaInteractions => 5,
            TaskId::AppOpens => 6,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.number() == number)
    }

    /// File stem for rendered output.
    pub const fn slug(self) -> &'static str {
        match self {
            TaskId::EngagementScatter => "task1_engagement_scatter",
            TaskId::InteractionCategories => "task2_interaction_categories",
            TaskId::TopTweets => "task3_top_tweets",
            TaskId::EngagementTrend => "task4_engagement_trend",
            TaskId::MediaInteractions => "task5_media_interactions",
            TaskId::AppOpens => "task6_app_opens",
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task {}", self.number())
    }
}

/// Settings shared by every task build.
#[derive(Debug, Clone)]
pub struct TaskContext {
    /// Zone the time gate and zone-converting tasks read hours in.
    pub timezone: Tz,
    /// Abbreviation of `timezone` used in titles, e.g. `IST`.
    pub zone_label: String,
    pub width: u32,
    pub height: u32,
}

/// A chart on the dashboard.
pub trait DashboardTask: Send + Sync {
    fn id(&self) -> TaskId;

    /// Tab heading, e.g. `"Task 1: Scatter Chart"`.
    fn tab_title(&self) -> &'static str;

    fn required_columns(&self) -> &'static [Column];

    /// Local-time windows in which the chart may be shown.
    fn render_windows(&self) -> &'static [HourWindow];

    /// Opening words of the message shown outside the windows.
    fn unavailable_prefix(&self) -> &'static str {
        "The chart is only visible"
    }

    /// Whether absent columns may be filled with demo data.
    fn accepts_synthetic_data(&self) -> bool {
        false
    }

    /// Run derivation, filtering and aggregation over an owned dataset.
    /// Required columns have already been checked.
    fn build(&self, dataset: Dataset, ctx: &TaskContext) -> Result<Chart>;
}

/// Every task in tab order.
pub fn all_tasks() -> Vec<Box<dyn DashboardTask>> {
    TaskId::ALL.into_iter().map(task_for).collect()
}

pub fn task_for(id: TaskId) -> Box<dyn DashboardTask> {
    match id {
        TaskId::EngagementScatter => Box::new(EngagementScatterTask),
        TaskId::InteractionCategories => Box::new(InteractionCategoriesTask),
        TaskId::TopTweets => Box::new(TopTweetsTask),
        TaskId::EngagementTrend => Box::new(EngagementTrendTask),
        TaskId::MediaInteractions => Box::new(MediaInteractionsTask),
        TaskId::AppOpens => Box::new(AppOpensTask),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::TaskContext;

    pub fn ist_context() -> TaskContext {
        TaskContext {
            timezone: chrono_tz::Asia::Kolkata,
            zone_label: "IST".to_string(),
            width: 800,
            height: 500,
        }
    }
}
