//! The application: one dashboard run over the selected tabs.

use crate::cli::{OutputMode, RunOptions};
use crate::error::AppResult;
use crate::report::{self, RunSummary, PAGE_TITLE};
use std::io::Write;
use std::sync::Arc;
use tdash_config::Config;
use tdash_graphs::{Clock, Dashboard, FixedClock, GraphRenderer, SystemClock, TaskReport};
use tracing::{info, instrument};

/// Main application structure.
pub struct DashboardApp {
    dashboard: Dashboard,
    clock: Arc<dyn Clock>,
    options: RunOptions,
}

impl DashboardApp {
    /// Builds the dashboard, pinning its clock when `options.at` is set.
    pub fn new(config: Config, options: RunOptions) -> AppResult<Self> {
        let clock: Arc<dyn Clock> = match options.at {
            Some(at) => Arc::new(FixedClock(at)),
            None => Arc::new(SystemClock),
        };
        let dashboard = Dashboard::new(config)?.with_clock(Arc::clone(&clock));
        Ok(Self {
            dashboard,
            clock,
            options,
        })
    }

    pub fn with_renderer(mut self, renderer: Box<dyn GraphRenderer>) -> Self {
        self.dashboard = self.dashboard.with_renderer(renderer);
        self
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    #[instrument(skip_all, fields(tasks = self.options.tasks.len()))]
    pub fn run(&self) -> Vec<TaskReport> {
        info!(
            data = %self.dashboard.config().data.path.display(),
            timezone = %self.dashboard.config().timezone,
            "Running {PAGE_TITLE}"
        );
        self.dashboard.run_selected(&self.options.tasks)
    }

    /// Runs the selected tabs and prints them in the configured mode.
    pub fn run_and_print<W: Write>(&self, out: &mut W) -> AppResult<Vec<TaskReport>> {
        let reports = self.run();
        match self.options.output {
            OutputMode::Text => report::write_text(out, &reports)?,
            OutputMode::Json => {
                let summary = RunSummary {
                    title: PAGE_TITLE,
                    generated_at: self.clock.now(),
                    timezone: &self.dashboard.config().timezone,
                    reports: &reports,
                };
                report::write_json(out, &summary)?;
            }
        }
        out.flush()?;
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tdash_graphs::{TaskId, TaskOutcome};
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.data.path = dir.path().join("tweets.csv");
        config.render.output_dir = dir.path().join("charts");
        config
    }

    #[test]
    fn test_pinned_clock_reaches_dashboard() {
        let dir = TempDir::new().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 6, 5, 11, 0, 0).unwrap();
        let options = RunOptions {
            at: Some(at),
            ..RunOptions::default()
        };
        let app = DashboardApp::new(config(&dir), options).unwrap();
        assert_eq!(app.clock.now(), at);
        assert_eq!(app.dashboard().context().zone_label, "IST");
    }

    #[test]
    fn test_missing_dataset_still_prints_every_selected_tab() {
        let dir = TempDir::new().unwrap();
        let options = RunOptions {
            tasks: vec![TaskId::TopTweets, TaskId::AppOpens],
            ..RunOptions::default()
        };
        let app = DashboardApp::new(config(&dir), options).unwrap();

        let mut out = Vec::new();
        let reports = app.run_and_print(&mut out).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports
            .iter()
            .all(|r| matches!(r.outcome, TaskOutcome::Failed { .. })));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[Task 3: Top 10 Tweets]"));
        assert!(text.contains("[Task 6: App Opens Comparison]"));
        assert_eq!(text.matches("Error: ").count(), 2);
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.timezone = "Nowhere/Special".to_string();
        assert!(DashboardApp::new(config, RunOptions::default()).is_err());
    }
}
