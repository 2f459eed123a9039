//! Runs dashboard tasks end to end and reports one outcome per task.

use crate::cache::DatasetCache;
use crate::renderer::{GraphRenderer, PlottersRenderer};
use crate::synthetic;
use crate::tasks::{all_tasks, DashboardTask, TaskContext, TaskId};
use crate::time_gate::{zone_abbreviation, Clock, SystemClock, TimeGate};
use crate::types::Chart;
use chrono_tz::Tz;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tdash_common::{Dataset, Result, TDashError};
use tdash_config::Config;
use tracing::{debug, error, info, info_span, warn};

/// What happened to one task.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Chart written to `path`.
    Rendered { path: PathBuf, chart: Chart },
    /// Outside every render window; nothing was drawn.
    Unavailable { message: String },
    /// The task could not produce a chart.
    Failed {
        error: String,
        /// A precondition such as a missing column, rather than broken input.
        precondition: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub task: TaskId,
    pub tab_title: String,
    pub outcome: TaskOutcome,
}

impl TaskReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, TaskOutcome::Failed { .. })
    }
}

/// The dashboard: configuration, shared dataset cache, clock and renderer.
pub struct Dashboard {
    config: Config,
    timezone: Tz,
    cache: DatasetCache,
    clock: Arc<dyn Clock>,
    renderer: Box<dyn GraphRenderer>,
    tasks: Vec<Box<dyn DashboardTask>>,
}

impl Dashboard {
    pub fn new(config: Config) -> Result<Self> {
        let timezone = config.tz()?;
        Ok(Self {
            config,
            timezone,
            cache: DatasetCache::default(),
            clock: Arc::new(SystemClock),
            renderer: Box::new(PlottersRenderer::new()),
            tasks: all_tasks(),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn GraphRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    pub fn context(&self) -> TaskContext {
        TaskContext {
            timezone: self.timezone,
            zone_label: zone_abbreviation(&self.timezone, self.clock.now()),
            width: self.config.render.width,
            height: self.config.render.height,
        }
    }

    fn task(&self, id: TaskId) -> Result<&dyn DashboardTask> {
        self.tasks
            .iter()
            .find(|task| task.id() == id)
            .map(|task| task.as_ref())
            .ok_or_else(|| TDashError::new(format!("{id} is not registered")))
    }

    /// The task's working copy of the dataset, with its columns checked.
    fn prepare_dataset(&self, task: &dyn DashboardTask) -> Result<Dataset> {
        let shared = self.cache.get_or_load(&self.config.data.path)?;
        let mut dataset = Dataset::clone(&shared);
        if self.config.data.synthesize_missing && task.accepts_synthetic_data() {
            synthetic::synthesize_missing(&mut dataset, task.required_columns());
        }
        dataset.require(task.required_columns(), task.tab_title())?;
        debug!(
            source = ?dataset.source(),
            records = dataset.records().len(),
            "Prepared task dataset"
        );
        Ok(dataset)
    }

    /// Load, derive, filter and aggregate one task without gating or drawing.
    pub fn build_chart(&self, id: TaskId) -> Result<Chart> {
        let task = self.task(id)?;
        let dataset = self.prepare_dataset(task)?;
        task.build(dataset, &self.context())
    }

    pub fn run_task(&self, id: TaskId) -> TaskReport {
        let span = info_span!("task", task = id.number());
        let _guard = span.enter();

        let (tab_title, outcome) = match self.task(id) {
            Ok(task) => (task.tab_title().to_string(), self.execute(task)),
            Err(e) => (id.to_string(), failed(e)),
        };
        TaskReport {
            task: id,
            tab_title,
            outcome,
        }
    }

    /// Every task in tab order; a failing task does not stop the rest.
    pub fn run_all(&self) -> Vec<TaskReport> {
        self.run_selected(&TaskId::ALL)
    }

    pub fn run_selected(&self, ids: &[TaskId]) -> Vec<TaskReport> {
        let reports: Vec<TaskReport> = ids.iter().map(|&id| self.run_task(id)).collect();
        let failures = reports.iter().filter(|r| r.is_failure()).count();
        info!(tasks = reports.len(), failures, "Dashboard run finished");
        reports
    }

    fn execute(&self, task: &dyn DashboardTask) -> TaskOutcome {
        let chart = match self
            .prepare_dataset(task)
            .and_then(|dataset| task.build(dataset, &self.context()))
        {
            Ok(chart) => chart,
            Err(e) => return failed(e),
        };

        let now = self.clock.now();
        let gate = TimeGate::new(self.timezone, task.render_windows());
        if !gate.is_open_at(now) {
            let message = format!("{} {}.", task.unavailable_prefix(), gate.describe(now));
            info!(hour = gate.local_hour(now), "Outside render windows");
            return TaskOutcome::Unavailable { message };
        }

        match self.render(task.id(), &chart) {
            Ok(path) => TaskOutcome::Rendered { path, chart },
            Err(e) => failed(e),
        }
    }

    fn render(&self, id: TaskId, chart: &Chart) -> Result<PathBuf> {
        let dir = &self.config.render.output_dir;
        std::fs::create_dir_all(dir).map_err(|e| {
            TDashError::graph_with_source(
                format!("Cannot create output directory {}", dir.display()),
                e,
            )
        })?;
        let path = dir.join(format!(
            "{}.{}",
            id.slug(),
            self.config.render.format.extension()
        ));
        self.renderer.render_to_file(chart, &path)?;
        Ok(path)
    }
}

fn failed(e: TDashError) -> TaskOutcome {
    let precondition = e.is_precondition();
    if precondition {
        warn!("{e}");
    } else {
        error!("{e}");
    }
    TaskOutcome::Failed {
        error: e.to_string(),
        precondition,
    }
}
