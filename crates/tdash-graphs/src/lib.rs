//! # tdash graphs
//!
//! The chart pipeline of the dashboard: CSV loading and caching, feature
//! derivation, predicate filtering, aggregation, time gating and plotters
//! rendering, plus the six dashboard tasks built from those stages.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod cache;
pub mod dashboard;
pub mod features;
pub mod loader;
pub mod predicates;
pub mod renderer;
pub mod synthetic;
pub mod tasks;
pub mod time_gate;
pub mod types;

pub use cache::DatasetCache;
pub use dashboard::{Dashboard, TaskOutcome, TaskReport};
pub use features::{Derivation, FeatureDeriver, FeatureRow, Features};
pub use loader::DatasetLoader;
pub use predicates::{Field, Predicate, PredicateChain};
pub use renderer::{GraphRenderer, PlottersRenderer};
pub use tasks::{all_tasks, task_for, DashboardTask, TaskContext, TaskId};
pub use time_gate::{Clock, FixedClock, HourWindow, SystemClock, TimeGate};
pub use types::*;
