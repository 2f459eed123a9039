//! # tdash
//!
//! Command line front end for the tweet analytics dashboard. Loads the
//! configuration, runs the selected tabs against the shared dataset and
//! prints one section per tab, or the whole run as JSON.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;
pub mod report;

pub use app::DashboardApp;
pub use cli::{Args, OutputMode, RunOptions};
pub use error::{AppError, AppResult};
pub use report::PAGE_TITLE;
