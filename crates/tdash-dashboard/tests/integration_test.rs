//! Integration tests for the `tdash` front end: arguments through config
//! loading to printed reports.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tdash_common::test_utils::init_test_logging;
use tdash_common::Result;
use tdash_dashboard::{Args, DashboardApp};
use tdash_graphs::{Chart, GraphRenderer, TaskOutcome};
use tempfile::TempDir;

const HEADER: &str = "id,Tweet,time,tweet_date,impressions,engagements,engagement rate,retweets,\
replies,likes,user profile clicks,url clicks,hashtag clicks,app opens,media views,\
media engagements,views";

#[derive(Clone, Default)]
struct CapturingRenderer {
    paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl GraphRenderer for CapturingRenderer {
    fn render_to_file(&self, _chart: &Chart, path: &Path) -> Result<()> {
        self.paths.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

/// Writes a one-row export and a YAML config pointing at it.
fn workspace() -> (TempDir, PathBuf) {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("SocialMedia.csv");
    let text = vec!["lorem"; 20].join(" ");
    std::fs::write(
        &data,
        format!("{HEADER}\n7,{text},2020-07-01 10:00:00,3,2,4,12.5%,5,20,6,1,2,0,3,4,9,100\n"),
    )
    .unwrap();

    let config = dir.path().join("tdash.yaml");
    std::fs::write(
        &config,
        format!(
            "data:\n  path: {}\ntimezone: Asia/Kolkata\nrender:\n  output_dir: {}\n  format: svg\n",
            data.display(),
            dir.path().join("charts").display()
        ),
    )
    .unwrap();
    (dir, config)
}

fn app(args: &[&str]) -> DashboardApp {
    let args = Args::try_parse_from(std::iter::once("tdash").chain(args.iter().copied())).unwrap();
    let config = args.resolve_config().unwrap();
    DashboardApp::new(config, args.run_options().unwrap()).unwrap()
}

#[test]
fn test_afternoon_text_report() {
    let (dir, config) = workspace();
    let renderer = CapturingRenderer::default();
    let app = app(&[
        "--config",
        config.to_str().unwrap(),
        "--at",
        "2024-06-05T16:00:00+05:30",
        "--task",
        "1",
        "--task",
        "3",
    ])
    .with_renderer(Box::new(renderer.clone()));

    let mut out = Vec::new();
    let reports = app.run_and_print(&mut out).unwrap();
    assert_eq!(reports.len(), 2);

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Twitter Analytics Dashboard\n"));
    assert!(text.contains("[Task 1: Scatter Chart]\nScatter plot is only available between 6PM and 11PM IST.\n"));
    assert!(text.contains("[Task 3: Top 10 Tweets]\nChart written to "));

    let paths = renderer.paths.lock().unwrap();
    assert_eq!(*paths, vec![dir.path().join("charts/task3_top_tweets.svg")]);
}

#[test]
fn test_night_json_report_is_all_placeholders() {
    let (_dir, config) = workspace();
    // 02:00 IST is outside every render window, so nothing is drawn
    let app = app(&[
        "--config",
        config.to_str().unwrap(),
        "--at",
        "2024-06-04T20:30:00Z",
        "--json",
    ]);

    let mut out = Vec::new();
    let reports = app.run_and_print(&mut out).unwrap();
    assert!(reports
        .iter()
        .all(|r| matches!(r.outcome, TaskOutcome::Unavailable { .. })));

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["title"], "Twitter Analytics Dashboard");
    assert_eq!(value["generated_at"], "2024-06-04T20:30:00Z");
    assert_eq!(value["reports"].as_array().unwrap().len(), 6);
    assert_eq!(
        value["reports"][1]["outcome"]["message"],
        "The chart is only visible between 3PM and 5PM IST."
    );
    assert_eq!(
        value["reports"][5]["outcome"]["message"],
        "The chart is only visible between 12PM-6PM IST and 7AM-11AM IST."
    );
}

#[test]
fn test_output_dir_flag_redirects_charts() {
    let (dir, config) = workspace();
    let renderer = CapturingRenderer::default();
    let elsewhere = dir.path().join("elsewhere");
    let app = app(&[
        "--config",
        config.to_str().unwrap(),
        "--output-dir",
        elsewhere.to_str().unwrap(),
        "--at",
        "2024-06-05T16:00:00+05:30",
        "--task",
        "6",
    ])
    .with_renderer(Box::new(renderer.clone()));

    let reports = app.run();
    assert!(matches!(reports[0].outcome, TaskOutcome::Rendered { .. }));
    assert_eq!(
        *renderer.paths.lock().unwrap(),
        vec![elsewhere.join("task6_app_opens.svg")]
    );
}
