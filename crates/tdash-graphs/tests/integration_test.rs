//! End-to-end runs of the dashboard over small CSV exports.

use chrono::{DateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tdash_common::test_utils::init_test_logging;
use tdash_common::Result;
use tdash_config::Config;
use tdash_graphs::{
    Chart, ChartBody, Dashboard, FixedClock, GraphRenderer, TaskId, TaskOutcome,
};
use tempfile::TempDir;

const HEADER: &str = "id,Tweet,time,tweet_date,impressions,engagements,engagement rate,retweets,\
replies,likes,user profile clicks,url clicks,hashtag clicks,app opens,media views,\
media engagements,views";

#[derive(Clone, Default)]
struct CapturingRenderer {
    charts: Arc<Mutex<Vec<(Chart, PathBuf)>>>,
}

impl GraphRenderer for CapturingRenderer {
    fn render_to_file(&self, chart: &Chart, path: &Path) -> Result<()> {
        self.charts
            .lock()
            .unwrap()
            .push((chart.clone(), path.to_path_buf()));
        Ok(())
    }
}

fn ist(hour: u32, minute: u32) -> DateTime<Utc> {
    chrono_tz::Asia::Kolkata
        .with_ymd_and_hms(2024, 6, 5, hour, minute, 0)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

fn setup(rows: &[&str], now: DateTime<Utc>) -> (TempDir, Dashboard, CapturingRenderer) {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("SocialMedia.csv");
    let mut body = format!("{HEADER}\n");
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    std::fs::write(&data, body).unwrap();

    let mut config = Config::default();
    config.data.path = data;
    config.render.output_dir = dir.path().join("out");

    let renderer = CapturingRenderer::default();
    let dashboard = Dashboard::new(config)
        .unwrap()
        .with_clock(Arc::new(FixedClock(now)))
        .with_renderer(Box::new(renderer.clone()));
    (dir, dashboard, renderer)
}

fn words(n: usize) -> String {
    vec!["lorem"; n].join(" ")
}

#[test]
fn test_afternoon_run_renders_open_tasks_only() {
    let text = words(20);
    // Wednesday 2020-07-01 10:00 UTC is 15:30 IST
    let row = format!("7,{text},2020-07-01 10:00:00,3,2,4,12.5%,5,20,6,1,2,0,3,4,9,100");
    let (_dir, dashboard, renderer) = setup(&[&row], ist(16, 0));

    let reports = dashboard.run_all();
    assert_eq!(reports.len(), 6);
    assert!(reports.iter().all(|r| !r.is_failure()), "{reports:#?}");

    match &reports[0].outcome {
        TaskOutcome::Unavailable { message } => assert_eq!(
            message,
            "Scatter plot is only available between 6PM and 11PM IST."
        ),
        other => panic!("task 1 should be gated, got {other:?}"),
    }
    for report in &reports[1..] {
        assert!(
            matches!(report.outcome, TaskOutcome::Rendered { .. }),
            "{:?} was not rendered",
            report.task
        );
    }
    assert_eq!(renderer.charts.lock().unwrap().len(), 5);
    assert_eq!(dashboard.cache().load_count(), 1);
}

#[test]
fn test_top_tweets_chart_from_csv() {
    let text = words(5);
    let rows: Vec<String> = (1..=12)
        .map(|i| format!("id{i},{text},2020-07-01 10:00:00,3,2,4,1%,{i},0,{i},0,0,0,0,0,0,0"))
        .collect();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let (_dir, dashboard, _) = setup(&refs, ist(15, 0));

    let chart = dashboard.build_chart(TaskId::TopTweets).unwrap();
    let ChartBody::Ranked { bars } = chart.body else {
        panic!("expected ranked bars");
    };
    assert_eq!(bars.len(), 10);
    assert_eq!(bars[0].label, "id12");
    assert_eq!(bars[0].value, 24.0);
}

#[test]
fn test_empty_export_produces_empty_charts() {
    let (_dir, dashboard, renderer) = setup(&[], ist(16, 0));
    for id in TaskId::ALL {
        let chart = dashboard.build_chart(id).unwrap();
        assert!(chart.is_empty(), "{id} should be empty");
    }
    let reports = dashboard.run_all();
    assert!(reports.iter().all(|r| !r.is_failure()));
    // placeholder charts are still handed to the renderer
    assert_eq!(renderer.charts.lock().unwrap().len(), 5);
}

#[test]
fn test_evening_run_only_shows_scatter() {
    let text = words(60);
    let row = format!("1,{text},2020-07-01 10:00:00,3,2,40,1%,0,20,0,0,0,0,0,0,0,100");
    let (_dir, dashboard, renderer) = setup(&[&row], ist(19, 0));

    let reports = dashboard.run_all();
    let rendered: Vec<TaskId> = reports
        .iter()
        .filter(|r| matches!(r.outcome, TaskOutcome::Rendered { .. }))
        .map(|r| r.task)
        .collect();
    assert_eq!(rendered, vec![TaskId::EngagementScatter]);

    let charts = renderer.charts.lock().unwrap();
    let (chart, path) = &charts[0];
    assert!(path.ends_with("task1_engagement_scatter.png"));
    let ChartBody::Points { datasets } = &chart.body else {
        panic!("expected points");
    };
    // 40 engagements over 100 views is a 40% rate
    assert_eq!(datasets[1].data.len(), 1);
}
