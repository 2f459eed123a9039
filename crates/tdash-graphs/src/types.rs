//! Chart types and data structures handed from the aggregator to the renderer

use serde::{Deserialize, Serialize};

/// Supported graph types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphType {
    Scatter,
    Line,
    Bar,
    ClusteredBar,
    HorizontalBar,
}

/// Graph configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    pub graph_type: GraphType,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub style: StyleConfig,
}

impl GraphConfig {
    /// Config of the given type and title with default size and style.
    pub fn new(graph_type: GraphType, title: impl Into<String>) -> Self {
        Self {
            graph_type,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_labels(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = Some(x_label.to_string());
        self.y_label = Some(y_label.to_string());
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.style.color_scheme = scheme;
        self
    }

    pub fn with_grid(mut self, show_grid: bool) -> Self {
        self.style.show_grid = show_grid;
        self
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            graph_type: GraphType::Bar,
            title: "Graph".to_string(),
            width: 1000,
            height: 600,
            x_label: None,
            y_label: None,
            style: StyleConfig::default(),
        }
    }
}

/// Data point for point-based graphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
    pub label: Option<String>,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, label: None }
    }
}

/// Named series of points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    pub name: String,
    pub data: Vec<DataPoint>,
    pub color: Option<String>,
}

/// One bar per category for a named series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// A labelled bar in a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedBar {
    pub label: String,
    pub value: f64,
}

/// Aggregated payload of a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartBody {
    /// Scatter or line series
    Points { datasets: Vec<DataSet> },
    /// Bars grouped by category, one bar per series inside each group
    Bars {
        categories: Vec<String>,
        series: Vec<BarSeries>,
    },
    /// Ranked bars, best first
    Ranked { bars: Vec<RankedBar> },
}

impl ChartBody {
    pub fn is_empty(&self) -> bool {
        match self {
            ChartBody::Points { datasets } => datasets.iter().all(|ds| ds.data.is_empty()),
            ChartBody::Bars { categories, series } => categories.is_empty() || series.is_empty(),
            ChartBody::Ranked { bars } => bars.is_empty(),
        }
    }
}

/// Aggregate result ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub config: GraphConfig,
    pub body: ChartBody,
    /// Records that survived filtering and fed the aggregate
    pub records: usize,
}

impl Chart {
    /// Nothing to draw: either no records matched or the aggregate is empty.
    pub fn is_empty(&self) -> bool {
        self.records == 0 || self.body.is_empty()
    }
}

/// Color scheme for graphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColorScheme {
    Default,
    Viridis,
    Set2,
    Custom(Vec<String>),
}

/// Font configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    pub family: String,
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 14,
        }
    }
}

/// Margin configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginConfig {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 20,
            right: 20,
            bottom: 50,
            left: 70,
        }
    }
}

/// Styling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub color_scheme: ColorScheme,
    pub background_color: Option<String>,
    pub title_font: FontConfig,
    pub axis_font: FontConfig,
    pub margins: MarginConfig,
    pub show_grid: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Default,
            background_color: Some("#FFFFFF".to_string()),
            title_font: FontConfig {
                family: "sans-serif".to_string(),
                size: 20,
            },
            axis_font: FontConfig::default(),
            margins: MarginConfig::default(),
            show_grid: false,
        }
    }
}
