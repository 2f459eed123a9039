//! Graph rendering trait and the plotters implementation

use crate::types::{BarSeries, Chart, ChartBody, ColorScheme, DataSet, GraphConfig, GraphType, RankedBar};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tdash_common::{truncate_string, Result, TDashError};
use tracing::{debug, info};

/// Shown in place of a chart when no records survive filtering.
pub const EMPTY_CHART_MESSAGE: &str = "No records matched the filters";

/// Longest axis label drawn for a ranked bar.
const MAX_BAR_LABEL_CHARS: usize = 24;

/// Trait for rendering charts to image files
pub trait GraphRenderer: Send + Sync {
    /// Render a chart to a file path; the extension selects the format.
    fn render_to_file(&self, chart: &Chart, path: &Path) -> Result<()>;

    /// Get colors from color scheme
    fn get_colors(&self, scheme: &ColorScheme) -> Vec<RGBColor> {
        match scheme {
            ColorScheme::Default => vec![
                RGBColor(31, 119, 180),  // Blue
                RGBColor(255, 127, 14),  // Orange
                RGBColor(44, 160, 44),   // Green
                RGBColor(214, 39, 40),   // Red
                RGBColor(148, 103, 189), // Purple
                RGBColor(140, 86, 75),   // Brown
                RGBColor(227, 119, 194), // Pink
                RGBColor(127, 127, 127), // Gray
            ],
            ColorScheme::Viridis => vec![
                RGBColor(68, 1, 84),
                RGBColor(59, 82, 139),
                RGBColor(33, 145, 140),
                RGBColor(94, 201, 98),
                RGBColor(253, 231, 37),
            ],
            ColorScheme::Set2 => vec![
                RGBColor(102, 194, 165),
                RGBColor(252, 141, 98),
                RGBColor(141, 160, 203),
                RGBColor(231, 138, 195),
                RGBColor(166, 216, 84),
                RGBColor(255, 217, 47),
                RGBColor(229, 196, 148),
                RGBColor(179, 179, 179),
            ],
            ColorScheme::Custom(colors) if !colors.is_empty() => colors
                .iter()
                .map(|color_str| self.parse_color(color_str))
                .collect(),
            ColorScheme::Custom(_) => self.get_colors(&ColorScheme::Default),
        }
    }

    /// Parse a color string (hex format) to RGBColor
    fn parse_color(&self, color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 && hex.is_ascii() {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        // Default to black if parsing fails
        RGBColor(0, 0, 0)
    }

    /// Get background color from style config
    fn get_background_color(&self, config: &GraphConfig) -> RGBColor {
        config
            .style
            .background_color
            .as_ref()
            .map(|color| self.parse_color(color))
            .unwrap_or(RGBColor(255, 255, 255))
    }
}

/// Renders every chart body with plotters, to PNG or SVG.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlottersRenderer;

impl PlottersRenderer {
    pub fn new() -> Self {
        Self
    }

    fn draw<DB>(&self, root: DrawingArea<DB, Shift>, chart: &Chart) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let config = &chart.config;
        root.fill(&self.get_background_color(config))?;

        if chart.is_empty() {
            self.draw_placeholder(&root, config)?;
        } else {
            match &chart.body {
                ChartBody::Points { datasets } => self.draw_points(&root, config, datasets)?,
                ChartBody::Bars { categories, series } => {
                    self.draw_bars(&root, config, categories, series)?
                }
                ChartBody::Ranked { bars } => self.draw_ranked(&root, config, bars)?,
            }
        }

        root.present()?;
        Ok(())
    }

    fn draw_placeholder<DB>(&self, root: &DrawingArea<DB, Shift>, config: &GraphConfig) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let title_font = (config.style.title_font.family.as_str(), config.style.title_font.size);
        let area = root.titled(&config.title, title_font)?;
        let (width, height) = area.dim_in_pixel();
        let font_size = config.style.axis_font.size + 4;
        let text_width = (EMPTY_CHART_MESSAGE.len() as u32 * font_size) / 2;
        let x = (width.saturating_sub(text_width) / 2) as i32;
        let y = (height / 2) as i32;
        area.draw(&Text::new(
            EMPTY_CHART_MESSAGE,
            (x, y),
            (config.style.axis_font.family.as_str(), font_size).into_font(),
        ))?;
        Ok(())
    }

    fn draw_points<DB>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &GraphConfig,
        datasets: &[DataSet],
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let (x_min, x_max, y_min, y_max) = calculate_data_ranges(datasets);

        let title_font = (config.style.title_font.family.as_str(), config.style.title_font.size);
        let mut chart = ChartBuilder::on(root)
            .caption(&config.title, title_font)
            .margin(config.style.margins.top as i32)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(config.x_label.as_deref().unwrap_or(""))
            .y_desc(config.y_label.as_deref().unwrap_or(""));
        if !config.style.show_grid {
            mesh.disable_mesh();
        }
        mesh.draw()?;

        let colors = self.get_colors(&config.style.color_scheme);
        for (i, dataset) in datasets.iter().enumerate() {
            let color = dataset
                .color
                .as_deref()
                .map(|c| self.parse_color(c))
                .unwrap_or(colors[i % colors.len()]);
            let points: Vec<(f64, f64)> = dataset
                .data
                .iter()
                .filter(|p| p.x.is_finite() && p.y.is_finite())
                .map(|p| (p.x, p.y))
                .collect();

            match config.graph_type {
                GraphType::Line => {
                    chart
                        .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
                        .label(dataset.name.as_str())
                        .legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
                        });
                    chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))?;
                }
                _ => {
                    chart
                        .draw_series(
                            points
                                .iter()
                                .map(|&p| Circle::new(p, 4, color.mix(0.7).filled())),
                        )?
                        .label(dataset.name.as_str())
                        .legend(move |(x, y)| Circle::new((x + 6, y), 4, color.filled()));
                }
            }
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }

    fn draw_bars<DB>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &GraphConfig,
        categories: &[String],
        series: &[BarSeries],
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let n = categories.len();
        let (y_min, y_max) = value_range(series.iter().flat_map(|s| s.values.iter().copied()));

        let title_font = (config.style.title_font.family.as_str(), config.style.title_font.size);
        let mut chart = ChartBuilder::on(root)
            .caption(&config.title, title_font)
            .margin(config.style.margins.top as i32)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..y_max)?;

        let label_of = |x: &f64| slot_label(categories, *x);
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(n)
            .x_label_formatter(&label_of)
            .x_desc(config.x_label.as_deref().unwrap_or(""))
            .y_desc(config.y_label.as_deref().unwrap_or(""));
        if !config.style.show_grid {
            mesh.disable_x_mesh().disable_y_mesh();
        }
        mesh.draw()?;

        let colors = self.get_colors(&config.style.color_scheme);
        let bar_width = 0.8 / series.len() as f64;

        for (j, bars) in series.iter().enumerate() {
            let series_color = colors[j % colors.len()];
            let rects = bars.values.iter().enumerate().map(|(i, &value)| {
                // a lone series gets one color per category
                let color = if series.len() == 1 {
                    colors[i % colors.len()]
                } else {
                    series_color
                };
                let left = i as f64 - 0.4 + j as f64 * bar_width;
                let top = clamp_to_range(value, y_min, y_max);
                Rectangle::new([(left, 0.0), (left + bar_width, top)], color.filled())
            });
            let anno = chart.draw_series(rects)?;
            if series.len() > 1 {
                anno.label(bars.name.as_str()).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], series_color.filled())
                });
            }
        }

        if series.len() > 1 {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }
        Ok(())
    }

    fn draw_ranked<DB>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &GraphConfig,
        bars: &[RankedBar],
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let n = bars.len();
        let (x_min, x_max) = value_range(bars.iter().map(|bar| bar.value));

        // best bar on top: rank i sits at y = n - 1 - i
        let labels: Vec<String> = bars
            .iter()
            .rev()
            .map(|bar| truncate_string(&bar.label, MAX_BAR_LABEL_CHARS))
            .collect();
        let label_of = |y: &f64| slot_label(&labels, *y);

        let title_font = (config.style.title_font.family.as_str(), config.style.title_font.size);
        let mut chart = ChartBuilder::on(root)
            .caption(&config.title, title_font)
            .margin(config.style.margins.top as i32)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left + 40)
            .build_cartesian_2d(x_min..x_max, -0.5f64..(n as f64 - 0.5))?;

        let mut mesh = chart.configure_mesh();
        mesh.y_labels(n)
            .y_label_formatter(&label_of)
            .x_desc(config.x_label.as_deref().unwrap_or(""))
            .y_desc(config.y_label.as_deref().unwrap_or(""));
        if !config.style.show_grid {
            mesh.disable_x_mesh().disable_y_mesh();
        }
        mesh.draw()?;

        let colors = self.get_colors(&config.style.color_scheme);
        let color = colors[0];
        chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let y = (n - 1 - i) as f64;
            let end = clamp_to_range(bar.value, x_min, x_max);
            Rectangle::new([(0.0, y - 0.35), (end, y + 0.35)], color.filled())
        }))?;

        let value_font = (config.style.axis_font.family.as_str(), config.style.axis_font.size);
        chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let y = (n - 1 - i) as f64;
            let end = clamp_to_range(bar.value, x_min, x_max);
            Text::new(format!("{}", bar.value), (end, y), value_font.into_font())
        }))?;
        Ok(())
    }
}

impl GraphRenderer for PlottersRenderer {
    fn render_to_file(&self, chart: &Chart, path: &Path) -> Result<()> {
        let size = (chart.config.width, chart.config.height);
        if size.0 == 0 || size.1 == 0 {
            return Err(TDashError::graph(format!(
                "Cannot render a {}x{} chart",
                size.0, size.1
            )));
        }

        let is_svg = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
        debug!(path = %path.display(), svg = is_svg, "Rendering chart");

        if is_svg {
            self.draw(SVGBackend::new(path, size).into_drawing_area(), chart)?;
        } else {
            self.draw(BitMapBackend::new(path, size).into_drawing_area(), chart)?;
        }

        info!("Successfully rendered '{}' to {}", chart.config.title, path.display());
        Ok(())
    }
}

/// Label of the integer slot nearest `position`, blank between slots.
fn slot_label(labels: &[String], position: f64) -> String {
    let slot = position.round();
    if (position - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    labels.get(slot as usize).cloned().unwrap_or_default()
}

/// Value axis range for bars: always includes zero, padded 10% past the extreme.
/// Non-finite values are left out; plotters cannot lay out an infinite axis.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let low = if min < 0.0 { min * 1.1 } else { 0.0 };
    let high = if max > 0.0 { max * 1.1 } else { 1.0 };
    if low.is_finite() && high.is_finite() {
        (low, high)
    } else {
        (min, max.max(1.0))
    }
}

/// Keeps a drawn extent inside the axis; NaN collapses to zero.
fn clamp_to_range(value: f64, low: f64, high: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(low, high)
    }
}

/// Calculate padded data ranges for all datasets
fn calculate_data_ranges(datasets: &[DataSet]) -> (f64, f64, f64, f64) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for point in datasets
        .iter()
        .flat_map(|ds| ds.data.iter())
        .filter(|p| p.x.is_finite() && p.y.is_finite())
    {
        x_min = x_min.min(point.x);
        x_max = x_max.max(point.x);
        y_min = y_min.min(point.y);
        y_max = y_max.max(point.y);
    }

    if !x_min.is_finite() || !y_min.is_finite() {
        return (0.0, 1.0, 0.0, 1.0);
    }

    let pad = |min: f64, max: f64| {
        let padding = if max > min { (max - min) * 0.05 } else { 1.0 };
        let (low, high) = (min - padding, max + padding);
        if low.is_finite() && high.is_finite() && high > low {
            (low, high)
        } else if max > min {
            (min, max)
        } else {
            (min - 1.0, min + 1.0)
        }
    };
    let (x_min, x_max) = pad(x_min, x_max);
    let (y_min, y_max) = pad(y_min, y_max);
    (x_min, x_max, y_min, y_max)
}
