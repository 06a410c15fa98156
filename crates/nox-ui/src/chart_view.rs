//! Bar charts of the aggregate series with regulatory reference lines.
//!
//! Mirrors the four report plots: yearly average (line at 40 µg/m³),
//! monthly average, daily average, and yearly count of hourly readings at
//! or above 200 µg/m³ (line at 18). Missing values leave a gap in the bars.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset as ChartDataset, GraphType, Paragraph},
    Frame,
};

use nox_core::formatting::{day_label, month_label};
use nox_core::limits::{
    ANNUAL_MEAN_LIMIT_UGM3, DAYS_PER_MONTH_EVALUATED, HOURLY_EXCEEDANCES_ALLOWED,
    HOURLY_LIMIT_UGM3, MONTHS_PER_YEAR,
};
use nox_core::models::{NoxSeries, Reading};

use crate::themes::Theme;

// ── ChartKind ─────────────────────────────────────────────────────────────────

/// The four report charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    YearlyAverage,
    MonthlyAverage,
    DailyAverage,
    YearlyExceedances,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::YearlyAverage,
        ChartKind::MonthlyAverage,
        ChartKind::DailyAverage,
        ChartKind::YearlyExceedances,
    ];

    /// Chart title; the exceedance chart names the threshold it counts.
    pub fn title(self, exceedance_threshold: f64) -> String {
        match self {
            ChartKind::YearlyAverage => "Average Annual NOx".to_string(),
            ChartKind::MonthlyAverage => "Average Monthly NOx".to_string(),
            ChartKind::DailyAverage => "Average Daily NOx".to_string(),
            ChartKind::YearlyExceedances => {
                format!("Number of Measurements Over {} ugm-3", exceedance_threshold)
            }
        }
    }

    pub fn x_label(self) -> &'static str {
        match self {
            ChartKind::YearlyAverage | ChartKind::YearlyExceedances => "Year",
            ChartKind::MonthlyAverage => "Month",
            ChartKind::DailyAverage => "Day",
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            ChartKind::YearlyExceedances => "Number",
            _ => "NOx ugm-3",
        }
    }

    /// Reference line drawn across the chart, if the chart has one.
    pub fn threshold(self) -> Option<f64> {
        match self {
            ChartKind::YearlyAverage => Some(ANNUAL_MEAN_LIMIT_UGM3),
            ChartKind::YearlyExceedances => Some(f64::from(HOURLY_EXCEEDANCES_ALLOWED)),
            ChartKind::MonthlyAverage | ChartKind::DailyAverage => None,
        }
    }
}

// ── ChartSpec ─────────────────────────────────────────────────────────────────

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    /// `(x, value)` per bar. Yearly charts use the year as `x`; the others
    /// number their cells from 1.
    pub bars: Vec<(f64, Reading)>,
    pub threshold: Option<f64>,
    /// Labels for the start and end of the x axis.
    pub x_labels: Vec<String>,
}

impl ChartSpec {
    pub fn from_series(kind: ChartKind, series: &NoxSeries) -> Self {
        let by_year = |values: Vec<Reading>| -> Vec<(f64, Reading)> {
            series
                .year_list
                .iter()
                .map(|&y| f64::from(y))
                .zip(values)
                .collect()
        };
        let by_position = |values: &[Reading]| -> Vec<(f64, Reading)> {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| ((i + 1) as f64, *v))
                .collect()
        };

        let bars = match kind {
            ChartKind::YearlyAverage => by_year(series.yearly_average_nox.clone()),
            ChartKind::YearlyExceedances => by_year(
                series
                    .yearly_count_over_200
                    .iter()
                    .map(|&c| Some(f64::from(c)))
                    .collect(),
            ),
            ChartKind::MonthlyAverage => by_position(&series.monthly_average_nox),
            ChartKind::DailyAverage => by_position(&series.daily_average_nox),
        };

        let first = series.year_list.first().copied();
        let last = series.year_list.last().copied();
        let x_labels = match (first, last) {
            (Some(first), Some(last)) => match kind {
                ChartKind::YearlyAverage | ChartKind::YearlyExceedances => {
                    vec![first.to_string(), last.to_string()]
                }
                ChartKind::MonthlyAverage => {
                    vec![month_label(first, 1), month_label(last, MONTHS_PER_YEAR)]
                }
                ChartKind::DailyAverage => vec![
                    day_label(first, 1, 1),
                    day_label(last, MONTHS_PER_YEAR, DAYS_PER_MONTH_EVALUATED),
                ],
            },
            _ => Vec::new(),
        };

        Self {
            kind,
            title: kind.title(HOURLY_LIMIT_UGM3),
            bars,
            threshold: kind.threshold(),
            x_labels,
        }
    }

    /// Retitle for a non-default exceedance threshold.
    pub fn with_exceedance_threshold(mut self, exceedance_threshold: f64) -> Self {
        self.title = self.kind.title(exceedance_threshold);
        self
    }

    /// All four charts in report order.
    pub fn all(series: &NoxSeries) -> Vec<Self> {
        ChartKind::ALL
            .iter()
            .map(|&kind| Self::from_series(kind, series))
            .collect()
    }

    pub fn has_data(&self) -> bool {
        self.bars.iter().any(|(_, v)| v.is_some())
    }
}

// ── Geometry helpers ──────────────────────────────────────────────────────────

/// Bars split into `(within_limit, above_limit)` points. Missing values are
/// dropped; without a limit every bar is within it.
pub fn bar_points(bars: &[(f64, Reading)], limit: Option<f64>) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    bars.iter()
        .filter_map(|&(x, v)| v.map(|v| (x, v)))
        .partition(|&(_, v)| limit.map(|l| v <= l).unwrap_or(true))
}

/// Horizontal `[x_min, x_max]` with one unit of padding on each side.
/// Bars may arrive in any x order.
pub fn x_bounds(bars: &[(f64, Reading)]) -> [f64; 2] {
    if bars.is_empty() {
        return [0.0, 1.0];
    }
    let (lo, hi) = bars
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(x, _)| {
            (lo.min(x), hi.max(x))
        });
    [lo - 1.0, hi + 1.0]
}

/// Endpoints of the reference line spanning the padded x range.
pub fn threshold_line(bars: &[(f64, Reading)], threshold: f64) -> [(f64, f64); 2] {
    let [lo, hi] = x_bounds(bars);
    [(lo, threshold), (hi, threshold)]
}

/// Vertical bounds from zero to 10 % above the tallest bar or the threshold.
pub fn y_bounds(bars: &[(f64, Reading)], threshold: Option<f64>) -> [f64; 2] {
    let top = bars
        .iter()
        .filter_map(|(_, v)| *v)
        .chain(threshold)
        .fold(0.0_f64, f64::max);
    [0.0, if top > 0.0 { top * 1.1 } else { 1.0 }]
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render `spec` as a bordered bar chart into `area`.
pub fn render_chart(frame: &mut Frame, area: Rect, spec: &ChartSpec, theme: &Theme) {
    if !spec.has_data() {
        render_no_data(frame, area, &spec.title, theme);
        return;
    }

    let (within, above) = bar_points(&spec.bars, spec.threshold);
    let line = spec.threshold.map(|t| threshold_line(&spec.bars, t));
    let x = x_bounds(&spec.bars);
    let y = y_bounds(&spec.bars, spec.threshold);

    let mut datasets = vec![bar_dataset(&within, theme.bar)];
    if !above.is_empty() {
        datasets.push(bar_dataset(&above, theme.bar_breach));
    }
    if let (Some(points), Some(t)) = (line.as_ref(), spec.threshold) {
        datasets.push(
            ChartDataset::default()
                .name(format!("limit {}", t))
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.threshold)
                .data(points),
        );
    }

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", spec.title), theme.title)),
        )
        .x_axis(
            Axis::default()
                .title(spec.kind.x_label())
                .style(theme.axis)
                .bounds(x)
                .labels(spec.x_labels.clone()),
        )
        .y_axis(
            Axis::default()
                .title(spec.kind.y_label())
                .style(theme.axis)
                .bounds(y)
                .labels(axis_labels(y)),
        );

    frame.render_widget(chart, area);
}

/// Render a bordered "no data" placeholder.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        "No valid measurements to chart.",
        theme.dim,
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(format!(" {} ", title), theme.title)),
    );
    frame.render_widget(paragraph, area);
}

fn bar_dataset(points: &[(f64, f64)], style: Style) -> ChartDataset<'_> {
    ChartDataset::default()
        .marker(symbols::Marker::HalfBlock)
        .graph_type(GraphType::Bar)
        .style(style)
        .data(points)
}

/// Low, middle and high labels for the value axis.
fn axis_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| format!("{:.0}", v))
        .collect()
}
