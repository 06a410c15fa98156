//! Yearly summary table for the NOx report.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per year:
//! mean, max and min concentration, the count of hourly readings at or
//! above the limit, and whether either objective was breached.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use nox_core::formatting::format_concentration;
use nox_core::models::YearlyStat;

use crate::themes::Theme;

/// Display values for a single year row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRowData {
    pub year: String,
    pub mean: String,
    pub max: String,
    pub min: String,
    pub count_over_threshold: String,
    pub breaches_annual_mean: bool,
    pub breaches_hourly_limit: bool,
}

impl From<&YearlyStat> for TableRowData {
    fn from(stat: &YearlyStat) -> Self {
        Self {
            year: stat.year.to_string(),
            mean: format_concentration(stat.summary.mean),
            max: format_concentration(stat.summary.max),
            min: format_concentration(stat.summary.min),
            count_over_threshold: stat.count_over_threshold.to_string(),
            breaches_annual_mean: stat.breaches_annual_mean(),
            breaches_hourly_limit: stat.breaches_hourly_limit(),
        }
    }
}

/// Build table rows from yearly statistics, preserving their order.
pub fn rows_from_stats(stats: &[YearlyStat]) -> Vec<TableRowData> {
    stats.iter().map(TableRowData::from).collect()
}

/// Render the yearly summary table into `area`.
///
/// `exceedance_threshold` labels the column of hourly readings at or above it.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    rows: &[TableRowData],
    exceedance_threshold: f64,
    theme: &Theme,
) {
    if rows.is_empty() {
        render_no_data(frame, area, theme);
        return;
    }

    let header_cells = [
        "Year".to_string(),
        "Mean".to_string(),
        "Max".to_string(),
        "Min".to_string(),
        format!("Hours ≥ {}", exceedance_threshold),
        "Annual mean".to_string(),
        "Hourly limit".to_string(),
    ]
    .into_iter()
    .map(|h| Cell::from(h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let flag = |breached: bool| {
        if breached {
            Cell::from("BREACH").style(theme.breach)
        } else {
            Cell::from("ok").style(theme.compliant)
        }
    };

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(row.year.clone()),
                Cell::from(row.mean.clone()),
                Cell::from(row.max.clone()),
                Cell::from(row.min.clone()),
                Cell::from(row.count_over_threshold.clone()),
                flag(row.breaches_annual_mean),
                flag(row.breaches_hourly_limit),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let table = Table::new(data_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Yearly Summary ", theme.title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a "no data" placeholder when no year was found.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No NOx measurements found", theme.breach)),
        Line::from(""),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Yearly Summary "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
