//! Ratatui-based terminal UI.
//!
//! The TUI fetches the daily feed once, then lets you flip between the chart
//! views (positive tests, deaths, estimated vs. reported infections,
//! unaccounted cases), toggle the log scale, and adjust the lag offset
//! without refetching.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::pipeline::{RunOutput, run_report_with_records};
use crate::cli::ReportArgs;
use crate::data::{CovidClient, RawRecord};
use crate::domain::Scale;
use crate::error::{AppError, ErrorKind};
use crate::report::LabeledSeries;

mod plotters_chart;

use plotters_chart::{SeriesChart, SeriesLine};

// High-contrast palette for terminal rendering, one color per overlay series.
const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(0, 255, 255), // cyan
    RGBColor(255, 255, 0), // yellow
    RGBColor(255, 255, 255), // white
    RGBColor(0, 255, 0),   // green
];

/// Start the TUI.
pub fn run(args: ReportArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                ErrorKind::Io,
                format!("Failed to enter alternate screen: {e}"),
            ));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: crate::domain::RunConfig,
    status: String,
    raw: Vec<RawRecord>,
    source_url: String,
    run: Option<RunOutput>,
}

impl App {
    fn new(args: ReportArgs) -> Result<Self, AppError> {
        let config = crate::app::run_config_from_args(&args);
        let mut app = Self {
            config,
            status: "Fetching daily feed...".to_string(),
            raw: Vec::new(),
            source_url: String::new(),
            run: None,
        };
        app.refresh_feed()?;
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(ErrorKind::Io, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(ErrorKind::Io, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read()
                .map_err(|e| AppError::new(ErrorKind::Io, format!("Event read error: {e}")))?
            {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Left => {
                self.config.chart = self.config.chart.prev();
                self.status = format!("chart: {}", self.config.chart.display_name());
            }
            KeyCode::Right => {
                self.config.chart = self.config.chart.next();
                self.status = format!("chart: {}", self.config.chart.display_name());
            }
            KeyCode::Char('l') => {
                self.config.scale = self.config.scale.toggled();
                self.status = format!("scale: {}", self.config.scale.display_name());
            }
            KeyCode::Up => self.adjust_offset(1)?,
            KeyCode::Down => self.adjust_offset(-1)?,
            KeyCode::Char('r') => {
                self.refresh_feed()?;
                self.status = "Refetched daily feed.".to_string();
            }
            KeyCode::Char('d') => {
                if let Some(run) = &self.run {
                    match crate::debug::write_debug_bundle(run, &self.config) {
                        Ok(path) => {
                            self.status = format!("Wrote debug bundle: {}", path.display());
                        }
                        Err(err) => {
                            self.status = format!("Debug write failed: {err}");
                        }
                    }
                } else {
                    self.status = "No feed data available.".to_string();
                }
            }
            _ => {}
        }

        Ok(false)
    }

    fn adjust_offset(&mut self, delta: i64) -> Result<(), AppError> {
        let next = (self.config.params.offset_days + delta).max(0);
        if next != self.config.params.offset_days {
            self.config.params.offset_days = next;
            self.recompute()?;
        }
        self.status = format!("offset: {}d", self.config.params.offset_days);
        Ok(())
    }

    fn refresh_feed(&mut self) -> Result<(), AppError> {
        let client = CovidClient::from_env(self.config.url.as_deref());
        self.raw = client.fetch_daily()?;
        self.source_url = client.url().to_string();
        self.recompute()
    }

    fn recompute(&mut self) -> Result<(), AppError> {
        let run = run_report_with_records(&self.config, &self.raw, self.source_url.clone())?;
        self.run = Some(run);
        Ok(())
    }

    fn draw(&self, f: &mut ratatui::Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.draw_header(f, chunks[0]);

        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(40)])
            .split(chunks[1]);

        self.draw_chart(f, main[0]);
        self.draw_side_panel(f, main[1]);

        let help = Paragraph::new(
            " q quit | \u{2190}/\u{2192} chart | l log scale | \u{2191}/\u{2193} offset | r refetch | d debug bundle",
        )
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, chunks[2]);
    }

    fn draw_header(&self, f: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let params = &self.config.params;
        let line = Line::from(vec![
            Span::styled(
                "backcast ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "offset={}d  death_rate={:.4}  symptomatic={:.4}  scale={}  |  ",
                params.offset_days,
                params.death_rate,
                params.death_rate_symptomatic,
                self.config.scale.display_name()
            )),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        f.render_widget(header, area);
    }

    fn draw_chart(&self, f: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let title = format!(
            " {} ({}) ",
            self.config.chart.display_name(),
            self.config.scale.display_name()
        );
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let Some(run) = &self.run else {
            f.render_widget(Paragraph::new("Loading..."), inner);
            return;
        };

        let series = crate::report::chart_series(
            self.config.chart,
            &run.daily,
            &run.estimates,
            &run.unaccounted,
        );

        let Some(chart) = prepare_chart(&series, self.config.scale) else {
            f.render_widget(Paragraph::new("No drawable points."), inner);
            return;
        };

        let widget = SeriesChart {
            lines: &chart.lines,
            x_labels: &chart.x_labels,
            x_bounds: chart.x_bounds,
            y_bounds: chart.y_bounds,
            x_label: "day",
            y_label: match self.config.scale {
                Scale::Linear => "count".to_string(),
                Scale::Log => "log10(count)".to_string(),
            },
            fmt_y: |v| format!("{v:.1}"),
        };
        f.render_widget(widget, inner);
    }

    fn draw_side_panel(&self, f: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let block = Block::default().borders(Borders::ALL).title(" summary ");
        let inner = block.inner(area);
        f.render_widget(block, area);

        let Some(run) = &self.run else {
            f.render_widget(Paragraph::new("Loading..."), inner);
            return;
        };

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(format!("rows fetched : {}", run.rows_fetched)));
        lines.push(Line::from(format!("days cleaned : {}", run.daily.len())));
        if let (Some(first), Some(last)) = (run.daily.first(), run.daily.last()) {
            lines.push(Line::from(format!("range        : {}..{}", first.date, last.date)));
            lines.push(Line::from(""));
            lines.push(Line::from(format!(
                "latest ({})",
                last.day_label
            )));
            lines.push(Line::from(format!("  positive   : {}", last.positive)));
            lines.push(Line::from(format!("  death      : {}", last.death)));
        }
        if let Some(est) = run.estimates.last() {
            lines.push(Line::from(format!(
                "  infected   : {:.0} (as of {})",
                est.infected, est.day_label
            )));
            lines.push(Line::from(format!("  symptomatic: {:.0}", est.symptomatic)));
        }
        if let Some(p) = run.unaccounted.last() {
            lines.push(Line::from(""));
            lines.push(Line::from(format!(
                "unaccounted ({}) : {:.0}",
                p.day_label, p.value
            )));
        }

        // Per-series color key for the current chart.
        let series = crate::report::chart_series(
            self.config.chart,
            &run.daily,
            &run.estimates,
            &run.unaccounted,
        );
        if series.len() > 1 {
            lines.push(Line::from(""));
            for (i, s) in series.iter().enumerate() {
                let color = match i % SERIES_COLORS.len() {
                    0 => Color::Cyan,
                    1 => Color::Yellow,
                    2 => Color::White,
                    _ => Color::Green,
                };
                lines.push(Line::from(Span::styled(
                    format!("\u{2500}\u{2500} {}", s.name),
                    Style::default().fg(color),
                )));
            }
        }

        f.render_widget(Paragraph::new(lines), inner);
    }
}

/// Prepared chart data: transformed points, bounds, and tick labels.
struct PreparedChart {
    lines: Vec<SeriesLine>,
    x_labels: Vec<String>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Convert `(label, value)` series into drawable lines.
///
/// On the log scale, values are log10-transformed and non-positive points are
/// dropped (the line breaks are acceptable at terminal resolution).
fn prepare_chart(series: &[LabeledSeries], scale: Scale) -> Option<PreparedChart> {
    let n_days = series.iter().map(|s| s.points.len()).max()?;
    if n_days == 0 {
        return None;
    }

    let x_labels = series
        .iter()
        .max_by_key(|s| s.points.len())
        .map(|s| s.points.iter().map(|(l, _)| l.clone()).collect())
        .unwrap_or_default();

    let mut lines = Vec::with_capacity(series.len());
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for (i, s) in series.iter().enumerate() {
        let mut points = Vec::with_capacity(s.points.len());
        for (x, (_, value)) in s.points.iter().enumerate() {
            let y = match scale {
                Scale::Linear if value.is_finite() => *value,
                Scale::Log if value.is_finite() && *value > 0.0 => value.log10(),
                _ => continue,
            };
            y_min = y_min.min(y);
            y_max = y_max.max(y);
            points.push((x as f64, y));
        }
        lines.push(SeriesLine {
            points,
            color: SERIES_COLORS[i % SERIES_COLORS.len()],
        });
    }

    if !(y_min.is_finite() && y_max.is_finite() && y_max > y_min) {
        return None;
    }
    let pad = ((y_max - y_min) * 0.05).max(1e-12);

    Some(PreparedChart {
        lines,
        x_labels,
        x_bounds: [0.0, (n_days.max(2) - 1) as f64],
        y_bounds: [y_min - pad, y_max + pad],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_chart_log_drops_non_positive_points() {
        let series = vec![LabeledSeries::new(
            "Positive tests",
            vec![
                ("Mar 01".to_string(), 0.0),
                ("Mar 02".to_string(), 10.0),
                ("Mar 03".to_string(), 1000.0),
            ],
        )];

        let chart = prepare_chart(&series, Scale::Log).unwrap();
        assert_eq!(chart.lines.len(), 1);
        // The zero point is dropped; the remaining two are log10 values.
        assert_eq!(chart.lines[0].points.len(), 2);
        assert!((chart.lines[0].points[0].1 - 1.0).abs() < 1e-9);
        assert!((chart.lines[0].points[1].1 - 3.0).abs() < 1e-9);
        assert_eq!(chart.x_labels.len(), 3);
    }

    #[test]
    fn prepare_chart_rejects_empty_input() {
        assert!(prepare_chart(&[], Scale::Linear).is_none());
        let flat = vec![LabeledSeries::new("Deaths", vec![("Mar 01".to_string(), 5.0)])];
        // A single value has no spread, so there is nothing to draw.
        assert!(prepare_chart(&flat, Scale::Linear).is_none());
    }
}
