//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each series is drawn as a connected polyline with its own glyph; the x
//! axis is the day index and the header carries the label range. On the log
//! scale, non-positive values are skipped and the polyline breaks there.

use crate::domain::Scale;
use crate::report::LabeledSeries;

const GLYPHS: [char; 4] = ['o', '*', '+', 'x'];

/// Render one chart for a set of `(label, value)` series.
pub fn render_ascii_chart(
    title: &str,
    series: &[LabeledSeries],
    scale: Scale,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let n_days = series.iter().map(|s| s.points.len()).max().unwrap_or(0);
    let (day_first, day_last) = label_range(series);

    let scale_suffix = match scale {
        Scale::Linear => "",
        Scale::Log => " (log scale)",
    };

    let Some((y_min, y_max)) = value_range(series, scale) else {
        return format!("Chart: {title}{scale_suffix} | no drawable points\n");
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for (si, s) in series.iter().enumerate() {
        let glyph = GLYPHS[si % GLYPHS.len()];
        let mut prev: Option<(usize, usize)> = None;

        for (i, (_, value)) in s.points.iter().enumerate() {
            let Some(v) = scale_value(*value, scale) else {
                prev = None;
                continue;
            };
            let x = map_x(i, n_days, width);
            let y = map_y(v, y_min, y_max, height);

            if let Some((x0, y0)) = prev {
                draw_line(&mut grid, x0, y0, x, y, glyph);
            } else {
                grid[y][x] = glyph;
            }
            prev = Some((x, y));
        }
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Chart: {title}{scale_suffix} | days=[{day_first}, {day_last}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    for (si, s) in series.iter().enumerate() {
        out.push_str(&format!("  {} {}\n", GLYPHS[si % GLYPHS.len()], s.name));
    }

    out
}

fn scale_value(value: f64, scale: Scale) -> Option<f64> {
    match scale {
        Scale::Linear => value.is_finite().then_some(value),
        Scale::Log => (value.is_finite() && value > 0.0).then(|| value.log10()),
    }
}

fn label_range(series: &[LabeledSeries]) -> (String, String) {
    let longest = series.iter().max_by_key(|s| s.points.len());
    match longest {
        Some(s) if !s.points.is_empty() => (
            s.points.first().map(|(l, _)| l.clone()).unwrap_or_default(),
            s.points.last().map(|(l, _)| l.clone()).unwrap_or_default(),
        ),
        _ => ("-".to_string(), "-".to_string()),
    }
}

fn value_range(series: &[LabeledSeries], scale: Scale) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for s in series {
        for &(_, value) in &s.points {
            if let Some(v) = scale_value(value, scale) {
                min_y = min_y.min(v);
                max_y = max_y.max(v);
            }
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    let width = width.max(2);
    if n < 2 {
        return 0;
    }
    let u = (i as f64 / (n as f64 - 1.0)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only blank cells are written, so
/// earlier series keep their glyphs where lines cross.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_golden_snapshot_small() {
        let series = vec![LabeledSeries::new(
            "Deaths",
            vec![("Mar 01".to_string(), 0.0), ("Mar 05".to_string(), 10.0)],
        )];

        let txt = render_ascii_chart("Deaths", &series, Scale::Linear, 10, 5);
        let expected = concat!(
            "Chart: Deaths | days=[Mar 01, Mar 05] | y=[-0.50, 10.50]\n",
            "         o\n",
            "       oo \n",
            "    ooo   \n",
            "  oo      \n",
            "oo        \n",
            "  o Deaths\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn log_scale_spaces_decades_evenly() {
        let series = vec![LabeledSeries::new(
            "Positive tests",
            vec![
                ("Mar 01".to_string(), 1.0),
                ("Mar 02".to_string(), 10.0),
                ("Mar 03".to_string(), 100.0),
            ],
        )];

        let txt = render_ascii_chart("Positive Tests", &series, Scale::Log, 11, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert!(lines[0].contains("(log scale)"));

        // 1 -> 10 -> 100 is linear in log10, so the middle point sits in the
        // middle grid row (header is line 0).
        assert_eq!(lines[3].chars().nth(5), Some('o'));
    }

    #[test]
    fn log_scale_skips_non_positive_values() {
        let series = vec![LabeledSeries::new(
            "Unaccounted cases",
            vec![
                ("Mar 01".to_string(), 0.0),
                ("Mar 02".to_string(), 10.0),
                ("Mar 03".to_string(), 100.0),
            ],
        )];

        let txt = render_ascii_chart("Unaccounted", &series, Scale::Log, 12, 6);
        assert!(txt.contains("o"));
    }

    #[test]
    fn empty_series_render_a_hint_instead_of_panicking() {
        let txt = render_ascii_chart("Deaths", &[], Scale::Linear, 10, 5);
        assert!(txt.contains("no drawable points"));
    }

    #[test]
    fn overlayed_series_get_distinct_glyphs() {
        let a = LabeledSeries::new(
            "est. infections",
            vec![("Mar 01".to_string(), 5.0), ("Mar 02".to_string(), 50.0)],
        );
        let b = LabeledSeries::new(
            "Positive tests",
            vec![("Mar 01".to_string(), 40.0), ("Mar 02".to_string(), 8.0)],
        );

        let txt = render_ascii_chart("Infections", &[a, b], Scale::Linear, 20, 8);
        assert!(txt.contains('o'));
        assert!(txt.contains('*'));
        assert!(txt.contains("  o est. infections"));
        assert!(txt.contains("  * Positive tests"));
    }
}
