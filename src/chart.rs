//! Stacked percentage bar chart (PNG) using plotters
//!
//! One bar per pay tier, one stacked segment per experience value. Segment
//! colors run along a diverging blue-to-red palette in column order.

use std::path::Path;

use plotters::prelude::*;
use thiserror::Error;

use crate::crosstab::CrossTab;
use crate::graph::destination_label;

/// Default output image name
pub const DEFAULT_IMAGE_FILE: &str = "tier_experience_chart.png";

pub const CHART_WIDTH: u32 = 1000;
pub const CHART_HEIGHT: u32 = 700;

pub const CHART_TITLE: &str = "Experience Distribution by Pay Tier";

/// Errors that can occur while drawing the chart
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("nothing to draw: the cross-tabulation is empty")]
    Empty,

    #[error("failed to render chart to {path}: {message}")]
    Render { path: String, message: String },
}

/// Draw `crosstab` as a stacked bar chart and write it to `path`
pub fn render_stacked_bar(path: &Path, crosstab: &CrossTab) -> Result<(), ChartError> {
    if crosstab.is_empty() {
        return Err(ChartError::Empty);
    }

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_error(path, e))?;

    let tiers = crosstab.rows();
    let columns = crosstab.columns();

    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, ("sans-serif", 24).into_font().style(FontStyle::Bold))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0..tiers.len()).into_segmented(), 0.0f64..100.0f64)
        .map_err(|e| render_error(path, e))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(tiers.len())
        .x_label_formatter(&|x| {
            if let SegmentValue::CenterOf(idx) = x {
                if let Some(tier) = tiers.get(*idx) {
                    return tier.clone();
                }
            }
            String::new()
        })
        .x_desc("Pay Tier")
        .y_desc("Share of Employees (%)")
        .y_label_formatter(&|y| format!("{:.0}", y))
        .light_line_style(WHITE)
        .bold_line_style(BLACK.mix(0.15))
        .draw()
        .map_err(|e| render_error(path, e))?;

    let mut baselines = vec![0.0f64; tiers.len()];

    for (col_idx, column) in columns.iter().enumerate() {
        let color = coolwarm(palette_position(col_idx, columns.len()));

        let segments: Vec<(usize, f64, f64)> = (0..tiers.len())
            .filter_map(|row_idx| {
                let pct = crosstab.row_percentages(row_idx)?[col_idx];
                let bottom = baselines[row_idx];
                baselines[row_idx] += pct;
                (pct > 0.0).then_some((row_idx, bottom, bottom + pct))
            })
            .collect();

        chart
            .draw_series(segments.into_iter().map(|(row_idx, bottom, top)| {
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(row_idx), bottom),
                        (SegmentValue::Exact(row_idx + 1), top),
                    ],
                    color.filled(),
                );
                bar.set_margin(0, 0, 15, 15);
                bar
            }))
            .map_err(|e| render_error(path, e))?
            .label(destination_label(column))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()
        .map_err(|e| render_error(path, e))?;

    root.present().map_err(|e| render_error(path, e))?;
    Ok(())
}

fn render_error(path: &Path, e: impl std::fmt::Display) -> ChartError {
    ChartError::Render {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

fn palette_position(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.5
    } else {
        index as f64 / (count - 1) as f64
    }
}

/// Diverging palette: blue at 0.0, light grey at 0.5, red at 1.0
pub fn coolwarm(value: f64) -> RGBColor {
    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    let v = value.clamp(0.0, 1.0);
    let (from, to, t) = if v < 0.5 {
        (COLD, MID, v * 2.0)
    } else {
        (MID, WARM, (v - 0.5) * 2.0)
    };

    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}
