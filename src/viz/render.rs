//! Chart drawing on a plotters backend.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{EngineError, Result};
use crate::viz::style::ResolvedStyle;
use crate::viz::VizKind;

fn render_err<E: std::fmt::Display>(err: E) -> EngineError {
    EngineError::Render(err.to_string())
}

pub(super) fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    values: &[f64],
    kind: VizKind,
    style: &ResolvedStyle,
    fitted: Option<(f64, f64)>,
) -> Result<()> {
    root.fill(&WHITE).map_err(render_err)?;
    match kind {
        VizKind::Histogram => draw_histogram(&root, values, style)?,
        _ => draw_series_chart(&root, values, kind, style, fitted)?,
    }
    root.present().map_err(render_err)?;
    Ok(())
}

fn draw_series_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    values: &[f64],
    kind: VizKind,
    style: &ResolvedStyle,
    fitted: Option<(f64, f64)>,
) -> Result<()> {
    let title_font = ("sans-serif", style.font_px);
    let tick_font = ("sans-serif", (style.font_px * 4 / 5).max(1));

    let x_max = values.len().saturating_sub(1).max(1) as f64;
    let (mut y_min, mut y_max) = bounds(values);
    if let Some((slope, intercept)) = fitted {
        y_min = y_min.min(intercept).min(slope * x_max + intercept);
        y_max = y_max.max(intercept).max(slope * x_max + intercept);
    }
    let (y_lo, y_hi) = pad(y_min, y_max);

    let mut chart = ChartBuilder::on(root)
        .caption(&style.title, title_font)
        .margin(20)
        .x_label_area_size(style.font_px * 3)
        .y_label_area_size(style.font_px * 4)
        .build_cartesian_2d(-0.5..x_max + 0.5, y_lo..y_hi)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .x_desc(&style.xlabel)
        .y_desc(&style.ylabel)
        .axis_desc_style(title_font)
        .label_style(tick_font)
        .draw()
        .map_err(render_err)?;

    let fill = style.fill;
    let marker = style.marker_radius;
    let alpha = style.alpha;

    match kind {
        VizKind::Line => {
            chart
                .draw_series(LineSeries::new(
                    points(values),
                    fill.stroke_width(style.line_width),
                ))
                .map_err(render_err)?;
        }
        VizKind::Scatter => {
            chart
                .draw_series(points(values).map(|xy| {
                    Circle::new(xy, marker, fill.mix(alpha).filled())
                }))
                .map_err(render_err)?;
        }
        VizKind::FitLine => {
            chart
                .draw_series(points(values).map(|xy| {
                    Circle::new(xy, marker, fill.mix(alpha).filled())
                }))
                .map_err(render_err)?
                .label(style.scatter_label.clone())
                .legend(move |(x, y)| Circle::new((x + 10, y), 4, fill.filled()));

            if let Some((slope, intercept)) = fitted {
                let line_width = style.line_width;
                let endpoints = vec![(0.0, intercept), (x_max, slope * x_max + intercept)];
                chart
                    .draw_series(LineSeries::new(endpoints, RED.stroke_width(line_width)))
                    .map_err(render_err)?
                    .label(format!("Fit: y={:.2}x+{:.2}", slope, intercept))
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(line_width))
                    });
            }

            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font(tick_font)
                .draw()
                .map_err(render_err)?;
        }
        VizKind::Histogram => {}
    }
    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    values: &[f64],
    style: &ResolvedStyle,
) -> Result<()> {
    let title_font = ("sans-serif", style.font_px);
    let tick_font = ("sans-serif", (style.font_px * 4 / 5).max(1));

    let (min, max) = bounds(values);
    let (lo, hi) = if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let bin_width = (hi - lo) / style.bins as f64;
    let mut counts = vec![0usize; style.bins];
    for &v in values {
        let idx = (((v - lo) / bin_width) as usize).min(style.bins - 1);
        counts[idx] += 1;
    }
    let y_max = counts.iter().copied().max().unwrap_or(1).max(1) as f64 * 1.05;

    let mut chart = ChartBuilder::on(root)
        .caption(&style.title, title_font)
        .margin(20)
        .x_label_area_size(style.font_px * 3)
        .y_label_area_size(style.font_px * 4)
        .build_cartesian_2d(lo..hi, 0.0..y_max)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .x_desc(&style.xlabel)
        .y_desc(&style.ylabel)
        .axis_desc_style(title_font)
        .label_style(tick_font)
        .draw()
        .map_err(render_err)?;

    let fill = style.fill.mix(style.alpha).filled();
    chart
        .draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = lo + i as f64 * bin_width;
            Rectangle::new([(x0, 0.0), (x0 + bin_width, count as f64)], fill)
        }))
        .map_err(render_err)?;
    // Bar outlines drawn separately so the edge color stays opaque.
    let edge = style.edge.stroke_width(1);
    chart
        .draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = lo + i as f64 * bin_width;
            Rectangle::new([(x0, 0.0), (x0 + bin_width, count as f64)], edge)
        }))
        .map_err(render_err)?;
    Ok(())
}

fn points(values: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    values.iter().enumerate().map(|(i, &v)| (i as f64, v))
}

fn bounds(values: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

fn pad(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span.abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min - 0.05 * span, max + 0.05 * span)
    }
}
