//! Visualization style configuration.
//!
//! Every style default lives here, on one struct, instead of being scattered
//! through the render bodies. Sizes follow the plotting convention of inches
//! and points; the renderer converts to pixels using the configured DPI.

use plotters::style::RGBColor;
use serde::Deserialize;

use crate::error::{EngineError, Result};
use crate::viz::VizKind;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VizParams {
    /// Figure width in inches.
    pub fig_width: f64,
    /// Figure height in inches.
    pub fig_height: f64,
    /// Dots per inch at save time.
    pub dpi: f64,
    /// Base font size in points, applied to title, labels, and legend.
    pub font_size: f64,
    /// Fill transparency for markers and histogram bars.
    pub alpha: f64,
    /// Marker area in points squared (scatter and fit_line).
    pub size: f64,
    /// Series color; per-kind default when absent.
    pub color: Option<String>,
    /// Histogram bar edge color.
    pub edgecolor: String,
    /// Histogram bin count.
    pub bins: usize,
    /// Line width in points.
    pub linewidth: f64,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub title: Option<String>,
    /// Legend label for the raw points in a fit_line plot.
    pub scatter_label: String,
}

impl Default for VizParams {
    fn default() -> Self {
        Self {
            fig_width: 10.0,
            fig_height: 6.0,
            dpi: 300.0,
            font_size: 12.0,
            alpha: 0.7,
            size: 20.0,
            color: None,
            edgecolor: "black".to_string(),
            bins: 20,
            linewidth: 2.0,
            xlabel: None,
            ylabel: None,
            title: None,
            scatter_label: "Data".to_string(),
        }
    }
}

/// Style with per-kind defaults applied and units converted to pixels.
#[derive(Debug, Clone)]
pub struct ResolvedStyle {
    pub width_px: u32,
    pub height_px: u32,
    pub font_px: i32,
    pub alpha: f64,
    pub marker_radius: i32,
    pub line_width: u32,
    pub fill: RGBColor,
    pub edge: RGBColor,
    pub bins: usize,
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub scatter_label: String,
}

impl ResolvedStyle {
    pub fn for_kind(kind: VizKind, params: &VizParams) -> Result<Self> {
        let px_per_pt = params.dpi / 72.0;
        let fill_name = params.color.clone().unwrap_or_else(|| match kind {
            VizKind::Histogram => "skyblue".to_string(),
            _ => "blue".to_string(),
        });
        let (title, xlabel, ylabel) = kind_labels(kind);

        Ok(Self {
            width_px: (params.fig_width * params.dpi).round().max(1.0) as u32,
            height_px: (params.fig_height * params.dpi).round().max(1.0) as u32,
            font_px: (params.font_size * px_per_pt).round().max(1.0) as i32,
            alpha: params.alpha.clamp(0.0, 1.0),
            // Marker `size` is an area in points squared.
            marker_radius: ((params.size / std::f64::consts::PI).sqrt() * px_per_pt)
                .round()
                .max(1.0) as i32,
            line_width: (params.linewidth * px_per_pt).round().max(1.0) as u32,
            fill: parse_color(&fill_name)?,
            edge: parse_color(&params.edgecolor)?,
            bins: params.bins.max(1),
            title: params.title.clone().unwrap_or_else(|| title.to_string()),
            xlabel: params.xlabel.clone().unwrap_or_else(|| xlabel.to_string()),
            ylabel: params.ylabel.clone().unwrap_or_else(|| ylabel.to_string()),
            scatter_label: params.scatter_label.clone(),
        })
    }
}

fn kind_labels(kind: VizKind) -> (&'static str, &'static str, &'static str) {
    match kind {
        VizKind::Scatter => ("Scatter Plot", "Index", "Value"),
        VizKind::Line => ("Line Plot", "Index", "Value"),
        VizKind::Histogram => ("Histogram", "Value", "Frequency"),
        VizKind::FitLine => ("Data with Linear Fit", "Index", "Value"),
    }
}

/// Named colors used by the node palette, plus `#rrggbb` hex.
pub fn parse_color(name: &str) -> Result<RGBColor> {
    let lower = name.trim().to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix('#') {
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16);
            let g = u8::from_str_radix(&hex[2..4], 16);
            let b = u8::from_str_radix(&hex[4..6], 16);
            if let (Ok(r), Ok(g), Ok(b)) = (r, g, b) {
                return Ok(RGBColor(r, g, b));
            }
        }
        return Err(EngineError::Operation(format!("invalid color: {}", name)));
    }
    Ok(match lower.as_str() {
        "blue" => RGBColor(31, 119, 180),
        "skyblue" => RGBColor(135, 206, 235),
        "red" => RGBColor(214, 39, 40),
        "green" => RGBColor(44, 160, 44),
        "orange" => RGBColor(255, 127, 14),
        "purple" => RGBColor(148, 103, 189),
        "black" => RGBColor(0, 0, 0),
        "white" => RGBColor(255, 255, 255),
        "gray" | "grey" => RGBColor(127, 127, 127),
        "cyan" => RGBColor(23, 190, 207),
        "magenta" => RGBColor(227, 119, 194),
        "yellow" => RGBColor(188, 189, 34),
        _ => return Err(EngineError::Operation(format!("invalid color: {}", name))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_table() {
        let params = VizParams::default();
        assert_eq!(params.fig_width, 10.0);
        assert_eq!(params.fig_height, 6.0);
        assert_eq!(params.dpi, 300.0);
        assert_eq!(params.bins, 20);
        assert_eq!(params.alpha, 0.7);
        assert_eq!(params.linewidth, 2.0);
    }

    #[test]
    fn histogram_defaults_to_skyblue_fill() {
        let style = ResolvedStyle::for_kind(VizKind::Histogram, &VizParams::default()).unwrap();
        assert_eq!(style.fill, parse_color("skyblue").unwrap());
        assert_eq!(style.edge, parse_color("black").unwrap());
        assert_eq!(style.xlabel, "Value");
        assert_eq!(style.ylabel, "Frequency");
    }

    #[test]
    fn pixel_size_is_inches_times_dpi() {
        let style = ResolvedStyle::for_kind(VizKind::Line, &VizParams::default()).unwrap();
        assert_eq!(style.width_px, 3000);
        assert_eq!(style.height_px, 1800);
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_color("#ff0080").unwrap(), RGBColor(255, 0, 128));
        assert!(parse_color("#zzz").is_err());
        assert!(parse_color("mauvelous").is_err());
    }

    #[test]
    fn explicit_overrides_win() {
        let params: VizParams = serde_json::from_value(serde_json::json!({
            "color": "red",
            "title": "My Plot",
            "bins": 5,
        }))
        .unwrap();
        let style = ResolvedStyle::for_kind(VizKind::Histogram, &params).unwrap();
        assert_eq!(style.fill, parse_color("red").unwrap());
        assert_eq!(style.title, "My Plot");
        assert_eq!(style.bins, 5);
    }
}
