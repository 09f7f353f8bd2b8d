//! Visualization Renderer.
//!
//! Turns a 1-D numeric series into a persisted image plus any derived
//! numeric facts. Each call builds its own renderer context; there is no
//! process-global figure state. Writes are atomic: the chart is rendered
//! into a tempfile in the target directory and renamed into place only on
//! success, so a failed render never leaves a partial file.

pub mod fit;
pub mod render;
pub mod style;

use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::{BitMapBackend, IntoDrawingArea, SVGBackend};
use tracing::info;

use crate::error::{EngineError, Result};
use style::ResolvedStyle;

pub use style::VizParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VizKind {
    Scatter,
    Line,
    Histogram,
    FitLine,
}

impl VizKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "scatter" => VizKind::Scatter,
            "line" => VizKind::Line,
            "histogram" => VizKind::Histogram,
            "fit_line" => VizKind::FitLine,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            VizKind::Scatter => "scatter",
            VizKind::Line => "line",
            VizKind::Histogram => "histogram",
            VizKind::FitLine => "fit_line",
        }
    }
}

/// The persisted image plus the numeric facts the render computed.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub output_path: PathBuf,
    pub slope: Option<f64>,
    pub intercept: Option<f64>,
}

enum BackendKind {
    Bitmap,
    Svg,
}

/// Render `values` as `kind` into `target`, creating parent directories as
/// needed. Re-rendering to an existing path silently replaces the file.
pub fn render(
    values: &[f64],
    kind: VizKind,
    params: &VizParams,
    target: &Path,
) -> Result<RenderOutcome> {
    if values.is_empty() {
        return Err(EngineError::Operation(
            "No input data provided for visualization".into(),
        ));
    }
    let style = ResolvedStyle::for_kind(kind, params)?;
    let fitted = match kind {
        VizKind::FitLine => Some(fit::fit_line(values)?),
        _ => None,
    };

    let ext = target
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let backend = match ext.as_str() {
        "png" | "bmp" | "jpg" | "jpeg" => BackendKind::Bitmap,
        "svg" => BackendKind::Svg,
        other => {
            return Err(EngineError::Operation(format!(
                "unsupported image format: '{}'",
                other
            )))
        }
    };

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    // The tempfile keeps the real extension so the backend picks the right
    // encoder; it is removed automatically if the render fails.
    let tmp = tempfile::Builder::new()
        .prefix(".flownode-")
        .suffix(&format!(".{}", ext))
        .tempfile_in(&dir)?;
    let tmp_path = tmp.path().to_path_buf();

    let dimensions = (style.width_px, style.height_px);
    match backend {
        BackendKind::Bitmap => {
            let root = BitMapBackend::new(&tmp_path, dimensions).into_drawing_area();
            render::draw(root, values, kind, &style, fitted)?;
        }
        BackendKind::Svg => {
            let root = SVGBackend::new(&tmp_path, dimensions).into_drawing_area();
            render::draw(root, values, kind, &style, fitted)?;
        }
    }

    tmp.persist(target).map_err(|e| EngineError::Io(e.error))?;
    info!(path = %target.display(), kind = kind.name(), "visualization written");

    Ok(RenderOutcome {
        output_path: target.to_path_buf(),
        slope: fitted.map(|f| f.0),
        intercept: fitted.map(|f| f.1),
    })
}
