//! Curve sampling and the renderer interface used to validate candidates.

use std::fmt::Write;

use crate::schema::RenderConfig;

use super::{Curve, EvaluationError, Point};

/// Reasons a curve cannot be rendered.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("Evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error("Sample {index} is not finite")]
    NonFinite { index: usize },
    #[error("Curve collapses to a {width}x{height} bounding box")]
    Collapsed { width: f64, height: f64 },
    #[error("No sample points requested")]
    NoPoints,
}

/// Turns a curve into a drawable path, or reports it invalid.
pub trait Renderer: Sync {
    fn render(&self, curve: &Curve) -> Result<Rendering, RenderError>;
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Bounding box of a non-empty point set.
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        Some(points.iter().fold(
            Bounds {
                min: first,
                max: first,
            },
            |b, p| Bounds {
                min: Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                max: Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
            },
        ))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// A sampled curve fitted into a `size x size` square.
#[derive(Debug, Clone)]
pub struct Rendering {
    /// Normalized polyline.
    pub points: Vec<Point>,
    /// Bounds of the raw samples before normalization.
    pub bounds: Bounds,
    /// Side of the target square.
    pub size: f64,
}

impl Rendering {
    /// Export the polyline as a standalone SVG document.
    pub fn to_svg(&self, stroke_width: f64) -> String {
        let mut path = String::with_capacity(self.points.len() * 16);
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                path.push(' ');
            }
            let _ = write!(path, "{:.2},{:.2}", p.x, p.y);
        }
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}">"#,
                r#"<rect width="100%" height="100%" fill="black"/>"#,
                r#"<polyline points="{path}" fill="none" stroke="white" stroke-width="{stroke}"/>"#,
                "</svg>"
            ),
            size = self.size,
            path = path,
            stroke = stroke_width,
        )
    }
}

/// Sample `points` evenly spaced values of `t` in `[0, 1)`.
pub fn interpolate(curve: &Curve, points: usize) -> Result<Vec<Point>, EvaluationError> {
    (0..points)
        .map(|i| curve.evaluate(i as f64 / points as f64))
        .collect()
}

/// Scale points to fit the rectangle `(0, 0) - (width, height)`, each axis
/// independently. A zero-extent axis is shifted but not scaled.
pub fn normalize(points: &[Point], width: f64, height: f64) -> Vec<Point> {
    let Some(bounds) = Bounds::of(points) else {
        return Vec::new();
    };
    let axis_scale = |extent: f64, target: f64| if extent > 0.0 { target / extent } else { 1.0 };
    let x_scale = axis_scale(bounds.width(), width);
    let y_scale = axis_scale(bounds.height(), height);

    points
        .iter()
        .map(|p| {
            Point::new(
                (p.x - bounds.min.x) * x_scale,
                (p.y - bounds.min.y) * y_scale,
            )
        })
        .collect()
}

/// Samples a curve and rejects curves that evaluate badly or collapse to
/// a point.
#[derive(Debug, Clone, Default)]
pub struct PathRenderer {
    config: RenderConfig,
}

impl PathRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }
}

impl Renderer for PathRenderer {
    fn render(&self, curve: &Curve) -> Result<Rendering, RenderError> {
        if self.config.points == 0 {
            return Err(RenderError::NoPoints);
        }

        let samples = interpolate(curve, self.config.points)?;
        if let Some(index) = samples.iter().position(|p| !p.is_finite()) {
            return Err(RenderError::NonFinite { index });
        }

        let bounds = Bounds::of(&samples).ok_or(RenderError::NoPoints)?;
        if bounds.width() < self.config.min_extent && bounds.height() < self.config.min_extent {
            return Err(RenderError::Collapsed {
                width: bounds.width(),
                height: bounds.height(),
            });
        }

        Ok(Rendering {
            points: normalize(&samples, self.config.size, self.config.size),
            bounds,
            size: self.config.size,
        })
    }
}
