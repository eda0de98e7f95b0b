//! Paths for the plotter: evolved curves scaled onto the plotting disk,
//! and hypotrochoids.

use std::f64::consts::PI;
use std::io::{BufRead, Write};

use crate::compute::{Curve, Point, interpolate};

use super::{PlotterError, SandPlotter};

/// Sample `curve` at `points` parameters, scale by `radius` plotter units
/// and pull every sample outside the disk of that radius back onto its
/// rim.
pub fn curve_path(curve: &Curve, points: usize, radius: f64) -> Result<Vec<Point>, PlotterError> {
    let samples = interpolate(curve, points)?;
    Ok(samples
        .into_iter()
        .map(|p| {
            let scaled = Point::new(p.x * radius, p.y * radius);
            let reach = p.x.hypot(p.y);
            if reach > 1.0 {
                Point::new(scaled.x / reach, scaled.y / reach)
            } else {
                scaled
            }
        })
        .collect())
}

/// Move through every point of `path`, truncating to whole plotter units.
/// Returns the number of moves sent.
pub fn plot_path<S: BufRead + Write>(
    plotter: &mut SandPlotter<S>,
    path: &[Point],
) -> Result<usize, PlotterError> {
    for point in path {
        plotter.move_xy(point.x as i64, point.y as i64)?;
    }
    Ok(path.len())
}

/// Draw `curve` on a disk of `radius` plotter units.
pub fn plot_curve<S: BufRead + Write>(
    plotter: &mut SandPlotter<S>,
    curve: &Curve,
    points: usize,
    radius: f64,
) -> Result<usize, PlotterError> {
    let path = curve_path(curve, points, radius)?;
    plot_path(plotter, &path)
}

/// Hypotrochoid with rolling-circle ratio `p / q`, scaled so its outermost
/// reach is `radius`. Traces one full period of `2πp` radians at
/// `steps_per_rad` samples per radian, skipping the start point.
pub fn hypotrochoid(p: u32, q: u32, radius: f64, steps_per_rad: u32) -> Vec<Point> {
    let a = 1.0;
    let b = p as f64 / q as f64;
    let period = 2.0 * PI * p as f64;
    let scale = radius / (a + 2.0 * b);
    let steps = (period * steps_per_rad as f64) as usize;

    (1..steps)
        .map(|i| {
            let t = i as f64 / steps_per_rad as f64;
            let x = (a + b) * t.cos() + b * ((a + b) / b * t).cos();
            let y = (a + b) * t.sin() + b * ((a + b) / b * t).sin();
            Point::new(x * scale, y * scale)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotter::protocol::tests::FakePort;

    #[test]
    fn test_curve_path_clamps_to_disk() {
        let curve = Curve::scale(Curve::circle(), Curve::scalar(3.0));
        let path = curve_path(&curve, 16, 5000.0).unwrap();
        for p in &path {
            assert!((p.x.hypot(p.y) - 5000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_curve_path_keeps_inner_points() {
        let curve = Curve::scale(Curve::circle(), Curve::scalar(0.5));
        let path = curve_path(&curve, 4, 5000.0).unwrap();
        assert!((path[0].y - 2500.0).abs() < 1e-9);
        assert!(path[0].x.abs() < 1e-9);
    }

    #[test]
    fn test_plot_curve_sends_one_move_per_point() {
        let mut plotter = SandPlotter::new(FakePort::answering_ok(4));
        let sent = plot_curve(&mut plotter, &Curve::circle(), 4, 1000.0).unwrap();
        assert_eq!(sent, 4);

        let port = plotter.into_inner();
        assert_eq!(port.sent(), vec!["m 0 1000", "m 1000 0", "m 0 -1000", "m -1000 0"]);
    }

    #[test]
    fn test_plot_curve_evaluation_error() {
        let curve = Curve::repeat(Curve::line(), Curve::scalar(0.0));
        let mut plotter = SandPlotter::new(FakePort::answering_ok(0));
        assert!(matches!(
            plot_curve(&mut plotter, &curve, 4, 1000.0),
            Err(PlotterError::Evaluation(_))
        ));
    }

    #[test]
    fn test_hypotrochoid_stays_within_radius() {
        let path = hypotrochoid(3, 5, 4000.0, 10);
        // 2π·3 radians at 10 steps each, minus the start point
        assert_eq!(path.len(), (2.0 * PI * 3.0 * 10.0) as usize - 1);
        assert!(path.iter().all(|p| p.x.hypot(p.y) <= 4000.0 + 1e-9));
    }
}
