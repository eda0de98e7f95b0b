//! Curve algebra: parametric 2-D curves built from atoms and combinators.
//!
//! A curve maps time `t` in `[0, 1)` to a point. Pointwise combinators
//! (`Translate`, `Scale`, `Rotate`) leave the flow of time alone; the
//! temporal ones (`Reverse`, `Concat`, `Repeat`, `Step`) reshape it.
//!
//! `Translate`, `Scale` and `Rotate` are associative and commutative, and
//! `Scale`/`Rotate` distribute over `Translate`. `Concat` is neither, and
//! jumps at `t = 0.5` unless the first curve ends where the second begins.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::schema::{Atom, Operator};

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Arithmetic failures that would otherwise surface as NaN or infinity.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("{operator} rate evaluated to zero at t = {t}")]
    ZeroRate { operator: Operator, t: f64 },
    #[error("{operator} rate {rate} is not finite at t = {t}")]
    NonFiniteRate {
        operator: Operator,
        rate: f64,
        t: f64,
    },
}

/// Compiled curve expression.
///
/// Children are shared so that subtrees reused by the compiler's operand
/// stack are not deep-copied.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    Atom(Atom),
    /// Pointwise vector sum.
    Translate(Arc<Curve>, Arc<Curve>),
    /// Pointwise component-wise product.
    Scale(Arc<Curve>, Arc<Curve>),
    /// Complex multiplication of the two outputs.
    Rotate(Arc<Curve>, Arc<Curve>),
    /// `a(1 - t)`.
    Reverse(Arc<Curve>),
    /// `a` then `b`, each in half the time.
    Concat(Arc<Curve>, Arc<Curve>),
    /// `a` repeated `n(t).x` times.
    Repeat(Arc<Curve>, Arc<Curve>),
    /// `a` quantized to `floor(n(t).x)` values.
    Step(Arc<Curve>, Arc<Curve>),
}

impl From<Atom> for Curve {
    fn from(atom: Atom) -> Self {
        Curve::Atom(atom)
    }
}

impl Curve {
    pub fn circle() -> Self {
        Curve::Atom(Atom::Circle)
    }

    pub fn line() -> Self {
        Curve::Atom(Atom::Line)
    }

    pub fn scalar(value: f64) -> Self {
        Curve::Atom(Atom::Scalar(value))
    }

    pub fn point(x: f64, y: f64) -> Self {
        Curve::Atom(Atom::Point(x, y))
    }

    pub fn translate(a: Curve, b: Curve) -> Self {
        Curve::Translate(Arc::new(a), Arc::new(b))
    }

    pub fn scale(a: Curve, b: Curve) -> Self {
        Curve::Scale(Arc::new(a), Arc::new(b))
    }

    pub fn rotate(a: Curve, b: Curve) -> Self {
        Curve::Rotate(Arc::new(a), Arc::new(b))
    }

    pub fn reverse(a: Curve) -> Self {
        Curve::Reverse(Arc::new(a))
    }

    pub fn concat(a: Curve, b: Curve) -> Self {
        Curve::Concat(Arc::new(a), Arc::new(b))
    }

    pub fn repeat(a: Curve, times: Curve) -> Self {
        Curve::Repeat(Arc::new(a), Arc::new(times))
    }

    pub fn step(a: Curve, steps: Curve) -> Self {
        Curve::Step(Arc::new(a), Arc::new(steps))
    }

    /// Like `repeat`, but every other pass runs backwards so the passes
    /// join up without jumps.
    pub fn boustro(a: Curve, times: Curve) -> Self {
        Self::boustro_shared(Arc::new(a), Arc::new(times))
    }

    pub(crate) fn boustro_shared(a: Arc<Curve>, times: Arc<Curve>) -> Self {
        let there_and_back = Curve::Concat(Arc::clone(&a), Arc::new(Curve::Reverse(a)));
        let half = Curve::Scale(times, Arc::new(Curve::scalar(0.5)));
        Curve::Repeat(Arc::new(there_and_back), Arc::new(half))
    }

    /// True when this node is a bare atom.
    pub fn is_atom(&self) -> bool {
        matches!(self, Curve::Atom(_))
    }

    /// Evaluate the curve at time `t`.
    pub fn evaluate(&self, t: f64) -> Result<Point, EvaluationError> {
        match self {
            Curve::Atom(atom) => Ok(evaluate_atom(atom, t)),
            Curve::Translate(a, b) => {
                let (p, q) = (a.evaluate(t)?, b.evaluate(t)?);
                Ok(Point::new(p.x + q.x, p.y + q.y))
            }
            Curve::Scale(a, b) => {
                let (p, q) = (a.evaluate(t)?, b.evaluate(t)?);
                Ok(Point::new(p.x * q.x, p.y * q.y))
            }
            Curve::Rotate(a, b) => {
                let (p, q) = (a.evaluate(t)?, b.evaluate(t)?);
                let z = Complex::new(p.x, p.y) * Complex::new(q.x, q.y);
                Ok(Point::new(z.re, z.im))
            }
            Curve::Reverse(a) => a.evaluate(1.0 - t),
            Curve::Concat(a, b) => {
                if t < 0.5 {
                    a.evaluate(t * 2.0)
                } else {
                    b.evaluate(t * 2.0 - 1.0)
                }
            }
            Curve::Repeat(a, times) => {
                // Only the x component of the rate curve is used. A zero
                // rate holds the curve at a(0).
                let rate = rate_at(times, Operator::Repeat, t)?;
                a.evaluate((t * rate).rem_euclid(1.0))
            }
            Curve::Step(a, steps) => {
                let rate = rate_at(steps, Operator::Step, t)?;
                if rate == 0.0 {
                    return Err(EvaluationError::ZeroRate {
                        operator: Operator::Step,
                        t,
                    });
                }
                a.evaluate((t * rate).floor() / rate)
            }
        }
    }

    /// Binding strength used when printing infix operators.
    fn precedence(&self) -> u8 {
        match self {
            Curve::Translate(..) => 10,
            Curve::Scale(..) => 9,
            _ => 0,
        }
    }
}

fn evaluate_atom(atom: &Atom, t: f64) -> Point {
    match *atom {
        Atom::Circle => {
            let theta = 2.0 * PI * t;
            Point::new(theta.sin(), theta.cos())
        }
        Atom::Line => Point::new(t, t),
        Atom::Scalar(c) => Point::new(c, c),
        Atom::Point(x, y) => Point::new(x, y),
    }
}

fn rate_at(rate: &Curve, operator: Operator, t: f64) -> Result<f64, EvaluationError> {
    let rate = rate.evaluate(t)?.x;
    if !rate.is_finite() {
        return Err(EvaluationError::NonFiniteRate { operator, rate, t });
    }
    Ok(rate)
}

fn write_operand(f: &mut fmt::Formatter<'_>, curve: &Curve, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({})", curve)
    } else {
        write!(f, "{}", curve)
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::Atom(Atom::Scalar(v)) => write!(f, "{}", v),
            Curve::Atom(Atom::Point(x, y)) => write!(f, "({}, {})", x, y),
            Curve::Atom(atom) => write!(f, "{}", atom),
            Curve::Translate(a, b) | Curve::Scale(a, b) => {
                let op = if matches!(self, Curve::Translate(..)) {
                    "+"
                } else {
                    "*"
                };
                let own = self.precedence();
                write_operand(f, a, a.precedence() > own)?;
                write!(f, " {} ", op)?;
                write_operand(f, b, b.precedence() >= own)
            }
            Curve::Rotate(a, b) => write!(f, "rotate({}, {})", a, b),
            Curve::Reverse(a) => write!(f, "reverse({})", a),
            Curve::Concat(a, b) => write!(f, "concat({}, {})", a, b),
            Curve::Repeat(a, n) | Curve::Step(a, n) => {
                let op = if matches!(self, Curve::Repeat(..)) {
                    "**"
                } else {
                    "//"
                };
                write_operand(f, a, a.precedence() > 0)?;
                write!(f, " {} ", op)?;
                write_operand(f, n, n.precedence() > 0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(p: Point, q: Point) {
        assert!(p.distance(&q) < EPS, "{:?} != {:?}", p, q);
    }

    #[test]
    fn test_atoms() {
        assert_close(Curve::circle().evaluate(0.0).unwrap(), Point::new(0.0, 1.0));
        assert_close(Curve::circle().evaluate(0.25).unwrap(), Point::new(1.0, 0.0));
        assert_close(Curve::line().evaluate(0.3).unwrap(), Point::new(0.3, 0.3));
        assert_close(
            Curve::scalar(2.5).evaluate(0.7).unwrap(),
            Point::new(2.5, 2.5),
        );
        assert_close(
            Curve::point(1.0, -2.0).evaluate(0.1).unwrap(),
            Point::new(1.0, -2.0),
        );
    }

    #[test]
    fn test_pointwise_operators() {
        let a = Curve::point(1.0, 2.0);
        let b = Curve::point(3.0, 4.0);
        assert_close(
            Curve::translate(a.clone(), b.clone()).evaluate(0.0).unwrap(),
            Point::new(4.0, 6.0),
        );
        assert_close(
            Curve::scale(a.clone(), b.clone()).evaluate(0.0).unwrap(),
            Point::new(3.0, 8.0),
        );
        // (1 + 2i)(3 + 4i) = -5 + 10i
        assert_close(Curve::rotate(a, b).evaluate(0.0).unwrap(), Point::new(-5.0, 10.0));
    }

    #[test]
    fn test_reverse() {
        let curve = Curve::reverse(Curve::line());
        assert_close(curve.evaluate(0.25).unwrap(), Point::new(0.75, 0.75));
    }

    #[test]
    fn test_concat_continuous_when_endpoints_meet() {
        // line ends at (1, 1); reversed line starts there
        let curve = Curve::concat(Curve::line(), Curve::reverse(Curve::line()));
        let before = curve.evaluate(0.5 - 1e-12).unwrap();
        let after = curve.evaluate(0.5).unwrap();
        assert!(before.distance(&after) < 1e-9);
    }

    #[test]
    fn test_concat_jumps_when_endpoints_differ() {
        let a = Curve::line();
        let b = Curve::point(3.0, 1.0);
        let gap = Point::new(1.0, 1.0).distance(&Point::new(3.0, 1.0));
        let curve = Curve::concat(a, b);
        let before = curve.evaluate(0.5 - 1e-12).unwrap();
        let after = curve.evaluate(0.5).unwrap();
        assert!((before.distance(&after) - gap).abs() < 1e-9);
    }

    #[test]
    fn test_repeat_and_step() {
        let repeated = Curve::repeat(Curve::line(), Curve::scalar(4.0));
        assert_close(repeated.evaluate(0.3).unwrap(), Point::new(0.2, 0.2));

        let stepped = Curve::step(Curve::line(), Curve::scalar(4.0));
        assert_close(stepped.evaluate(0.3).unwrap(), Point::new(0.25, 0.25));
        assert_close(stepped.evaluate(0.99).unwrap(), Point::new(0.75, 0.75));
    }

    #[test]
    fn test_repeat_uses_x_component_of_rate() {
        let curve = Curve::repeat(Curve::line(), Curve::point(2.0, 100.0));
        assert_close(curve.evaluate(0.75).unwrap(), Point::new(0.5, 0.5));
    }

    #[test]
    fn test_zero_step_rate_is_an_error() {
        let step = Curve::step(Curve::circle(), Curve::point(0.0, 1.0));
        assert!(matches!(
            step.evaluate(0.5),
            Err(EvaluationError::ZeroRate {
                operator: Operator::Step,
                ..
            })
        ));

        // line is zero at t = 0 only
        let step = Curve::step(Curve::circle(), Curve::line());
        assert!(step.evaluate(0.0).is_err());
        assert!(step.evaluate(0.5).is_ok());
    }

    #[test]
    fn test_zero_repeat_rate_holds_start() {
        let start = Curve::circle().evaluate(0.0).unwrap();
        let repeat = Curve::repeat(Curve::circle(), Curve::scalar(0.0));
        assert_close(repeat.evaluate(0.3).unwrap(), start);

        // line is zero at t = 0 only
        let repeat = Curve::repeat(Curve::circle(), Curve::line());
        assert_close(repeat.evaluate(0.0).unwrap(), start);
        assert!(repeat.evaluate(0.5).is_ok());
    }

    #[test]
    fn test_non_finite_rate_is_an_error() {
        let curve = Curve::repeat(Curve::circle(), Curve::scalar(f64::INFINITY));
        assert!(matches!(
            curve.evaluate(0.5),
            Err(EvaluationError::NonFiniteRate { .. })
        ));
    }

    #[test]
    fn test_boustro_has_no_internal_jumps() {
        for times in 1..=6 {
            let curve = Curve::boustro(
                Curve::scale(Curve::circle(), Curve::line()),
                Curve::scalar(times as f64),
            );
            let samples = 20_000;
            let mut previous = curve.evaluate(0.0).unwrap();
            for i in 1..samples {
                let point = curve.evaluate(i as f64 / samples as f64).unwrap();
                assert!(
                    point.distance(&previous) < 0.01,
                    "jump at t = {} for n = {}",
                    i as f64 / samples as f64,
                    times
                );
                previous = point;
            }
        }
    }

    #[test]
    fn test_boustro_with_rate_through_zero() {
        // Both rates are zero at t = 0.
        for rate in [Curve::line(), Curve::scale(Curve::circle(), Curve::line())] {
            let curve = Curve::boustro(Curve::circle(), rate);
            assert_close(curve.evaluate(0.0).unwrap(), Point::new(0.0, 1.0));
            for i in 1..1000 {
                let p = curve.evaluate(i as f64 / 1000.0).unwrap();
                assert!(p.is_finite());
            }
        }
    }

    #[test]
    fn test_display() {
        let spiral = Curve::translate(
            Curve::scale(Curve::circle(), Curve::line()),
            Curve::point(1.0, 0.0),
        );
        assert_eq!(spiral.to_string(), "circle * line + (1, 0)");

        let grouped = Curve::scale(
            Curve::translate(Curve::circle(), Curve::line()),
            Curve::scalar(0.5),
        );
        assert_eq!(grouped.to_string(), "(circle + line) * 0.5");

        let repeated = Curve::repeat(
            Curve::scale(Curve::circle(), Curve::line()),
            Curve::scalar(20.0),
        );
        assert_eq!(repeated.to_string(), "(circle * line) ** 20");

        let nested = Curve::rotate(
            Curve::reverse(Curve::line()),
            Curve::step(Curve::circle(), Curve::scalar(30.0)),
        );
        assert_eq!(nested.to_string(), "rotate(reverse(line), circle // 30)");

        let varying = Curve::repeat(
            Curve::line(),
            Curve::translate(Curve::circle(), Curve::scalar(2.0)),
        );
        assert_eq!(varying.to_string(), "line ** (circle + 2)");
    }
}
