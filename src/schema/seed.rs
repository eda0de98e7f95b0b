//! Hand-written generation-0 genomes.

use super::{Atom, Genome, Operator, Token};

const CIRCLE: Token = Token::Atom(Atom::Circle);
const LINE: Token = Token::Atom(Atom::Line);
const TRANSLATE: Token = Token::Op(Operator::Translate);
const SCALE: Token = Token::Op(Operator::Scale);
const ROTATE: Token = Token::Op(Operator::Rotate);
const REPEAT: Token = Token::Op(Operator::Repeat);
const STEP: Token = Token::Op(Operator::Step);
const BOUSTRO: Token = Token::Op(Operator::Boustro);

fn n(value: f64) -> Token {
    Token::Atom(Atom::Scalar(value))
}

fn p(x: f64, y: f64) -> Token {
    Token::Atom(Atom::Point(x, y))
}

/// The seed population every run starts from.
pub fn initial_genomes() -> Vec<Genome> {
    vec![
        // Spiral
        vec![CIRCLE, LINE, SCALE],
        // Crosshatched diamond
        vec![CIRCLE, CIRCLE, n(20.0), REPEAT, SCALE],
        // In/out spiral
        vec![
            CIRCLE, LINE, SCALE, BOUSTRO, n(30.0), REPEAT, CIRCLE, n(30.0), STEP, ROTATE,
        ],
        // Hypnotic spirograph
        vec![
            CIRCLE, n(29.0), REPEAT, LINE, BOUSTRO, n(30.0), REPEAT, SCALE,
        ],
        // Lotus
        vec![
            LINE, BOUSTRO, n(32.0), REPEAT, CIRCLE, n(5.0), REPEAT, ROTATE, n(0.7), SCALE,
        ],
        // Cubed circle spiral
        vec![
            CIRCLE, n(5.0), REPEAT, LINE, SCALE, CIRCLE, n(5.0), REPEAT, LINE, SCALE, CIRCLE,
            n(5.0), REPEAT, LINE, SCALE, SCALE, SCALE,
        ],
        // Sine wave
        vec![
            CIRCLE, p(1.0, 0.0), SCALE, LINE, p(0.0, 1.0), SCALE, TRANSLATE,
        ],
        // Rotating lobes
        vec![
            CIRCLE, CIRCLE, p(1.0, 0.0), SCALE, CIRCLE, p(0.0, 1.0), ROTATE, p(0.0, 1.0), SCALE,
            TRANSLATE, n(8.0), REPEAT, n(1.9), TRANSLATE, SCALE, n(1.0 / 2.8), SCALE,
        ],
        // Diagonal row of circles
        vec![
            CIRCLE, n(20.0), REPEAT, LINE, TRANSLATE, p(-1.0, -1.0), TRANSLATE,
        ],
        // Nautilus
        vec![
            CIRCLE, n(2.0), REPEAT, LINE, n(0.3), SCALE, n(0.1), TRANSLATE, SCALE, CIRCLE,
            n(50.0), REPEAT, LINE, n(0.05), SCALE, n(0.05), TRANSLATE, SCALE, TRANSLATE,
        ],
        // Sine wave zigzag
        vec![
            CIRCLE, p(0.0, 1.0), SCALE, n(20.0), STEP, LINE, n(2.0), SCALE, n(-1.0), TRANSLATE,
            n(20.0), REPEAT, SCALE, LINE, p(1.0, 0.0), SCALE, TRANSLATE,
        ],
        // Oscilloscope
        vec![
            CIRCLE, n(5.0), REPEAT, p(0.0, 1.0), SCALE, CIRCLE, n(3.0), REPEAT, p(1.0, 0.0),
            SCALE, TRANSLATE,
        ],
        // Spirograph
        vec![
            CIRCLE, n(30.0), REPEAT, n(0.8), SCALE, CIRCLE, n(61.0), REPEAT, n(0.2), SCALE,
            TRANSLATE,
        ],
        // Spirograph spiral
        vec![
            CIRCLE, n(30.0), REPEAT, n(0.8), SCALE, CIRCLE, n(61.0), REPEAT, LINE, n(0.5), SCALE,
            n(0.2), TRANSLATE, SCALE, TRANSLATE,
        ],
        // Zigzag circle
        vec![
            CIRCLE, p(0.2, 0.0), SCALE, p(1.0, 0.0), TRANSLATE, n(40.0), REPEAT, CIRCLE, ROTATE,
            n(0.5), SCALE,
        ],
        // Zigzag circle spiral
        vec![
            CIRCLE, p(0.2, 0.0), SCALE, p(1.0, 0.0), TRANSLATE, n(400.0), REPEAT, CIRCLE,
            n(10.0), REPEAT, LINE, n(0.1), TRANSLATE, SCALE, ROTATE, n(0.8), SCALE,
        ],
    ]
    .into_iter()
    .map(Genome::from)
    .collect()
}
