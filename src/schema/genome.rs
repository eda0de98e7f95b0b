//! Genome token types.
//!
//! A genome is a flat postfix program: atoms are pushed onto an operand
//! stack and operators pop their arguments and push the combined curve.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// A leaf value in a genome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Atom {
    /// Constant `(c, c)`.
    Scalar(f64),
    /// Constant `(x, y)`.
    Point(f64, f64),
    /// Unit circle traced once, starting and ending at `(0, 1)`.
    Circle,
    /// Diagonal from `(0, 0)` towards `(1, 1)`.
    Line,
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Scalar(v) => write!(f, "{:.3}", v),
            Atom::Point(x, y) => write!(f, "({:.3}, {:.3})", x, y),
            Atom::Circle => f.write_str("circle"),
            Atom::Line => f.write_str("line"),
        }
    }
}

/// A curve combinator with a fixed arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Translate,
    Scale,
    Rotate,
    Reverse,
    Concat,
    Repeat,
    Step,
    /// Derived: `repeat(concat(a, reverse(a)), n * 0.5)`.
    Boustro,
}

impl Operator {
    /// The primitive combinators. Mutation draws from this set; `Boustro`
    /// only enters a population through hand-written genomes.
    pub const PRIMITIVES: [Operator; 7] = [
        Operator::Translate,
        Operator::Scale,
        Operator::Rotate,
        Operator::Reverse,
        Operator::Concat,
        Operator::Repeat,
        Operator::Step,
    ];

    /// Number of operands popped from the stack.
    pub fn arity(self) -> usize {
        match self {
            Operator::Reverse => 1,
            _ => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Translate => "translate",
            Operator::Scale => "scale",
            Operator::Rotate => "rotate",
            Operator::Reverse => "reverse",
            Operator::Concat => "concat",
            Operator::Repeat => "repeat",
            Operator::Step => "step",
            Operator::Boustro => "boustro",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One instruction of a genome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Atom(Atom),
    Op(Operator),
}

impl From<Atom> for Token {
    fn from(atom: Atom) -> Self {
        Token::Atom(atom)
    }
}

impl From<Operator> for Token {
    fn from(op: Operator) -> Self {
        Token::Op(op)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Atom(a) => a.fmt(f),
            Token::Op(op) => op.fmt(f),
        }
    }
}

/// An ordered token sequence; the unit of storage, crossover and mutation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genome {
    tokens: Vec<Token>,
}

impl Genome {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }
}

impl Deref for Genome {
    type Target = [Token];

    fn deref(&self) -> &[Token] {
        &self.tokens
    }
}

impl From<Vec<Token>> for Genome {
    fn from(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

impl FromIterator<Token> for Genome {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            token.fmt(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity() {
        assert_eq!(Operator::Reverse.arity(), 1);
        for op in Operator::PRIMITIVES.iter().filter(|op| **op != Operator::Reverse) {
            assert_eq!(op.arity(), 2);
        }
        assert_eq!(Operator::Boustro.arity(), 2);
        assert!(!Operator::PRIMITIVES.contains(&Operator::Boustro));
    }

    #[test]
    fn test_genome_listing() {
        let genome = Genome::new(vec![
            Atom::Circle.into(),
            Atom::Scalar(0.5).into(),
            Atom::Point(1.0, -0.25).into(),
            Operator::Repeat.into(),
            Operator::Boustro.into(),
        ]);
        assert_eq!(
            genome.to_string(),
            "circle 0.500 (1.000, -0.250) repeat boustro"
        );
    }

    #[test]
    fn test_serialization() {
        let genome = Genome::new(vec![
            Atom::Line.into(),
            Atom::Scalar(2.0).into(),
            Atom::Point(0.1, 0.2).into(),
            Operator::Scale.into(),
        ]);
        let json = serde_json::to_string(&genome).unwrap();
        assert_eq!(json, r#"["line",{"scalar":2.0},{"point":[0.1,0.2]},"scale"]"#);
        let parsed: Genome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, genome);
    }
}
