//! Genome compiler: runs a genome as a postfix stack program and returns
//! the resulting curve expression.
//!
//! Compilation never fails. When an operator asks for more operands than
//! the stack holds, the read cursor wraps around to the top of the most
//! recent `WRAP_WIDTH` slots and re-supplies earlier values; popping an
//! empty stack yields the scalar `0`. This leniency decides which
//! phenotypes offspring can reach, so it must not be tightened.

use std::sync::Arc;

use crate::schema::{Atom, Operator, Token};

use super::Curve;

/// Number of slots the read cursor wraps within.
pub const WRAP_WIDTH: usize = 8;

/// Operand stack with a read cursor independent of its storage length.
///
/// Pushes overwrite the slot under the cursor (or append past the end);
/// pops move the cursor down, wrapping to `min(len, WRAP_WIDTH) - 1`
/// instead of underflowing.
#[derive(Debug, Default)]
struct OperandStack {
    slots: Vec<Arc<Curve>>,
    cursor: usize,
}

impl OperandStack {
    fn push(&mut self, curve: Arc<Curve>) {
        if self.cursor < self.slots.len() {
            self.slots[self.cursor] = curve;
        } else {
            self.slots.push(curve);
        }
        self.cursor += 1;
    }

    fn pop(&mut self) -> Arc<Curve> {
        if self.slots.is_empty() {
            return Arc::new(Curve::Atom(Atom::Scalar(0.0)));
        }
        if self.cursor == 0 {
            self.cursor = self.slots.len().min(WRAP_WIDTH);
        }
        self.cursor -= 1;
        Arc::clone(&self.slots[self.cursor])
    }

    /// Pop `count` operands, returned in push order (oldest first).
    fn pop_n(&mut self, count: usize) -> Vec<Arc<Curve>> {
        let mut operands: Vec<_> = (0..count).map(|_| self.pop()).collect();
        operands.reverse();
        operands
    }
}

/// Compile a token sequence into a curve expression.
pub fn compile(tokens: &[Token]) -> Curve {
    let mut stack = OperandStack::default();

    for token in tokens {
        let node = match *token {
            Token::Atom(atom) => Curve::Atom(atom),
            Token::Op(op) => apply(op, &mut stack),
        };
        stack.push(Arc::new(node));
    }

    Arc::unwrap_or_clone(stack.pop())
}

fn apply(op: Operator, stack: &mut OperandStack) -> Curve {
    let mut operands = stack.pop_n(op.arity()).into_iter();
    let mut next = || operands.next().unwrap_or_else(|| Arc::new(Curve::scalar(0.0)));

    match op {
        Operator::Reverse => Curve::Reverse(next()),
        Operator::Translate => Curve::Translate(next(), next()),
        Operator::Scale => Curve::Scale(next(), next()),
        Operator::Rotate => Curve::Rotate(next(), next()),
        Operator::Concat => Curve::Concat(next(), next()),
        Operator::Repeat => Curve::Repeat(next(), next()),
        Operator::Step => Curve::Step(next(), next()),
        Operator::Boustro => Curve::boustro_shared(next(), next()),
    }
}

/// True when the expression is a bare atom: a constant point, or a single
/// platonic curve with nothing applied to it.
pub fn is_degenerate(curve: &Curve) -> bool {
    curve.is_atom()
}
