//! Genome manipulation utilities for evolutionary search.
//!
//! Provides random atoms, cut-and-splice crossover, and per-locus mutation.
//! Everything works on the flat token sequence; the compiled tree is never
//! inspected.

use rand::prelude::*;

use crate::schema::{Atom, Genome, MutationConfig, Operator, Token};

/// Random number generator wrapper for genome operations.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Uniform index in `0..len`; `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// `amount` distinct indices in `0..len`, in random order.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, len, amount.min(len)).into_vec()
    }

    /// A fresh atom of uniformly chosen kind.
    pub fn random_atom(&mut self) -> Atom {
        match self.rng.gen_range(0..4) {
            0 => Atom::Scalar(self.uniform()),
            1 => Atom::Point(self.uniform(), self.uniform()),
            2 => Atom::Circle,
            _ => Atom::Line,
        }
    }

    /// Independent uniform cut points for genomes of the given lengths.
    pub fn cut_points(&mut self, len1: usize, len2: usize) -> (usize, usize) {
        let mut cut = |len: usize| if len == 0 { 0 } else { self.index(len) };
        (cut(len1), cut(len2))
    }

    /// Cut-and-splice crossover. Either child may be degenerate.
    pub fn cut_and_splice(&mut self, g1: &Genome, g2: &Genome) -> (Genome, Genome) {
        let (p1, p2) = self.cut_points(g1.len(), g2.len());
        splice_at(g1, g2, p1, p2)
    }

    /// Mutate a genome in place.
    ///
    /// Per-locus probabilities are divided by the genome length so the
    /// expected number of mutations per genome does not grow with it.
    pub fn mutate(&mut self, genome: &mut Genome, config: &MutationConfig) {
        let len = genome.len();
        if len == 0 {
            return;
        }
        let atom_probability = config.atom_rate / len as f64;
        let op_probability = config.op_rate / len as f64;

        for token in genome.tokens_mut() {
            match *token {
                Token::Atom(atom) => {
                    if self.uniform() < atom_probability {
                        *token = Token::Atom(self.mutate_atom(atom, config));
                    }
                }
                Token::Op(_) => {
                    if self.uniform() < op_probability {
                        *token = Token::Op(self.mutate_op());
                    }
                }
            }
        }
    }

    /// Replace or perturb one atom.
    pub fn mutate_atom(&mut self, atom: Atom, config: &MutationConfig) -> Atom {
        if self.uniform() < config.change_type_probability {
            return self.random_atom();
        }
        match atom {
            Atom::Scalar(v) => Atom::Scalar(self.mutate_number(v)),
            Atom::Point(x, y) => {
                if self.rng.gen_bool(0.5) {
                    Atom::Point(self.mutate_number(x), y)
                } else {
                    Atom::Point(x, self.mutate_number(y))
                }
            }
            Atom::Circle => Atom::Line,
            Atom::Line => Atom::Circle,
        }
    }

    /// Shrink by up to half or grow by up to double, with equal odds.
    pub fn mutate_number(&mut self, value: f64) -> f64 {
        if self.rng.gen_bool(0.5) {
            value * (1.0 - self.uniform() * 0.5)
        } else {
            value * (1.0 + self.uniform())
        }
    }

    /// A uniformly chosen primitive operator. Arity changes are absorbed by
    /// the compiler's operand stack.
    pub fn mutate_op(&mut self) -> Operator {
        Operator::PRIMITIVES[self.index(Operator::PRIMITIVES.len())]
    }

    /// Generate next u64 for seeding child RNGs.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}

/// Crossover at fixed cut points: `g1[..p1] + g2[p2..]` and
/// `g2[..p2] + g1[p1..]`.
pub fn splice_at(g1: &Genome, g2: &Genome, p1: usize, p2: usize) -> (Genome, Genome) {
    let first = g1[..p1].iter().chain(&g2[p2..]).copied().collect();
    let second = g2[..p2].iter().chain(&g1[p1..]).copied().collect();
    (first, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CIRCLE: Token = Token::Atom(Atom::Circle);
    const LINE: Token = Token::Atom(Atom::Line);
    const SCALE: Token = Token::Op(Operator::Scale);
    const REPEAT: Token = Token::Op(Operator::Repeat);
    const TWENTY: Token = Token::Atom(Atom::Scalar(20.0));

    fn parents() -> (Genome, Genome) {
        (
            Genome::new(vec![CIRCLE, LINE, SCALE]),
            Genome::new(vec![CIRCLE, CIRCLE, TWENTY, REPEAT, SCALE]),
        )
    }

    #[test]
    fn test_splice_at_fixed_cuts() {
        let (g1, g2) = parents();
        let (a, b) = splice_at(&g1, &g2, 1, 2);
        assert_eq!(a, Genome::new(vec![CIRCLE, TWENTY, REPEAT, SCALE]));
        assert_eq!(b, Genome::new(vec![CIRCLE, CIRCLE, LINE, SCALE]));
    }

    #[test]
    fn test_cut_and_splice_is_deterministic() {
        let (g1, g2) = parents();
        let mut rng = GenomeRng::new(42);
        let mut replay = GenomeRng::new(42);

        let children = rng.cut_and_splice(&g1, &g2);
        let (p1, p2) = replay.cut_points(g1.len(), g2.len());
        assert!(p1 < g1.len() && p2 < g2.len());
        assert_eq!(children, splice_at(&g1, &g2, p1, p2));
        assert_eq!(children.0.len() + children.1.len(), g1.len() + g2.len());
    }

    #[test]
    fn test_cut_and_splice_empty_parent() {
        let (g1, _) = parents();
        let mut rng = GenomeRng::new(1);
        let (a, b) = rng.cut_and_splice(&g1, &Genome::default());
        assert!(a.is_empty());
        assert_eq!(b, g1);
    }

    #[test]
    fn test_zero_rate_mutation_is_identity() {
        let (_, mut genome) = parents();
        let original = genome.clone();
        let config = MutationConfig {
            atom_rate: 0.0,
            op_rate: 0.0,
            ..Default::default()
        };
        GenomeRng::new(3).mutate(&mut genome, &config);
        assert_eq!(genome, original);
    }

    #[test]
    fn test_mutation_preserves_token_kinds() {
        let (_, original) = parents();
        let config = MutationConfig {
            atom_rate: 5.0,
            op_rate: 5.0,
            ..Default::default()
        };
        let mut rng = GenomeRng::new(9);
        let mut changed = false;
        for _ in 0..20 {
            let mut genome = original.clone();
            rng.mutate(&mut genome, &config);
            assert_eq!(genome.len(), original.len());
            for (before, after) in original.iter().zip(genome.iter()) {
                match (before, after) {
                    (Token::Atom(_), Token::Atom(_)) | (Token::Op(_), Token::Op(_)) => {}
                    _ => panic!("mutation changed a token kind"),
                }
            }
            changed |= genome != original;
        }
        assert!(changed);
    }

    #[test]
    fn test_mutate_number_bounds() {
        let mut rng = GenomeRng::new(5);
        for _ in 0..1000 {
            let v = rng.mutate_number(2.0);
            assert!(v > 1.0 && v < 4.0, "{} out of range", v);
        }
    }

    #[test]
    fn test_platonic_atoms_swap() {
        let config = MutationConfig {
            change_type_probability: 0.0,
            ..Default::default()
        };
        let mut rng = GenomeRng::new(11);
        assert_eq!(rng.mutate_atom(Atom::Circle, &config), Atom::Line);
        assert_eq!(rng.mutate_atom(Atom::Line, &config), Atom::Circle);
    }

    #[test]
    fn test_point_mutation_changes_one_component() {
        let config = MutationConfig {
            change_type_probability: 0.0,
            ..Default::default()
        };
        let mut rng = GenomeRng::new(13);
        for _ in 0..100 {
            let Atom::Point(x, y) = rng.mutate_atom(Atom::Point(1.0, 1.0), &config) else {
                panic!("point mutated into another kind");
            };
            assert!(x == 1.0 || y == 1.0);
        }
    }

    #[test]
    fn test_random_atoms_are_in_unit_range() {
        let mut rng = GenomeRng::new(17);
        for _ in 0..200 {
            match rng.random_atom() {
                Atom::Scalar(v) => assert!((0.0..1.0).contains(&v)),
                Atom::Point(x, y) => {
                    assert!((0.0..1.0).contains(&x) && (0.0..1.0).contains(&y))
                }
                Atom::Circle | Atom::Line => {}
            }
        }
    }

    #[test]
    fn test_sample_indices_distinct() {
        let mut rng = GenomeRng::new(23);
        let mut picked = rng.sample_indices(10, 4);
        assert_eq!(picked.len(), 4);
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), 4);
        assert_eq!(rng.sample_indices(3, 8).len(), 3);
    }

    #[test]
    fn test_mutate_op_stays_primitive() {
        let mut rng = GenomeRng::new(19);
        for _ in 0..100 {
            assert_ne!(rng.mutate_op(), Operator::Boustro);
        }
    }
}
