//! Row processing orders (initial basis selection and halfspace insertion).

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::kernel::Scalar;

/// Order in which the engine consumes input rows.
///
/// The dual set is the same for every order; counts of intermediate rays and
/// the order of output rows are not.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// Insertion order.
    #[default]
    MinIndex,
    MaxIndex,
    /// Lexicographically smallest row first.
    LexMin,
    LexMax,
    /// Reproducible shuffle.
    Random { seed: u64 },
}

pub(crate) fn processing_order<S: Scalar>(rows: &[Vec<S>], order: RowOrder) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..rows.len()).collect();
    match order {
        RowOrder::MinIndex => {}
        RowOrder::MaxIndex => idx.reverse(),
        RowOrder::LexMin => idx.sort_by(|&a, &b| lex_cmp(&rows[a], &rows[b])),
        RowOrder::LexMax => idx.sort_by(|&a, &b| lex_cmp(&rows[b], &rows[a])),
        RowOrder::Random { seed } => {
            let mut rng = StdRng::seed_from_u64(seed);
            idx.shuffle(&mut rng);
        }
    }
    idx
}

fn lex_cmp<S: Scalar>(a: &[S], b: &[S]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.partial_cmp(y).unwrap_or(Ordering::Equal) {
            Ordering::Equal => continue,
            o => return o,
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Vec<f64>> {
        vec![
            vec![1.0, 0.0],
            vec![0.0, 2.0],
            vec![0.0, 1.0],
            vec![-1.0, 5.0],
        ]
    }

    #[test]
    fn index_orders() {
        assert_eq!(processing_order(&rows(), RowOrder::MinIndex), vec![0, 1, 2, 3]);
        assert_eq!(processing_order(&rows(), RowOrder::MaxIndex), vec![3, 2, 1, 0]);
    }

    #[test]
    fn lexicographic_orders() {
        assert_eq!(processing_order(&rows(), RowOrder::LexMin), vec![3, 2, 1, 0]);
        assert_eq!(processing_order(&rows(), RowOrder::LexMax), vec![0, 1, 2, 3]);
    }

    #[test]
    fn random_order_is_a_reproducible_permutation() {
        let a = processing_order(&rows(), RowOrder::Random { seed: 11 });
        let b = processing_order(&rows(), RowOrder::Random { seed: 11 });
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
    }
}
