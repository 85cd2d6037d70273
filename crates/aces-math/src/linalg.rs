#![warn(missing_docs, unused_imports)]

//! Linear algebra over Z_q.

use crate::errors::{Error, Result};
use crate::zq::Modulus;
use ndarray::Array2;

/// Expresses `target` as a linear combination of the columns of `basis` over
/// Z_q, returning the coefficient vector λ with `basis · λ = target`.
///
/// The elimination is adapted to a finite ring: q may be composite, so each
/// pivot must be invertible modulo q (checked through the extended gcd), and
/// free variables are set to zero. A system without enough invertible pivots
/// is reported as singular; the caller is expected to redraw the basis.
pub fn solve_in_basis(q: &Modulus, basis: &Array2<u64>, target: &[u64]) -> Result<Vec<u64>> {
    let rows = basis.nrows();
    let cols = basis.ncols();
    assert_eq!(target.len(), rows, "Incompatible dimensions");

    // Augmented matrix [basis | target].
    let mut m = Array2::<u64>::zeros((rows, cols + 1));
    for r in 0..rows {
        for c in 0..cols {
            m[[r, c]] = q.reduce(basis[[r, c]]);
        }
        m[[r, cols]] = q.reduce(target[r]);
    }

    let mut pivot_of_col: Vec<Option<usize>> = vec![None; cols];
    let mut next_row = 0;
    for c in 0..cols {
        if next_row == rows {
            break;
        }
        // A pivot must be invertible so the row can be normalized.
        let Some((r, inv)) = (next_row..rows).find_map(|r| q.inv(m[[r, c]]).map(|inv| (r, inv)))
        else {
            continue;
        };
        if r != next_row {
            for col in 0..=cols {
                m.swap([r, col], [next_row, col]);
            }
        }
        for col in 0..=cols {
            m[[next_row, col]] = q.mul(m[[next_row, col]], inv);
        }
        for rr in 0..rows {
            if rr == next_row {
                continue;
            }
            let f = m[[rr, c]];
            if f != 0 {
                for col in 0..=cols {
                    let s = q.mul(f, m[[next_row, col]]);
                    m[[rr, col]] = q.sub(m[[rr, col]], s);
                }
            }
        }
        pivot_of_col[c] = Some(next_row);
        next_row += 1;
    }

    // Rows without a pivot must have been eliminated entirely.
    for r in next_row..rows {
        if (0..=cols).any(|c| m[[r, c]] != 0) {
            return Err(Error::SingularSystem(format!(
                "equation {r} has no invertible pivot"
            )));
        }
    }

    let mut lambda = vec![0u64; cols];
    for (c, pivot) in pivot_of_col.iter().enumerate() {
        if let Some(r) = *pivot {
            lambda[c] = m[[r, cols]];
        }
    }
    Ok(lambda)
}

#[cfg(test)]
mod tests {
    use super::solve_in_basis;
    use crate::zq::Modulus;
    use ndarray::Array2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn apply(q: &Modulus, basis: &Array2<u64>, lambda: &[u64]) -> Vec<u64> {
        (0..basis.nrows())
            .map(|r| {
                (0..basis.ncols()).fold(0u64, |acc, c| {
                    q.add(acc, q.mul(basis[[r, c]], lambda[c]))
                })
            })
            .collect()
    }

    #[test]
    fn solves_random_systems() {
        // 47601551 = 709 * 67139 is composite, as the channel moduli are.
        let q = Modulus::new(47601551).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for n in [2usize, 5, 8] {
            for _ in 0..10 {
                let basis = Array2::from_shape_fn((n, n + 1), |_| q.random(&mut rng));
                let target = q.random_vec(n, &mut rng);
                let lambda = solve_in_basis(&q, &basis, &target).unwrap();
                assert_eq!(apply(&q, &basis, &lambda), target);
            }
        }
    }

    #[test]
    fn underdetermined_systems_use_free_variables() {
        let q = Modulus::new(1000001).unwrap();
        // One equation, two unknowns: x + 2y = 5.
        let basis = Array2::from_shape_vec((1, 2), vec![1, 2]).unwrap();
        let lambda = solve_in_basis(&q, &basis, &[5]).unwrap();
        assert_eq!(apply(&q, &basis, &lambda), vec![5]);
    }

    #[test]
    fn reports_singular_systems() {
        // Modulo 10, a column of non-units cannot be eliminated.
        let q = Modulus::new(10).unwrap();
        let basis = Array2::from_shape_vec((2, 2), vec![2, 5, 4, 5]).unwrap();
        assert!(solve_in_basis(&q, &basis, &[1, 3]).is_err());
    }

    #[test]
    fn reports_inconsistent_systems() {
        let q = Modulus::new(1000001).unwrap();
        // Two identical equations with different right-hand sides.
        let basis = Array2::from_shape_vec((2, 2), vec![1, 2, 1, 2]).unwrap();
        assert!(solve_in_basis(&q, &basis, &[5, 6]).is_err());
    }
}
