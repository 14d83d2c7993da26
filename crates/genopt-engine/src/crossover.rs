//! Single-point crossover.
//!
//! A child takes genes `[0, point)` from parent A and `[point, len)` from parent B. The
//! cut point is fixed for the whole run at the midpoint of the genome (see
//! [`crossover_point`]); only the choice of parents is random.

use rand::Rng;

use crate::genome::Genome;

/// Cut point used for genomes of `num_genes` genes: `num_genes / 2`.
///
/// For a single-gene genome this is 0, so the child is a copy of parent B.
#[must_use]
pub const fn crossover_point(num_genes: usize) -> usize {
    num_genes / 2
}

/// Splices two parents at `point`.
///
/// # Panics
///
/// Panics if the parents differ in length or `point` exceeds their length.
///
/// # Examples
///
/// ```
/// use genopt_engine::{crossover, genome::Genome};
///
/// let a = Genome::new(vec![1.0, 2.0, 3.0, 4.0]);
/// let b = Genome::new(vec![5.0, 6.0, 7.0, 8.0]);
/// let child = crossover::single_point(&a, &b, 2);
/// assert_eq!(child.genes(), &[1.0, 2.0, 7.0, 8.0]);
/// ```
#[must_use]
pub fn single_point(parent_a: &Genome, parent_b: &Genome, point: usize) -> Genome {
    assert_eq!(
        parent_a.len(),
        parent_b.len(),
        "parents must have the same length"
    );
    assert!(point <= parent_a.len(), "crossover point out of range");
    let mut genes = Vec::with_capacity(parent_a.len());
    genes.extend_from_slice(&parent_a[..point]);
    genes.extend_from_slice(&parent_b[point..]);
    Genome::new(genes)
}

/// Breeds `count` children from `elites`.
///
/// For each child, parent A and then parent B are drawn uniformly with replacement from
/// `elites`, so two draws per child, in child order. Drawing the same elite twice yields a
/// copy of it.
///
/// # Panics
///
/// Panics if `elites` is empty while `count > 0`.
pub fn breed<R>(elites: &[Genome], count: usize, point: usize, rng: &mut R) -> Vec<Genome>
where
    R: Rng + ?Sized,
{
    assert!(
        count == 0 || !elites.is_empty(),
        "cannot breed without parents"
    );
    (0..count)
        .map(|_| {
            let a = rng.random_range(0..elites.len());
            let b = rng.random_range(0..elites.len());
            single_point(&elites[a], &elites[b], point)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn genome(values: &[f64]) -> Genome {
        Genome::new(values.to_vec())
    }

    #[test]
    fn test_crossover_point_is_midpoint() {
        assert_eq!(crossover_point(1), 0);
        assert_eq!(crossover_point(4), 2);
        assert_eq!(crossover_point(5), 2);
    }

    #[test]
    fn test_child_takes_prefix_and_suffix() {
        let a = genome(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = genome(&[-1.0, -2.0, -3.0, -4.0, -5.0]);
        let c = crossover_point(a.len());
        let child = single_point(&a, &b, c);
        assert_eq!(child[..c], a[..c]);
        assert_eq!(child[c..], b[c..]);
    }

    #[test]
    fn test_same_parent_is_copy() {
        let a = genome(&[0.1, 0.2, 0.3]);
        assert_eq!(single_point(&a, &a, 1), a);
    }

    #[test]
    fn test_extreme_points() {
        let a = genome(&[1.0, 2.0]);
        let b = genome(&[3.0, 4.0]);
        assert_eq!(single_point(&a, &b, 0), b);
        assert_eq!(single_point(&a, &b, 2), a);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_length_mismatch_panics() {
        let _ = single_point(&genome(&[1.0]), &genome(&[1.0, 2.0]), 0);
    }

    #[test]
    fn test_breed_draw_order() {
        let elites = vec![
            genome(&[1.0, 1.0, 1.0, 1.0]),
            genome(&[2.0, 2.0, 2.0, 2.0]),
            genome(&[3.0, 3.0, 3.0, 3.0]),
        ];
        let mut rng = Pcg32::seed_from_u64(11);
        let children = breed(&elites, 6, 2, &mut rng);

        let mut expected_rng = Pcg32::seed_from_u64(11);
        for child in &children {
            let a = expected_rng.random_range(0..elites.len());
            let b = expected_rng.random_range(0..elites.len());
            assert_eq!(child[..2], elites[a][..2]);
            assert_eq!(child[2..], elites[b][2..]);
        }
        assert_eq!(rng.random::<u32>(), expected_rng.random::<u32>());
    }

    #[test]
    fn test_breed_nothing_draws_nothing() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut untouched = Pcg32::seed_from_u64(3);
        assert!(breed(&[], 0, 0, &mut rng).is_empty());
        assert_eq!(rng.random::<u32>(), untouched.random::<u32>());
    }
}
