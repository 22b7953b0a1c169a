//! LLL Lattice Reduction Algorithm
//!
//! Classical sequential LLL in exact rational arithmetic.
//!
//! # The LLL Algorithm
//!
//! Given a basis B = [b_0, ..., b_{n-1}], LLL produces a δ-reduced basis satisfying:
//! 1. **Size reduction**: |μ_ij| ≤ 1/2 for all j < i
//! 2. **Lovász condition**: ||b*_k||² ≥ (δ - μ_{k,k-1}²) ||b*_{k-1}||² for all k ≥ 1
//!
//! Only two kinds of row operation are ever applied, b_k ← b_k - q b_j with
//! integer q and b_k ↔ b_{k-1}, so the output generates the same lattice as the
//! input.
//!
//! # Orthogonal basis maintenance
//!
//! The orthogonal vectors b*_i are held explicitly. A size-reduction pass on
//! row k reads μ_kj against the current b_k but the b*_j of the previous
//! refresh (which b_k does not affect for j < k); once the pass is done, only
//! rows k.. are recomputed. A swap of b_{k-1} and b_k invalidates rows k-1..
//! and nothing before. Setting [`LLLConfig::partial_refresh`] to false
//! recomputes everything after each mutation instead, with identical results.

use num_bigint::BigInt;
use std::time::Instant;

use super::basis::LatticeBasis;
use super::gram_schmidt::GramSchmidt;
use crate::error::{LatticeError, Result};
use crate::matrix::Matrix;
use crate::rational::Rational;

/// What to do when the input rows are linearly dependent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneratePolicy {
    /// Zero orthogonal vectors are allowed; μ against them is taken as 0
    #[default]
    Tolerate,
    /// Fail with [`LatticeError::DegenerateBasis`] before touching the basis
    Reject,
}

/// LLL configuration parameters
#[derive(Debug, Clone)]
pub struct LLLConfig {
    /// Lovász parameter δ, must lie in (1/4, 1]
    /// Higher values give better reduction but take longer.
    pub delta: Rational,
    /// Optional bound on outer-loop iterations
    pub max_iterations: Option<usize>,
    /// Handling of rank-deficient inputs
    pub degenerate: DegeneratePolicy,
    /// Recompute only the invalidated suffix of the orthogonal basis
    pub partial_refresh: bool,
}

impl Default for LLLConfig {
    fn default() -> Self {
        Self {
            delta: Rational::from_ratio(99, 100),
            max_iterations: None,
            degenerate: DegeneratePolicy::Tolerate,
            partial_refresh: true,
        }
    }
}

impl LLLConfig {
    /// Default configuration with the given δ, validated
    pub fn new(delta: Rational) -> Result<Self> {
        let config = Self {
            delta,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// δ = 3/4, Lovász's original choice
    pub fn classic() -> Self {
        Self {
            delta: Rational::from_ratio(3, 4),
            ..Default::default()
        }
    }

    /// δ = 0.99 (strong reduction)
    pub fn strong() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        validate_delta(&self.delta)
    }
}

/// Check 1/4 < δ ≤ 1
pub fn validate_delta(delta: &Rational) -> Result<()> {
    let quarter = Rational::from_ratio(1, 4);
    if *delta <= quarter || *delta > Rational::one() {
        return Err(LatticeError::InvalidParameter(format!(
            "delta must lie in (1/4, 1], got {}",
            delta
        )));
    }
    Ok(())
}

/// Statistics from LLL execution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LLLStats {
    /// Number of size reductions performed
    pub size_reductions: usize,
    /// Number of swaps performed
    pub swaps: usize,
    /// Total iterations
    pub iterations: usize,
    /// Orthogonal vectors computed, including the initial full pass
    pub gs_rows_computed: usize,
    /// Time for Gram-Schmidt computation (seconds)
    pub gs_time: f64,
    /// Total time (seconds)
    pub total_time: f64,
}

/// LLL lattice reduction algorithm
pub struct LLL;

impl LLL {
    /// Reduce a copy of `basis`
    ///
    /// # Returns
    /// The reduced basis and execution statistics
    pub fn reduce(basis: &LatticeBasis, config: &LLLConfig) -> Result<(LatticeBasis, LLLStats)> {
        let mut b = basis.clone();
        let stats = Self::reduce_in_place(&mut b, config)?;
        Ok((b, stats))
    }

    /// Reduce `basis` in place
    ///
    /// Parameter and degeneracy checks happen before the basis is touched. If
    /// the iteration limit trips, `basis` is left at an intermediate state
    /// that still generates the original lattice.
    pub fn reduce_in_place(basis: &mut LatticeBasis, config: &LLLConfig) -> Result<LLLStats> {
        Self::run(basis, config, None)
    }

    /// Reduce a copy of `basis`, also returning the unimodular U with U·B = B'
    pub fn reduce_with_transform(
        basis: &LatticeBasis,
        config: &LLLConfig,
    ) -> Result<(LatticeBasis, Matrix<BigInt>, LLLStats)> {
        let mut b = basis.clone();
        let mut u = Matrix::identity(basis.n);
        let stats = Self::run(&mut b, config, Some(&mut u))?;
        Ok((b, u, stats))
    }

    fn run(
        basis: &mut LatticeBasis,
        config: &LLLConfig,
        mut transform: Option<&mut Matrix<BigInt>>,
    ) -> Result<LLLStats> {
        config.validate()?;
        let start = Instant::now();
        let mut stats = LLLStats::default();
        let n = basis.n;

        let gs_start = Instant::now();
        let mut gs = GramSchmidt::compute(basis)?;
        stats.gs_rows_computed += n;
        stats.gs_time += gs_start.elapsed().as_secs_f64();

        if let Some(index) = gs.first_degenerate() {
            if config.degenerate == DegeneratePolicy::Reject {
                return Err(LatticeError::DegenerateBasis { index });
            }
            log::debug!("LLL: tolerating dependent basis, b*_{} is zero", index);
        }

        let half = Rational::half();
        let mut k = 1usize;

        while k < n {
            if let Some(limit) = config.max_iterations {
                if stats.iterations >= limit {
                    log::warn!(
                        "LLL stopped after {} iterations at k={} ({} swaps)",
                        stats.iterations,
                        k,
                        stats.swaps
                    );
                    return Err(LatticeError::IterationLimit { limit });
                }
            }
            stats.iterations += 1;

            // Size-reduce b_k against b_{k-1}, ..., b_0
            let mut mutated = false;
            for j in (0..k).rev() {
                let mu = gs.mu(basis, k, j)?;
                if mu.abs() > half {
                    let q = mu.round();
                    basis.reduce_vector(k, j, &q);
                    if let Some(u) = transform.as_deref_mut() {
                        u.sub_scaled_row(k, j, &q);
                    }
                    stats.size_reductions += 1;
                    mutated = true;
                }
            }
            if mutated {
                Self::refresh(&mut gs, basis, k, config, &mut stats)?;
            }

            if gs.check_lovasz(basis, k, &config.delta)? {
                k += 1;
            } else {
                basis.swap(k, k - 1);
                if let Some(u) = transform.as_deref_mut() {
                    u.swap_rows(k, k - 1);
                }
                stats.swaps += 1;
                log::debug!("LLL swap b_{} <-> b_{}", k - 1, k);

                Self::refresh(&mut gs, basis, k - 1, config, &mut stats)?;
                k = (k - 1).max(1);
            }
        }

        stats.total_time = start.elapsed().as_secs_f64();
        log::info!(
            "LLL completed: n={}, {} iterations, {} swaps, {} reductions, {} GS rows, {:.3}s",
            n,
            stats.iterations,
            stats.swaps,
            stats.size_reductions,
            stats.gs_rows_computed,
            stats.total_time
        );

        Ok(stats)
    }

    /// Bring the orthogonal basis up to date after rows `start..` changed
    fn refresh(
        gs: &mut GramSchmidt,
        basis: &LatticeBasis,
        start: usize,
        config: &LLLConfig,
        stats: &mut LLLStats,
    ) -> Result<()> {
        let gs_start = Instant::now();
        let rows = if config.partial_refresh {
            gs.refresh_from(basis, start)?
        } else {
            *gs = GramSchmidt::compute(basis)?;
            basis.n
        };
        stats.gs_rows_computed += rows;
        log::debug!("GS refresh from row {}: {} rows recomputed", start, rows);
        stats.gs_time += gs_start.elapsed().as_secs_f64();
        Ok(())
    }

    /// Check if a basis is δ-LLL-reduced
    pub fn is_reduced(basis: &LatticeBasis, delta: &Rational) -> Result<bool> {
        validate_delta(delta)?;
        let gs = GramSchmidt::compute(basis)?;
        let n = basis.n;

        // Check size reduction
        for i in 1..n {
            for j in 0..i {
                if gs.needs_size_reduction(basis, i, j)? {
                    return Ok(false);
                }
            }
        }

        // Check Lovász condition
        for k in 1..n {
            if !gs.check_lovasz(basis, k, delta)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

/// Reduce `basis` with parameter `delta`, tolerating dependent rows
///
/// Takes the basis by value and hands back the reduced one; clone first to
/// keep the original.
pub fn lll(mut basis: LatticeBasis, delta: &Rational) -> Result<LatticeBasis> {
    let config = LLLConfig::new(delta.clone())?;
    LLL::reduce_in_place(&mut basis, &config)?;
    Ok(basis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::gauss::gauss_reduce;
    use crate::vector;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn q(n: i64, d: i64) -> Rational {
        Rational::from_ratio(n, d)
    }

    fn cryptopals_basis() -> LatticeBasis {
        LatticeBasis::from_rows(&[
            vec![q(-2, 1), q(0, 1), q(2, 1), q(0, 1)],
            vec![q(1, 2), q(-1, 1), q(0, 1), q(0, 1)],
            vec![q(-1, 1), q(0, 1), q(-2, 1), q(1, 2)],
            vec![q(-1, 1), q(1, 1), q(1, 1), q(2, 1)],
        ])
        .unwrap()
    }

    fn assert_same_lattice(input: &LatticeBasis, output: &LatticeBasis, u: &Matrix<BigInt>) {
        assert!(u.is_unimodular(), "transform is not unimodular: {:?}", u);
        assert_eq!(&input.transform(u).unwrap(), output);
        assert_eq!(
            GramSchmidt::compute(input).unwrap().volume_squared(),
            GramSchmidt::compute(output).unwrap().volume_squared()
        );
    }

    #[test]
    fn test_lll_cryptopals_basis() {
        let expected = LatticeBasis::from_rows(&[
            vec![q(1, 2), q(-1, 1), q(0, 1), q(0, 1)],
            vec![q(-1, 1), q(0, 1), q(-2, 1), q(1, 2)],
            vec![q(-1, 2), q(0, 1), q(1, 1), q(2, 1)],
            vec![q(-3, 2), q(-1, 1), q(2, 1), q(0, 1)],
        ])
        .unwrap();

        let reduced = lll(cryptopals_basis(), &q(99, 100)).unwrap();
        assert_eq!(reduced, expected);

        let (_, stats) = LLL::reduce(&cryptopals_basis(), &LLLConfig::default()).unwrap();
        assert_eq!(stats.swaps, 3);
        assert_eq!(stats.iterations, 8);
    }

    #[test]
    fn test_lll_simple() {
        // Simple 2D lattice that needs reduction
        let basis = LatticeBasis::from_rows(&[vec![1i64, 1], vec![0, 1]]).unwrap();

        let config = LLLConfig::classic();
        let (reduced, stats) = LLL::reduce(&basis, &config).unwrap();

        assert_eq!(reduced, LatticeBasis::from_rows(&[vec![0i64, 1], vec![1, 0]]).unwrap());
        assert!(LLL::is_reduced(&reduced, &config.delta).unwrap());
        assert!(!LLL::is_reduced(&basis, &config.delta).unwrap());
        assert_eq!(stats.swaps, 1);
    }

    #[test]
    fn test_lll_identity() {
        // Identity lattice (already reduced)
        let basis = LatticeBasis::from_rows(&[
            vec![1i64, 0, 0],
            vec![0, 1, 0],
            vec![0, 0, 1],
        ])
        .unwrap();

        let (reduced, stats) = LLL::reduce(&basis, &LLLConfig::default()).unwrap();

        assert_eq!(stats.swaps, 0);
        assert_eq!(stats.size_reductions, 0);
        assert_eq!(stats.gs_rows_computed, 3);
        assert_eq!(reduced, basis);
    }

    #[test]
    fn test_lll_single_row() {
        let basis = LatticeBasis::from_rows(&[vec![5i64, 3]]).unwrap();
        let (reduced, stats) = LLL::reduce(&basis, &LLLConfig::default()).unwrap();
        assert_eq!(reduced, basis);
        assert_eq!(stats.iterations, 0);
    }

    #[test]
    fn test_lll_strong_and_weak() {
        let basis = LatticeBasis::from_rows(&[
            vec![1i64, 1, 1],
            vec![-1, 0, 2],
            vec![3, 5, 6],
        ])
        .unwrap();
        let expected = LatticeBasis::from_rows(&[
            vec![0i64, 1, 0],
            vec![1, 0, 1],
            vec![-1, 0, 2],
        ])
        .unwrap();

        for delta in [q(1, 2), q(3, 4), q(99, 100)] {
            let reduced = lll(basis.clone(), &delta).unwrap();
            assert_eq!(reduced, expected, "delta = {}", delta);
            assert!(LLL::is_reduced(&reduced, &delta).unwrap());
        }
    }

    #[test]
    fn test_lll_knapsack() {
        // 5 + 7 = 12
        let basis = LatticeBasis::knapsack(&[3, 5, 7], 12).unwrap();
        let (reduced, _) = LLL::reduce(&basis, &LLLConfig::default()).unwrap();

        assert!(LLL::is_reduced(&reduced, &q(99, 100)).unwrap());
        assert_eq!(reduced.get(0), &[q(1, 1), q(-1, 1), q(-1, 1), q(0, 1)]);

        // Row (1 - 2x_1, 1 - 2x_2, 1 - 2x_3, 0) encodes the subset x
        let x: Vec<Rational> = reduced.get(0)[..3]
            .iter()
            .map(|v| &(&Rational::one() - v) / &q(2, 1))
            .collect();
        assert_eq!(x, vec![q(0, 1), q(1, 1), q(1, 1)]);
    }

    #[test]
    fn test_config_presets() {
        assert_eq!(LLLConfig::classic().delta, q(3, 4));
        let strong = LLLConfig::strong();
        assert_eq!(strong.delta, q(99, 100));
        assert!(strong.partial_refresh);
        assert_eq!(strong.degenerate, DegeneratePolicy::Tolerate);
        assert!(strong.validate().is_ok());

        let (weak, _) = LLL::reduce(&cryptopals_basis(), &LLLConfig::classic()).unwrap();
        let (tight, _) = LLL::reduce(&cryptopals_basis(), &strong).unwrap();
        assert!(LLL::is_reduced(&weak, &q(3, 4)).unwrap());
        assert!(LLL::is_reduced(&tight, &q(99, 100)).unwrap());
    }

    #[test]
    fn test_delta_boundaries() {
        let quarter = q(1, 4);
        assert!(matches!(
            lll(cryptopals_basis(), &quarter),
            Err(LatticeError::InvalidParameter(_))
        ));
        assert!(LLLConfig::new(q(11, 10)).is_err());
        assert!(LLLConfig::new(Rational::zero()).is_err());
        assert!(LLL::is_reduced(&cryptopals_basis(), &quarter).is_err());

        let just_above = &quarter + &q(1, 1_000_000);
        let reduced = lll(cryptopals_basis(), &just_above).unwrap();
        assert!(LLL::is_reduced(&reduced, &just_above).unwrap());

        let reduced = lll(cryptopals_basis(), &Rational::one()).unwrap();
        assert!(LLL::is_reduced(&reduced, &Rational::one()).unwrap());
    }

    #[test]
    fn test_invalid_delta_leaves_basis_untouched() {
        let mut basis = cryptopals_basis();
        let config = LLLConfig {
            delta: q(3, 2),
            ..Default::default()
        };
        assert!(LLL::reduce_in_place(&mut basis, &config).is_err());
        assert_eq!(basis, cryptopals_basis());
    }

    #[test]
    fn test_zero_row_basis() {
        let basis = LatticeBasis::from_rows(&[
            vec![1i64, 2, 3],
            vec![0, 0, 0],
            vec![4, 5, 6],
        ])
        .unwrap();

        let reduced = lll(basis.clone(), &q(99, 100)).unwrap();
        assert_eq!(
            reduced,
            LatticeBasis::from_rows(&[vec![0i64, 0, 0], vec![2, 1, 0], vec![-1, 1, 3]]).unwrap()
        );
        assert!(LLL::is_reduced(&reduced, &q(99, 100)).unwrap());

        let strict = LLLConfig {
            degenerate: DegeneratePolicy::Reject,
            ..Default::default()
        };
        let mut untouched = basis.clone();
        assert_eq!(
            LLL::reduce_in_place(&mut untouched, &strict),
            Err(LatticeError::DegenerateBasis { index: 1 })
        );
        assert_eq!(untouched, basis);
    }

    #[test]
    fn test_identical_rows_basis() {
        let basis = LatticeBasis::from_rows(&[
            vec![1i64, 2, 3],
            vec![1, 2, 3],
            vec![4, 5, 7],
        ])
        .unwrap();

        let (reduced, u, _) = LLL::reduce_with_transform(&basis, &LLLConfig::default()).unwrap();
        assert_eq!(
            reduced,
            LatticeBasis::from_rows(&[vec![0i64, 0, 0], vec![1, -1, -2], vec![2, 1, 1]]).unwrap()
        );
        assert_eq!(reduced.zero_rows(), vec![0]);
        assert!(u.is_unimodular());
        assert_eq!(basis.transform(&u).unwrap(), reduced);

        let strict = LLLConfig {
            degenerate: DegeneratePolicy::Reject,
            ..Default::default()
        };
        assert_eq!(
            LLL::reduce(&basis, &strict).map(|(b, _)| b),
            Err(LatticeError::DegenerateBasis { index: 1 })
        );
    }

    #[test]
    fn test_iteration_limit() {
        let config = LLLConfig {
            max_iterations: Some(7),
            ..Default::default()
        };
        let mut basis = cryptopals_basis();
        assert_eq!(
            LLL::reduce_in_place(&mut basis, &config),
            Err(LatticeError::IterationLimit { limit: 7 })
        );

        let config = LLLConfig {
            max_iterations: Some(8),
            ..Default::default()
        };
        assert!(LLL::reduce(&cryptopals_basis(), &config).is_ok());
    }

    #[test]
    fn test_lll_random_postconditions() {
        let mut rng = StdRng::seed_from_u64(2024);
        for n in 2..7 {
            for delta in [q(3, 4), q(99, 100), Rational::one()] {
                let basis = LatticeBasis::random(n, n + 1, 8, &mut rng).unwrap();
                let config = LLLConfig::new(delta.clone()).unwrap();
                let (reduced, u, _) = LLL::reduce_with_transform(&basis, &config).unwrap();

                assert!(LLL::is_reduced(&reduced, &delta).unwrap(), "n={} δ={}", n, delta);
                assert_same_lattice(&basis, &reduced, &u);
            }
        }
    }

    #[test]
    fn test_lll_idempotent() {
        let mut rng = StdRng::seed_from_u64(99);
        for n in [3, 5, 6] {
            let basis = LatticeBasis::random(n, n, 10, &mut rng).unwrap();
            let once = lll(basis, &q(99, 100)).unwrap();
            let (twice, stats) = LLL::reduce(&once, &LLLConfig::default()).unwrap();
            assert_eq!(twice, once);
            assert_eq!(stats.swaps, 0);
            assert_eq!(stats.size_reductions, 0);
        }
    }

    #[test]
    fn test_partial_refresh_matches_full() {
        let mut rng = StdRng::seed_from_u64(314);
        for n in [4, 6, 8] {
            let basis = LatticeBasis::random(n, n, 12, &mut rng).unwrap();
            let full_config = LLLConfig {
                partial_refresh: false,
                ..Default::default()
            };

            let (partial, partial_stats) = LLL::reduce(&basis, &LLLConfig::default()).unwrap();
            let (full, full_stats) = LLL::reduce(&basis, &full_config).unwrap();

            assert_eq!(partial, full);
            assert_eq!(partial_stats.swaps, full_stats.swaps);
            assert_eq!(partial_stats.iterations, full_stats.iterations);
            assert!(
                partial_stats.gs_rows_computed < full_stats.gs_rows_computed,
                "partial {} vs full {}",
                partial_stats.gs_rows_computed,
                full_stats.gs_rows_computed
            );
        }
    }

    #[test]
    fn test_random_unimodular_round_trip() {
        let mut rng = StdRng::seed_from_u64(77);
        for n in [3, 4, 5] {
            let basis = LatticeBasis::random(n, n, 8, &mut rng).unwrap();
            let scramble = Matrix::random_unimodular(n, 6 * n, 2, &mut rng);
            let scrambled = basis.transform(&scramble).unwrap();

            let config = LLLConfig::default();
            let (a, ua, _) = LLL::reduce_with_transform(&basis, &config).unwrap();
            let (b, ub, _) = LLL::reduce_with_transform(&scrambled, &config).unwrap();

            assert!(LLL::is_reduced(&a, &config.delta).unwrap());
            assert!(LLL::is_reduced(&b, &config.delta).unwrap());

            // b = ub * scramble * basis, a composition of unimodular maps
            let composed = ub.matmul(&scramble).unwrap();
            assert_same_lattice(&basis, &b, &composed);
            assert_same_lattice(&basis, &a, &ua);
        }
    }

    #[test]
    fn test_two_rows_agree_with_gauss() {
        // With δ = 1 a 2-row LLL-reduced basis attains both successive minima
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..10 {
            let basis = LatticeBasis::random(2, 3, 10, &mut rng).unwrap();
            let reduced = lll(basis.clone(), &Rational::one()).unwrap();
            let (g1, g2) = gauss_reduce(basis.get(0), basis.get(1)).unwrap();

            assert_eq!(reduced.norm_squared(0), vector::norm_squared(&g1));
            assert_eq!(reduced.norm_squared(1), vector::norm_squared(&g2));
        }
    }
}
