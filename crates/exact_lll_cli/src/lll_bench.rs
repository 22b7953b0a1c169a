//! LLL Lattice Reduction Benchmark
//!
//! Compares partial Gram-Schmidt refresh against full recomputation after
//! every basis mutation, on seeded random or knapsack lattices.

use anyhow::{ensure, Context, Result};
use clap::ValueEnum;
use exact_lll_core::lattice::{LatticeBasis, LLLConfig, LLLStats, LLL};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Lattice family to benchmark on
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Family {
    /// Square lattice with uniformly random entries
    Random,
    /// Subset-sum lattice (cryptanalytic application)
    Knapsack,
}

/// Results from a single LLL benchmark run
#[derive(Debug, Clone)]
pub struct LLLBenchResult {
    pub n: usize,
    pub m: usize,
    pub bits: usize,
    pub partial_ms: f64,
    pub full_ms: f64,
    pub speedup: f64,
    pub swaps: usize,
    pub iterations: usize,
    pub partial_gs_rows: usize,
    pub full_gs_rows: usize,
    pub verified: bool,
}

/// Run LLL benchmark comparing partial vs full orthogonal-basis refresh
pub fn run_refresh_benchmark(
    max_dim: usize,
    bits: usize,
    family: Family,
    seed: u64,
    export: Option<&Path>,
) -> Result<()> {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║           Exact LLL Benchmark: Partial vs Full GS            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Family: {:?}, max dimension: {}, bits: {}, seed: {}", family, max_dim, bits, seed);
    println!();

    if let Family::Knapsack = family {
        ensure!(
            (1..=40).contains(&bits),
            "knapsack weights must be 1 to 40 bits, got {}",
            bits
        );
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let dims: Vec<usize> = vec![4, 6, 8, 10, 12, 16, 20, 24, 30]
        .into_iter()
        .filter(|&n| n <= max_dim)
        .collect();

    let mut results = Vec::new();

    println!("┌──────┬──────┬────────────┬────────────┬──────────┬────────────┬────────────┬──────────┐");
    println!("│  n   │ bits │ Partial ms │  Full ms   │ Speedup  │  GS rows   │   Swaps    │ Verified │");
    println!("├──────┼──────┼────────────┼────────────┼──────────┼────────────┼────────────┼──────────┤");

    for n in &dims {
        let basis = match family {
            Family::Random => LatticeBasis::random(*n, *n, bits, &mut rng)?,
            Family::Knapsack => {
                let a: Vec<i64> = (0..*n).map(|_| rng.gen_range(1..(1i64 << bits))).collect();
                let s: i64 = a.iter().take(n / 2).sum();
                LatticeBasis::knapsack(&a, s)?
            }
        };

        let result = benchmark_lll(&basis, bits)
            .with_context(|| format!("benchmark failed for n={}", n))?;

        let verified_str = if result.verified { "✓" } else { "✗" };
        println!(
            "│ {:>4} │ {:>4} │ {:>10.2} │ {:>10.2} │ {:>7.2}× │ {:>10} │ {:>10} │    {}     │",
            result.n,
            bits,
            result.partial_ms,
            result.full_ms,
            result.speedup,
            format!("{}/{}", result.partial_gs_rows, result.full_gs_rows),
            result.swaps,
            verified_str
        );

        results.push(result);
    }

    println!("└──────┴──────┴────────────┴────────────┴──────────┴────────────┴────────────┴──────────┘");
    println!();

    if let Some(result) = results.last() {
        println!("Summary for n={}, bits={}:", result.n, result.bits);
        println!(
            "  Partial refresh: {:>10.2} ms ({} GS rows, {} iterations)",
            result.partial_ms, result.partial_gs_rows, result.iterations
        );
        println!(
            "  Full refresh:    {:>10.2} ms ({} GS rows)",
            result.full_ms, result.full_gs_rows
        );
        println!();
    }

    if let Some(path) = export {
        export_lll_results(path, &results)?;
        println!("Results exported to: {}", path.display());
    }

    ensure!(
        results.iter().all(|r| r.verified),
        "partial and full refresh disagreed on at least one lattice"
    );
    Ok(())
}

fn benchmark_lll(basis: &LatticeBasis, bits: usize) -> Result<LLLBenchResult> {
    let partial_config = LLLConfig::default();
    let full_config = LLLConfig {
        partial_refresh: false,
        ..LLLConfig::default()
    };

    let (partial, partial_stats, partial_ms) = timed_reduce(basis, &partial_config)?;
    let (full, full_stats, full_ms) = timed_reduce(basis, &full_config)?;

    let verified = partial == full && LLL::is_reduced(&partial, &partial_config.delta)?;
    let speedup = if partial_ms > 0.001 { full_ms / partial_ms } else { 0.0 };

    Ok(LLLBenchResult {
        n: basis.n,
        m: basis.m,
        bits,
        partial_ms,
        full_ms,
        speedup,
        swaps: partial_stats.swaps,
        iterations: partial_stats.iterations,
        partial_gs_rows: partial_stats.gs_rows_computed,
        full_gs_rows: full_stats.gs_rows_computed,
        verified,
    })
}

fn timed_reduce(basis: &LatticeBasis, config: &LLLConfig) -> Result<(LatticeBasis, LLLStats, f64)> {
    let start = Instant::now();
    let (reduced, stats) = LLL::reduce(basis, config)?;
    Ok((reduced, stats, start.elapsed().as_secs_f64() * 1000.0))
}

/// Export LLL benchmark results to CSV
fn export_lll_results(path: &Path, results: &[LLLBenchResult]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create export file {}", path.display()))?;
    writeln!(
        file,
        "n,m,bits,partial_ms,full_ms,speedup,swaps,iterations,partial_gs_rows,full_gs_rows,verified"
    )?;

    for r in results {
        writeln!(
            file,
            "{},{},{},{:.6},{:.6},{:.6},{},{},{},{},{}",
            r.n, r.m, r.bits, r.partial_ms, r.full_ms, r.speedup,
            r.swaps, r.iterations, r.partial_gs_rows, r.full_gs_rows, r.verified
        )?;
    }
    Ok(())
}
