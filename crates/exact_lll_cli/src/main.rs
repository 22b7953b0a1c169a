//! Exact LLL CLI
//!
//! Lattice basis reduction in exact rational arithmetic.
//!
//! # Usage
//! ```bash
//! # Reduce a basis file (one row per line) with δ = 0.99
//! exact-lll reduce basis.txt --delta 0.99
//!
//! # Gram-Schmidt vectors of a basis read from stdin
//! cat basis.txt | exact-lll orthogonalize
//!
//! # Partial vs full orthogonal-basis refresh on random lattices
//! exact-lll bench --max-dim 20 --export results.csv
//! ```

mod lll_bench;
mod logging;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use exact_lll_core::lattice::{gauss_reduce, DegeneratePolicy, GramSchmidt, LatticeBasis, LLLConfig, LLL};
use exact_lll_core::{vector, Rational};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "exact-lll")]
#[command(about = "Exact rational LLL lattice basis reduction")]
#[command(version)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// LLL-reduce a basis
    Reduce {
        /// Basis file, one row per line (stdin if omitted)
        input: Option<PathBuf>,

        /// Lovász parameter δ in (1/4, 1], as a fraction or exact decimal
        #[arg(long, default_value = "99/100")]
        delta: Rational,

        /// Give up after this many outer-loop iterations
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Fail on linearly dependent rows instead of tolerating them
        #[arg(long)]
        reject_degenerate: bool,

        /// Recompute the whole orthogonal basis after every mutation
        #[arg(long)]
        full_refresh: bool,

        /// Also print the unimodular transform U with U·B = B'
        #[arg(long)]
        transform: bool,

        /// Write the reduced basis here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the Gram-Schmidt orthogonal basis
    Orthogonalize {
        /// Basis file (stdin if omitted)
        input: Option<PathBuf>,
    },

    /// Lagrange-Gauss reduce a two-row basis
    Gauss {
        /// Basis file with exactly two rows (stdin if omitted)
        input: Option<PathBuf>,
    },

    /// Report whether a basis is δ-LLL-reduced
    Check {
        /// Basis file (stdin if omitted)
        input: Option<PathBuf>,

        /// Lovász parameter δ in (1/4, 1]
        #[arg(long, default_value = "99/100")]
        delta: Rational,
    },

    /// Benchmark partial vs full Gram-Schmidt refresh
    Bench {
        /// Maximum lattice dimension
        #[arg(long, default_value = "20")]
        max_dim: usize,

        /// Entry bit size
        #[arg(long, default_value = "16")]
        bits: usize,

        /// Lattice family
        #[arg(long, value_enum, default_value = "random")]
        family: lll_bench::Family,

        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Export results to CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        Commands::Reduce {
            input,
            delta,
            max_iterations,
            reject_degenerate,
            full_refresh,
            transform,
            output,
        } => {
            let config = LLLConfig {
                delta,
                max_iterations,
                degenerate: if reject_degenerate {
                    DegeneratePolicy::Reject
                } else {
                    DegeneratePolicy::Tolerate
                },
                partial_refresh: !full_refresh,
            };
            run_reduce(input.as_deref(), &config, transform, output.as_deref())
        }
        Commands::Orthogonalize { input } => run_orthogonalize(input.as_deref()),
        Commands::Gauss { input } => run_gauss(input.as_deref()),
        Commands::Check { input, delta } => run_check(input.as_deref(), &delta),
        Commands::Bench {
            max_dim,
            bits,
            family,
            seed,
            export,
        } => lll_bench::run_refresh_benchmark(max_dim, bits, family, seed, export.as_deref()),
    }
}

fn read_basis(input: Option<&Path>) -> Result<LatticeBasis> {
    let text = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => io::read_to_string(io::stdin()).context("failed to read basis from stdin")?,
    };
    let source = input.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    text.parse::<LatticeBasis>()
        .with_context(|| format!("invalid basis in {}", source))
}

fn run_reduce(
    input: Option<&Path>,
    config: &LLLConfig,
    print_transform: bool,
    output: Option<&Path>,
) -> Result<()> {
    let basis = read_basis(input)?;
    let (reduced, u, stats) = LLL::reduce_with_transform(&basis, config)
        .with_context(|| format!("reduction with delta = {} failed", config.delta))?;

    match output {
        Some(path) => fs::write(path, format!("{}\n", reduced))
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", reduced),
    }

    if print_transform {
        println!();
        println!("# U");
        for i in 0..u.rows() {
            let row: Vec<String> = u.row(i).iter().map(|x| x.to_string()).collect();
            println!("[{}]", row.join(", "));
        }
    }

    eprintln!(
        "n={} m={} delta={}: {} swaps, {} size reductions, {} iterations, {} GS rows, {:.3} ms",
        reduced.n,
        reduced.m,
        config.delta,
        stats.swaps,
        stats.size_reductions,
        stats.iterations,
        stats.gs_rows_computed,
        stats.total_time * 1000.0
    );
    let zero_rows = reduced.zero_rows();
    if !zero_rows.is_empty() {
        eprintln!("dependent input: rows {:?} reduced to zero", zero_rows);
    }
    Ok(())
}

fn run_orthogonalize(input: Option<&Path>) -> Result<()> {
    let basis = read_basis(input)?;
    let gs = GramSchmidt::compute(&basis)?;
    println!("{}", gs.orthogonal_basis()?);
    eprintln!("rank {} of {}", gs.rank(), basis.n);
    Ok(())
}

fn run_gauss(input: Option<&Path>) -> Result<()> {
    let basis = read_basis(input)?;
    if basis.n != 2 {
        bail!("gauss needs exactly two rows, got {}", basis.n);
    }
    let (v1, v2) = gauss_reduce(basis.get(0), basis.get(1))?;
    println!("{}", vector::format_row(&v1));
    println!("{}", vector::format_row(&v2));
    Ok(())
}

fn run_check(input: Option<&Path>, delta: &Rational) -> Result<()> {
    let basis = read_basis(input)?;
    if LLL::is_reduced(&basis, delta)? {
        println!("reduced (delta = {})", delta);
        Ok(())
    } else {
        bail!("not {}-LLL-reduced", delta)
    }
}
