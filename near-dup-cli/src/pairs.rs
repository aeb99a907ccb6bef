use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use near_dup::{DuplicateSearcher, SearchConfig, Strategy, TokenDigest};

#[derive(Parser, Debug)]
#[clap(
    name = "near-dup-pairs",
    about = "A program to find all pairs of near-duplicate documents."
)]
struct Args {
    /// File path to a document file, one document per line.
    #[clap(short = 'i', long)]
    document_path: PathBuf,

    /// Maximum Hamming distance between fingerprints in [0,128].
    #[clap(short = 'd', long)]
    max_distance: i64,

    /// Retrieval strategy of candidates ("exhaustive" or "indexed").
    #[clap(short = 'S', long, default_value = "indexed")]
    strategy: Strategy,

    /// Number of bands in the indexed strategy.
    #[clap(short = 'b', long, default_value = "8")]
    bands: usize,

    /// Number of bits per band in the indexed strategy (bands * band_width must be 128).
    #[clap(short = 'r', long, default_value = "16")]
    band_width: usize,

    /// Checks every document when the index yields no candidates for a document.
    #[clap(short = 'f', long)]
    fallback: bool,

    /// Seed value for token hashing.
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// Hash function of tokens ("xxh3" or "md5").
    /// "md5" reproduces MD5-based simhash fingerprints and ignores the seed.
    #[clap(short = 'D', long, default_value = "xxh3")]
    digest: TokenDigest,

    /// Disables parallel construction.
    #[clap(short = 'p', long)]
    disable_parallel: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = SearchConfig::new()
        .with_strategy(args.strategy)
        .with_bands(args.bands, args.band_width)
        .with_fallback_to_exhaustive(args.fallback)
        .with_seed(args.seed)
        .with_digest(args.digest);
    let mut searcher = DuplicateSearcher::new(config)?.shows_progress(true);

    {
        tracing::info!("Converting documents into fingerprints...");
        let start = Instant::now();
        let documents = load_lines(&args.document_path)?;
        searcher = if args.disable_parallel {
            searcher.build_fingerprints(documents)
        } else {
            searcher.build_fingerprints_in_parallel(documents)
        };
        tracing::info!(
            "Produced {} fingerprints in {} sec, consuming {} MiB",
            searcher.len(),
            start.elapsed().as_secs_f64(),
            searcher.memory_in_bytes() as f64 / (1024. * 1024.)
        );
    }

    tracing::info!("Finding all similar pairs in fingerprints...");
    let start = Instant::now();
    let results = searcher.similar_pairs(args.max_distance);
    tracing::info!("Done in {} sec", start.elapsed().as_secs_f64());

    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "i,j,dist")?;
    for (i, j, dist) in results {
        writeln!(out, "{i},{j},{dist}")?;
    }
    out.flush()?;

    Ok(())
}

fn load_lines(path: &PathBuf) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    BufReader::new(file)
        .lines()
        .collect::<io::Result<_>>()
        .with_context(|| format!("failed to read {}", path.display()))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
