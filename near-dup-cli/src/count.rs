use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use near_dup::feed::Feed;
use near_dup::{DuplicateSearcher, SearchConfig, Strategy, TokenDigest};

#[derive(Parser, Debug)]
#[clap(
    name = "near-dup-count",
    about = "A program to count near-duplicate documents for threshold queries."
)]
struct Args {
    /// File path to an input feed: the number of documents, the documents,
    /// the number of queries, and queries of "<doc_id> <max_distance>".
    /// If None, the feed is read from the standard input.
    #[clap(short = 'i', long)]
    input: Option<PathBuf>,

    /// Retrieval strategy of candidates.
    /// "exhaustive" compares against every other document.
    /// "indexed" compares only against documents sharing a band of bits.
    #[clap(short = 'S', long, default_value = "exhaustive")]
    strategy: Strategy,

    /// Number of bands in the indexed strategy.
    #[clap(short = 'b', long, default_value = "8")]
    bands: usize,

    /// Number of bits per band in the indexed strategy (bands * band_width must be 128).
    #[clap(short = 'r', long, default_value = "16")]
    band_width: usize,

    /// Checks every document when the index yields no candidates for a query document.
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

    let input = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read the standard input")?;
            input
        }
    };
    let (documents, queries) = Feed::parse(&input)?.into_parts();

    let config = SearchConfig::new()
        .with_strategy(args.strategy)
        .with_bands(args.bands, args.band_width)
        .with_fallback_to_exhaustive(args.fallback)
        .with_seed(args.seed)
        .with_digest(args.digest);
    let mut searcher = DuplicateSearcher::new(config)?.shows_progress(true);

    {
        tracing::info!("Converting {} documents into fingerprints...", documents.len());
        let start = Instant::now();
        searcher = if args.disable_parallel {
            searcher.build_fingerprints(documents)
        } else {
            searcher.build_fingerprints_in_parallel(documents)
        };
        tracing::info!("Produced in {} sec", start.elapsed().as_secs_f64());
    }

    tracing::info!("Answering {} queries...", queries.len());
    let start = Instant::now();
    let counts = searcher.count_all(&queries)?;
    tracing::info!("Done in {} sec", start.elapsed().as_secs_f64());

    let mut out = BufWriter::new(io::stdout().lock());
    for count in counts {
        writeln!(out, "{count}")?;
    }
    out.flush()?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
