use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use near_dup::{DuplicateSearcher, SearchConfig, TokenDigest};

#[derive(Parser, Debug)]
#[clap(
    name = "near-dup-fingerprint",
    about = "A program to print the simhash fingerprint of every document."
)]
struct Args {
    /// File path to a document file, one document per line.
    /// If None, documents are read from the standard input.
    #[clap(short = 'i', long)]
    document_path: Option<PathBuf>,

    /// Prints 128 binary digits instead of 32 hex digits.
    #[clap(short = 'B', long)]
    binary: bool,

    /// Seed value for token hashing.
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// Hash function of tokens ("xxh3" or "md5").
    /// "md5" reproduces MD5-based simhash fingerprints and ignores the seed.
    #[clap(short = 'D', long, default_value = "xxh3")]
    digest: TokenDigest,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let rdr: Box<dyn Read> = match &args.document_path {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        ),
        None => Box::new(io::stdin()),
    };
    let documents = BufReader::new(rdr)
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .context("failed to read documents")?;

    let config = SearchConfig::new()
        .with_seed(args.seed)
        .with_digest(args.digest);
    let searcher = DuplicateSearcher::new(config)?.build_fingerprints_in_parallel(documents);

    let mut out = BufWriter::new(io::stdout().lock());
    for fp in searcher.fingerprints() {
        if args.binary {
            writeln!(out, "{}", fp.bits())?;
        } else {
            writeln!(out, "{fp}")?;
        }
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
