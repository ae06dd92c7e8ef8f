// ABOUTME: Launcher entry point: searches Amazon for the query and prints script-filter feedback JSON.
// ABOUTME: Wires the HTTP fetcher, disk cache, and image store into the core search pipeline.

mod cache;
mod fetch;
mod images;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use shopscout_core::options::{DEFAULT_AFFILIATE_TAG, DEFAULT_MAX_RESULTS, DEFAULT_ORIGIN};
use shopscout_core::{
    apply_query, build_feedback, extract_records, parse_query, prompt_feedback, search, Cache,
    Feedback, ImageStore, NoCache, NoImages, SearchOptions,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cache::DiskCache;
use crate::fetch::{build_client, HttpFetcher, DEFAULT_TIMEOUT};
use crate::images::HttpImageStore;

/// Search Amazon and print launcher feedback items.
#[derive(Parser, Debug)]
#[command(name = "shopscout")]
#[command(about = "Search Amazon listings and print launcher feedback JSON", long_about = None)]
struct Args {
    /// Search terms. Accepts srt:p|pd|r|rd to sort and dl:<days> to cap delivery time.
    query: Vec<String>,

    /// Marketplace origin used for searching and for product links.
    #[arg(long, default_value = DEFAULT_ORIGIN)]
    origin: String,

    /// Affiliate tag appended to every product link.
    #[arg(long, default_value = DEFAULT_AFFILIATE_TAG)]
    affiliate_tag: String,

    /// Maximum listings read from one results page.
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: usize,

    /// Directory for cached results and icon paths.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Always fetch fresh results.
    #[arg(long, default_value_t = false)]
    no_cache: bool,

    /// Directory product images are downloaded into (default: system temp dir).
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Use the default icon instead of downloading product images.
    #[arg(long, default_value_t = false)]
    no_images: bool,

    /// Parse a saved results page instead of fetching one.
    #[arg(long, conflicts_with = "save_html")]
    html: Option<PathBuf>,

    /// Save the fetched results page to this file.
    #[arg(long)]
    save_html: Option<PathBuf>,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Log filter used when RUST_LOG is unset (logs go to stderr).
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let opts = SearchOptions::builder()
        .origin(&args.origin)
        .affiliate_tag(&args.affiliate_tag)
        .max_results(args.max_results)
        .build();
    let raw_query = args.query.join(" ");
    let today = Local::now().date_naive();

    let cache: Box<dyn Cache> = if args.no_cache {
        Box::new(NoCache)
    } else {
        Box::new(DiskCache::new(cache_dir(&args)))
    };

    let feedback = if let Some(html_path) = &args.html {
        let html = fs::read_to_string(html_path)
            .with_context(|| format!("reading {}", html_path.display()))?;
        let query = parse_query(&raw_query);
        let records = apply_query(extract_records(&html, &opts, today), &query);
        debug!(count = records.len(), "records from saved page");
        render(&records, &opts, cache.as_ref(), &args)?
    } else if raw_query.trim().is_empty() {
        prompt_feedback(&opts)
    } else {
        let client = build_client(Duration::from_secs(args.timeout))?;
        let mut fetcher = HttpFetcher::new(client);
        if let Some(path) = &args.save_html {
            fetcher = fetcher.save_to(path);
        }
        let results = search(&raw_query, &opts, &fetcher, cache.as_ref(), today);
        debug!(
            terms = %results.query.search_terms,
            count = results.records.len(),
            "search finished"
        );
        render(&results.records, &opts, cache.as_ref(), &args)?
    };

    let output = if args.compact {
        serde_json::to_string(&feedback)?
    } else {
        serde_json::to_string_pretty(&feedback)?
    };
    println!("{}", output);
    Ok(())
}

fn render(
    records: &[shopscout_core::ProductRecord],
    opts: &SearchOptions,
    cache: &dyn Cache,
    args: &Args,
) -> Result<Feedback> {
    let images: Box<dyn ImageStore> = if args.no_images {
        Box::new(NoImages)
    } else {
        let client = build_client(Duration::from_secs(args.timeout))?;
        let dir = args.image_dir.clone().unwrap_or_else(std::env::temp_dir);
        Box::new(HttpImageStore::new(client, dir))
    };
    Ok(build_feedback(records, opts, cache, images.as_ref()))
}

/// `--cache-dir`, else the launcher's workflow cache, else a temp subdirectory.
fn cache_dir(args: &Args) -> PathBuf {
    args.cache_dir
        .clone()
        .or_else(|| std::env::var_os("alfred_workflow_cache").map(PathBuf::from))
        .unwrap_or_else(|| std::env::temp_dir().join("shopscout"))
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
