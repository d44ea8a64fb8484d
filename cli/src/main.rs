use anyhow::Result;
use clap::Parser;
use scour_cli::{
    build_engine, run_autocomplete, run_prefix_search, run_search, run_status, ErrorOutput,
};
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "scour")]
#[command(about = "In-memory full-text search over a folder of .txt files", long_about = None)]
struct Args {
    /// Directory of .txt files to index
    #[arg(long = "data-dir", default_value = "./Data")]
    data_dir: String,
    /// Keyword search query
    #[arg(long)]
    search: Option<String>,
    /// Autocomplete prefix
    #[arg(long)]
    autocomplete: Option<String>,
    /// Prefix-expanded search
    #[arg(long)]
    prefixsearch: Option<String>,
    /// Results per page
    #[arg(long = "topK", default_value_t = 10)]
    top_k: usize,
    /// Maximum autocomplete suggestions
    #[arg(long, default_value_t = 10)]
    limit: usize,
    /// Maximum completions a prefix search expands through
    #[arg(long = "expandLimit", default_value_t = 100)]
    expand_limit: usize,
    /// Page number, 1-indexed
    #[arg(long, default_value_t = 1)]
    page: usize,
}

fn main() {
    // Stdout carries the JSON contract; diagnostics go to stderr.
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => {}
        Err(err) => {
            let record = ErrorOutput {
                error: err.to_string(),
            };
            let json = serde_json::to_string(&record)
                .unwrap_or_else(|_| String::from(r#"{"error":"output serialization failed"}"#));
            println!("{json}");
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut engine = build_engine(Path::new(&args.data_dir))?;
    if engine.document_count() == 0 {
        anyhow::bail!("No documents could be indexed.");
    }

    let json = if let Some(query) = args.search.as_deref() {
        serde_json::to_string(&run_search(&mut engine, query, args.page, args.top_k))?
    } else if let Some(prefix) = args.autocomplete.as_deref() {
        serde_json::to_string(&run_autocomplete(&mut engine, prefix, args.limit))?
    } else if let Some(prefix) = args.prefixsearch.as_deref() {
        serde_json::to_string(&run_prefix_search(
            &mut engine,
            prefix,
            args.expand_limit,
            args.page,
            args.top_k,
        ))?
    } else {
        serde_json::to_string(&run_status(&engine, &args.data_dir))?
    };
    println!("{json}");
    Ok(())
}
