use std::env;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::error;
use tracing_subscriber::EnvFilter;

use paperscope_core::config::EngineConfig;
use paperscope_core::error::Error;
use paperscope_engine::IndexManager;
use paperscope_engine::QueryPipeline;
use paperscope_infer::{embedder_from_config, generator_from_config};

fn print_usage(prog: &str) {
    eprintln!("Usage: {prog} <ingest|query> [args...]");
    eprintln!("  ingest                 rebuild the index from configured data dirs");
    eprintln!("  query \"<question>\" [k]  answer a question against the index");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        print_usage(&prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);

    let code = match run(&cmd, &args, &prog) {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {e}");
            // An empty corpus is a distinct, actionable failure.
            match e.downcast_ref::<Error>() {
                Some(Error::NoDocuments(_)) => 2,
                _ => 1,
            }
        }
    };
    std::process::exit(code);
}

fn run(cmd: &str, args: &[String], prog: &str) -> anyhow::Result<()> {
    let config = EngineConfig::load()?;
    match cmd {
        "ingest" => ingest(config),
        "query" => {
            let Some(query) = args.first() else {
                eprintln!("Usage: {prog} query \"<question>\" [k]");
                std::process::exit(1);
            };
            let top_k = match args.get(1) {
                Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
                    anyhow::anyhow!("k must be a positive integer, got {raw:?}")
                })?),
                None => None,
            };
            query_index(config, query, top_k)
        }
        _ => {
            print_usage(prog);
            std::process::exit(1);
        }
    }
}

fn ingest(config: EngineConfig) -> anyhow::Result<()> {
    let embedder = embedder_from_config(&config)?;
    let manager = IndexManager::new(config, embedder);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("ingesting documents...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    let result = manager.rebuild();
    spinner.finish_and_clear();

    let (_, stats) = result?;
    println!("Ingest complete");
    println!("  documents: {}", stats.document_count);
    println!("  chunks:    {}", stats.chunk_count);
    println!("  avg chunk: {:.2} chars", stats.avg_chunk_size);
    println!("  index:     {}", stats.fingerprint.embedding_model);
    Ok(())
}

fn query_index(config: EngineConfig, query: &str, top_k: Option<usize>) -> anyhow::Result<()> {
    let embedder = embedder_from_config(&config)?;
    let generator = generator_from_config(&config)?;
    let manager = IndexManager::new(config.clone(), embedder);
    let (index, rebuilt) = manager.ensure_index()?;
    if rebuilt {
        eprintln!("(index was stale or missing and has been rebuilt)");
    }

    let pipeline = QueryPipeline::new(&config, manager.embedder(), generator.as_ref());
    let response = pipeline.run_query(&index, query, top_k)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
