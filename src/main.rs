use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vending_dfa::application::engine::VendingEngine;
use vending_dfa::domain::product::Catalog;
use vending_dfa::interfaces::config;
use vending_dfa::interfaces::console::{repl, report};
use vending_dfa::interfaces::csv::product_reader::ProductReader;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Automaton definition file
    #[arg(default_value = "config/dfa_config.txt")]
    config: PathBuf,

    /// Product catalog CSV (code,name,price,state_key). Uses the built-in
    /// catalog when omitted.
    #[arg(long)]
    products: Option<PathBuf>,

    /// Print the transaction summary as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = "error")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let loaded = config::load(&cli.config).into_diagnostic()?;
    for warning in &loaded.warnings {
        eprintln!("Warning: {}", warning);
    }

    let catalog = match &cli.products {
        Some(path) => ProductReader::open(path)
            .into_diagnostic()?
            .into_catalog(|e| eprintln!("Error reading product: {}", e)),
        None => Catalog::default(),
    };

    let engine = VendingEngine::new(loaded.automaton, catalog);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let session = repl::run(&engine, stdin.lock(), &mut out).into_diagnostic()?;

    let summary = session.summary(engine.catalog());
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &summary).into_diagnostic()?;
        writeln!(out).into_diagnostic()?;
    } else {
        report::write_diagram(&mut out, &session).into_diagnostic()?;
        report::write_summary(&mut out, &summary).into_diagnostic()?;
    }

    Ok(())
}
