//! Contract Check CLI
//!
//! Validates a contract document against an implementation type catalog.
//!
//! Usage:
//!   contract-check --contract api/swagger.yaml --metadata api/catalog.yaml all
//!   contract-check --contract api/swagger.json --metadata catalog.toml --format json resources
//!
//! Exit codes: 0 valid (warnings allowed), 1 validation failure, 2 load or
//! configuration error.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use contract_drift::{ContractDocument, ContractError, TypeCatalog, ValidationEngine, ValidatorConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "contract-check")]
#[command(about = "Check an OpenAPI/Swagger contract against implementation metadata")]
struct Cli {
    /// Contract document (.yaml/.yml or .json)
    #[arg(short, long)]
    contract: PathBuf,

    /// Implementation type catalog (.yaml/.yml, .json or .toml)
    #[arg(short, long)]
    metadata: PathBuf,

    /// Configuration file (defaults to contract-check.toml lookup)
    #[arg(long)]
    config: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Validate the definitions section and its references
    Definitions,
    /// Validate the paths section
    Resources,
    /// Validate definitions, then paths
    All,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = ValidatorConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    let document = ContractDocument::load(&cli.contract)
        .with_context(|| format!("loading contract {}", cli.contract.display()))?;
    let catalog = TypeCatalog::load(&cli.metadata)
        .with_context(|| format!("loading type catalog {}", cli.metadata.display()))?;

    let mut engine = ValidationEngine::with_config(document, catalog, config);

    let result = match cli.command {
        Commands::Definitions => engine.validate_definitions(),
        Commands::Resources => engine.validate_resources(),
        Commands::All => engine.validate_all(),
    };

    let failure = match result {
        Ok(()) => None,
        Err(e) if e.is_validation() => Some(e),
        Err(e) => return Err(e.into()),
    };

    match cli.format.as_str() {
        "json" => print_json_report(&engine, failure.as_ref())?,
        _ => print_text_report(&engine, failure.as_ref()),
    }

    Ok(if failure.is_some() { 1 } else { 0 })
}

fn print_text_report(engine: &ValidationEngine<TypeCatalog>, failure: Option<&ContractError>) {
    for warning in engine.warnings() {
        println!("⚠️  [{}] {}", warning.code, warning);
    }

    if let Some(diagnostic) = failure.and_then(ContractError::diagnostic) {
        println!("❌ [{}] {}", diagnostic.code, diagnostic);
    }

    println!();
    println!("{}", engine.summary());

    if failure.is_some() {
        eprintln!("\n❌ Contract does not match the implementation");
    } else {
        eprintln!("\n✅ Contract matches the implementation");
    }
}

fn print_json_report(engine: &ValidationEngine<TypeCatalog>, failure: Option<&ContractError>) -> anyhow::Result<()> {
    let report = serde_json::json!({
        "valid": failure.is_none(),
        "summary": engine.summary(),
        "diagnostics": engine.diagnostics().all(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
