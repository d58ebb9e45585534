use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

mod commands;
mod markdown;

#[derive(Debug, Parser)]
#[command(
    name = "temario",
    version,
    about = "Curation checks for the government-news theme tree"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate structure, required fields and branching of the theme tree
    Validate(ValidateArgs),
    /// Flag sibling themes with semantically redundant descriptions
    Similarity(SimilarityArgs),
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Theme-tree YAML file
    #[arg(long)]
    pub themes: PathBuf,

    /// Curation config overrides (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Write a Markdown report to this path
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SimilarityArgs {
    /// Theme-tree YAML file
    #[arg(long)]
    pub themes: PathBuf,

    /// Curation config overrides (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Similarity threshold override for this run
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Ollama endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Embedding model name
    #[arg(long)]
    pub model: Option<String>,

    /// Embedding cache file (content-hash keyed)
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Skip the embedding cache entirely
    #[arg(long)]
    pub no_cache: bool,

    /// Emit the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Write a Markdown report to this path
    #[arg(long)]
    pub out: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::run_validate(args),
        Commands::Similarity(args) => commands::similarity::run_similarity(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            ExitCode::FAILURE
        }
    }
}
