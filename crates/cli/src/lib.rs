pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::recommend::Surface;

#[derive(Debug, Parser)]
#[command(
    name = "vitrine",
    about = "Vitrine recommendation engine CLI",
    long_about = "Operate the Vitrine catalog: run migrations, load seed data, and query every recommendation surface.",
    after_help = "Examples:\n  vitrine migrate\n  vitrine seed\n  vitrine recommend 2 --limit 4\n  vitrine trending --limit 8\n  vitrine clear-cache --product-id 2"
)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "vitrine.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations")]
    Migrate,
    #[command(about = "Load the deterministic boutique seed catalog and verify it")]
    Seed,
    #[command(about = "Combined product-page recommendations (similarity + rules + fallbacks)")]
    Recommend {
        product_id: i64,
        #[arg(long, help = "Maximum number of results (defaults to recommender.default_limit)")]
        limit: Option<usize>,
    },
    #[command(about = "Content-similarity recommendations only (memoized)")]
    Similar {
        product_id: i64,
        #[arg(long)]
        limit: Option<usize>,
    },
    #[command(about = "Rule-based recommendations only")]
    Rules {
        product_id: i64,
        #[arg(long)]
        limit: Option<usize>,
    },
    #[command(about = "Featured-then-latest trending rail (no product context)")]
    Trending {
        #[arg(long, help = "Maximum number of results (defaults to recommender.trending_limit)")]
        limit: Option<usize>,
    },
    #[command(about = "Drop one cached recommendation entry, or all of them")]
    ClearCache {
        #[arg(long, help = "Entry to drop; omit to clear the whole cache")]
        product_id: Option<i64>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(&cli.config),
        Command::Seed => commands::seed::run(&cli.config),
        Command::Recommend { product_id, limit } => {
            commands::recommend::run(&cli.config, Surface::Page, Some(product_id), limit)
        }
        Command::Similar { product_id, limit } => {
            commands::recommend::run(&cli.config, Surface::Similarity, Some(product_id), limit)
        }
        Command::Rules { product_id, limit } => {
            commands::recommend::run(&cli.config, Surface::Rules, Some(product_id), limit)
        }
        Command::Trending { limit } => {
            commands::recommend::run(&cli.config, Surface::Trending, None, limit)
        }
        Command::ClearCache { product_id } => {
            commands::clear_cache::run(&cli.config, product_id)
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
