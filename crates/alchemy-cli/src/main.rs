use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use alchemy_cli::commands::craft::{handle_craft, CraftArgs};
use alchemy_cli::commands::stats::handle_stats;
use alchemy_cli::output::OutputFormat;
use alchemy_lib::{TraversalMode, TraversalOrder};

#[derive(Parser, Debug)]
#[command(author, version, about = "Decompose crafting recipes into their ingredients")]
struct Cli {
    /// Recipe catalog JSON file.
    #[arg(
        long,
        global = true,
        env = "ALCHEMY_CATALOG_PATH",
        default_value = "elements.json"
    )]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show how an element is made, down to terminal elements.
    Craft {
        /// Element name (case-sensitive).
        element: String,
        /// Traversal order: dfs or bfs.
        #[arg(long, default_value = "dfs")]
        order: TraversalOrder,
        /// `one` follows a single random recipe, `all` expands every recipe.
        #[arg(long, default_value = "all")]
        mode: TraversalMode,
        /// Seed for the random recipe choices of `--mode one`.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print element, recipe and edge counts for the catalog.
    Stats {
        /// Print every element with its recipes instead of the counts.
        #[arg(long)]
        dump: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Craft {
            element,
            order,
            mode,
            seed,
            format,
        } => handle_craft(
            &cli.catalog,
            &CraftArgs {
                element,
                order,
                mode,
                seed,
                format,
            },
        ),
        Command::Stats { dump } => handle_stats(&cli.catalog, dump),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
