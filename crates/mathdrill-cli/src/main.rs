//! mathdrill CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mathdrill", version, about = "Mental math practice in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Practice problems interactively on stdin
    Practice {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Random seed, for a reproducible session
        #[arg(long)]
        seed: Option<u64>,

        /// Suppliers to drill (comma-separated, default: from config)
        #[arg(long, value_delimiter = ',')]
        suppliers: Vec<String>,

        /// Summary format at the end: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print generated problems with their answers
    Sample {
        /// Number of problems
        #[arg(long, default_value = "5")]
        count: usize,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Only sample from this supplier
        #[arg(long)]
        supplier: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List suppliers and their settings
    List {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Evaluate an arithmetic expression
    Eval {
        /// Expression, e.g. "3/4 * (2 + 1/3)"
        expr: String,
    },

    /// Create a starter mathdrill.toml
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mathdrill=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Practice {
            config,
            seed,
            suppliers,
            format,
        } => commands::practice::execute(config, seed, suppliers, format),
        Commands::Sample {
            count,
            seed,
            supplier,
            format,
            config,
        } => commands::sample::execute(count, seed, supplier, format, config),
        Commands::List { config } => commands::list::execute(config),
        Commands::Eval { expr } => commands::eval::execute(expr),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
