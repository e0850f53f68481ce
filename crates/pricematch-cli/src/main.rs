mod compare;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pricematch_core::GroupingMode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pricematch")]
#[command(about = "Compare grocery prices across retailers, accounting for pack size")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reconcile exported listings for one or more queries
    Compare {
        /// JSON array of `{source, query, name, price, raw_quantity}` rows
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Skip the model-backed suggester and intent filter
        #[arg(long)]
        no_assist: bool,
        /// Override `PRICEMATCH_GROUPING`
        #[arg(long, value_enum)]
        grouping: Option<GroupingArg>,
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Show how a packaging string is parsed, normalized and bucketed
    Quantity { text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GroupingArg {
    Pairs,
    Buckets,
}

impl From<GroupingArg> for GroupingMode {
    fn from(arg: GroupingArg) -> Self {
        match arg {
            GroupingArg::Pairs => GroupingMode::Pairs,
            GroupingArg::Buckets => GroupingMode::Buckets,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = pricematch_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Compare {
            input,
            format,
            no_assist,
            grouping,
            queries,
        } => {
            let args = compare::CompareArgs {
                input,
                format,
                no_assist,
                grouping: grouping.map(GroupingMode::from),
                queries,
            };
            compare::run_compare(&config, &args).await?;
        }
        Commands::Quantity { text } => print!("{}", render::render_quantity(&text)),
    }

    Ok(())
}
