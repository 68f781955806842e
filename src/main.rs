use anyhow::Result;
use aurum::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount to USD and then to grams of gold
    Convert {
        /// Amount in the source currency
        amount: String,
        /// Source currency code, e.g. EUR
        #[arg(short = 'C', long)]
        currency: Option<String>,
        /// Stop after the USD conversion
        #[arg(long)]
        usd_only: bool,
    },
    /// List the supported currencies
    Currencies,
    /// Start an interactive conversion session
    Interactive,
}

impl From<Commands> for aurum::AppCommand {
    fn from(cmd: Commands) -> aurum::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                currency,
                usd_only,
            } => aurum::AppCommand::Convert {
                amount,
                currency,
                usd_only,
            },
            Commands::Currencies => aurum::AppCommand::Currencies,
            Commands::Interactive => aurum::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => aurum::cli::setup::setup_at_path(path),
            None => aurum::cli::setup::setup(),
        },
        Some(cmd) => aurum::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
