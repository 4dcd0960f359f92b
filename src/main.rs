use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xrate::cli::setup::setup;
use xrate::core::log::init_logging;

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

impl From<Commands> for xrate::AppCommand {
    fn from(cmd: Commands) -> xrate::AppCommand {
        match cmd {
            Commands::Rate { from, to } => xrate::AppCommand::Rate { from, to },
            Commands::Convert { amount, from, to } => {
                xrate::AppCommand::Convert { amount, from, to }
            }
            Commands::History { from, to, days } => xrate::AppCommand::History { from, to, days },
            Commands::Fees {
                amount,
                from,
                to,
                country,
            } => xrate::AppCommand::Fees {
                amount,
                from,
                to,
                country,
            },
            Commands::Portfolio => xrate::AppCommand::Portfolio,
            Commands::Trends { vs } => xrate::AppCommand::Trends { vs_currency: vs },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the exchange rate between two currencies
    Rate { from: String, to: String },
    /// Convert an amount from one currency to another
    Convert { amount: f64, from: String, to: String },
    /// Show recorded rates for a currency pair
    History {
        from: String,
        to: String,
        /// Number of days to look back
        #[arg(short, long, default_value_t = 7)]
        days: u32,
    },
    /// Estimate taxes and fees for a conversion
    Fees {
        amount: f64,
        from: String,
        to: String,
        /// ISO 3166 alpha-3 country code of the fee schedule
        #[arg(long, default_value = "USA")]
        country: String,
    },
    /// Value configured holdings in the base currency
    Portfolio,
    /// Show prices and 24h change of major crypto assets
    Trends {
        /// Currency to price the assets in
        #[arg(long, default_value = "USD")]
        vs: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => xrate::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
