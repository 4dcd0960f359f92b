pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::currency::{validate_amount, validate_code};
use crate::core::resolver::RateResolver;
use anyhow::Result;
use providers::RateProviders;
use providers::coingecko::CoinGeckoProvider;
use tracing::{debug, info};

/// A resolved subcommand, with codes and amounts as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Rate {
        from: String,
        to: String,
    },
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
    History {
        from: String,
        to: String,
        days: u32,
    },
    Fees {
        amount: f64,
        from: String,
        to: String,
        country: String,
    },
    Portfolio,
    Trends {
        vs_currency: String,
    },
}

/// Wires the rate store and providers described by `config` into a resolver.
pub fn build_resolver(config: &AppConfig) -> Result<RateResolver> {
    let store = store::open_rate_store(config);
    let providers = RateProviders::from_config(&config.providers)?;
    Ok(RateResolver::new(
        store,
        providers.fiat,
        providers.crypto,
        providers.offline,
    ))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xrate starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    let resolver = build_resolver(&config)?;

    match command {
        AppCommand::Rate { from, to } => {
            let (from, to) = (validate_code(&from)?, validate_code(&to)?);
            cli::rate::run(&resolver, &from, &to).await
        }
        AppCommand::Convert { amount, from, to } => {
            let amount = validate_amount(amount)?;
            let (from, to) = (validate_code(&from)?, validate_code(&to)?);
            cli::convert::run(&resolver, amount, &from, &to).await
        }
        AppCommand::History { from, to, days } => {
            let (from, to) = (validate_code(&from)?, validate_code(&to)?);
            cli::history::run(resolver.store().as_ref(), &from, &to, days).await
        }
        AppCommand::Fees {
            amount,
            from,
            to,
            country,
        } => {
            let (from, to) = (validate_code(&from)?, validate_code(&to)?);
            let country_code = country.trim().to_uppercase();
            let quote = cli::fees::FeeQuote {
                amount: validate_amount(amount)?,
                from: &from,
                to: &to,
                country_code: &country_code,
            };
            cli::fees::run(&resolver, &config.fee_schedules, quote).await
        }
        AppCommand::Portfolio => {
            let base_currency = validate_code(&config.base_currency)?;
            cli::portfolio::run(&config.holdings, &resolver, &base_currency).await
        }
        AppCommand::Trends { vs_currency } => {
            let vs_currency = validate_code(&vs_currency)?;
            let coingecko = &config.providers.coingecko;
            if !coingecko.enabled {
                anyhow::bail!("Crypto market data is disabled (providers.coingecko.enabled)");
            }
            let provider = CoinGeckoProvider::from_config(coingecko)?;
            cli::trends::run(&provider, &vs_currency).await
        }
    }
}
