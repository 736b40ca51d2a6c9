use anyhow::{Context, Result};
use cardwise_core::{format_rate, MerchantCategory};
use cardwise_engine::{summarize, ProjectedCard};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser, Debug)]
#[command(name = "cardwise", version, about = "Pick the card that pays the most cashback")]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Wallet file, overriding the one named in the config
    #[arg(long, global = true)]
    wallet: Option<PathBuf>,

    /// Merchant directory file, overriding the one named in the config
    #[arg(long, global = true)]
    merchants: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank the wallet's active cards for a merchant or merchant category
    Recommend {
        /// Merchant category, e.g. coffee, convenience, night_market
        #[arg(long, required_unless_present = "merchant", conflicts_with = "merchant")]
        category: Option<String>,

        /// Merchant name, looked up in the merchant directory
        #[arg(long)]
        merchant: Option<String>,

        /// Spend amount used for the reward projection
        #[arg(long, default_value_t = Decimal::ZERO)]
        amount: Decimal,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List merchant categories and the card categories they map to
    Categories,

    /// Top categories of every card in the wallet
    Summary,

    /// Search the merchant directory by name, address or description
    Merchants {
        /// Text to look for; lists every merchant when left out
        query: Option<String>,

        /// Only merchants in this category
        #[arg(long)]
        category: Option<MerchantCategory>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Recommend {
            category,
            merchant,
            amount,
            json,
        } => {
            anyhow::ensure!(amount >= Decimal::ZERO, "amount must not be negative");
            let category = match (category, merchant) {
                (Some(category), _) => {
                    if category.parse::<MerchantCategory>().is_err() {
                        tracing::warn!("'{category}' is not a known merchant category, using fallback keys only");
                    }
                    category
                }
                (None, Some(name)) => {
                    let directory = config::load_directory(cli.merchants.as_deref(), &config)?;
                    let found = directory.resolve(&name)?;
                    tracing::info!(merchant = %found.name, category = %found.category, "resolved merchant");
                    found.category.as_str().to_string()
                }
                (None, None) => anyhow::bail!("one of --category or --merchant is required"),
            };

            let wallet = config::load_wallet(cli.wallet.as_deref(), &config)?;
            let cards = wallet.snapshot();
            let projected = config.engine.project(&cards, &category, amount);

            if json {
                let out = serde_json::to_string_pretty(&projected).context("serialize ranking")?;
                println!("{out}");
            } else {
                print_ranking(&category, amount, &projected);
            }
        }

        Command::Categories => {
            for (merchant, candidates) in config.engine.mapping.iter() {
                println!("{merchant:<14} {}", candidates.join(" > "));
            }
            let fallback: Vec<&str> = config.engine.fallback_keys.iter().collect();
            println!("{:<14} {}", "(fallback)", fallback.join(" > "));
        }

        Command::Summary => {
            let wallet = config::load_wallet(cli.wallet.as_deref(), &config)?;
            let stats = wallet.stats();
            println!("{} cards, {} active\n", stats.total, stats.active);
            for card in wallet.cards() {
                let marker = if card.is_active { "*" } else { " " };
                println!(
                    "{marker} {} {} | {}",
                    card.bank_name,
                    card.card_name,
                    summarize(&card.cashback)
                );
            }
        }

        Command::Merchants { query, category } => {
            let directory = config::load_directory(cli.merchants.as_deref(), &config)?;
            let hits = directory.search(query.as_deref().unwrap_or(""), category);
            if hits.is_empty() {
                println!("No merchants found.");
            }
            for m in hits {
                println!("{:<24} {:<12} {}", m.name, m.category.label(), m.address);
            }
        }
    }

    Ok(())
}

fn print_ranking(category: &str, amount: Decimal, projected: &[ProjectedCard<'_>]) {
    if projected.is_empty() {
        println!("No active cards in the wallet.");
        return;
    }

    println!("{} cards for '{category}'\n", projected.len());
    for (i, p) in projected.iter().enumerate() {
        let r = &p.ranked;
        let badge = if r.is_recommended { " [best]" } else { "" };
        println!(
            "{}. {} {}{badge}",
            i + 1,
            r.card.bank_name,
            r.card.card_name
        );
        if r.matched_category.is_empty() {
            println!("   {}", format_rate(r.cashback_rate));
        } else {
            println!(
                "   {} via {} ({})",
                format_rate(r.cashback_rate),
                r.matched_category,
                r.match_type
            );
        }
        if !amount.is_zero() {
            let capped = if p.projection.capped { " (capped)" } else { "" };
            println!("   spend {amount} -> {} points{capped}", p.projection.points);
        }
        if let Some(note) = r.category_note {
            println!("   note: {note}");
        }
        if let Some(limit) = r.category_limit {
            println!("   limit: {limit} points per month");
        }
    }
}
