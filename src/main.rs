//! VYRE — friendly predictions with pari-mutuel settlement.
//!
//! Entry point. Loads configuration, initialises structured logging, and
//! runs one command: live odds, settlement, invite codes, or a payment
//! hand-off.

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::{info, warn};

use vyre::config::AppConfig;
use vyre::group::InviteCodeGenerator;
use vyre::input::load_stakes;
use vyre::payments::{self, LaunchOutcome, LinkOpener, PaymentError, PaymentLauncher, PaymentRail, PaymentRequest};
use vyre::settlement;
use vyre::types::{SettlementError, Side};

const BANNER: &str = r#"
__     ____   ______  _____
\ \   / /\ \ / /  _ \| ____|
 \ \ / /  \ V /| |_) |  _|
  \ V /    | | |  _ <| |___
   \_/     |_| |_| \_\_____|

  Stake it. Call it. Settle it.
"#;

#[derive(Parser)]
#[command(name = "vyre", version, about = "Pari-mutuel settlement for group predictions")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show live pool totals and odds for a stakes file.
    Odds { file: PathBuf },
    /// Settle a stakes file with the given winning side.
    Settle {
        file: PathBuf,
        /// Winning side: "a" or "b".
        #[arg(short, long)]
        winner: String,
        /// Also list payment requests on this rail.
        #[arg(short, long)]
        rail: Option<String>,
        #[arg(short, long, default_value = "VYRE settlement")]
        note: String,
    },
    /// Generate invite codes.
    Invite {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Hand a payment off to a payment app.
    Pay {
        /// venmo | cashapp | zelle (defaults to the configured rail).
        #[arg(short, long)]
        rail: Option<String>,
        #[arg(short, long)]
        to: String,
        #[arg(short, long)]
        amount: Decimal,
        #[arg(short, long, default_value = "")]
        note: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    init_logging();

    let cfg = AppConfig::load_or_default(&cli.config)?;

    println!("{BANNER}");
    info!(app = %cfg.app.name, currency = %cfg.app.currency, "VYRE starting up");

    match cli.command {
        Command::Odds { file } => {
            let stakes = load_stakes(&file)?;
            let stats = settlement::aggregate(&stakes);
            println!("{} stakes", stakes.len());
            println!("{stats}");
        }
        Command::Settle {
            file,
            winner,
            rail,
            note,
        } => {
            let stakes = load_stakes(&file)?;
            let side: Side = winner.parse()?;
            match settlement::distribute(&stakes, side) {
                Ok(s) => {
                    print!("{s}");
                    for transfer in s.transfers() {
                        println!("  {transfer}");
                    }
                    if let Some(rail) = rail {
                        let rail: PaymentRail = rail.parse()?;
                        for (transfer, request) in payments::requests_for(&s, rail, &note)? {
                            println!("  {} -> {request}", transfer.from_name);
                        }
                    }
                }
                Err(SettlementError::NoWinners { side }) => {
                    warn!(%side, "Nobody backed the winning side");
                    println!("Nobody staked on side {side}: no winners to pay. Refund every stake instead.");
                }
                Err(e) => return Err(e).context("Settlement failed"),
            }
        }
        Command::Invite { count } => {
            let codes = InviteCodeGenerator::from_config(&cfg.invite);
            for _ in 0..count {
                println!("{}", codes.generate());
            }
        }
        Command::Pay {
            rail,
            to,
            amount,
            note,
        } => {
            let rail = match rail {
                Some(r) => r.parse::<PaymentRail>()?,
                None => cfg.payments.default_rail,
            };
            let request = PaymentRequest::new(rail, to, amount, note)?;
            let launcher = PaymentLauncher::from_config(ConsoleOpener, &cfg.payments);
            match launcher.launch(&request).await? {
                LaunchOutcome::OpenedApp { deep_link } => println!("Opened {deep_link}"),
                LaunchOutcome::FellBackToWeb { web_url, .. } => println!("Web fallback: {web_url}"),
                LaunchOutcome::CopiedToClipboard { message, .. } => println!("{message}"),
            }
        }
    }

    Ok(())
}

/// Terminal stand-in for a browser: prints links instead of following
/// them. A terminal never loses focus, so the web fallback always shows.
struct ConsoleOpener;

#[async_trait]
impl LinkOpener for ConsoleOpener {
    async fn open(&self, url: &str) -> Result<(), PaymentError> {
        println!("-> {url}");
        Ok(())
    }

    fn still_focused(&self) -> bool {
        true
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), PaymentError> {
        println!("[clipboard] {text}");
        Ok(())
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vyre=info"));

    let json_logging = std::env::var("VYRE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
