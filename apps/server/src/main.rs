//! MACD Scanner - Headless Server
//!
//! Polls Bybit spot candles, detects bullish MACD crossovers on high-volume
//! pairs and pushes alerts to Telegram.

mod config;
mod scanner;

use clap::Parser;
use config::ScannerConfig;
use scanner::{ScanSettings, Scanner};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use scanner_alerts::TelegramNotifier;
use scanner_engine::{CrossoverDetector, MacdParams};
use scanner_feeds::{BybitClient, ReqwestTransport};

/// MACD Scanner CLI
#[derive(Parser, Debug)]
#[command(name = "macd-scanner")]
#[command(about = "Bybit spot MACD crossover scanner with Telegram alerts", long_about = None)]
struct Args {
    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Run a single scan pass and exit
    #[arg(long, default_value_t = false)]
    once: bool,
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
    }
}

fn print_banner(config: &ScannerConfig) {
    info!("📈 MACD Scanner starting...");
    info!("  Market data: {}", config.market_data_base_url);
    info!("  Interval: {} | Quote: {}", config.interval, config.quote);
    info!(
        "  Min volume: {} {} ({:?})",
        config.min_volume_usd, config.quote, config.volume_basis
    );
    info!(
        "  Cadence: {}s | Kline limit: {} | Symbol pause: {}ms",
        config.scan_cadence.as_secs(),
        config.kline_limit,
        config.symbol_pause.as_millis()
    );

    if config.telegram.bot_token.is_none() {
        warn!("TELEGRAM_TOKEN not set, alerts will only be logged");
    }
    if config.telegram.chat_id.is_none() {
        warn!("TELEGRAM_CHAT_ID not set, alerts will only be logged");
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_logging(&args.log_level);

    let config = match ScannerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    print_banner(&config);

    let transport = match ReqwestTransport::new(&config.market_data_base_url, config.request_timeout) {
        Ok(transport) => transport,
        Err(e) => {
            error!(error = %e, "Failed to create market data client");
            std::process::exit(1);
        }
    };
    let market = BybitClient::new(transport, config.retry.clone(), config.quote);

    let notifier = match TelegramNotifier::new(config.telegram.clone()) {
        Ok(notifier) => notifier,
        Err(e) => {
            error!(error = %e, "Failed to create Telegram client");
            std::process::exit(1);
        }
    };

    let detector = CrossoverDetector::new(config.min_volume_usd, config.volume_basis);
    let settings = ScanSettings {
        interval: config.interval,
        kline_limit: config.kline_limit,
        quote: config.quote,
        macd: MacdParams::default(),
        symbol_pause: config.symbol_pause,
        scan_cadence: config.scan_cadence,
    };
    let mut scanner = Scanner::new(market, notifier, detector, settings);

    if args.once {
        match scanner.run_pass().await {
            Ok(summary) => info!(?summary, "Single pass complete"),
            Err(e) => {
                error!(error = %e, "Single pass failed");
                std::process::exit(1);
            }
        }
        return;
    }

    tokio::select! {
        _ = scanner.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    info!("MACD Scanner stopped");
}
