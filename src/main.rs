// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{error, Level, LevelFilter, Log, Metadata, Record};

use echopath::app_config::Config;
use echopath::app_controller::Controller;
use echopath::dispatch::log_result;
use echopath::history::SqliteHistorySink;

/// Minimal stderr logger for the CLI
struct CliLogger;

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let prefix = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        eprintln!("[{}] {}", prefix, record.args());
    }

    fn flush(&self) {}
}

static LOGGER: CliLogger = CliLogger;

fn init_logger(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[derive(Parser, Debug)]
#[command(name = "echopath", about = "Translation core for the EchoPath service", version)]
struct Cli {
    /// Path to a config file (defaults to the per-user location)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate text through the dispatch chain
    Translate {
        /// Text to translate
        text: String,

        /// Source language short code, or "auto"
        #[arg(short, long, default_value = "auto")]
        source: String,

        /// Target language short code
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Show recent translation history
    History {
        /// Maximum records to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Write a default config file
    InitConfig,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_or_default(),
    };
    init_logger(config.log_level.to_level_filter());

    match cli.command {
        Commands::Translate { text, source, target } => {
            let target = target.unwrap_or_else(|| config.target_language.clone());

            // The CLI has no injected model provider, so dispatch runs on
            // the cloud tier; embedders wire the neural engine in
            let controller = Controller::new(config)?;
            if controller.config().neural.preload {
                controller.warmup().await?;
            }
            let result = controller.translate(&text, &source, &target).await?;
            log_result(&result);

            println!("{}", result.translated_text);
            if let Some(romanized) = &result.romanized_text {
                println!("({})", romanized);
            }
            if result.degraded {
                eprintln!("note: produced by the fallback backend");
            }
        }

        Commands::History { limit } => {
            let sink = SqliteHistorySink::open_default()?;
            for record in sink.recent(limit)? {
                println!(
                    "{} {} -> {} [{}{}] {}",
                    record.created_at,
                    record.source_tag,
                    record.target_tag,
                    record.backend,
                    if record.degraded { ", degraded" } else { "" },
                    record.translated_text
                );
            }
        }

        Commands::InitConfig => {
            let path = Config::default_path()
                .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;
            Config::default().to_file(&path)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
