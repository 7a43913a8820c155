//! config-store: inspect and watch a directory of configuration sections.
//!
//! Each `<section>.toml` file in the directory is one raw bundle for the
//! revision store (`config-network.toml`, `config-logging.toml`, ...).

use std::error::Error;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use config_store::config::loader::load_dir;
use config_store::config::{FileWatcher, LoggingConfig};
use config_store::observability::{logging, metrics};
use config_store::revision::{self, STORE_NAME};
use config_store::store::Section;

#[derive(Parser)]
#[command(name = "config-store")]
#[command(about = "Typed snapshot store for per-section configuration files", long_about = None)]
struct Cli {
    /// Emit logs as JSON.
    #[arg(long, global = true, env = "CONFIG_STORE_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every section file once and print the snapshot as JSON
    Dump {
        #[arg(short, long, env = "CONFIG_STORE_DIR")]
        dir: PathBuf,
    },
    /// Parse every section file and report failures
    Check {
        #[arg(short, long, env = "CONFIG_STORE_DIR")]
        dir: PathBuf,
    },
    /// Keep the store in sync with the directory until interrupted
    Watch {
        #[arg(short, long, env = "CONFIG_STORE_DIR")]
        dir: PathBuf,

        /// Serve Prometheus metrics on this address.
        #[arg(long, env = "CONFIG_STORE_METRICS_ADDRESS")]
        metrics_address: Option<SocketAddr>,

        /// Fallback poll interval when native file events are unavailable.
        #[arg(long, default_value = "2s", value_parser = humantime::parse_duration)]
        poll_interval: Duration,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let log_handle = logging::init(cli.json_logs);

    match cli.command {
        Commands::Dump { dir } => {
            let store = revision::new_store()?;
            let failures = load_into(&store, &dir)?;
            println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
            Ok(exit_code(failures))
        }
        Commands::Check { dir } => {
            let store = revision::new_store()?;
            let failures = load_into(&store, &dir)?;
            for (name, status) in store.statuses() {
                if status.updates == 0 {
                    println!("missing {}", name);
                }
            }
            Ok(exit_code(failures))
        }
        Commands::Watch {
            dir,
            metrics_address,
            poll_interval,
        } => {
            if let Some(addr) = metrics_address {
                metrics::init_metrics(addr)?;
            }

            let store = Arc::new(
                revision::Store::builder(STORE_NAME)
                    .on_section(LoggingConfig::NAME, move |update| {
                        if let Some(config) = update.value::<LoggingConfig>() {
                            log_handle.apply(config)?;
                        }
                        Ok(())
                    })
                    .on_after_store(|update| {
                        tracing::debug!(update = ?update, "Section installed");
                        Ok(())
                    })
                    .build()?,
            );

            let mut watcher = FileWatcher::new(&dir).with_poll_interval(poll_interval);
            store.watch_configs(&mut watcher);
            let handle = watcher.start()?;

            if !store.is_ready() {
                tracing::warn!(missing = ?store.missing_sections(), "Some sections have no value yet");
            }

            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutdown signal received");
            handle.stop().await;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Apply every section file in `dir`, printing one line per file.
/// Returns the number of files that failed.
fn load_into(store: &revision::Store, dir: &Path) -> std::io::Result<usize> {
    let mut failures = 0;
    for (path, loaded) in load_dir(dir)? {
        let result = loaded
            .map_err(|e| e.to_string())
            .and_then(|update| store.apply_update(&update).map_err(|e| e.to_string()));
        match result {
            Ok(report) => eprintln!("ok   {} ({})", report.section, path.display()),
            Err(e) => {
                failures += 1;
                eprintln!("FAIL {}: {}", path.display(), e);
            }
        }
    }
    Ok(failures)
}

fn exit_code(failures: usize) -> ExitCode {
    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
