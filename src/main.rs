use anyhow::Context;
use clap::Parser;
use opsgenie_relay::cli::{self, Cli, Commands};
use opsgenie_relay::config::{AppConfig, LoggingConfig};
use opsgenie_relay::{relay_events, AlertApp, AlertProfile, HostInfo};
use tokio::io::{AsyncBufRead, BufReader};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(&cli.config_dir)
        .with_context(|| format!("loading configuration from {}", cli.config_dir.display()))?;

    match cli.command {
        Commands::Run { input } => {
            init_logging(&config.logging);
            run_relay(&config, &input).await?;
        }
        Commands::Check => {
            init_logging_simple();
            let host = HostInfo::new(config.host.name.clone(), config.host.base_uri.clone());
            let profile = AlertProfile::from_settings(&config.alert, host)?;
            println!("{}", cli::format_profile(&profile));
            if config.alert.api_key.is_empty() {
                anyhow::bail!("alert.api_key is not set (OPSGENIE_RELAY__ALERT__API_KEY)");
            }
        }
    }

    Ok(())
}

async fn run_relay(config: &AppConfig, input: &str) -> anyhow::Result<()> {
    let app = AlertApp::attach(config)?;
    let dispatcher = app.dispatcher();

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = if input == "-" {
        info!("Reading events from stdin");
        Box::new(BufReader::new(tokio::io::stdin()))
    } else {
        info!(input, "Reading events from file");
        let file = tokio::fs::File::open(input)
            .await
            .with_context(|| format!("opening {}", input))?;
        Box::new(BufReader::new(file))
    };

    let result = relay_events(
        dispatcher,
        reader,
        config.relay.max_in_flight,
        shutdown_signal(),
    )
    .await;

    app.detach();
    let stats = result?;
    if stats.failed > 0 {
        error!(failed = stats.failed, "Some alerts were not delivered");
    }
    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if logging.level.eq_ignore_ascii_case("debug") {
            EnvFilter::new("debug,opsgenie_relay=debug,hyper=info,reqwest=info")
        } else {
            EnvFilter::new(&logging.level)
        }
    });

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }
}

fn init_logging_simple() {
    // Minimal logging for CLI commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
