//! Thor - command-line entry point

use clap::{error::ErrorKind, Parser};
use colored::*;
use std::process;
use std::sync::Arc;
use thor::{
    cli::{usage_text, Cli, HelpSystem},
    config::{display_config_summary, load_config, EnvManager},
    error::{ErrorReporter, Result},
    logging::LoggerFactory,
    output::{ReportSink, StdoutSink},
    Config, Coordinator, HttpClient, NetworkClient, PKG_NAME, VERSION,
};

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let progname = progname();

    // THOR_* defaults may come from .env, so load it before parsing
    if let Err(e) = EnvManager::load_env_file() {
        ErrorReporter::default().report_error(&e);
        process::exit(e.exit_code());
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            print!("{}", HelpSystem::new(progname.as_str()).display_main_help(false));
            process::exit(0);
        }
        Err(e) => {
            if let Some(reason) = e.to_string().lines().next() {
                eprintln!("{}", reason);
            }
            print!("{}", usage_text(&progname));
            process::exit(1);
        }
    };

    let reporter = ErrorReporter::new(cli.use_colors(), cli.debug);

    for warning in EnvManager::validate_current_env() {
        if reporter.use_color {
            eprintln!("{}", warning.yellow());
        } else {
            eprintln!("{}", warning);
        }
    }

    let config = match load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            reporter.report_error(&e);
            print!("{}", usage_text(&progname));
            process::exit(1);
        }
    };

    if let Err(e) = run_application(config).await {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}

/// Run the load test described by `config`
async fn run_application(config: Config) -> Result<()> {
    let factory = LoggerFactory::new(config.clone());
    let logger = Arc::new(factory.create_logger("thor")?);

    if config.debug {
        thor::log_debug!(logger, "{} v{} session {}", PKG_NAME, VERSION, factory.session_id());
        for line in display_config_summary(&config).lines() {
            thor::log_debug!(logger, "{}", line);
        }
    }

    let client: Arc<dyn HttpClient> = Arc::new(NetworkClient::with_timeout(config.timeout())?);
    let sink: Arc<dyn ReportSink> = Arc::new(StdoutSink::new());

    let mut coordinator = Coordinator::new(config, client, sink).with_logger(logger);
    coordinator.run().await?;

    Ok(())
}

/// Base name of the running executable
fn progname() -> String {
    std::env::args()
        .next()
        .as_deref()
        .map(std::path::Path::new)
        .and_then(|path| path.file_name())
        .and_then(|name| name.to_str())
        .map(String::from)
        .unwrap_or_else(|| PKG_NAME.to_string())
}
