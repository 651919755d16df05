//! Athena - interactive and batch console for AWS Athena.

use std::process::ExitCode;
use std::sync::Arc;

use athena_cli::batch::run_batch;
use athena_cli::cli::Cli;
use athena_cli::config::Config;
use athena_cli::error::Result;
use athena_cli::gateway::AthenaGateway;
use athena_cli::interrupt::Interrupts;
use athena_cli::logging::{self, LogHandle};
use athena_cli::output::OutputFormat;
use athena_cli::query::ControllerSettings;
use athena_cli::session::Session;
use athena_cli::shell::Shell;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let log = match logging::init_logging(cli.debug, cli.log_file.as_deref()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: {e}");
            None
        }
    };

    match run(cli, log).await {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            error!(category = e.category(), "{e}");
            eprintln!("{}: {}", e.category(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, log: Option<LogHandle>) -> Result<u8> {
    let interrupts = Interrupts::install();

    // Precedence: CLI arguments, then the config file, then the environment.
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.session.merge(&cli.to_session_config());
    config.apply_env_defaults();

    let session_config = &config.session;
    let gateway = AthenaGateway::connect(
        session_config.profile.as_deref(),
        session_config.region.as_deref(),
    )
    .await?;
    let result_location = match session_config.result_location_url()? {
        Some(url) => url,
        None => {
            gateway
                .default_result_location(session_config.profile.as_deref())
                .await?
        }
    };
    info!(%result_location, "Using result location");

    let batch_statement = cli.batch_statement();
    let format = session_config.output_format.unwrap_or_else(|| {
        if batch_statement.is_some() {
            OutputFormat::batch_default()
        } else {
            OutputFormat::shell_default()
        }
    });
    let settings = ControllerSettings {
        result_location: Some(result_location),
        encrypted: session_config.encryption,
        debug: cli.debug,
        ..Default::default()
    };

    let mut session = Session::new(
        Arc::new(gateway),
        settings,
        session_config.schema().map(String::from),
        format,
    );
    if let Some(log) = log {
        session = session.with_log_handle(log);
    }

    match batch_statement {
        Some(sql) => {
            let outcome = run_batch(
                &session,
                sql,
                &interrupts.arm(),
                &mut std::io::stdout().lock(),
                &mut std::io::stderr(),
            )
            .await?;
            Ok(outcome.exit_status())
        }
        None => {
            let mut shell = Shell::new(session, &config.shell, interrupts)?;
            shell.run().await?;
            Ok(0)
        }
    }
}
