use tokio_util::sync::CancellationToken;
use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    cli::Cli,
    client::{ClientConfig, GithubApi},
    config::{ActivityConfig, default_config_path, load_config},
    digest::EventsDigest,
    logging::{LoggingConfig, init_logging},
    result::{ActivityError, Result},
};

pub struct AppComponents {
    pub api: GithubApi,
    pub cancel: CancellationToken,
    pub _log_guard: Option<WorkerGuard>,
}

pub fn initialize_app(cli: &Cli) -> Result<AppComponents> {
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = load_config(&config_path)?;

    let log_guard = initialize_logging(&config)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        "gh-activity starting up"
    );

    let api = create_github_api(cli, config)?;

    Ok(AppComponents {
        api,
        cancel: CancellationToken::new(),
        _log_guard: log_guard,
    })
}

/// Fetch the user's events and summarize them
///
/// Ctrl-C cancels whatever request or pacing wait is in flight.
pub async fn run(cli: &Cli) -> Result<EventsDigest> {
    let AppComponents { mut api, cancel, _log_guard } = initialize_app(cli)?;

    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, cancelling request");
                cancel.cancel();
            }
        })
    };

    let events = api.get_user_events(&cancel, &cli.username).await;
    ctrl_c.abort();

    let events = events?;
    tracing::info!(event_count = events.len(), user = %cli.username, "Fetched activity");

    Ok(EventsDigest::from_events(&events)?)
}

fn initialize_logging(config: &ActivityConfig) -> Result<Option<WorkerGuard>> {
    let mut logging_config = LoggingConfig::from_env();

    // Override with config if specified
    if let Some(log_level) = &config.log_level {
        if let Ok(level) = log_level.parse() {
            logging_config.file_level = level;
        }

        // Disable file logging if set to "Off"
        if log_level.eq_ignore_ascii_case("off") {
            logging_config.log_dir = None;
        }
    }

    init_logging(logging_config).map_err(|e| ActivityError::Logging(e.into()))
}

fn create_github_api(cli: &Cli, config: ActivityConfig) -> Result<GithubApi> {
    let mut client_config = ClientConfig::from(config).with_debug_logging(cli.debug);
    if let Some(base_url) = &cli.base_url {
        client_config = client_config.with_base_url(base_url.as_str());
    }

    Ok(GithubApi::new(client_config)?)
}
