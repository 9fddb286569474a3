//! ATEMS scan station
//!
//! Runs a check-in/out terminal on stdin (keyboard-wedge barcode scanners
//! type the code followed by Enter) and offers one-shot commands for the
//! inventory statistics, the activity history and backend health.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use atems_core::{
    Condition, Config, Error, HistoryEvent, Notice, Result, Stats, checkinout,
    config::LogFormat,
    query::{QueryPolicy, fetch_with_retry},
};
use atems_station::{ApiClient, ScanReport, ScanStation, StationCommand, command::HELP};
use clap::{Parser, Subcommand};
use std::{fmt::Write as _, path::PathBuf, process::ExitCode};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    signal,
};
use tracing::{error, info, warn};

/// Command line interface for the ATEMS scan station
#[derive(Parser)]
#[command(
    name = "atems-station",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scan station and command-line client for ATEMS tool check-in/out",
    long_about = "Reads tool and badge scans from a keyboard-wedge scanner, looks up the badge owner, and checks tools in or out against the ATEMS backend."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Backend origin (overrides api.base_url)
    #[arg(long, env = "ATEMS_BASE_URL", value_name = "URL")]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Account used to open a backend session
    #[arg(long, env = "ATEMS_LOGIN_USER", value_name = "USERNAME")]
    login_user: Option<String>,

    /// Password for --login-user
    #[arg(long, env = "ATEMS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Run the scan loop on stdin (default)
    Scan,

    /// Submit one check-in/out
    Submit {
        /// Tool ID, e.g. CONS-HAM-001
        #[arg(short, long)]
        tool: String,

        /// Badge ID of the worker
        #[arg(short, long)]
        badge: String,

        /// Username; looked up from the badge when omitted
        #[arg(short, long)]
        user: Option<String>,

        /// Job or project ID
        #[arg(short, long)]
        job: Option<String>,

        /// Tool condition (Good, Fair, Damaged)
        #[arg(long)]
        condition: Option<String>,
    },

    /// Show inventory statistics
    Stats {
        /// Keep refreshing at the configured poll interval
        #[arg(short, long)]
        watch: bool,
    },

    /// Show recent check-in/out events
    History {
        /// Number of events (1-100)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Check backend health
    Health,

    /// Show the resolved configuration
    Config,
}

/// Main entry point for the scan station
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = atems_core::init_logging(&config.logging) {
        eprintln!("{e}");
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "ATEMS station starting"
    );

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "command failed");
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

/// Load configuration and apply command line overrides
///
/// # Errors
///
/// Returns error if the configuration file cannot be read, parsed or validated
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(base_url) = &cli.base_url {
        config.api.base_url.clone_from(base_url);
    }
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if cli.json {
        config.logging.format = LogFormat::Json;
    }

    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli, config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.api)?;
    let credentials = cli.login_user.zip(cli.password);

    let command = cli.command.unwrap_or(Commands::Scan);
    if !matches!(command, Commands::Health | Commands::Config)
        && let Some((username, password)) = &credentials
    {
        client.login(username, password).await?;
        info!(username, "backend session opened");
    }

    match command {
        Commands::Scan => run_scan_loop(client, config, credentials.as_ref()).await,
        Commands::Submit {
            tool,
            badge,
            user,
            job,
            condition,
        } => {
            submit_once(
                client,
                config,
                SubmitArgs {
                    tool,
                    badge,
                    user,
                    job,
                    condition,
                },
            )
            .await
        }
        Commands::Stats { watch } => {
            if watch {
                watch_stats(&client, config).await
            } else {
                show_stats(&client, &QueryPolicy::from(&config.query)).await
            }
        }
        Commands::History { limit } => {
            let limit = limit.unwrap_or(config.dashboard.history_limit);
            show_history(&client, limit).await
        }
        Commands::Health => show_health(&client).await,
        Commands::Config => show_config(config),
    }
}

/// Read scans and commands from stdin until EOF, `:quit` or Ctrl+C
///
/// # Errors
///
/// Returns error if stdin cannot be read
async fn run_scan_loop(
    client: ApiClient,
    config: &Config,
    credentials: Option<&(String, String)>,
) -> Result<()> {
    let mut station = ScanStation::new(client, &config.scanner);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!(
        delay_ms = config.scanner.auto_submit_delay_ms,
        "Scan station ready. Press Ctrl+C to stop."
    );
    println!("{}", station.session().prompt());

    loop {
        let line = tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
                break;
            }
            line = lines.next_line() => line
                .map_err(|e| Error::Other(format!("Failed to read input: {e}")))?,
        };
        let Some(line) = line else {
            info!("Input closed, shutting down");
            break;
        };

        let command = match StationCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                print_error(&e);
                continue;
            }
        };

        let result = match command {
            StationCommand::Quit => break,
            StationCommand::Scan(value) => station.handle_scan(&value).await.map(|report| {
                print_report(&report);
            }),
            StationCommand::Submit => station.submit().await.map(|notice| print_notice(&notice)),
            StationCommand::Clear => {
                station.reset();
                Ok(())
            }
            StationCommand::User(username) => {
                station.session_mut().set_username(username);
                Ok(())
            }
            StationCommand::Job(job_id) => {
                station.session_mut().set_job_id(job_id);
                Ok(())
            }
            StationCommand::Condition(condition) => {
                station.session_mut().set_condition(condition);
                Ok(())
            }
            StationCommand::Show => {
                print_session(&station);
                Ok(())
            }
            StationCommand::Help => {
                println!("{HELP}");
                Ok(())
            }
        };

        if let Err(error) = result {
            handle_loop_error(station.backend(), &error, credentials).await;
        }
        println!("{}", station.session().prompt());
    }

    Ok(())
}

/// Report a failed scan or submission; a lost session is reopened when
/// credentials are at hand
async fn handle_loop_error(
    client: &ApiClient,
    error: &Error,
    credentials: Option<&(String, String)>,
) {
    let Some(login_url) = error.login_url() else {
        print_error(error);
        return;
    };

    match credentials {
        Some((username, password)) => {
            warn!("backend session expired, logging in again");
            match client.login(username, password).await {
                Ok(()) => println!("Session renewed, scan again."),
                Err(e) => print_error(&e),
            }
        }
        None => println!(
            "Not logged in. Log in at {}{login_url} or pass --login-user.",
            client.base_url()
        ),
    }
}

struct SubmitArgs {
    tool: String,
    badge: String,
    user: Option<String>,
    job: Option<String>,
    condition: Option<String>,
}

/// Submit one check-in/out from command line arguments
///
/// # Errors
///
/// Returns error if validation fails, the session is missing, or the
/// backend rejects the submission
async fn submit_once(client: ApiClient, config: &Config, args: SubmitArgs) -> Result<()> {
    let condition = args
        .condition
        .as_deref()
        .map(Condition::parse_optional)
        .transpose()?
        .flatten();

    let username = match args.user {
        Some(user) => user,
        None => client
            .lookup_user(args.badge.trim())
            .await?
            .ok_or_else(|| {
                Error::validation(
                    "username",
                    format!("No user registered for badge {}", args.badge.trim()),
                )
            })?,
    };

    let mut station = ScanStation::new(client, &config.scanner);
    let session = station.session_mut();
    session.set_tool_id(args.tool.trim());
    session.set_badge_id(args.badge.trim());
    session.set_username(username);
    session.set_job_id(args.job.unwrap_or_default());
    session.set_condition(condition);

    let notice = station.submit().await?;
    print_notice(&notice);

    if notice.tone == atems_core::Tone::Error {
        return Err(Error::Other(notice.text));
    }
    Ok(())
}

/// Print inventory statistics once
///
/// # Errors
///
/// Returns error if the statistics cannot be fetched
async fn show_stats(client: &ApiClient, policy: &QueryPolicy) -> Result<()> {
    let stats = fetch_with_retry(policy, || client.get_stats()).await?;
    print_stats(&stats);
    Ok(())
}

/// Refresh statistics at the configured interval until Ctrl+C
///
/// # Errors
///
/// Returns error if the backend session is missing
async fn watch_stats(client: &ApiClient, config: &Config) -> Result<()> {
    let policy = QueryPolicy::from(&config.query);
    let mut interval = tokio::time::interval(config.dashboard.poll_interval());

    info!(
        interval_secs = config.dashboard.poll_interval_secs,
        "Watching statistics. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, stopping");
                return Ok(());
            }
            _ = interval.tick() => {
                match fetch_with_retry(&policy, || client.get_stats()).await {
                    Ok(stats) => print_stats(&stats),
                    Err(e) if e.is_unauthorized() => return Err(e),
                    Err(e) => {
                        warn!(error = %e, "statistics refresh failed");
                        println!("Failed to load stats: {e}");
                    }
                }
            }
        }
    }
}

/// Print the latest check-in/out events
///
/// # Errors
///
/// Returns error if the history cannot be fetched
async fn show_history(client: &ApiClient, limit: u32) -> Result<()> {
    let page = client.get_history(limit).await?;
    if page.events.is_empty() {
        println!("No recent activity.");
        return Ok(());
    }
    for event in &page.events {
        println!("{}", history_line(event));
    }
    Ok(())
}

/// Check backend health
///
/// # Errors
///
/// Returns error if the backend is unreachable or unhealthy
async fn show_health(client: &ApiClient) -> Result<()> {
    let health = client.health().await?;
    println!(
        "{} {}",
        health.service.as_deref().unwrap_or("ATEMS"),
        health.status
    );
    if health.is_healthy() {
        Ok(())
    } else {
        Err(Error::Other(format!("Backend reports {}", health.status)))
    }
}

/// Show configuration as JSON
///
/// # Errors
///
/// Returns error if configuration cannot be serialized
fn show_config(config: &Config) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn print_report(report: &ScanReport) {
    if let Some(username) = &report.username {
        println!("User: {username}");
    }
    if let Some(notice) = &report.submission {
        print_notice(notice);
    }
}

fn print_notice(notice: &Notice) {
    println!("[{}] {}", notice.tone.label(), notice.text);
}

fn print_error(error: &Error) {
    let notice = Notice::from_error(error)
        .unwrap_or_else(|| Notice::error(checkinout::GENERIC_ERROR_MESSAGE));
    print_notice(&notice);
}

fn print_session(station: &ScanStation<ApiClient>) {
    let session = station.session();
    println!("Tool:      {}", session.tool_id());
    println!("Badge:     {}", session.badge_id());
    println!("Username:  {}", session.username());
    println!("Job:       {}", session.job_id());
    println!(
        "Condition: {}",
        session.condition().map(Condition::as_str).unwrap_or_default()
    );
}

fn print_stats(stats: &Stats) {
    println!("Total tools:          {}", stats.total_tools);
    println!("In stock:             {}", stats.in_stock);
    println!("Checked out:          {}", stats.checked_out);
    println!("Calibrated tools:     {}", stats.calibrated_tools);
    println!("Calibration overdue:  {}", stats.calibration_overdue);
}

fn history_line(event: &HistoryEvent) -> String {
    let mut line = format!(
        "{:<16}  {:<8}  {}  {}",
        event.time_label(),
        event.action,
        event.tool_label(),
        event.username
    );
    if let Some(job_id) = &event.job_id {
        let _ = write!(line, "  job {job_id}");
    }
    if let Some(condition) = &event.condition {
        let _ = write!(line, "  ({condition})");
    }
    line
}
