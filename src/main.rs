//! Birthday Greeter - Main entry point
//!
//! Runs one daily greeting pass and exits. Exit code 0 means every event was
//! handled, 1 means at least one event failed, 2 means setup failed.

use anyhow::{Context, Result};
use birthday_greeter::calendar::google::{self, AuthConfig, GoogleCalendarClient};
use birthday_greeter::cli::Cli;
use birthday_greeter::clock::run_clock;
use birthday_greeter::{
    CalendarProvider, CalendarSource, Config, ConsoleSender, FileCalendarProvider,
    GoogleCalendarProvider, MessageGenerator, MessageSender, RunDailyGreetings, RunOptions,
    TemplateGenerator,
};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    // Logs go to stderr; stdout carries the run summary and console messages
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        provider = %config.calendar_provider,
        dry_run = config.dry_run,
        max_per_run = config.max_per_run,
        "Configuration loaded"
    );

    let use_case = match build_use_case(&config).await {
        Ok(uc) => uc,
        Err(e) => {
            error!("Setup failed: {:#}", e);
            eprintln!("error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    let res = use_case.run().await;

    println!("Run finished. {}", res.summary_line());

    if !res.errors.is_empty() {
        println!("Errors:");
        for e in &res.errors {
            println!("- {}", e);
        }
    }

    if res.has_failures() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Environment first, then command-line flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env().context("failed to load configuration")?;
    config.apply_cli(cli)?;
    config.validate()?;
    Ok(config)
}

async fn build_use_case(config: &Config) -> Result<RunDailyGreetings> {
    let clock = run_clock(config.date.as_deref(), config.timezone)?;

    let calendar = build_calendar(config).await?;
    let generator =
        Arc::new(TemplateGenerator::new(config.emoji.clone())) as Arc<dyn MessageGenerator>;
    let sender = Arc::new(ConsoleSender::stdout()) as Arc<dyn MessageSender>;

    let options = RunOptions {
        tag: config.tag.clone(),
        max_per_run: config.run_limit(),
        dry_run: config.dry_run,
    };

    Ok(RunDailyGreetings::new(
        calendar, generator, sender, clock, options,
    ))
}

async fn build_calendar(config: &Config) -> Result<Arc<dyn CalendarProvider>> {
    match config.calendar_provider {
        CalendarSource::File => {
            let path = config
                .calendar_file
                .clone()
                .context("--calendar-file is required when --calendar-provider=file")?;
            Ok(Arc::new(FileCalendarProvider::new(path)))
        }
        CalendarSource::Google => {
            let auth = AuthConfig {
                credentials_path: config.google_credentials.clone(),
                token_path: config.google_token.clone(),
            };

            // May prompt on the terminal for the consent code
            let token = tokio::task::spawn_blocking(move || google::auth::authorize(&auth))
                .await
                .context("auth task failed")??;

            let client = GoogleCalendarClient::new(
                config.google_api_url.clone(),
                token.access_token,
                Duration::from_secs(config.request_timeout),
            );

            Ok(Arc::new(GoogleCalendarProvider::new(
                client,
                config.google_calendar.clone(),
                config.timezone,
            )))
        }
    }
}
