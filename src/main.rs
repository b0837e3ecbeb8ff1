use std::fs::OpenOptions;
use std::process::ExitCode;

use campaign_sheets_sync::adapters::brevo::api_client::BrevoApiClient;
use campaign_sheets_sync::adapters::config::app_config::AppConfig;
use campaign_sheets_sync::adapters::config::logging_config::LoggingConfig;
use campaign_sheets_sync::adapters::config::secrets::Secrets;
use campaign_sheets_sync::adapters::sheets::google_sheets::GoogleSheetsConnector;
use campaign_sheets_sync::application::fetch::campaign_fetcher::CampaignFetcher;
use campaign_sheets_sync::application::publish::campaign_publisher::CampaignPublisher;
use campaign_sheets_sync::application::sync::campaign_sync_routine::CampaignSyncRoutine;
use campaign_sheets_sync::ports::routine::{Routine, RoutineError};
use campaign_sheets_sync::prettyprint::PrettyFormatter;
use error_stack::fmt::ColorMode;
use error_stack::Report;
use indicatif::ProgressStyle;
use tracing::{error, info, warn, Instrument};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

/// How a run ended. Only a run that never got to the pipeline changes the exit status;
/// routine failures are logged and the process still exits zero.
enum RunEnd {
    Aborted,
    Completed {
        routine: String,
        result: error_stack::Result<(), RoutineError>,
    },
}

fn exit_status(end: &RunEnd) -> u8 {
    match end {
        RunEnd::Aborted => 1,
        RunEnd::Completed { .. } => 0,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = AppConfig::load();
    let logging = config
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();

    if let Err(e) = setup_tracing(&logging) {
        eprintln!("Failed to set up logging to '{}': {:?}", logging.file, e);
        return ExitCode::FAILURE;
    }
    setup_panic_hook();

    let end = match config {
        Ok(config) => run(config).await,
        Err(report) => {
            error!("❌ Could not load configuration: {:?}", report);
            RunEnd::Aborted
        }
    };

    if let RunEnd::Completed { routine, result } = &end {
        match result {
            Ok(()) => info!("✅ {}: OK", routine),
            Err(report) => error!("❌ {}: {:?}", routine, report),
        }
        info!("Script finished.");
    }

    ExitCode::from(exit_status(&end))
}

async fn run(config: AppConfig) -> RunEnd {
    info!("Starting Brevo to Google Sheets export");

    let secrets = match Secrets::from_env(&config.secrets) {
        Ok(secrets) => secrets,
        Err(report) => {
            error!("❌ {:?}", report);
            return RunEnd::Aborted;
        }
    };

    let client = match BrevoApiClient::new(
        &*config.brevo.base_url,
        secrets.api_key(),
        config.brevo.request_timeout(),
    ) {
        Ok(client) => client,
        Err(report) => {
            error!("❌ {:?}", report);
            return RunEnd::Aborted;
        }
    };

    let publisher = match secrets.google_credentials_json() {
        Some(credentials_json) => Some(
            CampaignPublisher::new(
                GoogleSheetsConnector::new(config.sheets.clone(), credentials_json),
                &*config.sheets.worksheet_name,
            )
            .with_demo_noise(config.sheets.demo_noise()),
        ),
        None => {
            warn!(
                "Environment variable '{}' is not set. Data will only be logged.",
                config.secrets.credentials_var
            );
            None
        }
    };

    let routine = CampaignSyncRoutine::new(
        CampaignFetcher::new(client, config.brevo.page_size, config.brevo.page_wait()),
        publisher,
    );

    let result = routine
        .run()
        .instrument(tracing::span!(
            tracing::Level::INFO,
            "routine",
            routine = routine.name()
        ))
        .await;

    RunEnd::Completed {
        routine: routine.name().to_owned(),
        result,
    }
}

fn setup_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    // Reports are rendered into the log file too.
    Report::set_color_mode(ColorMode::None);

    let indicatif_layer = IndicatifLayer::new().with_progress_style(ProgressStyle::with_template(
        "{span_child_prefix}{spinner} {span_name} {elapsed} {wide_msg}",
    )?);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(true))
        .with_writer(indicatif_layer.get_stderr_writer());

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&*logging.file)?;

    let log_file_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(false))
        .with_writer(log_file)
        .with_ansi(false);

    Registry::default()
        .with(
            tracing_subscriber::filter::Targets::new()
                .with_target("campaign_sheets_sync", logging.level()),
        )
        .with(indicatif_layer)
        .with(log_file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

fn setup_panic_hook() {
    tracing::trace!("Setting panic hook");
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("panic: {info}");
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use error_stack::report;

    #[test]
    fn test_routine_failures_exit_zero() {
        for result in [
            Ok(()),
            Err(report!(RoutineError::FetchIncomplete { fetched: 2 })),
            Err(report!(RoutineError::PublishFailed)),
        ] {
            let end = RunEnd::Completed {
                routine: "Campaign sync".to_owned(),
                result,
            };
            assert_eq!(exit_status(&end), 0);
        }
    }

    #[test]
    fn test_aborted_run_exits_non_zero() {
        assert_eq!(exit_status(&RunEnd::Aborted), 1);
    }

    #[test]
    fn test_rendered_reports_have_no_ansi_styling() {
        Report::set_color_mode(ColorMode::None);

        let report = report!(RoutineError::PublishFailed).attach_printable("Failed to write");

        assert!(!format!("{report:?}").contains('\x1b'));
    }
}
