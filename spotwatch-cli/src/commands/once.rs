//! `spotwatch once`: one cycle, printed.

use std::path::Path;

use spotwatch::app::{AppConfig, SpotWatchApp};
use spotwatch::cycle::{CycleOutcome, SubscriberOutcome};

use super::common::{load_config, runtime, start_logging};
use crate::error::CliError;

pub fn run(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let app_config = AppConfig::from_config_file(&config)?;
    let _logging = start_logging()?;

    let outcome = runtime()?.block_on(async {
        let app = SpotWatchApp::start(app_config).await?;
        Ok::<_, CliError>(app.run_once().await)
    })?;

    println!();
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &CycleOutcome) {
    println!("{}", outcome);

    let Some(report) = outcome.report() else {
        return;
    };

    for subscriber in &report.subscribers {
        match subscriber {
            SubscriberOutcome::Reconciled(r) => {
                println!(
                    "  {:<20} +{} -{} ={} (ignored {})",
                    r.subscriber_id,
                    r.entered(),
                    r.exited(),
                    r.retained,
                    r.excluded
                );
                for failure in r.failures() {
                    if let Err(e) = &failure.outcome {
                        println!("    {} {}: {}", failure.kind, failure.object_id, e);
                    }
                }
            }
            SubscriberOutcome::InvalidZone {
                subscriber_id,
                error,
            } => println!("  {:<20} skipped: invalid zone ({})", subscriber_id, error),
            SubscriberOutcome::LoadFailed {
                subscriber_id,
                error,
            } => println!("  {:<20} skipped: {}", subscriber_id, error),
        }
    }
}
