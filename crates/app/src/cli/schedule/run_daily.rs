use std::sync::Arc;

use clap::{Args, ValueEnum};
use condo_app::domain::{
    associations::records::AssociationUuid,
    schedules::{DailyDriver, DriverReport, RuleRef, SchedulesService},
};
use jiff::{Zoned, civil::Date};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub(crate) struct RunDailyArgs {
    /// Application-role PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Only run this association; every association runs when omitted
    #[arg(long)]
    association: Option<Uuid>,

    /// Date to evaluate (YYYY-MM-DD); defaults to today in the local time zone
    #[arg(long)]
    date: Option<Date>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct AssociationRun {
    association_uuid: AssociationUuid,

    #[serde(flatten)]
    outcome: RunOutcome,
}

/// Result of one association's run. An aborted run never stops the others.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum RunOutcome {
    Completed { report: DriverReport },
    Aborted { reason: String },
}

impl AssociationRun {
    /// Rules that failed, counting an aborted run as one failure.
    fn failures(&self) -> usize {
        match &self.outcome {
            RunOutcome::Completed { report } => report.errors.len(),
            RunOutcome::Aborted { .. } => 1,
        }
    }
}

pub(crate) async fn run(args: RunDailyArgs) -> Result<(), String> {
    let ctx = super::connect(&args.database_url).await?;
    let date = args.date.unwrap_or_else(|| Zoned::now().date());

    let associations = match args.association {
        Some(uuid) => vec![AssociationUuid::from_uuid(uuid)],
        None => ctx
            .associations
            .list_associations()
            .await
            .map_err(|error| format!("failed to list associations: {error}"))?
            .into_iter()
            .map(|association| association.uuid)
            .collect(),
    };

    let runs = run_associations(&ctx.schedules, associations, date).await;

    match args.format {
        OutputFormat::Text => print_text(&runs),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&runs)
                .map_err(|error| format!("failed to encode report: {error}"))?;

            println!("{json}");
        }
    }

    let failures: usize = runs.iter().map(AssociationRun::failures).sum();

    if failures > 0 {
        return Err(format!("{failures} schedule(s) failed to fire on {date}"));
    }

    Ok(())
}

async fn run_associations(
    schedules: &Arc<dyn SchedulesService>,
    associations: Vec<AssociationUuid>,
    date: Date,
) -> Vec<AssociationRun> {
    let mut runs = Vec::with_capacity(associations.len());

    for association in associations {
        let outcome = match DailyDriver::new(association, Arc::clone(schedules))
            .run_daily(date)
            .await
        {
            Ok(report) => RunOutcome::Completed { report },
            Err(error) => {
                warn!(association_uuid = %association, error = %error, "daily run aborted");

                RunOutcome::Aborted {
                    reason: error.to_string(),
                }
            }
        };

        runs.push(AssociationRun {
            association_uuid: association,
            outcome,
        });
    }

    runs
}

fn print_text(runs: &[AssociationRun]) {
    for run in runs {
        println!("association_uuid: {}", run.association_uuid);

        let report = match &run.outcome {
            RunOutcome::Completed { report } => report,
            RunOutcome::Aborted { reason } => {
                println!("aborted: {reason}");
                println!();
                continue;
            }
        };

        println!("date: {}", report.date);
        println!("created_fees: {}", report.created_fees.len());
        println!("created_positions: {}", report.created_positions.len());
        println!("skipped: {}", report.skipped);

        for position in &report.created_positions {
            println!("  position: {} -> user {}", position.name, position.user_uuid);
        }

        for failure in &report.errors {
            let rule = match failure.rule {
                RuleRef::RecurrentFee(uuid) => format!("recurrent_fee {uuid}"),
                RuleRef::RotatingPosition(uuid) => format!("rotating_position {uuid}"),
            };

            println!("  error: {rule} ({}): {}", failure.name, failure.reason);
        }

        println!();
    }
}

#[cfg(test)]
mod tests {
    use condo_app::domain::schedules::{MockSchedulesService, SchedulesServiceError};
    use jiff::civil::date;
    use mockall::predicate::eq;

    use super::*;

    #[tokio::test]
    async fn aborted_association_does_not_stop_the_others() {
        let broken = AssociationUuid::new();
        let healthy = AssociationUuid::new();

        let mut mock = MockSchedulesService::new();

        mock.expect_list_recurrent_fees()
            .with(eq(broken), eq(true))
            .times(1)
            .returning(|_, _| Err(SchedulesServiceError::Sql(sqlx::Error::PoolTimedOut)));
        mock.expect_list_recurrent_fees()
            .with(eq(healthy), eq(true))
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        mock.expect_list_rotating_positions()
            .with(eq(healthy), eq(true))
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let schedules: Arc<dyn SchedulesService> = Arc::new(mock);
        let runs = run_associations(&schedules, vec![broken, healthy], date(2025, 6, 1)).await;

        assert_eq!(runs.len(), 2);

        let [first, second] = runs.as_slice() else {
            panic!("expected two runs, got {runs:?}");
        };

        assert_eq!(first.association_uuid, broken);
        assert!(
            matches!(first.outcome, RunOutcome::Aborted { .. }),
            "expected aborted run, got {:?}",
            first.outcome
        );

        assert_eq!(second.association_uuid, healthy);
        assert!(
            matches!(&second.outcome, RunOutcome::Completed { report } if report.is_clean()),
            "expected clean run, got {:?}",
            second.outcome
        );

        assert_eq!(runs.iter().map(AssociationRun::failures).sum::<usize>(), 1);
    }

    #[test]
    fn aborted_run_serializes_with_reason() -> testresult::TestResult {
        let run = AssociationRun {
            association_uuid: AssociationUuid::new(),
            outcome: RunOutcome::Aborted {
                reason: "pool timed out".to_string(),
            },
        };

        let json = serde_json::to_value(&run)?;

        assert_eq!(json["outcome"], "aborted");
        assert_eq!(json["reason"], "pool timed out");

        Ok(())
    }
}
