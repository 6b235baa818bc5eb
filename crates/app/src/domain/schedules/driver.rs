//! Daily Driver
//!
//! Evaluates every active schedule of an association for one date and fires the ones that
//! are due. A rule that fails is reported and the run moves on to the next rule.

use std::sync::Arc;

use condo::is_due;
use jiff::civil::Date;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{
    associations::records::AssociationUuid,
    ledger::records::FeeRecord,
    schedules::{
        SchedulesService,
        errors::SchedulesServiceError,
        records::{PositionGeneration, PositionRecord, RecurrentFeeUuid, RotatingPositionUuid},
    },
};

/// Reference to the rule a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "uuid", rename_all = "snake_case")]
pub enum RuleRef {
    RecurrentFee(RecurrentFeeUuid),
    RotatingPosition(RotatingPositionUuid),
}

/// A rule that could not be fired.
#[derive(Debug, Clone, Serialize)]
pub struct RuleFailure {
    pub rule: RuleRef,
    pub name: String,
    pub reason: String,
}

/// Everything a daily run created, skipped and failed.
#[derive(Debug, Clone, Serialize)]
pub struct DriverReport {
    pub date: Date,
    pub created_fees: Vec<FeeRecord>,
    pub created_positions: Vec<PositionRecord>,

    /// Fees and positions that already existed for the date.
    pub skipped: usize,

    pub errors: Vec<RuleFailure>,
}

impl DriverReport {
    fn new(date: Date) -> Self {
        Self {
            date,
            created_fees: Vec::new(),
            created_positions: Vec::new(),
            skipped: 0,
            errors: Vec::new(),
        }
    }

    /// Whether every due rule fired cleanly.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn fail(&mut self, rule: RuleRef, name: &str, error: &SchedulesServiceError) {
        warn!(rule = ?rule, name, error = %error, "schedule failed to fire");

        self.errors.push(RuleFailure {
            rule,
            name: name.to_string(),
            reason: error.to_string(),
        });
    }
}

/// Fires the due schedules of one association.
#[derive(Clone)]
pub struct DailyDriver {
    association: AssociationUuid,
    schedules: Arc<dyn SchedulesService>,
}

impl DailyDriver {
    #[must_use]
    pub fn new(association: AssociationUuid, schedules: Arc<dyn SchedulesService>) -> Self {
        Self {
            association,
            schedules,
        }
    }

    /// Fire every active rule due on `date`. Running twice for the same date creates
    /// nothing new the second time.
    ///
    /// # Errors
    ///
    /// Returns an error only when the rules cannot be listed; failures of individual rules
    /// are collected in [`DriverReport::errors`].
    #[tracing::instrument(
        name = "schedules.driver.run_daily",
        skip(self),
        fields(association_uuid = %self.association, date = %date),
        err
    )]
    pub async fn run_daily(&self, date: Date) -> Result<DriverReport, SchedulesServiceError> {
        let recurrent_fees = self
            .schedules
            .list_recurrent_fees(self.association, true)
            .await?;

        let rotating_positions = self
            .schedules
            .list_rotating_positions(self.association, true)
            .await?;

        let mut report = DriverReport::new(date);

        for rule in recurrent_fees {
            if !is_due(&rule.rule, date) {
                debug!(recurrent_fee_uuid = %rule.uuid, "recurrent fee not due");
                continue;
            }

            match self
                .schedules
                .fire_recurrent_fee(self.association, rule.uuid, date)
                .await
            {
                Ok(generation) => {
                    report.skipped += generation.skipped;
                    report.created_fees.extend(generation.created);
                }
                Err(SchedulesServiceError::Inactive) => {
                    debug!(recurrent_fee_uuid = %rule.uuid, "recurrent fee paused during run");
                }
                Err(error) => report.fail(RuleRef::RecurrentFee(rule.uuid), &rule.name, &error),
            }
        }

        for rule in rotating_positions {
            if !is_due(&rule.rule, date) {
                debug!(rotating_position_uuid = %rule.uuid, "rotating position not due");
                continue;
            }

            match self
                .schedules
                .fire_rotating_position(self.association, rule.uuid, date)
                .await
            {
                Ok(PositionGeneration::Created(position)) => {
                    report.created_positions.push(position);
                }
                Ok(PositionGeneration::AlreadyGenerated) => report.skipped += 1,
                Err(SchedulesServiceError::Inactive) => {
                    debug!(rotating_position_uuid = %rule.uuid, "rotating position paused during run");
                }
                Err(error) => {
                    report.fail(RuleRef::RotatingPosition(rule.uuid), &rule.name, &error);
                }
            }
        }

        info!(
            created_fees = report.created_fees.len(),
            created_positions = report.created_positions.len(),
            skipped = report.skipped,
            failed = report.errors.len(),
            "daily run finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use condo::{EmptyPoolError, RecurrenceRule};
    use jiff::{Timestamp, civil::date};
    use mockall::predicate::eq;
    use testresult::TestResult;

    use crate::{
        domain::{
            ledger::records::FeeUuid,
            schedules::{
                MockSchedulesService,
                data::{NewRecurrentFee, NewRotatingPosition, PositionFilter},
                records::{
                    FeeGeneration, PositionUuid, RecurrentFeeRecord, RotatingPositionRecord,
                },
            },
            units::records::{ProfileUuid, UnitTypeUuid, UnitUuid},
            users::UserUuid,
        },
        test::{TestContext, helpers},
    };

    use super::*;

    fn recurrent_fee(rule: RecurrenceRule) -> RecurrentFeeRecord {
        let now = Timestamp::now();

        RecurrentFeeRecord {
            uuid: RecurrentFeeUuid::new(),
            name: "Maintenance".to_string(),
            amount: 100_00,
            unit_type_uuid: UnitTypeUuid::new(),
            rule,
            active: true,
            created_by: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn rotating_position(name: &str) -> RotatingPositionRecord {
        let now = Timestamp::now();

        RotatingPositionRecord {
            uuid: RotatingPositionUuid::new(),
            name: name.to_string(),
            description: String::new(),
            rule: RecurrenceRule::every_day(),
            active: true,
            unit_uuids: Vec::new(),
            cursor_profile_uuid: None,
            created_by: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn fee(due_date: Date) -> FeeRecord {
        let now = Timestamp::now();

        FeeRecord {
            uuid: FeeUuid::new(),
            name: "Maintenance".to_string(),
            amount: 100_00,
            unit_uuid: UnitUuid::new(),
            due_date,
            recurrent_fee_uuid: None,
            created_by: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn position(date: Date) -> PositionRecord {
        PositionRecord {
            uuid: PositionUuid::new(),
            user_uuid: UserUuid::new(),
            profile_uuid: ProfileUuid::new(),
            date,
            name: "Trash duty".to_string(),
            description: String::new(),
            rotating_position_uuid: None,
            created_by: None,
            created_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn fires_only_due_rules() -> TestResult {
        let association = AssociationUuid::new();
        let day = date(2025, 6, 1);

        let due = recurrent_fee(RecurrenceRule::from_values(&[], &[1], &[])?);
        let not_due = recurrent_fee(RecurrenceRule::from_values(&[], &[15], &[])?);
        let due_uuid = due.uuid;

        let mut mock = MockSchedulesService::new();

        mock.expect_list_recurrent_fees()
            .with(eq(association), eq(true))
            .returning(move |_, _| Ok(vec![due.clone(), not_due.clone()]));
        mock.expect_list_rotating_positions()
            .returning(|_, _| Ok(Vec::new()));
        mock.expect_fire_recurrent_fee()
            .with(eq(association), eq(due_uuid), eq(day))
            .times(1)
            .returning(move |_, _, d| {
                Ok(FeeGeneration {
                    created: vec![fee(d), fee(d)],
                    skipped: 1,
                })
            });

        let report = DailyDriver::new(association, Arc::new(mock))
            .run_daily(day)
            .await?;

        assert_eq!(report.created_fees.len(), 2);
        assert_eq!(report.skipped, 1);
        assert!(report.is_clean());

        Ok(())
    }

    #[tokio::test]
    async fn failing_rule_does_not_stop_the_run() -> TestResult {
        let association = AssociationUuid::new();
        let day = date(2025, 6, 1);

        let empty = rotating_position("Garden duty");
        let staffed = rotating_position("Trash duty");
        let empty_uuid = empty.uuid;
        let staffed_uuid = staffed.uuid;

        let mut mock = MockSchedulesService::new();

        mock.expect_list_recurrent_fees()
            .returning(|_, _| Ok(Vec::new()));
        mock.expect_list_rotating_positions()
            .returning(move |_, _| Ok(vec![empty.clone(), staffed.clone()]));
        mock.expect_fire_rotating_position()
            .with(eq(association), eq(empty_uuid), eq(day))
            .times(1)
            .returning(|_, _, _| Err(SchedulesServiceError::EmptyPool(EmptyPoolError)));
        mock.expect_fire_rotating_position()
            .with(eq(association), eq(staffed_uuid), eq(day))
            .times(1)
            .returning(|_, _, d| Ok(PositionGeneration::Created(position(d))));

        let report = DailyDriver::new(association, Arc::new(mock))
            .run_daily(day)
            .await?;

        assert_eq!(report.created_positions.len(), 1);
        assert_eq!(report.errors.len(), 1);

        let Some(failure) = report.errors.first() else {
            panic!("expected one failure");
        };

        assert_eq!(failure.rule, RuleRef::RotatingPosition(empty_uuid));
        assert_eq!(failure.name, "Garden duty");
        assert_eq!(failure.reason, EmptyPoolError.to_string());

        Ok(())
    }

    #[tokio::test]
    async fn already_generated_position_counts_as_skipped() -> TestResult {
        let association = AssociationUuid::new();
        let rule = rotating_position("Trash duty");

        let mut mock = MockSchedulesService::new();

        mock.expect_list_recurrent_fees()
            .returning(|_, _| Ok(Vec::new()));
        mock.expect_list_rotating_positions()
            .returning(move |_, _| Ok(vec![rule.clone()]));
        mock.expect_fire_rotating_position()
            .returning(|_, _, _| Ok(PositionGeneration::AlreadyGenerated));

        let report = DailyDriver::new(association, Arc::new(mock))
            .run_daily(date(2025, 6, 1))
            .await?;

        assert!(report.created_positions.is_empty());
        assert_eq!(report.skipped, 1);
        assert!(report.is_clean());

        Ok(())
    }

    #[tokio::test]
    async fn listing_failure_aborts_the_run() {
        let mut mock = MockSchedulesService::new();

        mock.expect_list_recurrent_fees()
            .returning(|_, _| Err(SchedulesServiceError::Sql(sqlx::Error::PoolTimedOut)));
        mock.expect_list_rotating_positions().never();

        let result = DailyDriver::new(AssociationUuid::new(), Arc::new(mock))
            .run_daily(date(2025, 6, 1))
            .await;

        assert!(
            matches!(result, Err(SchedulesServiceError::Sql(_))),
            "expected Sql error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn running_twice_creates_nothing_new() -> TestResult {
        let ctx = TestContext::new().await;
        let unit_type = helpers::create_unit_type(&ctx, "Studio").await?;
        let unit = helpers::create_unit(&ctx, "101", unit_type.uuid).await?;

        helpers::create_unit(&ctx, "102", unit_type.uuid).await?;
        helpers::create_profile(&ctx, unit.uuid).await?;

        ctx.schedules
            .create_recurrent_fee(
                ctx.association,
                NewRecurrentFee {
                    uuid: RecurrentFeeUuid::new(),
                    name: "Maintenance".to_string(),
                    amount: 100_00,
                    unit_type: unit_type.uuid,
                    rule: RecurrenceRule::from_values(&[], &[1], &[])?,
                    created_by: None,
                },
            )
            .await?;

        ctx.schedules
            .create_rotating_position(
                ctx.association,
                NewRotatingPosition {
                    uuid: RotatingPositionUuid::new(),
                    name: "Trash duty".to_string(),
                    description: String::new(),
                    rule: RecurrenceRule::every_day(),
                    units: vec![unit.uuid],
                    created_by: None,
                },
            )
            .await?;

        let driver = DailyDriver::new(ctx.association, Arc::new(ctx.schedules.clone()));
        let day = date(2025, 7, 1);

        let first = driver.run_daily(day).await?;

        assert_eq!(first.created_fees.len(), 2);
        assert_eq!(first.created_positions.len(), 1);
        assert_eq!(first.skipped, 0);

        let second = driver.run_daily(day).await?;

        assert!(second.created_fees.is_empty());
        assert!(second.created_positions.is_empty());
        assert_eq!(second.skipped, 3);

        let positions = ctx
            .schedules
            .list_positions(
                ctx.association,
                PositionFilter {
                    rotating_position: None,
                    date: Some(day),
                },
            )
            .await?;

        assert_eq!(positions.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn empty_rotation_is_reported_not_raised() -> TestResult {
        let ctx = TestContext::new().await;
        let unit_type = helpers::create_unit_type(&ctx, "Studio").await?;
        let unit = helpers::create_unit(&ctx, "101", unit_type.uuid).await?;

        let rule = ctx
            .schedules
            .create_rotating_position(
                ctx.association,
                NewRotatingPosition {
                    uuid: RotatingPositionUuid::new(),
                    name: "Pool watch".to_string(),
                    description: String::new(),
                    rule: RecurrenceRule::every_day(),
                    units: vec![unit.uuid],
                    created_by: None,
                },
            )
            .await?;

        let report = DailyDriver::new(ctx.association, Arc::new(ctx.schedules.clone()))
            .run_daily(date(2025, 7, 1))
            .await?;

        assert!(report.created_positions.is_empty());
        assert_eq!(
            report.errors.first().map(|f| f.rule),
            Some(RuleRef::RotatingPosition(rule.uuid))
        );

        Ok(())
    }
}
