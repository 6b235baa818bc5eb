//! Schedules service.

use async_trait::async_trait;
use condo::{RotationPool, is_due};
use jiff::civil::Date;
use mockall::automock;
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        associations::records::AssociationUuid,
        schedules::{
            data::{NewPosition, NewRecurrentFee, NewRotatingPosition, PositionFilter},
            errors::SchedulesServiceError,
            records::{
                FeeGeneration, PositionGeneration, PositionRecord, RecurrentFeeRecord,
                RecurrentFeeUuid, RotatingPositionRecord, RotatingPositionUuid,
            },
            repositories::{
                PgPositionsRepository, PgRecurrentFeesRepository, PgRotatingPositionsRepository,
            },
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgSchedulesService {
    db: Db,
    recurrent_fees: PgRecurrentFeesRepository,
    rotating_positions: PgRotatingPositionsRepository,
    positions: PgPositionsRepository,
}

impl PgSchedulesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            recurrent_fees: PgRecurrentFeesRepository::new(),
            rotating_positions: PgRotatingPositionsRepository::new(),
            positions: PgPositionsRepository::new(),
        }
    }

    /// Select the next resident and record their position, all under the rule's row lock.
    ///
    /// Fails with [`SchedulesServiceError::DuplicateGeneration`] when the rule already has a
    /// position on `date`; the rotation cursor is then left untouched.
    async fn generate_position(
        &self,
        association: AssociationUuid,
        position: RotatingPositionUuid,
        date: Date,
    ) -> Result<PositionRecord, SchedulesServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let rule = self
            .rotating_positions
            .lock_rotating_position(&mut tx, position)
            .await?;

        if !rule.active {
            return Err(SchedulesServiceError::Inactive);
        }

        if !is_due(&rule.rule, date) {
            return Err(SchedulesServiceError::NotDue(date));
        }

        if self
            .positions
            .position_exists(&mut tx, rule.uuid, date)
            .await?
        {
            return Err(SchedulesServiceError::DuplicateGeneration);
        }

        let pool = RotationPool::new(
            self.rotating_positions
                .list_rotation_pool(&mut tx, rule.uuid)
                .await?,
        );

        let selection = pool.next_candidate(rule.cursor_profile_uuid.as_ref())?;

        let created = self
            .positions
            .create_generated_position(&mut tx, &rule, selection.candidate, date)
            .await?
            .ok_or(SchedulesServiceError::DuplicateGeneration)?;

        self.rotating_positions
            .set_cursor(&mut tx, rule.uuid, selection.cursor)
            .await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[async_trait]
impl SchedulesService for PgSchedulesService {
    #[tracing::instrument(
        name = "schedules.service.create_recurrent_fee",
        skip(self, fee),
        fields(association_uuid = %association, recurrent_fee_uuid = %fee.uuid),
        err
    )]
    async fn create_recurrent_fee(
        &self,
        association: AssociationUuid,
        fee: NewRecurrentFee,
    ) -> Result<RecurrentFeeRecord, SchedulesServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let created = self
            .recurrent_fees
            .create_recurrent_fee(&mut tx, fee)
            .await?;

        tx.commit().await?;

        info!(recurrent_fee_uuid = %created.uuid, name = %created.name, "created recurrent fee");

        Ok(created)
    }

    async fn list_recurrent_fees(
        &self,
        association: AssociationUuid,
        active_only: bool,
    ) -> Result<Vec<RecurrentFeeRecord>, SchedulesServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let fees = self
            .recurrent_fees
            .list_recurrent_fees(&mut tx, active_only)
            .await?;

        tx.commit().await?;

        Ok(fees)
    }

    async fn set_recurrent_fee_active(
        &self,
        association: AssociationUuid,
        fee: RecurrentFeeUuid,
        active: bool,
    ) -> Result<RecurrentFeeRecord, SchedulesServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let updated = self.recurrent_fees.set_active(&mut tx, fee, active).await?;

        tx.commit().await?;

        info!(recurrent_fee_uuid = %fee, active, "changed recurrent fee activity");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "schedules.service.create_rotating_position",
        skip(self, position),
        fields(association_uuid = %association, rotating_position_uuid = %position.uuid),
        err
    )]
    async fn create_rotating_position(
        &self,
        association: AssociationUuid,
        position: NewRotatingPosition,
    ) -> Result<RotatingPositionRecord, SchedulesServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let created = self
            .rotating_positions
            .create_rotating_position(&mut tx, position)
            .await?;

        tx.commit().await?;

        info!(
            rotating_position_uuid = %created.uuid,
            units = created.unit_uuids.len(),
            "created rotating position"
        );

        Ok(created)
    }

    async fn list_rotating_positions(
        &self,
        association: AssociationUuid,
        active_only: bool,
    ) -> Result<Vec<RotatingPositionRecord>, SchedulesServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let positions = self
            .rotating_positions
            .list_rotating_positions(&mut tx, active_only)
            .await?;

        tx.commit().await?;

        Ok(positions)
    }

    async fn set_rotating_position_active(
        &self,
        association: AssociationUuid,
        position: RotatingPositionUuid,
        active: bool,
    ) -> Result<RotatingPositionRecord, SchedulesServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let rows_affected = self
            .rotating_positions
            .set_active(&mut tx, position, active)
            .await?;

        if rows_affected == 0 {
            return Err(SchedulesServiceError::NotFound);
        }

        let updated = self
            .rotating_positions
            .get_rotating_position(&mut tx, position)
            .await?;

        tx.commit().await?;

        info!(rotating_position_uuid = %position, active, "changed rotating position activity");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "schedules.service.create_position",
        skip(self, position),
        fields(
            association_uuid = %association,
            position_uuid = %position.uuid,
            profile_uuid = %position.profile
        ),
        err
    )]
    async fn create_position(
        &self,
        association: AssociationUuid,
        position: NewPosition,
    ) -> Result<PositionRecord, SchedulesServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let created = self
            .positions
            .create_position(&mut tx, position)
            .await?
            .ok_or(SchedulesServiceError::InvalidReference)?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_positions(
        &self,
        association: AssociationUuid,
        filter: PositionFilter,
    ) -> Result<Vec<PositionRecord>, SchedulesServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let positions = self.positions.list_positions(&mut tx, filter).await?;

        tx.commit().await?;

        Ok(positions)
    }

    #[tracing::instrument(
        name = "schedules.service.fire_recurrent_fee",
        skip(self),
        fields(association_uuid = %association, recurrent_fee_uuid = %fee, date = %date),
        err
    )]
    async fn fire_recurrent_fee(
        &self,
        association: AssociationUuid,
        fee: RecurrentFeeUuid,
        date: Date,
    ) -> Result<FeeGeneration, SchedulesServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let rule = self.recurrent_fees.lock_recurrent_fee(&mut tx, fee).await?;

        if !rule.active {
            return Err(SchedulesServiceError::Inactive);
        }

        if !is_due(&rule.rule, date) {
            return Err(SchedulesServiceError::NotDue(date));
        }

        let units = self
            .recurrent_fees
            .list_billable_units(&mut tx, rule.unit_type_uuid)
            .await?;

        let mut generation = FeeGeneration::default();

        for unit in units {
            match self
                .recurrent_fees
                .create_generated_fee(&mut tx, &rule, unit, date)
                .await?
            {
                Some(created) => generation.created.push(created),
                None => generation.skipped += 1,
            }
        }

        tx.commit().await?;

        info!(
            created = generation.created.len(),
            skipped = generation.skipped,
            "fired recurrent fee"
        );

        Ok(generation)
    }

    #[tracing::instrument(
        name = "schedules.service.fire_rotating_position",
        skip(self),
        fields(association_uuid = %association, rotating_position_uuid = %position, date = %date),
        err
    )]
    async fn fire_rotating_position(
        &self,
        association: AssociationUuid,
        position: RotatingPositionUuid,
        date: Date,
    ) -> Result<PositionGeneration, SchedulesServiceError> {
        match self.generate_position(association, position, date).await {
            Ok(created) => {
                info!(
                    position_uuid = %created.uuid,
                    profile_uuid = %created.profile_uuid,
                    "assigned rotating position"
                );

                Ok(PositionGeneration::Created(created))
            }
            Err(SchedulesServiceError::DuplicateGeneration) => {
                debug!("position already generated");

                Ok(PositionGeneration::AlreadyGenerated)
            }
            Err(error) => Err(error),
        }
    }
}

#[automock]
#[async_trait]
pub trait SchedulesService: Send + Sync {
    /// Creates a recurring fee rule.
    async fn create_recurrent_fee(
        &self,
        association: AssociationUuid,
        fee: NewRecurrentFee,
    ) -> Result<RecurrentFeeRecord, SchedulesServiceError>;

    /// Lists recurring fee rules, oldest first.
    async fn list_recurrent_fees(
        &self,
        association: AssociationUuid,
        active_only: bool,
    ) -> Result<Vec<RecurrentFeeRecord>, SchedulesServiceError>;

    /// Pauses or resumes a recurring fee rule.
    async fn set_recurrent_fee_active(
        &self,
        association: AssociationUuid,
        fee: RecurrentFeeUuid,
        active: bool,
    ) -> Result<RecurrentFeeRecord, SchedulesServiceError>;

    /// Creates a rotating duty over the residents of `units`.
    async fn create_rotating_position(
        &self,
        association: AssociationUuid,
        position: NewRotatingPosition,
    ) -> Result<RotatingPositionRecord, SchedulesServiceError>;

    /// Lists rotating duties, oldest first.
    async fn list_rotating_positions(
        &self,
        association: AssociationUuid,
        active_only: bool,
    ) -> Result<Vec<RotatingPositionRecord>, SchedulesServiceError>;

    /// Pauses or resumes a rotating duty.
    async fn set_rotating_position_active(
        &self,
        association: AssociationUuid,
        position: RotatingPositionUuid,
        active: bool,
    ) -> Result<RotatingPositionRecord, SchedulesServiceError>;

    /// Assigns a position by hand.
    async fn create_position(
        &self,
        association: AssociationUuid,
        position: NewPosition,
    ) -> Result<PositionRecord, SchedulesServiceError>;

    /// Lists positions by date.
    async fn list_positions(
        &self,
        association: AssociationUuid,
        filter: PositionFilter,
    ) -> Result<Vec<PositionRecord>, SchedulesServiceError>;

    /// Bills every live unit of the rule's unit type for `date`.
    ///
    /// Units already billed by this rule for `date` are counted as skipped. Concurrent
    /// firings of the same rule serialize on the rule's row.
    async fn fire_recurrent_fee(
        &self,
        association: AssociationUuid,
        fee: RecurrentFeeUuid,
        date: Date,
    ) -> Result<FeeGeneration, SchedulesServiceError>;

    /// Assigns the next resident in the rotation for `date` and advances the cursor.
    ///
    /// Returns [`PositionGeneration::AlreadyGenerated`] when the rule already has a
    /// position on `date`.
    async fn fire_rotating_position(
        &self,
        association: AssociationUuid,
        position: RotatingPositionUuid,
        date: Date,
    ) -> Result<PositionGeneration, SchedulesServiceError>;
}
