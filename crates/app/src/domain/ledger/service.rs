//! Ledger service.

use async_trait::async_trait;
use condo::{FeeBalance, FeeStatus};
use jiff::civil::Date;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        associations::records::AssociationUuid,
        ledger::{
            data::{DepositFilter, FeeFilter, NewDeposit, NewFee, NewWithdrawal},
            errors::LedgerServiceError,
            records::{Balance, DepositRecord, FeeRecord, FeeUuid, WithdrawalRecord},
            repositories::{PgDepositsRepository, PgFeesRepository, PgWithdrawalsRepository},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgLedgerService {
    db: Db,
    fees: PgFeesRepository,
    deposits: PgDepositsRepository,
    withdrawals: PgWithdrawalsRepository,
}

impl PgLedgerService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            fees: PgFeesRepository::new(),
            deposits: PgDepositsRepository::new(),
            withdrawals: PgWithdrawalsRepository::new(),
        }
    }
}

#[async_trait]
impl LedgerService for PgLedgerService {
    #[tracing::instrument(
        name = "ledger.service.create_fee",
        skip(self, fee),
        fields(association_uuid = %association, fee_uuid = %fee.uuid, unit_uuid = %fee.unit),
        err
    )]
    async fn create_fee(
        &self,
        association: AssociationUuid,
        fee: NewFee,
    ) -> Result<FeeRecord, LedgerServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let created = self.fees.create_fee(&mut tx, fee).await?;

        tx.commit().await?;

        info!(fee_uuid = %created.uuid, amount = created.amount, "created fee");

        Ok(created)
    }

    async fn get_fee(
        &self,
        association: AssociationUuid,
        fee: FeeUuid,
    ) -> Result<FeeRecord, LedgerServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let fee = self.fees.get_fee(&mut tx, fee).await?;

        tx.commit().await?;

        Ok(fee)
    }

    async fn list_fees(
        &self,
        association: AssociationUuid,
        filter: FeeFilter,
    ) -> Result<Vec<FeeRecord>, LedgerServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let fees = self.fees.list_fees(&mut tx, filter).await?;

        tx.commit().await?;

        Ok(fees)
    }

    async fn delete_fee(
        &self,
        association: AssociationUuid,
        fee: FeeUuid,
    ) -> Result<(), LedgerServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let rows_affected = self.fees.delete_fee(&mut tx, fee).await?;

        if rows_affected == 0 {
            return Err(LedgerServiceError::NotFound);
        }

        tx.commit().await?;

        info!(fee_uuid = %fee, "deleted fee");

        Ok(())
    }

    async fn fee_status(
        &self,
        association: AssociationUuid,
        fee: FeeUuid,
        as_of: Date,
    ) -> Result<FeeStatus, LedgerServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let record = self.fees.get_fee(&mut tx, fee).await?;
        let amount_paid = self.fees.amount_paid(&mut tx, fee).await?;

        tx.commit().await?;

        Ok(FeeBalance::new(record.amount, amount_paid).status(record.due_date, as_of))
    }

    #[tracing::instrument(
        name = "ledger.service.record_deposit",
        skip(self, deposit),
        fields(association_uuid = %association, deposit_uuid = %deposit.uuid),
        err
    )]
    async fn record_deposit(
        &self,
        association: AssociationUuid,
        deposit: NewDeposit,
    ) -> Result<DepositRecord, LedgerServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let created = self.deposits.create_deposit(&mut tx, deposit).await?;

        tx.commit().await?;

        info!(deposit_uuid = %created.uuid, amount = created.amount, "recorded deposit");

        Ok(created)
    }

    async fn list_deposits(
        &self,
        association: AssociationUuid,
        filter: DepositFilter,
    ) -> Result<Vec<DepositRecord>, LedgerServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let deposits = self.deposits.list_deposits(&mut tx, filter).await?;

        tx.commit().await?;

        Ok(deposits)
    }

    #[tracing::instrument(
        name = "ledger.service.record_withdrawal",
        skip(self, withdrawal),
        fields(association_uuid = %association, withdrawal_uuid = %withdrawal.uuid),
        err
    )]
    async fn record_withdrawal(
        &self,
        association: AssociationUuid,
        withdrawal: NewWithdrawal,
    ) -> Result<WithdrawalRecord, LedgerServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let created = self
            .withdrawals
            .create_withdrawal(&mut tx, withdrawal)
            .await?;

        tx.commit().await?;

        info!(withdrawal_uuid = %created.uuid, amount = created.amount, "recorded withdrawal");

        Ok(created)
    }

    async fn list_withdrawals(
        &self,
        association: AssociationUuid,
    ) -> Result<Vec<WithdrawalRecord>, LedgerServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let withdrawals = self.withdrawals.list_withdrawals(&mut tx).await?;

        tx.commit().await?;

        Ok(withdrawals)
    }

    async fn balance(
        &self,
        association: AssociationUuid,
        as_of: Date,
    ) -> Result<Balance, LedgerServiceError> {
        let mut tx = self.db.begin_association_transaction(association).await?;

        let balance = self.deposits.balance(&mut tx, as_of).await?;

        tx.commit().await?;

        Ok(balance)
    }
}

#[automock]
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Bills a unit by hand.
    async fn create_fee(
        &self,
        association: AssociationUuid,
        fee: NewFee,
    ) -> Result<FeeRecord, LedgerServiceError>;

    async fn get_fee(
        &self,
        association: AssociationUuid,
        fee: FeeUuid,
    ) -> Result<FeeRecord, LedgerServiceError>;

    /// Lists fees by due date, then unit number.
    async fn list_fees(
        &self,
        association: AssociationUuid,
        filter: FeeFilter,
    ) -> Result<Vec<FeeRecord>, LedgerServiceError>;

    /// Soft-deletes a fee.
    async fn delete_fee(
        &self,
        association: AssociationUuid,
        fee: FeeUuid,
    ) -> Result<(), LedgerServiceError>;

    /// Settlement status of a fee from the deposits applied to it.
    async fn fee_status(
        &self,
        association: AssociationUuid,
        fee: FeeUuid,
        as_of: Date,
    ) -> Result<FeeStatus, LedgerServiceError>;

    /// Records money received, optionally against a fee.
    async fn record_deposit(
        &self,
        association: AssociationUuid,
        deposit: NewDeposit,
    ) -> Result<DepositRecord, LedgerServiceError>;

    async fn list_deposits(
        &self,
        association: AssociationUuid,
        filter: DepositFilter,
    ) -> Result<Vec<DepositRecord>, LedgerServiceError>;

    /// Records money paid out, optionally for a project.
    async fn record_withdrawal(
        &self,
        association: AssociationUuid,
        withdrawal: NewWithdrawal,
    ) -> Result<WithdrawalRecord, LedgerServiceError>;

    async fn list_withdrawals(
        &self,
        association: AssociationUuid,
    ) -> Result<Vec<WithdrawalRecord>, LedgerServiceError>;

    /// Totals of deposits and withdrawals dated on or before `as_of`.
    async fn balance(
        &self,
        association: AssociationUuid,
        as_of: Date,
    ) -> Result<Balance, LedgerServiceError>;
}
