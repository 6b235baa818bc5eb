mod deposits;
mod fees;
mod withdrawals;

pub(crate) use deposits::PgDepositsRepository;
pub(crate) use fees::PgFeesRepository;
pub(crate) use withdrawals::PgWithdrawalsRepository;
