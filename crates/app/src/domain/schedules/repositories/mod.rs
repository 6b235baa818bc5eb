mod positions;
mod recurrent_fees;
mod rotating_positions;

pub(crate) use positions::PgPositionsRepository;
pub(crate) use recurrent_fees::PgRecurrentFeesRepository;
pub(crate) use rotating_positions::PgRotatingPositionsRepository;

use condo::RecurrenceRule;
use sqlx::{Row, postgres::PgRow};

/// Decode the `weekdays`, `monthdays` and `months` array columns.
fn try_get_rule(row: &PgRow) -> Result<RecurrenceRule, sqlx::Error> {
    let weekdays: Vec<i16> = row.try_get("weekdays")?;
    let monthdays: Vec<i16> = row.try_get("monthdays")?;
    let months: Vec<i16> = row.try_get("months")?;

    RecurrenceRule::from_stored(&weekdays, &monthdays, &months)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
