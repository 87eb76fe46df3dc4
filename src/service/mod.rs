//! Domain core: the employee directory, the attendance ledger and the
//! read-side aggregation over both. Handlers in `api` only translate HTTP.

use chrono::{NaiveDate, Utc};

pub mod aggregation;
pub mod directory;
pub mod ledger;

/// Calendar day used for "not in the future" checks and dashboard defaults.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
