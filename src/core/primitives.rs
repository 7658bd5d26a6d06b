use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{TerminalError, TerminalResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> TerminalResult<f64> {
    value.to_f64().ok_or_else(|| {
        TerminalError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_millis(time: DateTime<Utc>) -> i64 {
    time.timestamp_millis()
}
