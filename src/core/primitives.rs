use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Formats unix seconds as a `YYYY-MM-DD` label in the local time zone.
pub fn unix_seconds_to_local_date(seconds: i64) -> ChartResult<String> {
    let utc = DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        ChartError::InvalidData(format!("timestamp {seconds} is out of range"))
    })?;
    Ok(utc.with_timezone(&Local).format("%Y-%m-%d").to_string())
}
