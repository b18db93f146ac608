use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day for a symbol.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Observation {
    #[serde(alias = "timestamp")]
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub volume: u64,
}

impl Observation {
    pub fn new(date: NaiveDate, open: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            close,
            volume,
        }
    }
}
