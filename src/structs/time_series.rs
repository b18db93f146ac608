use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::structs::Observation;

/// Daily observations for one symbol, kept in the order they were appended.
///
/// Nothing is sorted or deduplicated: a feed that delivers newest-first stays
/// newest-first.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct TimeSeries {
    data: Vec<Observation>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self { data: vec![] }
    }

    pub fn append(&mut self, date: NaiveDate, open: f64, close: f64, volume: u64) {
        self.push(Observation::new(date, open, close, volume));
    }

    pub fn push(&mut self, observation: Observation) {
        self.data.push(observation);
    }

    pub fn export(&self) -> Vec<Observation> {
        self.data.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<Observation>> for TimeSeries {
    fn from(data: Vec<Observation>) -> Self {
        Self { data }
    }
}

impl FromIterator<Observation> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl Extend<Observation> for TimeSeries {
    fn extend<I: IntoIterator<Item = Observation>>(&mut self, iter: I) {
        self.data.extend(iter);
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
