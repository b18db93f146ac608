use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::error::{IndexError, Result};
use crate::structs::{Observation, Symbol, SymbolIndex, TimeSeries};

/// Shared handle over the process-wide [`SymbolIndex`].
///
/// Clones point at the same index. Lookups and listings take the read lock,
/// adds take the write lock; symbols are parsed into [`Symbol`] first, so
/// `aapl` and `AAPL` name the same entry here.
#[derive(Clone, Default)]
pub struct StockBook {
    index: Arc<RwLock<SymbolIndex>>,
}

impl StockBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observations`, in the order given, as the history of `symbol`.
    ///
    /// An existing entry for the same symbol is not replaced: the new one is
    /// inserted behind it and stays unreachable by lookup.
    pub fn add_symbol(&self, symbol: &str, observations: Vec<Observation>) -> Result<usize> {
        let symbol = Symbol::parse(symbol)?;
        if observations.is_empty() {
            return Err(IndexError::EmptyInput(symbol.to_string()));
        }
        let series = TimeSeries::from(observations);
        let count = series.len();

        let mut index = self.write();
        if index.contains(symbol.as_str()) {
            warn!(%symbol, "symbol already indexed, new history will be shadowed by the existing one");
        }
        index.insert(symbol.as_str(), series);
        info!(%symbol, observations = count, symbols = index.len(), "symbol added");
        Ok(count)
    }

    pub fn get_symbol_data(&self, symbol: &str) -> Result<Vec<Observation>> {
        let symbol = Symbol::parse(symbol)?;
        let index = self.read();
        match index.search(symbol.as_str()) {
            Some(series) => {
                debug!(%symbol, observations = series.len(), "symbol found");
                Ok(series.export())
            }
            None => {
                debug!(%symbol, "symbol not found");
                Err(IndexError::NotFound(symbol.into()))
            }
        }
    }

    pub fn list_symbols(&self) -> Vec<String> {
        self.read().all_symbols()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave a half-linked node behind,
    // insert attaches with a single assignment.
    fn read(&self) -> RwLockReadGuard<'_, SymbolIndex> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SymbolIndex> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::thread;

    fn observation(y: i32, m: u32, d: u32, open: f64, close: f64, volume: u64) -> Observation {
        Observation::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), open, close, volume)
    }

    #[test]
    fn add_then_get_and_list() {
        let book = StockBook::new();
        let aapl = observation(2024, 6, 1, 190.0, 192.5, 1_000_000);
        assert_eq!(book.add_symbol("AAPL", vec![aapl.clone()]), Ok(1));

        assert_eq!(book.get_symbol_data("AAPL"), Ok(vec![aapl]));
        assert_eq!(book.list_symbols(), vec!["AAPL"]);
        assert_eq!(
            book.get_symbol_data("MSFT"),
            Err(IndexError::NotFound("MSFT".to_string()))
        );
    }

    #[test]
    fn listing_order_ignores_insert_order() {
        let book = StockBook::new();
        book.add_symbol("MSFT", vec![observation(2024, 6, 1, 1.0, 1.0, 1)]).unwrap();
        book.add_symbol("AAPL", vec![observation(2024, 6, 1, 1.0, 1.0, 1)]).unwrap();
        assert_eq!(book.list_symbols(), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn observations_keep_supplied_order() {
        let book = StockBook::new();
        let newer = observation(2024, 1, 2, 100.0, 101.0, 1000);
        let older = observation(2024, 1, 1, 99.0, 98.0, 500);
        book.add_symbol("IBM", vec![newer.clone(), older.clone()]).unwrap();
        assert_eq!(book.get_symbol_data("IBM").unwrap(), vec![newer, older]);
    }

    #[test]
    fn empty_observations_leave_index_untouched() {
        let book = StockBook::new();
        assert_eq!(
            book.add_symbol("AAPL", vec![]),
            Err(IndexError::EmptyInput("AAPL".to_string()))
        );
        assert!(book.is_empty());
        assert!(book.list_symbols().is_empty());
    }

    #[test]
    fn invalid_symbols_are_rejected() {
        let book = StockBook::new();
        let err = book
            .add_symbol("", vec![observation(2024, 6, 1, 1.0, 1.0, 1)])
            .unwrap_err();
        assert!(matches!(err, IndexError::InvalidSymbol { .. }));
        assert!(matches!(
            book.get_symbol_data("$$$"),
            Err(IndexError::InvalidSymbol { .. })
        ));
        assert_eq!(book.len(), 0);
    }

    #[test]
    fn lookups_are_case_insensitive_at_the_boundary() {
        let book = StockBook::new();
        book.add_symbol("tsla", vec![observation(2024, 6, 1, 1.0, 2.0, 3)]).unwrap();
        assert_eq!(book.list_symbols(), vec!["TSLA"]);
        assert_eq!(book.get_symbol_data("TsLa").unwrap().len(), 1);
    }

    #[test]
    fn re_adding_a_symbol_shadows_the_new_history() {
        let book = StockBook::new();
        book.add_symbol("AMZN", vec![observation(2024, 6, 1, 1.0, 1.0, 1)]).unwrap();
        book.add_symbol("AMZN", vec![observation(2024, 6, 2, 2.0, 2.0, 2)]).unwrap();

        assert_eq!(book.list_symbols(), vec!["AMZN", "AMZN"]);
        assert_eq!(book.get_symbol_data("AMZN").unwrap()[0].volume, 1);
    }

    #[test]
    fn clones_share_one_index_across_threads() {
        let book = StockBook::new();
        let handles: Vec<_> = ["A", "B", "C", "D"]
            .into_iter()
            .map(|symbol| {
                let book = book.clone();
                thread::spawn(move || {
                    book.add_symbol(symbol, vec![observation(2024, 6, 1, 1.0, 1.0, 1)])
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        assert_eq!(book.list_symbols(), vec!["A", "B", "C", "D"]);
    }
}
