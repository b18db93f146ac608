pub mod error;
pub mod structs;

pub use error::{IndexError, Result};
pub use structs::{Observation, StockBook, Symbol, SymbolIndex, TimeSeries};
