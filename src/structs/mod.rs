mod observation;
mod time_series;
mod symbol;
mod symbol_index;
mod stock_book;

pub use observation::Observation;
pub use time_series::TimeSeries;
pub use symbol::Symbol;
pub use symbol_index::{Iter, SymbolIndex};
pub use stock_book::StockBook;
