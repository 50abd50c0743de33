//! Market data: provider trait, offline providers, polars frame conversion.

pub mod csv_file;
pub mod frame;
pub mod provider;
pub mod synthetic;

pub use csv_file::CsvProvider;
pub use frame::{frame_to_series, series_to_frame, BarSchema, SchemaError};
pub use provider::{DataError, Lookback, MarketDataProvider};
pub use synthetic::SyntheticProvider;
