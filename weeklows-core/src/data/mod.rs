//! Bar sources: live download, CSV import, and the bundled sample.

pub mod csv_import;
pub mod provider;
pub mod sample;
pub mod source;
pub mod yahoo;

pub use csv_import::{load_csv, parse_timestamp, read_bars};
pub use provider::{DataError, DataProvider, DataSource, FetchRequest};
pub use sample::{load_sample, SAMPLE_CSV};
pub use source::{load_bars, LoadedBars, SourceSpec};
pub use yahoo::YahooProvider;
