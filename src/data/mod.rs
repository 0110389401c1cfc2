pub mod connectors;
pub mod series;
pub mod synthetic;

pub use connectors::CsvConnector;
pub use series::PriceSeries;
