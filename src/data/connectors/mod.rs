pub mod csv;
pub mod validator;

pub use csv::CsvConnector;
pub use validator::{ColumnMap, DataValidator, RequiredColumn};
