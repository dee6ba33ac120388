//! Readers that turn delimited text files into [`DataFrame`](crate::data_handling::DataFrame)s.
pub mod delimited;

pub use delimited::{read_data, read_table, read_table_with_config, TableData, TableReaderConfig};
