pub mod parser;
pub mod reader;

pub use parser::LogRecordParser;
pub use reader::{LogRecords, RecordSource};
