//! Input parsing and data source handling.

mod cell;
mod parser;
mod source;
mod table;

pub use cell::{Cell, StorageKind, is_null_token};
pub use parser::{Parser, ParserConfig, SheetTable};
pub use source::{ColumnInfo, SourceMetadata};
pub use table::RawTable;
