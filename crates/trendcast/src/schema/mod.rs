//! Column type detection for picking date and value columns.

mod profile;
mod prober;
mod types;

pub use profile::{ColumnProfile, ColumnSuggestion};
pub use prober::{DEFAULT_DATE_THRESHOLD, ProberConfig, SchemaProber};
pub use types::ColumnKind;
