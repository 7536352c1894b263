//! Reading-table import and the standard sieve series.

mod parser;
mod sieve;
mod source;

pub use parser::{Parser, ParserConfig};
pub use sieve::{
    STANDARD_SIEVES, StandardSieve, find_by_aperture, find_by_designation, parse_number,
    resolve_aperture,
};
pub use source::{ReadingTable, SourceMetadata};
