pub mod listing_parser;
pub mod profile;

pub use listing_parser::{ListingParser, Parser};
pub use profile::{FieldSelectors, PriceSource, SourceProfile};
