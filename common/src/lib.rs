//! Player Review Common Library
//!
//! Tipos compartidos, normalización de registros, selección y recuento.

pub mod error;
pub mod normalize;
pub mod select;
pub mod tally;
pub mod types;

pub use error::{Error, Result};
pub use normalize::{records_from_str, records_from_value};
pub use select::select;
pub use tally::{tally, TagCount, Tally};
pub use types::{Confirmed, LabelOutcome, Record, ReviewMode, Tag, TagFilter};
