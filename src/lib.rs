pub mod comic;
pub mod db;
pub mod error;
pub mod extract;
pub mod scrape;
pub mod source;

pub use comic::{Comic, UpdateOutcome};
pub use error::{Error, Result};
pub use source::{SourceKey, identify};
