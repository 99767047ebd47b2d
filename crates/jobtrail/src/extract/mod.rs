pub mod extractor;

pub use extractor::{cutoff_for, ExtractionReport, Extractor};
