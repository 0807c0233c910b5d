//! The pluggable seams of the pipeline.
//!
//! Applications implement these traits to provide the query transport and
//! the field-extraction strategy; the core never touches a browser or a
//! DOM itself.

pub mod extractor;
pub mod provider;

pub use extractor::{coords_from_link, ExtractingSession, ItemExtractor, PanelTransport};
pub use provider::{SearchProvider, SearchSession};
