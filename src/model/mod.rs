//! Document model types shared by the converter and its callers.

mod document;

pub use document::{document_id, merge_metadata, IdHashKey, Metadata};
