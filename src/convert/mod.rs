//! Document conversion: options, results and the converter trait.
//!
//! # Example
//!
//! ```no_run
//! use untika::convert::{ConvertOptions, ConverterConfig, DocumentConverter, TikaConverter};
//! use std::path::Path;
//!
//! fn main() -> untika::Result<()> {
//!     let config = ConverterConfig::new()
//!         .with_remove_numeric_tables(true)
//!         .with_valid_languages(["en"]);
//!     let converter = TikaConverter::connect(config)?;
//!
//!     let result = converter.convert(Path::new("report.pdf"), &ConvertOptions::default())?;
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```

mod tika;

pub use tika::TikaConverter;

use crate::detect::LanguageCheck;
use crate::error::Result;
use crate::model::{IdHashKey, Metadata};
use crate::render::pages_of;
use crate::service::ServiceConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Converter-wide defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Extraction service connection
    pub service: ServiceConfig,

    /// Drop numeric table rows by default
    pub remove_numeric_tables: bool,

    /// Expected ISO 639-1 languages (empty = no check)
    pub valid_languages: Vec<String>,

    /// Attributes hashed into the document id
    pub id_hash_keys: Vec<IdHashKey>,
}

impl ConverterConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service connection.
    pub fn with_service(mut self, service: ServiceConfig) -> Self {
        self.service = service;
        self
    }

    /// Set the service URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.service = self.service.with_url(url);
        self
    }

    /// Enable or disable numeric table removal.
    pub fn with_remove_numeric_tables(mut self, remove: bool) -> Self {
        self.remove_numeric_tables = remove;
        self
    }

    /// Set the expected languages.
    pub fn with_valid_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Set the id hash keys.
    pub fn with_id_hash_keys(mut self, keys: Vec<IdHashKey>) -> Self {
        self.id_hash_keys = keys;
        self
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            remove_numeric_tables: false,
            valid_languages: Vec::new(),
            id_hash_keys: IdHashKey::DEFAULT.to_vec(),
        }
    }
}

/// Per-call overrides. Unset fields fall back to the [`ConverterConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Metadata merged over the service metadata
    pub meta: Option<Metadata>,

    /// Override of numeric table removal
    pub remove_numeric_tables: Option<bool>,

    /// Override of the expected languages
    pub valid_languages: Option<Vec<String>>,

    /// Override of the id hash keys
    pub id_hash_keys: Option<Vec<IdHashKey>>,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set caller metadata.
    pub fn with_meta(mut self, meta: Metadata) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Add a single caller metadata entry.
    pub fn with_meta_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }

    /// Override numeric table removal.
    pub fn with_remove_numeric_tables(mut self, remove: bool) -> Self {
        self.remove_numeric_tables = Some(remove);
        self
    }

    /// Override the expected languages.
    pub fn with_valid_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_languages = Some(languages.into_iter().map(Into::into).collect());
        self
    }

    /// Override the id hash keys.
    pub fn with_id_hash_keys(mut self, keys: Vec<IdHashKey>) -> Self {
        self.id_hash_keys = Some(keys);
        self
    }
}

/// Result of converting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertResult {
    /// Stable document id
    pub id: String,

    /// Cleaned pages joined by form feeds
    pub content: String,

    /// Service metadata merged with caller metadata
    pub metadata: Metadata,

    /// Number of pages found in the markup
    pub page_count: usize,

    /// Outcome of the language check
    pub language: LanguageCheck,
}

impl ConvertResult {
    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }

    /// Iterate over the page texts.
    ///
    /// Yields exactly `page_count` items, so a result without pages yields
    /// nothing even though its content is an empty string.
    pub fn pages(&self) -> impl Iterator<Item = &str> {
        pages_of(&self.content).take(self.page_count)
    }
}

/// Trait for document converters.
pub trait DocumentConverter {
    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Convert a file at the given path.
    fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converter_config_builder() {
        let config = ConverterConfig::new()
            .with_url("http://tika:9998")
            .with_remove_numeric_tables(true)
            .with_valid_languages(["en", "de"])
            .with_id_hash_keys(vec![IdHashKey::Content, IdHashKey::Meta]);

        assert_eq!(config.service.url, "http://tika:9998");
        assert!(config.remove_numeric_tables);
        assert_eq!(config.valid_languages, vec!["en", "de"]);
        assert_eq!(config.id_hash_keys.len(), 2);
    }

    #[test]
    fn test_converter_config_defaults() {
        let config = ConverterConfig::default();
        assert!(!config.remove_numeric_tables);
        assert!(config.valid_languages.is_empty());
        assert_eq!(config.id_hash_keys, vec![IdHashKey::Content]);
    }

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_meta_entry("source", "upload")
            .with_meta_entry("owner", "ops")
            .with_remove_numeric_tables(false)
            .with_valid_languages(["fr"]);

        assert_eq!(options.meta.as_ref().map(|m| m.len()), Some(2));
        assert_eq!(options.remove_numeric_tables, Some(false));
        assert_eq!(options.valid_languages, Some(vec!["fr".to_string()]));
        assert!(options.id_hash_keys.is_none());
    }

    #[test]
    fn test_convert_result_pages() {
        let result = ConvertResult {
            id: String::new(),
            content: "one\u{c}two".to_string(),
            metadata: Metadata::new(),
            page_count: 2,
            language: LanguageCheck::Skipped,
        };
        assert_eq!(result.pages().collect::<Vec<_>>(), vec!["one", "two"]);
        assert_eq!(result.content_len(), 7);
    }

    #[test]
    fn test_convert_result_without_pages() {
        let result = ConvertResult {
            id: String::new(),
            content: String::new(),
            metadata: Metadata::new(),
            page_count: 0,
            language: LanguageCheck::Skipped,
        };
        assert_eq!(result.pages().count(), 0);

        let blank = ConvertResult {
            page_count: 1,
            ..result
        };
        assert_eq!(blank.pages().collect::<Vec<_>>(), vec![""]);
    }
}
