//! # untika
//!
//! Document to plain text conversion through an Apache Tika server.
//!
//! Parsing is delegated to Tika. This library post-processes Tika's XHTML
//! output into clean per-page text plus metadata.
//!
//! ## Quick Start
//!
//! ```no_run
//! use untika::convert_file;
//!
//! fn main() -> untika::Result<()> {
//!     let result = convert_file("report.pdf")?;
//!     for (i, page) in result.pages().enumerate() {
//!         println!("--- page {} ---\n{}", i + 1, page);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Page splitting**: Tika's `<div class="page">` containers become pages,
//!   words hyphenated across line wraps are rejoined
//! - **Numeric table filter**: optional removal of lines that are mostly
//!   numbers and do not end like a sentence
//! - **Language check**: optional warning when the text is not in one of the
//!   expected languages, a common symptom of encoding problems
//! - **Output**: pages joined by form feeds, service metadata merged with
//!   caller metadata, and a stable document id

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod service;

// Re-export commonly used types
pub use convert::{
    ConvertOptions, ConvertResult, ConverterConfig, DocumentConverter, TikaConverter,
};
pub use detect::{detect_language, validate_language, LanguageCheck};
pub use error::{Error, Result};
pub use model::{document_id, merge_metadata, IdHashKey, Metadata};
pub use parser::{split_pages, MarkupEvent, PageSplitter};
pub use render::{join_pages, to_json, JsonFormat, NumericTableFilter, PAGE_BREAK};
pub use service::{
    client_available, launch_tika, Extraction, ExtractionService, LaunchOptions, ServiceConfig,
    Timeout,
};

#[cfg(feature = "http")]
pub use service::TikaClient;

use std::path::Path;

/// Convert a file with the default Tika server and settings.
///
/// # Example
///
/// ```no_run
/// use untika::convert_file;
///
/// let result = convert_file("document.docx").unwrap();
/// println!("{}", result.content);
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<ConvertResult> {
    convert_file_with_config(path, ConverterConfig::default())
}

/// Convert a file with custom settings.
///
/// # Example
///
/// ```no_run
/// use untika::{convert_file_with_config, ConverterConfig};
///
/// let config = ConverterConfig::new()
///     .with_url("http://tika.internal:9998")
///     .with_remove_numeric_tables(true);
/// let result = convert_file_with_config("annual_report.pdf", config).unwrap();
/// ```
pub fn convert_file_with_config<P: AsRef<Path>>(
    path: P,
    config: ConverterConfig,
) -> Result<ConvertResult> {
    let converter = TikaConverter::connect(config)?;
    converter.convert(path.as_ref(), &ConvertOptions::default())
}

/// Extract plain text from a file with the default Tika server.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(convert_file(path)?.content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_compose() {
        let pages = split_pages("<body><div class=\"page\">Sum-\nmary\n1 2 3</div></body>");
        let filter = NumericTableFilter::new();
        let cleaned: Vec<String> = pages.iter().map(|p| filter.filter(p, true)).collect();
        assert_eq!(join_pages(&cleaned), "Summary");
    }

    #[test]
    fn test_page_break_is_form_feed() {
        assert_eq!(PAGE_BREAK, '\x0c');
    }

    #[cfg(not(feature = "http"))]
    #[test]
    fn test_connect_without_client() {
        let err = TikaConverter::connect(ConverterConfig::default()).unwrap_err();
        assert!(matches!(err, Error::ClientUnavailable(_)));
    }
}
