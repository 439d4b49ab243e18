//! Tika-backed document converter.

use crate::detect::{validate_language, LanguageCheck};
use crate::error::{Error, Result};
use crate::model::{document_id, merge_metadata};
use crate::parser::split_pages;
use crate::render::{join_pages, NumericTableFilter};
use crate::service::{
    client_available, DefaultService, Extraction, ExtractionService, CLIENT_UNAVAILABLE_HINT,
};
use std::path::Path;

use super::{ConvertOptions, ConvertResult, ConverterConfig, DocumentConverter};

/// Converter that delegates parsing to an extraction service and cleans up
/// its XHTML output.
///
/// The service is probed once at construction. Conversions are stateless and
/// independent of each other.
#[derive(Debug)]
pub struct TikaConverter<S: ExtractionService = DefaultService> {
    service: S,
    config: ConverterConfig,
    filter: NumericTableFilter,
}

impl TikaConverter<DefaultService> {
    /// Connect to the Tika server described by `config`.
    ///
    /// Fails with [`Error::ClientUnavailable`] when the HTTP client is not
    /// compiled in, and with [`Error::ServiceUnreachable`] when the server
    /// does not answer the probe.
    pub fn connect(config: ConverterConfig) -> Result<Self> {
        if !client_available() {
            return Err(Error::ClientUnavailable(CLIENT_UNAVAILABLE_HINT.to_string()));
        }
        let service = DefaultService::new(config.service.clone())?;
        Self::with_service(service, config)
    }
}

impl<S: ExtractionService> TikaConverter<S> {
    /// Create a converter on top of an arbitrary service, probing it first.
    pub fn with_service(service: S, config: ConverterConfig) -> Result<Self> {
        service.probe()?;
        Ok(Self {
            service,
            config,
            filter: NumericTableFilter::new(),
        })
    }

    /// Converter-wide defaults.
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// The underlying service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Turn a service extraction into a conversion result.
    ///
    /// `origin` only labels log records.
    pub fn process(
        &self,
        extraction: Extraction,
        options: &ConvertOptions,
        origin: &str,
    ) -> ConvertResult {
        let remove_numeric_tables = options
            .remove_numeric_tables
            .unwrap_or(self.config.remove_numeric_tables);
        let valid_languages = options
            .valid_languages
            .as_deref()
            .unwrap_or(&self.config.valid_languages);
        let id_hash_keys = options
            .id_hash_keys
            .as_deref()
            .unwrap_or(&self.config.id_hash_keys);

        let pages = split_pages(&extraction.markup);
        log::debug!("{}: {} pages in markup", origin, pages.len());

        let mut removed = 0;
        let cleaned: Vec<String> = pages
            .iter()
            .map(|page| {
                let (text, count) = self.filter.filter_with_count(page, remove_numeric_tables);
                removed += count;
                text
            })
            .collect();
        if removed > 0 {
            log::debug!("{}: removed {} numeric table lines", origin, removed);
        }

        let language = if valid_languages.is_empty() {
            LanguageCheck::Skipped
        } else {
            let check = validate_language(&cleaned.concat(), valid_languages);
            if check.is_mismatch() {
                log::warn!(
                    "The language for {} is not one of {:?}. The file may not have \
                     been decoded in the correct text format.",
                    origin,
                    valid_languages
                );
            }
            check
        };

        let content = join_pages(&cleaned);
        let metadata = merge_metadata(&extraction.metadata, options.meta.as_ref());
        let id = document_id(&content, &metadata, id_hash_keys);

        ConvertResult {
            id,
            content,
            metadata,
            page_count: cleaned.len(),
            language,
        }
    }
}

impl<S: ExtractionService> DocumentConverter for TikaConverter<S> {
    fn name(&self) -> &str {
        "tika"
    }

    fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let extraction = self.service.extract(path)?;
        Ok(self.process(extraction, options, &path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IdHashKey, Metadata};
    use crate::render::PAGE_BREAK;
    use std::cell::Cell;

    struct StaticService {
        markup: &'static str,
        metadata: Metadata,
        probes: Cell<usize>,
    }

    impl StaticService {
        fn new(markup: &'static str) -> Self {
            let mut metadata = Metadata::new();
            metadata.insert("title".to_string(), "A".to_string());
            Self {
                markup,
                metadata,
                probes: Cell::new(0),
            }
        }
    }

    impl ExtractionService for StaticService {
        fn probe(&self) -> Result<()> {
            self.probes.set(self.probes.get() + 1);
            Ok(())
        }

        fn extract(&self, _path: &Path) -> Result<Extraction> {
            Ok(Extraction::new(self.markup, self.metadata.clone()))
        }
    }

    #[derive(Debug)]
    struct DownService;

    impl ExtractionService for DownService {
        fn probe(&self) -> Result<()> {
            Err(Error::ServiceUnreachable {
                url: "http://localhost:9998/tika".to_string(),
                reason: "connection refused".to_string(),
            })
        }

        fn extract(&self, _path: &Path) -> Result<Extraction> {
            unreachable!("never probed successfully")
        }
    }

    const TABLE_MARKUP: &str = "<html><body>\
        <div class=\"page\">Quarterly figures\n2019 2020 2021\n</div>\
        <div class=\"page\">Summary line</div>\
        </body></html>";

    #[test]
    fn test_probe_once_at_construction() {
        let converter =
            TikaConverter::with_service(StaticService::new(TABLE_MARKUP), ConverterConfig::new())
                .unwrap();
        converter
            .convert(Path::new("a.pdf"), &ConvertOptions::default())
            .unwrap();
        assert_eq!(converter.service().probes.get(), 1);
    }

    #[test]
    fn test_unreachable_service_fails_fast() {
        let err = TikaConverter::with_service(DownService, ConverterConfig::new()).unwrap_err();
        assert!(matches!(err, Error::ServiceUnreachable { .. }));
    }

    #[test]
    fn test_instance_default_and_override() {
        let config = ConverterConfig::new().with_remove_numeric_tables(true);
        let converter =
            TikaConverter::with_service(StaticService::new(TABLE_MARKUP), config).unwrap();

        let filtered = converter
            .convert(Path::new("a.pdf"), &ConvertOptions::default())
            .unwrap();
        assert_eq!(
            filtered.content,
            format!("Quarterly figures\n{}Summary line", PAGE_BREAK)
        );

        let raw = converter
            .convert(
                Path::new("a.pdf"),
                &ConvertOptions::new().with_remove_numeric_tables(false),
            )
            .unwrap();
        assert_eq!(
            raw.content,
            format!("Quarterly figures\n2019 2020 2021\n{}Summary line", PAGE_BREAK)
        );
        assert_eq!(raw.page_count, 2);
    }

    #[test]
    fn test_metadata_merge_and_id() {
        let converter =
            TikaConverter::with_service(StaticService::new(TABLE_MARKUP), ConverterConfig::new())
                .unwrap();
        let options = ConvertOptions::new()
            .with_meta_entry("title", "B")
            .with_meta_entry("author", "C");

        let result = converter.convert(Path::new("a.pdf"), &options).unwrap();
        assert_eq!(result.metadata["title"], "B");
        assert_eq!(result.metadata["author"], "C");
        assert_eq!(
            result.id,
            document_id(&result.content, &result.metadata, &[IdHashKey::Content])
        );

        let with_meta = converter
            .convert(
                Path::new("a.pdf"),
                &options.with_id_hash_keys(vec![IdHashKey::Content, IdHashKey::Meta]),
            )
            .unwrap();
        assert_ne!(with_meta.id, result.id);
    }

    #[test]
    fn test_language_skipped_without_allow_list() {
        let converter =
            TikaConverter::with_service(StaticService::new(TABLE_MARKUP), ConverterConfig::new())
                .unwrap();
        let result = converter
            .convert(Path::new("a.pdf"), &ConvertOptions::default())
            .unwrap();
        assert_eq!(result.language, LanguageCheck::Skipped);
    }

    #[test]
    fn test_name() {
        let converter =
            TikaConverter::with_service(StaticService::new(""), ConverterConfig::new()).unwrap();
        assert_eq!(converter.name(), "tika");
    }
}
