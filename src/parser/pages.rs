//! Page splitting over the markup event stream.

use super::markup::{tokenize, MarkupEvent};

/// Hyphen at a line wrap, removed to rejoin broken words.
const WRAPPED_HYPHEN: &str = "-\n";

/// Splitter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitState {
    /// Between pages; text is discarded
    Idle,
    /// Inside a page; text is accumulated
    #[default]
    Ingesting,
}

/// Two-state machine that turns markup events into page texts.
///
/// Capture starts enabled, is re-enabled by every page container start tag
/// and every `html` root, and is flushed into a new page by the first `div`
/// or `body` close while capturing.
///
/// # Example
///
/// ```
/// use untika::parser::{MarkupEvent, PageSplitter};
///
/// let mut splitter = PageSplitter::new();
/// splitter.feed(MarkupEvent::page_start());
/// splitter.feed(MarkupEvent::text("first page"));
/// splitter.feed(MarkupEvent::end("div"));
/// assert_eq!(splitter.finish(), vec!["first page".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PageSplitter {
    state: SplitState,
    buffer: String,
    pages: Vec<String>,
}

impl PageSplitter {
    /// Create a new splitter in the ingesting state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> SplitState {
        self.state
    }

    /// Number of pages flushed so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Process a single event.
    pub fn feed(&mut self, event: MarkupEvent) {
        match event {
            MarkupEvent::Start { page: true, .. } => {
                self.state = SplitState::Ingesting;
            }
            // Embedded documents follow the container as further roots
            MarkupEvent::Start { tag, .. } if tag == "html" => {
                self.state = SplitState::Ingesting;
            }
            MarkupEvent::Start { .. } => {}
            MarkupEvent::Text(text) => {
                if self.state == SplitState::Ingesting {
                    self.buffer.push_str(&text);
                }
            }
            MarkupEvent::End { tag } => {
                if self.state == SplitState::Ingesting && (tag == "div" || tag == "body") {
                    self.state = SplitState::Idle;
                    let page = std::mem::take(&mut self.buffer);
                    self.pages.push(page.replace(WRAPPED_HYPHEN, ""));
                }
            }
        }
    }

    /// Process every event of an iterator.
    pub fn feed_all<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = MarkupEvent>,
    {
        for event in events {
            self.feed(event);
        }
    }

    /// Finish splitting and return the pages in document order.
    ///
    /// Text still buffered (a body that was never closed) is dropped.
    pub fn finish(self) -> Vec<String> {
        if !self.buffer.is_empty() {
            log::debug!(
                "Dropping {} bytes of unterminated page content",
                self.buffer.len()
            );
        }
        self.pages
    }
}

/// Split Tika XHTML markup into page texts.
pub fn split_pages(markup: &str) -> Vec<String> {
    let mut splitter = PageSplitter::new();
    splitter.feed_all(tokenize(markup));
    splitter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_pages() {
        let markup = r#"<html><body><div class="page">One</div><div class="page">Two</div></body></html>"#;
        assert_eq!(split_pages(markup), vec!["One", "Two"]);
    }

    #[test]
    fn test_single_unpaginated_body() {
        let markup = "<html><body><p>Just text</p></body></html>";
        assert_eq!(split_pages(markup), vec!["Just text"]);
    }

    #[test]
    fn test_head_text_joins_first_page() {
        let markup =
            r#"<html><head><title>Title</title></head><body><div class="page">Body</div></body></html>"#;
        assert_eq!(split_pages(markup), vec!["TitleBody"]);
    }

    #[test]
    fn test_hyphenated_wrap_rejoined() {
        let markup = "<body><div class=\"page\">infor-\nmation</div></body>";
        assert_eq!(split_pages(markup), vec!["information"]);
    }

    #[test]
    fn test_text_between_pages_discarded() {
        let markup = r#"<body><div class="page">A</div>noise<div class="page">B</div>tail</body>"#;
        assert_eq!(split_pages(markup), vec!["A", "B"]);
    }

    #[test]
    fn test_unterminated_body_yields_nothing() {
        assert!(split_pages("<html><body><p>never closed").is_empty());
    }

    #[test]
    fn test_embedded_document_adds_pages() {
        let markup = concat!(
            r#"<html><body><div class="page">A</div><div class="page">B</div></body></html>"#,
            r#"<html><head><title>Sheet</title></head><body><p>C</p></body></html>"#,
        );
        assert_eq!(split_pages(markup), vec!["A", "B", "SheetC"]);
    }

    #[test]
    fn test_empty_page_kept() {
        let markup = r#"<body><div class="page"></div><div class="page">B</div></body>"#;
        assert_eq!(split_pages(markup), vec!["", "B"]);
    }

    #[test]
    fn test_state_transitions() {
        let mut splitter = PageSplitter::new();
        assert_eq!(splitter.state(), SplitState::Ingesting);

        splitter.feed(MarkupEvent::end("body"));
        assert_eq!(splitter.state(), SplitState::Idle);
        assert_eq!(splitter.page_count(), 1);

        splitter.feed(MarkupEvent::text("ignored"));
        splitter.feed(MarkupEvent::start("div"));
        assert_eq!(splitter.state(), SplitState::Idle);

        splitter.feed(MarkupEvent::page_start());
        assert_eq!(splitter.state(), SplitState::Ingesting);
        splitter.feed(MarkupEvent::text("kept"));
        splitter.feed(MarkupEvent::end("p"));
        splitter.feed(MarkupEvent::end("div"));

        assert_eq!(splitter.finish(), vec!["", "kept"]);
    }
}
