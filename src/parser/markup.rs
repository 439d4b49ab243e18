//! Forward-only tokenizer for Tika XHTML output.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;

/// Class token that marks a page container (`<div class="page">`).
const PAGE_CLASS: &str = "page";

/// A single markup event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    /// Opening tag. `page` is set for page containers.
    Start {
        /// Lowercased local tag name
        tag: String,
        /// Whether this element is a page container
        page: bool,
    },

    /// Closing tag.
    End {
        /// Lowercased local tag name
        tag: String,
    },

    /// Character data, entity-unescaped.
    Text(String),
}

impl MarkupEvent {
    /// Create a start event for a plain element.
    pub fn start(tag: impl Into<String>) -> Self {
        MarkupEvent::Start {
            tag: tag.into(),
            page: false,
        }
    }

    /// Create a start event for a page container.
    pub fn page_start() -> Self {
        MarkupEvent::Start {
            tag: "div".to_string(),
            page: true,
        }
    }

    /// Create an end event.
    pub fn end(tag: impl Into<String>) -> Self {
        MarkupEvent::End { tag: tag.into() }
    }

    /// Create a text event.
    pub fn text(text: impl Into<String>) -> Self {
        MarkupEvent::Text(text.into())
    }
}

/// Tokenize markup into a flat event sequence.
///
/// Declarations, comments, processing instructions and doctypes are skipped.
/// A self-closing element produces a `Start` immediately followed by an `End`.
/// Malformed markup stops the scan at the first reader error; events read up
/// to that point are returned.
pub fn tokenize(markup: &str) -> Vec<MarkupEvent> {
    let mut reader = Reader::from_str(markup);
    reader.check_end_names(false);

    let mut events = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => events.push(start_event(&e)),
            Ok(Event::Empty(e)) => {
                let start = start_event(&e);
                if let MarkupEvent::Start { ref tag, .. } = start {
                    let end = MarkupEvent::end(tag.clone());
                    events.push(start);
                    events.push(end);
                }
            }
            Ok(Event::End(e)) => events.push(MarkupEvent::End {
                tag: tag_name(e.local_name().as_ref()),
            }),
            Ok(Event::Text(e)) => {
                let text = match e.unescape() {
                    Ok(text) => text.into_owned(),
                    Err(_) => String::from_utf8_lossy(&e).into_owned(),
                };
                push_text(&mut events, text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                push_text(&mut events, text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                log::debug!(
                    "Stopping markup scan at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
        }
    }

    events
}

fn push_text(events: &mut Vec<MarkupEvent>, text: String) {
    if !text.is_empty() {
        events.push(MarkupEvent::Text(text));
    }
}

fn start_event(e: &BytesStart<'_>) -> MarkupEvent {
    let tag = tag_name(e.local_name().as_ref());
    let page = tag == "div" && has_page_class(e);
    MarkupEvent::Start { tag, page }
}

fn tag_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn has_page_class(e: &BytesStart<'_>) -> bool {
    e.attributes().flatten().any(|attr| {
        if !attr.key.local_name().as_ref().eq_ignore_ascii_case(b"class") {
            return false;
        }
        let value = attr
            .unescape_value()
            .unwrap_or_else(|_| Cow::Owned(String::from_utf8_lossy(&attr.value).into_owned()));
        value.split_whitespace().any(|class| class == PAGE_CLASS)
    })
}
