//! Markup parsing: Tika XHTML to page texts.

mod markup;
mod pages;

pub use markup::{tokenize, MarkupEvent};
pub use pages::{split_pages, PageSplitter, SplitState};
