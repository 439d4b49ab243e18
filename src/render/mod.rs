//! Post-processing of extracted pages and output rendering.

mod json;
mod numeric;
mod text;

pub use json::{to_json, JsonFormat};
pub use numeric::{NumericTableFilter, DIGIT_RATIO_THRESHOLD};
pub use text::{join_pages, pages_of, PAGE_BREAK};
