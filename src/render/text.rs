//! Plain text assembly of cleaned pages.

/// Control character placed between pages (form feed).
pub const PAGE_BREAK: char = '\u{000C}';

/// Join page texts into the final document text.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut output = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            output.push(PAGE_BREAK);
        }
        output.push_str(page.as_ref());
    }
    output
}

/// Split document text back into its pages.
pub fn pages_of(text: &str) -> impl Iterator<Item = &str> {
    text.split(PAGE_BREAK)
}
