//! Language detection and validation.
//!
//! Text extracted with the wrong encoding usually reads as garbage in no
//! particular language. Checking the dominant language against the languages a
//! corpus is expected to contain is a cheap way to catch that.

use serde::{Deserialize, Serialize};

/// Outcome of checking a text against an allow-list of languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LanguageCheck {
    /// No allow-list was configured
    Skipped,
    /// The detected language is allowed
    Valid {
        /// ISO 639-1 code of the detected language
        detected: String,
    },
    /// The language is not allowed or could not be detected
    Mismatch {
        /// ISO 639-1 code of the detected language, if any
        detected: Option<String>,
    },
}

impl LanguageCheck {
    /// Whether the check reported a mismatch.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, LanguageCheck::Mismatch { .. })
    }

    /// The detected language code, if detection ran and succeeded.
    pub fn detected(&self) -> Option<&str> {
        match self {
            LanguageCheck::Skipped => None,
            LanguageCheck::Valid { detected } => Some(detected),
            LanguageCheck::Mismatch { detected } => detected.as_deref(),
        }
    }
}

/// Detect the dominant language of a text.
///
/// # Returns
/// * `Some(code)` with an ISO 639-1 code
/// * `None` if the text has no detectable language
///
/// # Example
/// ```
/// use untika::detect::detect_language;
///
/// let lang = detect_language("The quick brown fox jumps over the lazy dog and keeps running.");
/// assert_eq!(lang, Some("en"));
/// ```
pub fn detect_language(text: &str) -> Option<&'static str> {
    let info = whatlang::detect(text)?;
    iso_639_1(info.lang().code())
}

/// Check the dominant language of `text` against `allowed` ISO 639-1 codes.
///
/// An empty allow-list skips detection entirely.
pub fn validate_language<S: AsRef<str>>(text: &str, allowed: &[S]) -> LanguageCheck {
    if allowed.is_empty() {
        return LanguageCheck::Skipped;
    }

    match detect_language(text) {
        Some(code) if allowed.iter().any(|a| a.as_ref().eq_ignore_ascii_case(code)) => {
            LanguageCheck::Valid {
                detected: code.to_string(),
            }
        }
        detected => LanguageCheck::Mismatch {
            detected: detected.map(str::to_string),
        },
    }
}

/// Map an ISO 639-3 code to ISO 639-1.
fn iso_639_1(code: &str) -> Option<&'static str> {
    let mapped = match code {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "nb",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        _ => return None,
    };
    Some(mapped)
}
