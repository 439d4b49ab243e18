//! Document-level types: metadata and stable document ids.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Document metadata as string key/value pairs, sorted by key.
pub type Metadata = BTreeMap<String, String>;

/// Merge service-extracted metadata with caller-supplied metadata.
///
/// The result is the union of both maps; on key collisions the caller's value
/// wins.
pub fn merge_metadata(service: &Metadata, caller: Option<&Metadata>) -> Metadata {
    let mut merged = service.clone();
    if let Some(caller) = caller {
        for (key, value) in caller {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Document attribute that contributes to the document id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdHashKey {
    /// The converted text
    Content,
    /// The merged metadata
    Meta,
}

impl IdHashKey {
    /// Keys used when none are configured.
    pub const DEFAULT: &'static [IdHashKey] = &[IdHashKey::Content];

    /// Key name as accepted by `FromStr`.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdHashKey::Content => "content",
            IdHashKey::Meta => "meta",
        }
    }
}

impl fmt::Display for IdHashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdHashKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "content" => Ok(IdHashKey::Content),
            "meta" | "metadata" => Ok(IdHashKey::Meta),
            other => Err(format!(
                "unknown id hash key '{}' (expected 'content' or 'meta')",
                other
            )),
        }
    }
}

/// Compute a stable document id from the selected attributes.
///
/// The id is the hex MD5 digest of the selected parts in the given order.
/// Metadata is hashed as compact JSON of the sorted map. An empty key list
/// behaves like [`IdHashKey::DEFAULT`].
pub fn document_id(content: &str, metadata: &Metadata, keys: &[IdHashKey]) -> String {
    let keys = if keys.is_empty() {
        IdHashKey::DEFAULT
    } else {
        keys
    };

    let mut hasher = Md5::new();
    for key in keys {
        match key {
            IdHashKey::Content => hasher.update(content.as_bytes()),
            IdHashKey::Meta => {
                // BTreeMap<String, String> always serializes
                let meta = serde_json::to_string(metadata).unwrap_or_default();
                hasher.update(meta.as_bytes());
            }
        }
    }

    format!("{:x}", hasher.finalize())
}
