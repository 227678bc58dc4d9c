use std::sync::LazyLock;

use compact_str::{CompactString, ToCompactString};
use regex::Regex;

use crate::error::{Error, Result};

/// Canonical lowercase identifier for a comic's originating site. Selects the
/// extraction rule and doubles as the database key, so both live in the same
/// namespace.
pub type SourceKey = CompactString;

static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:https?://)?(?:www\.)?([\w-]+)").unwrap());

/// Derive the source key from a page URL: drop the scheme and a `www.`
/// prefix, take the first label of what remains.
pub fn identify(url: &str) -> Result<SourceKey> {
    let Some(label) = LABEL.captures(url).and_then(|c| c.get(1)) else {
        return Err(Error::InvalidUrl(url.to_owned()));
    };
    Ok(label.as_str().to_ascii_lowercase().to_compact_string())
}
