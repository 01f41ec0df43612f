//! URL utilities: normalization, favicon derivation, safe-open check.
//!
//! All three are pure string functions. Favicon derivation follows the
//! Google s2 icon service convention and degrades to `None` (the
//! presentation layer substitutes `FAVICON_FALLBACK`) when the URL has
//! no parseable host.

use url::Url;

use crate::error::{Error, Result};

/// Fallback icon path used when no favicon can be derived.
pub const FAVICON_FALLBACK: &str = "/placeholder.svg";

/// Trim the input and prefix `https://` when no scheme is present.
///
/// `http://` URLs are left as entered; empty input stays empty.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty()
        || trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
    {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Derive a best-effort favicon reference from a URL's host.
pub fn favicon_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(format!(
        "https://www.google.com/s2/favicons?domain={}&sz=32",
        urlencoding::encode(host)
    ))
}

/// Whether a URL may be handed to the navigation layer.
///
/// Only `http` and `https` pass; everything else, including
/// `javascript:` and unparseable input, is refused.
pub fn is_safe_to_open(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Navigation seam. The surrounding application supplies the real
/// window/tab opener; tests supply a recorder.
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str);
}

/// Open a URL through the opener after the safe-scheme check.
pub fn open_external(url: &str, opener: &dyn UrlOpener) -> Result<()> {
    if !is_safe_to_open(url) {
        return Err(Error::UnsafeScheme(url.to_string()));
    }
    opener.open(url);
    Ok(())
}
