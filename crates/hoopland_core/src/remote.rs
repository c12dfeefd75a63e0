//! Checks around loading a save from a URL. The fetch itself belongs to the
//! front end; these helpers decide what may be fetched and what counts as a
//! save body.

use std::time::Duration;

use serde_json::Value;

use crate::core_api::{CoreError, CoreErrorCode};

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const ACCEPT_HEADER: &str = "application/json, text/plain, */*";
/// Display name for a save that did not come from a local file.
pub const DEFAULT_REMOTE_NAME: &str = "season_save.json";

/// Returns the trimmed URL when it is an `http` or `https` URL with a host.
pub fn validate_url(text: &str) -> Result<&str, CoreError> {
    let url = text.trim();
    if url.is_empty() {
        return Err(CoreError::new(CoreErrorCode::InvalidUrl, "URL is empty"));
    }

    let invalid = || {
        CoreError::new(
            CoreErrorCode::InvalidUrl,
            format!("invalid URL '{url}': only http:// and https:// URLs are allowed"),
        )
    };

    let (scheme, rest) = url.split_once("://").ok_or_else(invalid)?;
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return Err(invalid());
    }

    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = authority.rsplit('@').next().unwrap_or_default();
    if host.is_empty() || host.starts_with(':') || host.contains(char::is_whitespace) {
        return Err(invalid());
    }

    Ok(url)
}

/// Parses a fetched body, refusing anything that does not look like JSON
/// (an HTML error page, say) before handing it to the parser.
pub fn parse_body(text: &str) -> Result<Value, CoreError> {
    let trimmed = text.trim_start_matches('\u{feff}').trim();
    if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
        return Err(CoreError::new(
            CoreErrorCode::Parse,
            "response is not valid JSON",
        ));
    }
    serde_json::from_str(trimmed).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Parse,
            format!("failed to parse response as JSON: {e}"),
        )
    })
}
