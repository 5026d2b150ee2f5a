use log::debug;
use serde_yaml::Value;

use crate::error::ConvertError;
use crate::models::Document;

/// Parse and validate a Clash configuration from YAML text
///
/// Validation is all-or-nothing: the returned [`Document`] always has a
/// non-empty `proxies` sequence, and nothing is returned otherwise.
///
/// # Errors
/// * `MalformedDocument` - the text is not YAML, or `proxy-groups`/`rules`
///   are present but not sequences
/// * `MissingProxies` - no document, no `proxies` key, or `proxies` is not a
///   non-empty sequence
pub fn parse_clash_yaml(content: &str) -> Result<Document, ConvertError> {
    let value: Value = serde_yaml::from_str(content)
        .map_err(|e| ConvertError::MalformedDocument(format!("YAML parse failed: {}", e)))?;

    let has_proxies = value
        .get("proxies")
        .and_then(Value::as_sequence)
        .is_some_and(|proxies| !proxies.is_empty());
    if !has_proxies {
        return Err(ConvertError::MissingProxies);
    }

    let document: Document = serde_yaml::from_value(value)
        .map_err(|e| ConvertError::MalformedDocument(e.to_string()))?;
    debug!(
        "Parsed configuration with {} proxies",
        document.proxies.len()
    );
    Ok(document)
}
