use log::info;

use crate::error::ConvertError;
use crate::generator::{proxy_to_clash, proxy_to_shadowrocket, proxy_to_single};
use crate::models::{ConvertTarget, Document};
use crate::parser::parse_clash_yaml;
use crate::utils::http::{fetch_document, FetchOptions};

/// Result of a conversion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub target: ConvertTarget,
    /// Converted content
    pub content: String,
    /// Number of entries in the source `proxies` list
    pub node_count: usize,
    /// `subscription-userinfo` reported by the upstream, if fetched
    pub subscription_userinfo: Option<String>,
}

fn dispatch(document: &Document, target: ConvertTarget) -> Result<String, ConvertError> {
    match target {
        ConvertTarget::Clash => proxy_to_clash(document),
        ConvertTarget::V2Ray => Ok(proxy_to_single(document)),
        ConvertTarget::Shadowrocket => Ok(proxy_to_shadowrocket(document)),
    }
}

/// Convert a validated document to the named target format
///
/// # Errors
/// `UnsupportedFormat` when `target` is not one of `clash`, `v2ray`,
/// `shadowrocket`.
pub fn convert(document: &Document, target: &str) -> Result<String, ConvertError> {
    dispatch(document, target.parse()?)
}

/// Convert supplied configuration text
///
/// The target is checked before the text is parsed, so an unknown format is
/// reported even for unparseable input.
pub fn convert_content(content: &str, target: &str) -> Result<ConversionResult, ConvertError> {
    let target: ConvertTarget = target.parse()?;
    let document = parse_clash_yaml(content)?;
    let converted = dispatch(&document, target)?;
    info!(
        "Converted configuration with {} nodes to {}",
        document.proxies.len(),
        target
    );

    Ok(ConversionResult {
        target,
        content: converted,
        node_count: document.proxies.len(),
        subscription_userinfo: None,
    })
}

/// Fetch a remote configuration and convert it
///
/// No network I/O happens when `target` is unsupported.
pub async fn fetch_and_convert(
    url: &str,
    target: &str,
    options: &FetchOptions,
) -> Result<ConversionResult, ConvertError> {
    let parsed_target: ConvertTarget = target.parse()?;
    info!("Fetching configuration: {}", url);
    let fetched = fetch_document(url, options).await?;

    let mut result = convert_content(&fetched.body, parsed_target.as_str())?;
    result.subscription_userinfo = fetched.subscription_userinfo;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SS_ONLY: &str = "proxies:\n  - {type: ss, name: n1, cipher: aes-256-gcm, password: pw, server: 1.2.3.4, port: 8388}\n";

    #[test]
    fn test_dispatch_by_name() {
        let document = parse_clash_yaml(SS_ONLY).unwrap();
        assert!(convert(&document, "clash").unwrap().contains("socks-port: 7891"));
        assert_eq!(
            convert(&document, "v2ray").unwrap(),
            convert(&document, "shadowrocket").unwrap()
        );
    }

    #[test]
    fn test_unknown_format_checked_first() {
        let err = convert_content("not: [valid", "wireguard").unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(ref f) if f == "wireguard"));
    }

    #[test]
    fn test_convert_content_counts_nodes() {
        let result = convert_content(SS_ONLY, "v2ray").unwrap();
        assert_eq!(result.target, ConvertTarget::V2Ray);
        assert_eq!(result.node_count, 1);
        assert_eq!(result.subscription_userinfo, None);
    }

    #[tokio::test]
    async fn test_fetch_skipped_for_unknown_format() {
        // an unroutable URL would fail differently if it were fetched
        let err = fetch_and_convert("http://192.0.2.1/sub", "wireguard", &FetchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(_)));
    }
}
