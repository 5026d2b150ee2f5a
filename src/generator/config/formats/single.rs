use log::{debug, warn};
use serde_yaml::Value;

use crate::error::EncodeError;
use crate::generator::links::proxy_to_link;
use crate::models::{proxy_name, Document, ProxyRecord};
use crate::utils::base64_encode;

/// What happened to one entry of the `proxies` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Encoded(String),
    /// Type without a link form; skipped quietly.
    Unsupported(String),
    /// Supported type whose fields could not be encoded; dropped and logged.
    Failed(EncodeError),
}

fn encode_entry(entry: &Value) -> LinkOutcome {
    let encoded = ProxyRecord::from_value(entry).and_then(|record| proxy_to_link(&record));
    match encoded {
        Ok(Some(link)) => LinkOutcome::Encoded(link),
        Ok(None) => {
            let proxy_type = entry
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            LinkOutcome::Unsupported(proxy_type)
        }
        Err(e) => LinkOutcome::Failed(e),
    }
}

/// Encode every proxy of the document, in document order
///
/// One outcome per entry; a bad entry never stops the rest.
pub fn proxy_to_links(document: &Document) -> Vec<LinkOutcome> {
    document.proxies.iter().map(encode_entry).collect()
}

/// Convert proxies to a V2Ray subscription
///
/// The links of all encodable nodes are joined with `\n` and the whole list
/// is base64-encoded once more.
pub fn proxy_to_single(document: &Document) -> String {
    let mut links = Vec::with_capacity(document.proxies.len());

    for (entry, outcome) in document.proxies.iter().zip(proxy_to_links(document)) {
        match outcome {
            LinkOutcome::Encoded(link) => links.push(link),
            LinkOutcome::Unsupported(proxy_type) => {
                debug!(
                    "Skipping proxy {:?} with unsupported type `{}`",
                    proxy_name(entry),
                    proxy_type
                );
            }
            LinkOutcome::Failed(e) => warn!("Failed to convert node: {}", e),
        }
    }

    base64_encode(&links.join("\n"))
}

/// Shadowrocket reads the same subscription format as V2Ray.
pub fn proxy_to_shadowrocket(document: &Document) -> String {
    proxy_to_single(document)
}
