//! Single-node link encoders, one per supported protocol.

mod ss;
mod ssr;
mod trojan;
mod vless;
mod vmess;

pub use ss::ss_to_link;
pub use ssr::ssr_to_link;
pub use trojan::trojan_to_link;
pub use vless::vless_to_link;
pub use vmess::vmess_to_link;

use crate::error::EncodeError;
use crate::models::ProxyRecord;

/// Convert a proxy to its share link
///
/// Returns `Ok(None)` for types without a link form; those nodes are skipped,
/// not reported.
pub fn proxy_to_link(record: &ProxyRecord) -> Result<Option<String>, EncodeError> {
    let link = match record {
        ProxyRecord::VMess(node) => vmess_to_link(node)?,
        ProxyRecord::Shadowsocks(node) => ss_to_link(node),
        ProxyRecord::ShadowsocksR(node) => ssr_to_link(node),
        ProxyRecord::Trojan(node) => trojan_to_link(node),
        ProxyRecord::VLess(node) => vless_to_link(node),
        ProxyRecord::Unknown => return Ok(None),
    };
    Ok(Some(link))
}
