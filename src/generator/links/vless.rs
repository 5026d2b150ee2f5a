use url::form_urlencoded;

use crate::models::{non_empty, VLessProxy};
use crate::utils::url_encode;

/// Format: vless://uuid@server:port?encryption=..&type=..&security=tls&sni=..#remark
pub fn vless_to_link(node: &VLessProxy) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("encryption", non_empty(&node.encryption).unwrap_or("none"));
    if let Some(network) = non_empty(&node.network) {
        query.append_pair("type", network);
    }
    if node.tls.unwrap_or(false) {
        query.append_pair("security", "tls");
    }
    if let Some(sni) = node.sni() {
        query.append_pair("sni", sni);
    }

    format!(
        "vless://{}@{}:{}?{}#{}",
        node.uuid,
        node.server,
        node.port,
        query.finish(),
        url_encode(&node.name)
    )
}
