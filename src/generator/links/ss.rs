use crate::models::ShadowsocksProxy;
use crate::utils::{base64_encode, url_encode};

/// Format: ss://BASE64(method:password@server:port)#remark
pub fn ss_to_link(node: &ShadowsocksProxy) -> String {
    let user_info = format!(
        "{}:{}@{}:{}",
        node.cipher, node.password, node.server, node.port
    );
    format!(
        "ss://{}#{}",
        base64_encode(&user_info),
        url_encode(&node.name)
    )
}
