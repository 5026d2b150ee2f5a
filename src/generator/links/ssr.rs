use crate::models::{non_empty, ShadowsocksRProxy};
use crate::utils::base64_encode;

/// Format: ssr://BASE64(server:port:protocol:method:obfs:BASE64(password)/?obfsparam=BASE64(obfs_param)&protoparam=BASE64(protocol_param)&remarks=BASE64(remark))
pub fn ssr_to_link(node: &ShadowsocksRProxy) -> String {
    let mut plain_text = format!(
        "{}:{}:{}:{}:{}:{}",
        node.server,
        node.port,
        non_empty(&node.protocol).unwrap_or("origin"),
        node.cipher,
        non_empty(&node.obfs).unwrap_or("plain"),
        base64_encode(&node.password)
    );

    let mut params = Vec::new();
    if let Some(obfs_param) = non_empty(&node.obfs_param) {
        params.push(format!("obfsparam={}", base64_encode(obfs_param)));
    }
    if let Some(protocol_param) = non_empty(&node.protocol_param) {
        params.push(format!("protoparam={}", base64_encode(protocol_param)));
    }
    params.push(format!("remarks={}", base64_encode(&node.name)));

    plain_text.push_str("/?");
    plain_text.push_str(&params.join("&"));

    format!("ssr://{}", base64_encode(&plain_text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::base64_decode;

    fn node() -> ShadowsocksRProxy {
        ShadowsocksRProxy {
            name: "ssr1".to_string(),
            server: "ssr.example.com".to_string(),
            port: 9000,
            cipher: "aes-256-cfb".to_string(),
            password: "pass".to_string(),
            protocol: None,
            obfs: None,
            obfs_param: None,
            protocol_param: None,
        }
    }

    #[test]
    fn test_defaults_and_remarks() {
        let link = ssr_to_link(&node());
        let plain = base64_decode(link.strip_prefix("ssr://").unwrap());
        assert_eq!(
            plain,
            format!(
                "ssr.example.com:9000:origin:aes-256-cfb:plain:{}/?remarks={}",
                base64_encode("pass"),
                base64_encode("ssr1")
            )
        );
    }

    #[test]
    fn test_params_order() {
        let mut node = node();
        node.protocol = Some("auth_aes128_md5".to_string());
        node.obfs = Some("tls1.2_ticket_auth".to_string());
        node.obfs_param = Some("obfs.example.com".to_string());
        node.protocol_param = Some("32:abc".to_string());

        let link = ssr_to_link(&node);
        let plain = base64_decode(link.strip_prefix("ssr://").unwrap());
        assert_eq!(
            plain,
            format!(
                "ssr.example.com:9000:auth_aes128_md5:aes-256-cfb:tls1.2_ticket_auth:{}/?obfsparam={}&protoparam={}&remarks={}",
                base64_encode("pass"),
                base64_encode("obfs.example.com"),
                base64_encode("32:abc"),
                base64_encode("ssr1")
            )
        );
    }

    #[test]
    fn test_empty_params_are_absent() {
        let mut node = node();
        node.obfs_param = Some(String::new());
        let link = ssr_to_link(&node);
        let plain = base64_decode(link.strip_prefix("ssr://").unwrap());
        assert!(!plain.contains("obfsparam"));
    }
}
