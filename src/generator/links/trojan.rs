use crate::models::{non_empty, TrojanProxy};
use crate::utils::url_encode;

/// Format: trojan://password@server:port?sni=sni&allowInsecure=0|1#remark
pub fn trojan_to_link(node: &TrojanProxy) -> String {
    let sni = non_empty(&node.sni).unwrap_or(node.server.as_str());
    let allow_insecure = if node.skip_cert_verify.unwrap_or(false) {
        "1"
    } else {
        "0"
    };
    format!(
        "trojan://{}@{}:{}?sni={}&allowInsecure={}#{}",
        node.password,
        node.server,
        node.port,
        sni,
        allow_insecure,
        url_encode(&node.name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> TrojanProxy {
        TrojanProxy {
            name: "JP Trojan".to_string(),
            server: "jp.example.com".to_string(),
            port: 443,
            password: "pw".to_string(),
            sni: None,
            skip_cert_verify: None,
        }
    }

    #[test]
    fn test_sni_defaults_to_server() {
        assert_eq!(
            trojan_to_link(&node()),
            "trojan://pw@jp.example.com:443?sni=jp.example.com&allowInsecure=0#JP%20Trojan"
        );
    }

    #[test]
    fn test_sni_and_skip_verify() {
        let mut node = node();
        node.sni = Some("front.example.com".to_string());
        node.skip_cert_verify = Some(true);
        assert_eq!(
            trojan_to_link(&node),
            "trojan://pw@jp.example.com:443?sni=front.example.com&allowInsecure=1#JP%20Trojan"
        );
    }
}
