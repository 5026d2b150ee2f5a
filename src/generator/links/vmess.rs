use serde::Serialize;

use crate::error::EncodeError;
use crate::models::{non_empty, VMessProxy};
use crate::utils::base64_encode;

/// Body of a v2 vmess link. Field order is the order clients expect.
#[derive(Debug, Serialize)]
struct VMessLinkBody<'a> {
    v: &'static str,
    ps: &'a str,
    add: &'a str,
    port: String,
    id: &'a str,
    aid: String,
    net: &'a str,
    #[serde(rename = "type")]
    header_type: &'static str,
    host: &'a str,
    path: &'a str,
    tls: &'static str,
}

/// Format: vmess://BASE64(JSON)
pub fn vmess_to_link(node: &VMessProxy) -> Result<String, EncodeError> {
    let body = VMessLinkBody {
        v: "2",
        ps: &node.name,
        add: &node.server,
        port: node.port.to_string(),
        id: &node.uuid,
        aid: node.alter_id.unwrap_or(0).to_string(),
        net: non_empty(&node.network).unwrap_or("tcp"),
        header_type: "none",
        host: node.ws_host(),
        path: node.ws_path(),
        tls: if node.tls.unwrap_or(false) { "tls" } else { "" },
    };

    let json = serde_json::to_string(&body).map_err(|e| EncodeError::Serialize(e.to_string()))?;
    Ok(format!("vmess://{}", base64_encode(&json)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WsOptions;
    use crate::utils::base64_decode;
    use std::collections::HashMap;

    fn node() -> VMessProxy {
        VMessProxy {
            name: "节点 1".to_string(),
            server: "vm.example.com".to_string(),
            port: 443,
            uuid: "b831381d-6324-4d53-ad4f-8cda48b30811".to_string(),
            alter_id: None,
            network: None,
            tls: None,
            ws: None,
            ws_opts: None,
            ws_path: None,
            ws_headers: None,
        }
    }

    fn decode(link: &str) -> serde_json::Value {
        let body = link.strip_prefix("vmess://").unwrap();
        serde_json::from_str(&base64_decode(body)).unwrap()
    }

    #[test]
    fn test_defaults() {
        let link = vmess_to_link(&node()).unwrap();
        let json = decode(&link);
        assert_eq!(json["v"], "2");
        assert_eq!(json["ps"], "节点 1");
        assert_eq!(json["port"], "443");
        assert_eq!(json["aid"], "0");
        assert_eq!(json["net"], "tcp");
        assert_eq!(json["type"], "none");
        assert_eq!(json["host"], "");
        assert_eq!(json["path"], "");
        assert_eq!(json["tls"], "");
    }

    #[test]
    fn test_field_order() {
        let link = vmess_to_link(&node()).unwrap();
        let raw = base64_decode(link.strip_prefix("vmess://").unwrap());
        assert!(raw.starts_with(r#"{"v":"2","ps":"节点 1","add":"vm.example.com","port":"443","#));
        assert!(raw.ends_with(r#""type":"none","host":"","path":"","tls":""}"#));
    }

    #[test]
    fn test_websocket_tls() {
        let mut node = node();
        node.alter_id = Some(64);
        node.network = Some("ws".to_string());
        node.tls = Some(true);
        node.ws = Some(WsOptions {
            path: Some("/ray".to_string()),
            headers: Some(HashMap::from([(
                "Host".to_string(),
                "cdn.example.com".to_string(),
            )])),
        });

        let json = decode(&vmess_to_link(&node).unwrap());
        assert_eq!(json["aid"], "64");
        assert_eq!(json["net"], "ws");
        assert_eq!(json["host"], "cdn.example.com");
        assert_eq!(json["path"], "/ray");
        assert_eq!(json["tls"], "tls");
    }
}
