use serde::Serialize;
use serde_yaml::Value;

use crate::error::ConvertError;
use crate::models::Document;

pub const GROUP_SELECT: &str = "🚀 节点选择";
pub const GROUP_AUTO: &str = "♻️ 自动选择";
pub const HEALTH_CHECK_URL: &str = "http://www.gstatic.com/generate_204";
pub const HEALTH_CHECK_INTERVAL: u32 = 300;

/// Rules used when the source configuration has none. Last one is the catch-all.
pub const DEFAULT_RULES: [&str; 6] = [
    "DOMAIN-SUFFIX,google.com,🚀 节点选择",
    "DOMAIN-KEYWORD,google,🚀 节点选择",
    "DOMAIN,google.com,🚀 节点选择",
    "DOMAIN-SUFFIX,ad.com,REJECT",
    "GEOIP,CN,DIRECT",
    "MATCH,🚀 节点选择",
];

/// Proxy group synthesized when the source has no `proxy-groups`
#[derive(Debug, Clone, Serialize)]
pub struct ClashProxyGroup {
    pub name: String,
    #[serde(rename = "type")]
    pub group_type: &'static str,
    pub proxies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ProxyGroups<'a> {
    Generated(Vec<ClashProxyGroup>),
    Source(&'a [Value]),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Rules<'a> {
    Generated(&'static [&'static str]),
    Source(&'a [Value]),
}

/// Represents a complete Clash configuration output
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ClashYamlOutput<'a> {
    port: u16,
    socks_port: u16,
    allow_lan: bool,
    mode: &'static str,
    log_level: &'static str,
    external_controller: &'static str,
    proxies: &'a [Value],
    proxy_groups: ProxyGroups<'a>,
    rules: Rules<'a>,
}

/// The manual-selection and latency-tested groups over every proxy name.
pub fn default_proxy_groups(names: &[String]) -> Vec<ClashProxyGroup> {
    let mut select = vec![GROUP_AUTO.to_string(), "DIRECT".to_string()];
    select.extend(names.iter().cloned());

    vec![
        ClashProxyGroup {
            name: GROUP_SELECT.to_string(),
            group_type: "select",
            proxies: select,
            url: None,
            interval: None,
        },
        ClashProxyGroup {
            name: GROUP_AUTO.to_string(),
            group_type: "url-test",
            proxies: names.to_vec(),
            url: Some(HEALTH_CHECK_URL),
            interval: Some(HEALTH_CHECK_INTERVAL),
        },
    ]
}

/// Convert a document to a Clash configuration
///
/// General settings are fixed (mixed port 7890, SOCKS 7891, rule mode), the
/// proxies are copied verbatim, and `proxy-groups` / `rules` from the source
/// replace the generated defaults wholesale when present.
pub fn proxy_to_clash(document: &Document) -> Result<String, ConvertError> {
    let proxy_groups = match &document.proxy_groups {
        Some(groups) => ProxyGroups::Source(groups),
        None => ProxyGroups::Generated(default_proxy_groups(&document.proxy_names())),
    };
    let rules = match &document.rules {
        Some(rules) => Rules::Source(rules),
        None => Rules::Generated(&DEFAULT_RULES),
    };

    let output = ClashYamlOutput {
        port: 7890,
        socks_port: 7891,
        allow_lan: false,
        mode: "Rule",
        log_level: "debug",
        external_controller: "127.0.0.1:9090",
        proxies: &document.proxies,
        proxy_groups,
        rules,
    };

    serde_yaml::to_string(&output).map_err(|e| {
        ConvertError::MalformedDocument(format!("failed to serialize Clash config: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_clash_yaml;

    const SOURCE: &str = r#"
proxies:
  - {type: ss, name: a, cipher: aes-256-gcm, password: pw, server: 1.2.3.4, port: 8388}
  - {type: hysteria2, name: b, server: 5.6.7.8, port: 443, password: pw}
  - {type: ss, name: a, cipher: aes-256-gcm, password: pw2, server: 1.2.3.5, port: 8388}
"#;

    fn output(yaml: &str) -> Value {
        let document = parse_clash_yaml(yaml).unwrap();
        serde_yaml::from_str(&proxy_to_clash(&document).unwrap()).unwrap()
    }

    #[test]
    fn test_general_settings() {
        let out = output(SOURCE);
        assert_eq!(out["port"], Value::from(7890));
        assert_eq!(out["socks-port"], Value::from(7891));
        assert_eq!(out["allow-lan"], Value::from(false));
        assert_eq!(out["mode"], Value::from("Rule"));
        assert_eq!(out["external-controller"], Value::from("127.0.0.1:9090"));
    }

    #[test]
    fn test_key_order() {
        let document = parse_clash_yaml(SOURCE).unwrap();
        let text = proxy_to_clash(&document).unwrap();
        let positions: Vec<usize> = [
            "port:",
            "socks-port:",
            "allow-lan:",
            "mode:",
            "log-level:",
            "external-controller:",
            "proxies:",
            "proxy-groups:",
            "rules:",
        ]
        .iter()
        .map(|key| text.find(key).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);
    }

    #[test]
    fn test_proxies_copied_verbatim() {
        let document = parse_clash_yaml(SOURCE).unwrap();
        let out = output(SOURCE);
        assert_eq!(out["proxies"], Value::Sequence(document.proxies.clone()));
    }

    #[test]
    fn test_generated_groups() {
        let out = output(SOURCE);
        let groups = out["proxy-groups"].as_sequence().unwrap();
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0]["name"], Value::from(GROUP_SELECT));
        assert_eq!(groups[0]["type"], Value::from("select"));
        let select: Vec<&str> = groups[0]["proxies"]
            .as_sequence()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        // duplicate names are passed through
        assert_eq!(select, vec![GROUP_AUTO, "DIRECT", "a", "b", "a"]);

        assert_eq!(groups[1]["name"], Value::from(GROUP_AUTO));
        assert_eq!(groups[1]["type"], Value::from("url-test"));
        assert_eq!(groups[1]["url"], Value::from(HEALTH_CHECK_URL));
        assert_eq!(groups[1]["interval"], Value::from(300));
        assert_eq!(groups[1]["proxies"].as_sequence().unwrap().len(), 3);
    }

    #[test]
    fn test_default_rules() {
        let out = output(SOURCE);
        let rules = out["rules"].as_sequence().unwrap();
        assert_eq!(rules.len(), 6);
        assert_eq!(rules[5], Value::from("MATCH,🚀 节点选择"));
    }

    #[test]
    fn test_source_groups_and_rules_replace_defaults() {
        let yaml = format!(
            "{}proxy-groups:\n  - {{name: Only, type: select, proxies: [a]}}\nrules:\n  - MATCH,Only\n",
            SOURCE
        );
        let out = output(&yaml);
        let groups = out["proxy-groups"].as_sequence().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["name"], Value::from("Only"));
        assert_eq!(out["rules"], Value::Sequence(vec![Value::from("MATCH,Only")]));
    }

    #[test]
    fn test_long_lines_not_wrapped() {
        let long_name = ["word"; 40].join(" ");
        let long_rule = format!("DOMAIN-KEYWORD,{},DIRECT", ["segment"; 15].join(" "));
        let yaml = format!(
            "proxies:\n  - {{type: ss, name: '{}', cipher: c, password: p, server: s, port: 1}}\nrules:\n  - '{}'\n",
            long_name, long_rule
        );
        let document = parse_clash_yaml(&yaml).unwrap();
        let text = proxy_to_clash(&document).unwrap();
        assert!(text.lines().any(|line| line.ends_with(&long_name)));
        assert!(text.lines().any(|line| line.ends_with(&long_rule)));

        let reparsed: Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(reparsed["rules"][0].as_str(), Some(long_rule.as_str()));
    }
}
