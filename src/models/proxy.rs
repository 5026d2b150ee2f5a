//! Proxy model definitions
//!
//! One typed struct per supported protocol, tagged by the Clash `type` field.
//! Optional fields stay `Option`; the link encoders apply the defaults.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use serde_yaml::Value;

use crate::error::EncodeError;

/// Accepts a port written either as an integer or as a numeric string.
fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    struct PortVisitor;

    impl<'de> Visitor<'de> for PortVisitor {
        type Value = u16;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a port number between 0 and 65535")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u16::try_from(value).map_err(|_| E::custom(format!("port {} out of range", value)))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u16::try_from(value).map_err(|_| E::custom(format!("port {} out of range", value)))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            value
                .trim()
                .parse::<u16>()
                .map_err(|_| E::custom(format!("invalid port `{}`", value)))
        }
    }

    deserializer.deserialize_any(PortVisitor)
}

/// Accepts a scalar that YAML may have typed as a number (`password: 123456`).
fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumberVisitor;

    impl<'de> Visitor<'de> for StringOrNumberVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("string or number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumberVisitor)
}

/// Reads `alterId` written as an integer or a numeric string; null or "" is absent.
fn deserialize_alter_id<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    struct AlterIdVisitor;

    impl<'de> Visitor<'de> for AlterIdVisitor {
        type Value = Option<u32>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an alterId number")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(value)
                .map(Some)
                .map_err(|_| E::custom(format!("alterId {} out of range", value)))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(value)
                .map(Some)
                .map_err(|_| E::custom(format!("alterId {} out of range", value)))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let value = value.trim();
            if value.is_empty() {
                return Ok(None);
            }
            value
                .parse::<u32>()
                .map(Some)
                .map_err(|_| E::custom(format!("invalid alterId `{}`", value)))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(AlterIdVisitor)
}

/// Reads a `tls` flag written as a bool, `0`/`1`, or `"true"`/`"false"`.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = Option<bool>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a boolean flag")
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value != 0))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value != 0))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Some(true)),
                "false" | "0" | "" => Ok(Some(false)),
                other => Err(E::custom(format!("invalid flag `{}`", other))),
            }
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

/// Treats `Some("")` the same as `None`.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// WebSocket transport options (`ws` / `ws-opts`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WsOptions {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VMessProxy {
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub uuid: String,
    #[serde(rename = "alterId", default, deserialize_with = "deserialize_alter_id")]
    pub alter_id: Option<u32>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub tls: Option<bool>,
    #[serde(default)]
    pub ws: Option<WsOptions>,
    #[serde(rename = "ws-opts", default)]
    pub ws_opts: Option<WsOptions>,
    #[serde(rename = "ws-path", default)]
    pub ws_path: Option<String>,
    #[serde(rename = "ws-headers", default)]
    pub ws_headers: Option<HashMap<String, String>>,
}

impl VMessProxy {
    fn ws_sources(&self) -> impl Iterator<Item = &WsOptions> {
        self.ws.iter().chain(self.ws_opts.iter())
    }

    /// WebSocket `Host` header, or empty when none is configured.
    pub fn ws_host(&self) -> &str {
        self.ws_sources()
            .filter_map(|ws| ws.headers.as_ref())
            .chain(self.ws_headers.iter())
            .find_map(|headers| headers.get("Host").filter(|h| !h.is_empty()))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// WebSocket path, or empty when none is configured.
    pub fn ws_path(&self) -> &str {
        self.ws_sources()
            .find_map(|ws| non_empty(&ws.path))
            .or_else(|| non_empty(&self.ws_path))
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShadowsocksProxy {
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub cipher: String,
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShadowsocksRProxy {
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub cipher: String,
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub password: String,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub obfs: Option<String>,
    #[serde(rename = "obfs-param", default)]
    pub obfs_param: Option<String>,
    #[serde(rename = "protocol-param", default)]
    pub protocol_param: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrojanProxy {
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub password: String,
    #[serde(default)]
    pub sni: Option<String>,
    #[serde(rename = "skip-cert-verify", default)]
    pub skip_cert_verify: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VLessProxy {
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub uuid: String,
    #[serde(default)]
    pub encryption: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub tls: Option<bool>,
    #[serde(default)]
    pub sni: Option<String>,
    #[serde(default)]
    pub servername: Option<String>,
}

impl VLessProxy {
    /// `sni`, falling back to the Clash.Meta `servername` spelling.
    pub fn sni(&self) -> Option<&str> {
        non_empty(&self.sni).or_else(|| non_empty(&self.servername))
    }
}

/// One proxy node from a Clash `proxies` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ProxyRecord {
    #[serde(rename = "vmess")]
    VMess(VMessProxy),
    #[serde(rename = "ss")]
    Shadowsocks(ShadowsocksProxy),
    #[serde(rename = "ssr")]
    ShadowsocksR(ShadowsocksRProxy),
    #[serde(rename = "trojan")]
    Trojan(TrojanProxy),
    #[serde(rename = "vless")]
    VLess(VLessProxy),
    // Any other type tag; carried through Clash output, no link produced
    #[serde(other)]
    Unknown,
}

impl ProxyRecord {
    /// Reads one entry of the `proxies` sequence into its typed variant.
    pub fn from_value(value: &Value) -> Result<Self, EncodeError> {
        serde_yaml::from_value(value.clone()).map_err(|e| EncodeError::InvalidRecord {
            name: display_name(value),
            reason: e.to_string(),
        })
    }
}

/// Name of a raw proxy entry as it should appear in groups and diagnostics.
pub fn proxy_name(value: &Value) -> Option<String> {
    match value.get("name")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn display_name(value: &Value) -> String {
    proxy_name(value).unwrap_or_else(|| "<unnamed>".to_string())
}
