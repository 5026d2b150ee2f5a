use serde::Deserialize;
use serde_yaml::Value;

use crate::error::EncodeError;
use crate::models::proxy::{proxy_name, ProxyRecord};

/// A validated Clash configuration, as accepted by the converters.
///
/// `proxies` keeps the raw entries so the Clash converter can copy them
/// verbatim; the link encoders read typed [`ProxyRecord`]s from them on demand.
/// Only [`crate::parser::parse_clash_yaml`] hands out values of this type, and
/// it guarantees `proxies` is non-empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Document {
    pub proxies: Vec<Value>,
    #[serde(rename = "proxy-groups", default)]
    pub proxy_groups: Option<Vec<Value>>,
    #[serde(default)]
    pub rules: Option<Vec<Value>>,
}

impl Document {
    /// Typed view of every entry, in document order.
    pub fn records(&self) -> impl Iterator<Item = Result<ProxyRecord, EncodeError>> + '_ {
        self.proxies.iter().map(ProxyRecord::from_value)
    }

    /// Names of all entries that carry one, in document order. Duplicates are kept.
    pub fn proxy_names(&self) -> Vec<String> {
        self.proxies.iter().filter_map(proxy_name).collect()
    }
}
