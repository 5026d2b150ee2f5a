use std::fmt;
use std::str::FromStr;

use crate::error::ConvertError;

/// Output format requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvertTarget {
    /// Full Clash YAML configuration.
    Clash,
    /// Base64 link-list subscription.
    V2Ray,
    /// Same wire format as [`ConvertTarget::V2Ray`].
    Shadowrocket,
}

impl ConvertTarget {
    pub const ALL: [ConvertTarget; 3] = [
        ConvertTarget::Clash,
        ConvertTarget::V2Ray,
        ConvertTarget::Shadowrocket,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConvertTarget::Clash => "clash",
            ConvertTarget::V2Ray => "v2ray",
            ConvertTarget::Shadowrocket => "shadowrocket",
        }
    }

    /// Check if this target emits a base64 link list rather than a config file
    pub fn is_link_list(&self) -> bool {
        matches!(self, ConvertTarget::V2Ray | ConvertTarget::Shadowrocket)
    }

    pub fn content_type(&self) -> &'static str {
        if self.is_link_list() {
            "text/plain; charset=utf-8"
        } else {
            "text/yaml; charset=utf-8"
        }
    }

    /// Download name suggested to clients, if any.
    pub fn filename(&self) -> Option<&'static str> {
        match self {
            ConvertTarget::Clash => Some("clash_config.yaml"),
            _ => None,
        }
    }
}

impl FromStr for ConvertTarget {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConvertTarget::ALL
            .into_iter()
            .find(|target| target.as_str() == s)
            .ok_or_else(|| ConvertError::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for ConvertTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
