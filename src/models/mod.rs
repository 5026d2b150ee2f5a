//! Core data models for the application
//!
//! This module contains the primary data structures used throughout the application,
//! separated from the logic that operates on them.
//!
//! # Usage
//!
//! ```rust
//! use freeconvertor::models::ProxyRecord;
//!
//! let value: serde_yaml::Value = serde_yaml::from_str(
//!     "{type: trojan, name: t, server: example.com, port: 443, password: pw}",
//! )
//! .unwrap();
//! let record = ProxyRecord::from_value(&value).unwrap();
//! assert!(matches!(record, ProxyRecord::Trojan(ref t) if t.password == "pw"));
//! ```

mod app_state;
mod document;
mod proxy;
mod target;

pub use app_state::AppState;
pub use document::Document;
pub use proxy::*;
pub(crate) use proxy::non_empty;
pub use target::ConvertTarget;
