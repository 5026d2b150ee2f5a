pub mod error;
pub mod generator;
pub mod interfaces;
pub mod models;
pub mod parser;
pub mod settings;
pub mod utils;
#[cfg(feature = "web-api")]
pub mod web_handlers;

// Re-export the main types for easier access
pub use error::{ConvertError, EncodeError, ErrorKind, FetchFailure, Remedy};
pub use interfaces::{convert, convert_content, fetch_and_convert, ConversionResult};
pub use models::{ConvertTarget, Document, ProxyRecord};
pub use parser::parse_clash_yaml;
pub use settings::Settings;
