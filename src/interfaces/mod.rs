pub mod converter;

pub use converter::{convert, convert_content, fetch_and_convert, ConversionResult};
