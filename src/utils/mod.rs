pub mod base64;
pub mod http;
pub mod url;

pub use base64::base64_encode;
#[cfg(test)]
pub(crate) use base64::base64_decode;
pub use url::url_encode;
