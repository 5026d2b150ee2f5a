use base64::{engine::general_purpose, Engine as _};

/// Encodes a string to standard, padded Base64.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Inverse of [`base64_encode`] for assertions; invalid input decodes to "".
#[cfg(test)]
pub(crate) fn base64_decode(input: &str) -> String {
    general_purpose::STANDARD
        .decode(input)
        .map(|decoded| String::from_utf8_lossy(&decoded).into_owned())
        .unwrap_or_default()
}
