//! URL encoding utilities

/// Percent-encodes a string for use in a link fragment
///
/// # Examples
/// ```
/// use freeconvertor::utils::url::url_encode;
///
/// let encoded = url_encode("Hello World!");
/// assert_eq!(encoded, "Hello%20World%21");
/// ```
pub fn url_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}
