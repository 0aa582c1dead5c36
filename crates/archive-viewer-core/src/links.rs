//! Provider URL templates.
//!
//! | Resource | Template |
//! |----------|----------|
//! | Metadata | `<base>/metadata/<identifier>` |
//! | Download | `<base>/download/<identifier>/<file name>` |
//!
//! Identifiers and file names are percent-encoded per path segment. File
//! names may contain `/` (files nested in a record's subdirectories); those
//! separators are kept.

/// URL of the metadata document for `identifier`.
pub fn metadata_url(base_url: &str, identifier: &str) -> String {
    format!(
        "{}/metadata/{}",
        base_url.trim_end_matches('/'),
        encode_segment(identifier)
    )
}

/// URL a user opens to download `file_name` from record `identifier`.
pub fn download_url(base_url: &str, identifier: &str, file_name: &str) -> String {
    let path = file_name
        .split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/");
    format!(
        "{}/download/{}/{}",
        base_url.trim_end_matches('/'),
        encode_segment(identifier),
        path
    )
}

/// Percent-encode everything outside RFC 3986's unreserved set.
fn encode_segment(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => result.push_str(&format!("%{:02X}", byte)),
        }
    }
    result
}
