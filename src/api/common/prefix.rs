//
//  gerrit-cli
//  api/common/prefix.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Removal of the XSSI guard line Gerrit puts in front of JSON bodies.
//!
//! Every JSON response from the REST API starts with `)]}'` on a line of
//! its own so that the body cannot be evaluated as a script. The guard has
//! to go before the body is handed to `serde_json`.

/// The guard line, including its terminating newline.
pub const MAGIC_PREFIX: &[u8] = b")]}'\n";

/// Returns `body` without the leading [`MAGIC_PREFIX`].
///
/// Bodies that do not start with the full guard are returned untouched,
/// including empty and truncated ones. A `\r\n` line ending after the guard
/// is accepted as well.
///
/// # Example
///
/// ```rust
/// use gerrit_cli::api::common::strip_magic_prefix;
///
/// assert_eq!(strip_magic_prefix(b")]}'\n{\"a\":1}"), b"{\"a\":1}");
/// assert_eq!(strip_magic_prefix(b"{\"a\":1}"), b"{\"a\":1}");
/// ```
pub fn strip_magic_prefix(body: &[u8]) -> &[u8] {
    if let Some(rest) = body.strip_prefix(MAGIC_PREFIX) {
        return rest;
    }
    // )]}' followed by CRLF
    match body.strip_prefix(&MAGIC_PREFIX[..MAGIC_PREFIX.len() - 1]) {
        Some(rest) if rest.starts_with(b"\r\n") => &rest[2..],
        _ => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_prefixed_body() {
        assert_eq!(strip_magic_prefix(b")]}'\n[1,2]"), b"[1,2]");
        assert_eq!(strip_magic_prefix(b")]}'\r\n[1,2]"), b"[1,2]");
    }

    #[test]
    fn test_unprefixed_body_is_untouched() {
        assert_eq!(strip_magic_prefix(b"[1,2]"), b"[1,2]");
        assert_eq!(strip_magic_prefix(b"\"text\""), b"\"text\"");
    }

    #[test]
    fn test_short_or_partial_prefix_is_untouched() {
        assert_eq!(strip_magic_prefix(b""), b"");
        assert_eq!(strip_magic_prefix(b")]"), b")]");
        assert_eq!(strip_magic_prefix(b")]}'"), b")]}'");
        assert_eq!(strip_magic_prefix(b")]}'x{}"), b")]}'x{}");
    }

    #[test]
    fn test_prefixed_and_plain_bodies_parse_identically() {
        let plain = br#"{"name":"demo","count":3}"#;
        let mut prefixed = MAGIC_PREFIX.to_vec();
        prefixed.extend_from_slice(plain);

        let a: serde_json::Value = serde_json::from_slice(strip_magic_prefix(&prefixed)).unwrap();
        let b: serde_json::Value = serde_json::from_slice(strip_magic_prefix(plain)).unwrap();
        assert_eq!(a, b);
    }
}
