//! ETag computation for rendered cards.

use sha2::{Digest, Sha256};

/// Quoted SHA-256 of the response body. Identical bodies share a tag.
pub fn compute_etag(body: &[u8]) -> String {
  format!("\"{}\"", hex::encode(Sha256::digest(body)))
}

/// Whether an `If-None-Match` header value matches `etag`.
pub fn matches(if_none_match: &str, etag: &str) -> bool {
  if_none_match
    .split(',')
    .map(str::trim)
    .any(|candidate| candidate == "*" || candidate.trim_start_matches("W/") == etag)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn etag_is_quoted_hex_and_stable() {
    let a = compute_etag(b"<svg/>");
    assert_eq!(a, compute_etag(b"<svg/>"));
    assert_ne!(a, compute_etag(b"<svg></svg>"));
    assert!(a.starts_with('"') && a.ends_with('"'));
    assert_eq!(a.len(), 64 + 2);
  }

  #[test]
  fn if_none_match_lists_and_weak_tags() {
    let tag = compute_etag(b"x");
    assert!(matches(&tag, &tag));
    assert!(matches(&format!("\"other\", W/{tag}"), &tag));
    assert!(matches("*", &tag));
    assert!(!matches("\"other\"", &tag));
  }
}
