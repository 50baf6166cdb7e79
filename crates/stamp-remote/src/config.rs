//! Connection settings for the hosted service.

use serde::Deserialize;

fn default_bucket() -> String { "selfies".to_owned() }

fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
  /// Project base URL, e.g. `https://abc.supabase.co`.
  #[serde(default)]
  pub url:          String,
  #[serde(default)]
  pub api_key:      String,
  /// Object-storage bucket holding selfies.
  #[serde(default = "default_bucket")]
  pub bucket:       String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl RemoteConfig {
  pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
    Self {
      url:          url.into(),
      api_key:      api_key.into(),
      bucket:       default_bucket(),
      timeout_secs: default_timeout_secs(),
    }
  }

  /// Both the URL and the key must be set for the service to be used.
  pub fn is_configured(&self) -> bool {
    !self.url.trim().is_empty() && !self.api_key.trim().is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_fields_mean_unconfigured() {
    assert!(RemoteConfig::new("https://x.example", "key").is_configured());
    assert!(!RemoteConfig::new("", "key").is_configured());
    assert!(!RemoteConfig::new("https://x.example", "  ").is_configured());
  }

  #[test]
  fn defaults_fill_optional_fields() {
    let cfg: RemoteConfig =
      serde_json::from_str(r#"{"url":"https://x.example","api_key":"k"}"#)
        .unwrap();
    assert_eq!(cfg.bucket, "selfies");
    assert_eq!(cfg.timeout_secs, 30);
  }
}
