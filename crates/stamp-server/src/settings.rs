//! Server configuration: an optional TOML file overlaid with `STAMP_`
//! environment variables (`__` separates nested keys, so
//! `STAMP_REMOTE__API_KEY` sets `remote.api_key`).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use stamp_remote::RemoteConfig;

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 3000 }

fn default_store_path() -> PathBuf {
  PathBuf::from("~/.local/share/personality-stamp/local.db")
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  /// Base URL used in share links; defaults to `http://<host>:<port>`.
  #[serde(default)]
  pub public_url: Option<String>,
  /// SQLite file backing the local fallback store. `~` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default)]
  pub remote:     Option<RemoteConfig>,
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn public_url(&self) -> String {
    match &self.public_url {
      Some(url) if !url.trim().is_empty() => url.clone(),
      _ => format!("http://{}", self.address()),
    }
  }

  /// The remote settings, if both the URL and the key are present.
  pub fn configured_remote(&self) -> Option<RemoteConfig> {
    self.remote.clone().filter(RemoteConfig::is_configured)
  }
}

pub fn load(path: &Path) -> anyhow::Result<ServerConfig> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix("STAMP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::{Config, File, FileFormat};

  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_file_uses_defaults() {
    let cfg = parse("");
    assert_eq!(cfg.address(), "127.0.0.1:3000");
    assert_eq!(cfg.public_url(), "http://127.0.0.1:3000");
    assert!(cfg.configured_remote().is_none());
  }

  #[test]
  fn remote_needs_url_and_key() {
    let cfg = parse(
      r#"
      public_url = "https://stamp.example"

      [remote]
      url = "https://abc.supabase.co"
      api_key = ""
      "#,
    );
    assert_eq!(cfg.public_url(), "https://stamp.example");
    assert!(cfg.configured_remote().is_none());

    let cfg = parse(
      r#"
      [remote]
      url = "https://abc.supabase.co"
      api_key = "anon"
      "#,
    );
    let remote = cfg.configured_remote().unwrap();
    assert_eq!(remote.bucket, "selfies");
    assert_eq!(remote.timeout_secs, 30);
  }

  #[test]
  fn tilde_expands_to_home() {
    let home = std::env::var("HOME").unwrap_or_default();
    let expanded = expand_tilde(Path::new("~/stamp/local.db"));
    if !home.is_empty() {
      assert_eq!(expanded, PathBuf::from(home).join("stamp/local.db"));
    }
    assert_eq!(expand_tilde(Path::new("/tmp/x.db")), PathBuf::from("/tmp/x.db"));
  }
}
