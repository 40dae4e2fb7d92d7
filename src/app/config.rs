//! Backend settings: parse/write `memberdir.conf` and build the source.
//!
//! Settings pick which backing service the session talks to and how to
//! reach it. File values are overridden by CLI flags and environment
//! variables (handled by clap in `main`). Credentials are an opaque
//! optional API key sent as a request header.

use crate::api::{CollectionSource, RestSource, UserSource};
use crate::error::{Result, simple_error};

/// Which external source variant backs the session. Never both.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// REST listing/detail endpoints with a `data` envelope.
    #[default]
    Rest,
    /// Hosted document collection (list/create/delete only).
    Collection,
}

impl BackendKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" => Some(Self::Rest),
            "collection" => Some(Self::Collection),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Collection => "collection",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub backend: BackendKind,
    pub base_url: String,
    pub collection_url: String,
    pub per_page: u32,
    pub api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Rest,
            base_url: "https://reqres.in/api".to_string(),
            collection_url: String::new(),
            per_page: 12,
            api_key: None,
        }
    }
}

impl Settings {
    /// Load settings from a file, or create defaults if the file doesn't
    /// exist (writing them out for future customization).
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = crate::app::config_read_path("memberdir.conf") {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let cfg = Self::default();
        let _ = cfg.write_file(path);
        cfg
    }

    /// Parse `key = value` lines; comments and unknown keys are skipped.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut cfg = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            match lhs {
                "backend" => {
                    if let Some(kind) = BackendKind::parse(rhs) {
                        cfg.backend = kind;
                    }
                }
                "base_url" => cfg.base_url = rhs.to_string(),
                "collection_url" => cfg.collection_url = rhs.to_string(),
                "per_page" => {
                    if let Ok(n) = rhs.parse::<u32>() {
                        if n > 0 {
                            cfg.per_page = n;
                        }
                    }
                }
                "api_key" => cfg.api_key = Some(rhs.to_string()),
                _ => {}
            }
        }
        Some(cfg)
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# memberdir backend settings\n");
        buf.push_str("# backend: rest | collection\n");
        let _ = writeln!(&mut buf, "backend = {}", self.backend.as_str());
        let _ = writeln!(&mut buf, "base_url = {}", self.base_url);
        if self.collection_url.is_empty() {
            buf.push_str("# collection_url = https://example.mockapi.io/users\n");
        } else {
            let _ = writeln!(&mut buf, "collection_url = {}", self.collection_url);
        }
        let _ = writeln!(&mut buf, "per_page = {}", self.per_page);
        if let Some(key) = &self.api_key {
            let _ = writeln!(&mut buf, "api_key = {}", key);
        }
        std::fs::write(path, buf)
    }

    /// Apply CLI/env overrides on top of the file values.
    pub fn override_with(
        &mut self,
        backend: Option<BackendKind>,
        base_url: Option<String>,
        collection_url: Option<String>,
        per_page: Option<u32>,
        api_key: Option<String>,
    ) {
        if let Some(b) = backend {
            self.backend = b;
        }
        if let Some(u) = base_url {
            self.base_url = u;
        }
        if let Some(u) = collection_url {
            self.collection_url = u;
        }
        if let Some(n) = per_page {
            if n > 0 {
                self.per_page = n;
            }
        }
        if let Some(k) = api_key {
            self.api_key = Some(k);
        }
    }

    /// Build the configured external source.
    pub fn build_source(&self) -> Result<Box<dyn UserSource>> {
        match self.backend {
            BackendKind::Rest => Ok(Box::new(RestSource::new(
                self.base_url.clone(),
                self.per_page,
                self.api_key.clone(),
            ))),
            BackendKind::Collection => {
                if self.collection_url.is_empty() {
                    return Err(simple_error(
                        "backend 'collection' requires collection_url to be set",
                    ));
                }
                Ok(Box::new(CollectionSource::new(
                    self.collection_url.clone(),
                    self.api_key.clone(),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn tmp_path(tag: &str) -> String {
        let mut p = std::env::temp_dir();
        let n = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        p.push(format!("memberdir_{tag}_{}_{}", std::process::id(), n));
        p.to_string_lossy().into_owned()
    }

    #[test]
    fn roundtrip_preserves_values() {
        let path = tmp_path("settings");
        let cfg = Settings {
            backend: BackendKind::Collection,
            base_url: "https://api.example.com".to_string(),
            collection_url: "https://coll.example.com/users".to_string(),
            per_page: 24,
            api_key: Some("secret".to_string()),
        };
        cfg.write_file(&path).unwrap();
        let back = Settings::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back, cfg);
    }

    #[test]
    fn unknown_keys_and_bad_values_fall_back() {
        let path = tmp_path("settings_bad");
        let contents = "\
backend = carrier-pigeon
per_page = zero
mystery = 42
base_url = https://api.example.com
";
        std::fs::write(&path, contents).unwrap();
        let cfg = Settings::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.backend, BackendKind::Rest);
        assert_eq!(cfg.per_page, Settings::default().per_page);
        assert_eq!(cfg.base_url, "https://api.example.com");
    }

    #[test]
    fn collection_backend_requires_url() {
        let cfg = Settings {
            backend: BackendKind::Collection,
            collection_url: String::new(),
            ..Settings::default()
        };
        assert!(cfg.build_source().is_err());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut cfg = Settings::default();
        cfg.override_with(
            Some(BackendKind::Collection),
            None,
            Some("https://coll.example.com/users".to_string()),
            Some(6),
            None,
        );
        assert_eq!(cfg.backend, BackendKind::Collection);
        assert_eq!(cfg.per_page, 6);
        assert_eq!(cfg.base_url, Settings::default().base_url);
    }
}
