//! Site configuration loaded from `lexpages.toml`
//!
//! Every section has defaults, so an empty or missing file yields a
//! working local setup. `DATABASE_URL` and `LEXPAGES_*` environment
//! variables override file values.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lexpages.toml";

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "LEXPAGES_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub site: SiteSection,
    pub leads: LeadsConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub cors_permissive: bool,
    /// Directory holding `robots.txt`, `favicon.ico` and assets.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_owned(),
            cors_permissive: false,
            static_dir: PathBuf::from("static"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/lexpages".to_owned(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Host name the site is served from, without scheme.
    pub domain_name: String,
    /// Absolute origin used in the sitemap.
    pub base_url: String,
    /// Target of `/zvonok/`.
    pub callcenter_url: String,
    /// `domain` tag sent with every CRM lead.
    pub lead_domain: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            domain_name: "localhost:8080".to_owned(),
            base_url: "http://localhost:8080".to_owned(),
            callcenter_url: "/contacts/".to_owned(),
            lead_domain: "jurist-msk".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadsConfig {
    /// CRM endpoint; leads are not sent there when unset.
    pub crm_url: Option<String>,
    /// Analytics endpoint; leads are not sent there when unset.
    pub analytics_url: Option<String>,
    pub analytics_key: String,
    pub timeout_secs: u64,
}

impl Default for LeadsConfig {
    fn default() -> Self {
        Self {
            crm_url: None,
            analytics_url: None,
            analytics_key: String::new(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Password of the `admin` account created by `db init`.
    pub default_admin_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            default_admin_password: "admin".to_owned(),
        }
    }
}

impl SiteConfig {
    /// Config file path: explicit argument, then `LEXPAGES_CONFIG`, then
    /// `./lexpages.toml`.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Read `path` and apply environment overrides. A missing file gives
    /// the defaults; an unreadable or invalid one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Parse `path` without looking at the environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(path, &content),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(CoreError::config(path, err.to_string())),
        }
    }

    fn from_toml(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CoreError::config(path, e.to_string()))
    }

    /// Override file values with whatever `lookup` returns for the known
    /// variable names. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = get("LEXPAGES_BIND") {
            self.server.bind = v;
        }
        if let Some(v) = get("LEXPAGES_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(v);
        }
        if let Some(v) = get("LEXPAGES_DOMAIN_NAME") {
            self.site.domain_name = v;
        }
        if let Some(v) = get("LEXPAGES_BASE_URL") {
            self.site.base_url = v;
        }
        if let Some(v) = get("LEXPAGES_CALLCENTER_URL") {
            self.site.callcenter_url = v;
        }
        if let Some(v) = get("LEXPAGES_CRM_URL") {
            self.leads.crm_url = Some(v);
        }
        if let Some(v) = get("LEXPAGES_ANALYTICS_URL") {
            self.leads.analytics_url = Some(v);
        }
        if let Some(v) = get("LEXPAGES_ANALYTICS_KEY") {
            self.leads.analytics_key = v;
        }
    }

    /// `base_url` without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.site.base_url.trim_end_matches('/')
    }
}
