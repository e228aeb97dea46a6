//! Server configuration, read from `/etc/umscan/<context>.toml`.
//!
//! ```toml
//! [master]
//! name = "Master"
//! email = "master@example.com"
//! password_hash = "$argon2id$..."
//!
//! [storage]
//! data_dir = "/var/lib/umscan/prod"
//!
//! [jwt]
//! secret = "..."
//! expire_secs = 86400
//!
//! [server]
//! listen = "0.0.0.0:8080"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub master: MasterConfig,
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub server: ListenConfig,
}

/// The MASTER account created on first start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterConfig {
    #[serde(default = "default_master_name")]
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expire_secs")]
    pub expire_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_master_name() -> String {
    "Master".to_string()
}

fn default_expire_secs() -> i64 {
    86400
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

impl ServerConfig {
    /// A context name maps to `/etc/umscan/<name>.toml`; anything that looks
    /// like a path is used as is.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.ends_with(".toml") {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from("/etc/umscan").join(format!("{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_name_resolves_under_etc() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/umscan/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./dev.toml"),
            PathBuf::from("./dev.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("/tmp/x/conf"),
            PathBuf::from("/tmp/x/conf")
        );
    }

    #[test]
    fn load_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev.toml");
        std::fs::write(
            &path,
            r#"
[master]
email = "master@example.com"
password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"

[storage]
data_dir = "/var/lib/umscan/dev"

[jwt]
secret = "abc"
"#,
        )
        .unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.master.name, "Master");
        assert_eq!(config.jwt.expire_secs, 86400);
        assert_eq!(config.server.listen, "0.0.0.0:8080");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ServerConfig::load(Path::new("/nonexistent/umscan.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/umscan.toml"));
    }
}
