use std::path::PathBuf;

/// Storage and listener settings shared by service binaries.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding the database when `db_path` is unset.
    pub data_dir: Option<PathBuf>,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/umscan.redb` if not specified.
    pub db_path: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve the redb database path, falling back to `{data_dir}/umscan.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        if let Some(p) = &self.db_path {
            return p.clone();
        }
        self.data_dir
            .as_ref()
            .map(|d| d.join("umscan.redb"))
            .unwrap_or_else(|| PathBuf::from("umscan.redb"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_path_defaults_under_data_dir() {
        let config = ServiceConfig {
            data_dir: Some(PathBuf::from("/var/lib/umscan")),
            ..Default::default()
        };
        assert_eq!(config.resolve_db_path(), PathBuf::from("/var/lib/umscan/umscan.redb"));
    }

    #[test]
    fn explicit_db_path_wins() {
        let config = ServiceConfig {
            data_dir: Some(PathBuf::from("/data")),
            db_path: Some(PathBuf::from("/elsewhere/x.redb")),
            ..Default::default()
        };
        assert_eq!(config.resolve_db_path(), PathBuf::from("/elsewhere/x.redb"));
        assert_eq!(ServiceConfig::default().resolve_db_path(), PathBuf::from("umscan.redb"));
    }
}
