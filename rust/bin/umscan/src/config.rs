//! Named server connections kept in `~/.umscan/config.toml`.
//!
//! ```toml
//! active = "depot"
//!
//! [contexts.depot]
//! server = "http://10.0.0.5:8080"
//! server-config = "/etc/umscan/depot.toml"
//!
//! [contexts.depot.session]
//! user = "tech@example.com"
//! token = "eyJ..."
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context as _, Result};
use serde::{Deserialize, Serialize};

/// Who is signed in on a context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: String,
    pub token: String,
}

/// One umscand instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    /// Table key in the file.
    #[serde(skip)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,

    /// Server config written by `context create`, for local deployments.
    #[serde(rename = "server-config", default, skip_serializing_if = "Option::is_none")]
    pub server_config: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

impl Context {
    pub fn new(name: &str, server: &str) -> Self {
        Self {
            name: name.to_string(),
            server: server.to_string(),
            ..Default::default()
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn user(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user.as_str())
    }
}

/// The client config file: every known context and which one commands use.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Contexts {
    #[serde(skip)]
    path: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    active: Option<String>,

    #[serde(default)]
    contexts: BTreeMap<String, Context>,
}

impl Contexts {
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".umscan").join("config.toml")
    }

    /// Read `path`. A missing file is an empty config bound to that path.
    pub fn load(path: &Path) -> Result<Self> {
        let mut contexts = if path.exists() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            toml::from_str::<Contexts>(&text)
                .with_context(|| format!("invalid client config {}", path.display()))?
        } else {
            Contexts::default()
        };
        for (name, ctx) in contexts.contexts.iter_mut() {
            ctx.name = name.clone();
        }
        contexts.path = path.to_path_buf();
        Ok(contexts)
    }

    /// Write back to the file this config was loaded from.
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, toml::to_string_pretty(self)?)
            .with_context(|| format!("cannot write {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "client config saved");
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Contexts in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Context> {
        self.contexts.values()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.as_deref() == Some(name)
    }

    /// The context commands run against.
    pub fn active(&self) -> Result<&Context> {
        self.active
            .as_deref()
            .and_then(|name| self.contexts.get(name))
            .ok_or_else(|| anyhow!("No current context. Run `umscan use context <name>`."))
    }

    pub fn edit(&mut self, name: &str) -> Result<&mut Context> {
        self.contexts
            .get_mut(name)
            .ok_or_else(|| anyhow!("Context \"{}\" not found.", name))
    }

    /// Add or replace a context. The first one added becomes active.
    pub fn insert(&mut self, ctx: Context) {
        if self.active.is_none() {
            self.active = Some(ctx.name.clone());
        }
        self.contexts.insert(ctx.name.clone(), ctx);
    }

    pub fn switch_to(&mut self, name: &str) -> Result<()> {
        if !self.contexts.contains_key(name) {
            anyhow::bail!(
                "Context \"{}\" not found. Run `umscan context list` to see available contexts.",
                name
            );
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    /// Drop a context, and the active selection if it pointed there.
    pub fn remove(&mut self, name: &str) -> Option<Context> {
        if self.is_active(name) {
            self.active = None;
        }
        self.contexts.remove(name)
    }

    /// Store a session on `name`, replacing any earlier one.
    pub fn sign_in(&mut self, name: &str, session: Session) -> Result<()> {
        self.edit(name)?.session = Some(session);
        Ok(())
    }

    /// Forget the active context's session. Returns the context name.
    pub fn sign_out(&mut self) -> Result<String> {
        let name = self.active()?.name.clone();
        self.edit(&name)?.session = None;
        Ok(name)
    }
}
