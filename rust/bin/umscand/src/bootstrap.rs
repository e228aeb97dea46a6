//! First-start checks and MASTER account creation.
//!
//! When umscand starts:
//! 1. Verify the config names a MASTER account with a usable hash; refuse to
//!    start otherwise.
//! 2. Create that account if no user holds its e-mail yet.

use password_hash::PasswordHash;
use tracing::info;

use crate::config::ServerConfig;

/// Verify server configuration is ready for production use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.master.password_hash.is_empty() {
        anyhow::bail!(
            "No master password hash found in configuration.\n\
             Run `umscan context create <name>` to set up the server first."
        );
    }
    if PasswordHash::new(&config.master.password_hash).is_err() {
        anyhow::bail!("Master password hash is not a valid PHC string.");
    }
    if !config.master.email.contains('@') {
        anyhow::bail!("Master e-mail is missing or invalid in configuration.");
    }
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.jwt.expire_secs <= 0 {
        anyhow::bail!("JWT expire_secs must be positive.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    Ok(())
}

/// Create the configured MASTER account when it does not exist yet.
pub fn ensure_master(auth: &auth::service::AuthService, config: &ServerConfig) -> anyhow::Result<()> {
    let created = auth
        .ensure_master(
            &config.master.name,
            &config.master.email,
            &config.master.password_hash,
        )
        .map_err(|e| anyhow::anyhow!("failed to create master account: {}", e))?;
    if created {
        info!("Created master account {}", config.master.email);
    } else {
        info!("Master account {} already exists", config.master.email);
    }
    Ok(())
}
