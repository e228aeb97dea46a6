//! Context management commands.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::{Context, Contexts};

/// Settings for `context create`.
pub struct NewContext<'a> {
    pub name: &'a str,
    pub config_dir: &'a str,
    pub data_dir: &'a str,
    pub server: &'a str,
    pub master_name: &'a str,
    pub master_email: &'a str,
    pub password: &'a str,
}

/// Hash a password into an argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    use argon2::Argon2;
    use password_hash::rand_core::OsRng;
    use password_hash::{PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

/// Random hex JWT secret.
fn jwt_secret() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..32).map(|_| format!("{:02x}", rng.gen::<u8>())).collect()
}

fn quoted(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

fn listen_addr(server: &str) -> String {
    let port = server
        .rsplit(':')
        .next()
        .and_then(|p| p.trim_end_matches('/').parse::<u16>().ok())
        .unwrap_or(8080);
    format!("0.0.0.0:{}", port)
}

/// Server config TOML for a new context.
pub fn server_config(new: &NewContext<'_>, password_hash: &str, secret: &str) -> String {
    format!(
        r#"[master]
name = {name}
email = {email}
password_hash = {hash}

[storage]
data_dir = {data_dir}

[jwt]
secret = {secret}
expire_secs = 86400

[server]
listen = {listen}
"#,
        name = quoted(new.master_name),
        email = quoted(&new.master_email.trim().to_lowercase()),
        hash = quoted(password_hash),
        data_dir = quoted(new.data_dir),
        secret = quoted(secret),
        listen = quoted(&listen_addr(new.server)),
    )
}

/// Create a new context: generate the server config and register it in the
/// client config.
pub fn create(new: &NewContext<'_>, client_config_path: &Path) -> Result<()> {
    if !new.master_email.contains('@') {
        anyhow::bail!("Master e-mail \"{}\" is not valid.", new.master_email);
    }
    let password_hash = hash_password(new.password)?;
    let content = server_config(new, &password_hash, &jwt_secret());

    let config_path = PathBuf::from(new.config_dir).join(format!("{}.toml", new.name));
    std::fs::create_dir_all(new.config_dir)?;
    std::fs::write(&config_path, &content)?;
    std::fs::create_dir_all(new.data_dir)?;

    let mut contexts = Contexts::load(client_config_path)?;
    let mut ctx = Context::new(new.name, new.server);
    ctx.server_config = Some(config_path.clone());
    contexts.insert(ctx);
    contexts.save()?;

    println!("Context \"{}\" created.", new.name);
    println!("  Config: {}", config_path.display());
    println!("  Data:   {}", new.data_dir);
    println!("  Master: {}", new.master_email);
    println!("Start the server with: umscand -c {}", new.name);
    Ok(())
}

pub fn list(client_config_path: &Path) -> Result<()> {
    let contexts = Contexts::load(client_config_path)?;

    if contexts.is_empty() {
        println!("No contexts configured.");
        println!("Run: umscan context create <name>");
        return Ok(());
    }

    println!("{:2} {:20} {:32} {:28} {}", "", "NAME", "SERVER", "USER", "CONFIG");
    for ctx in contexts.iter() {
        let marker = if contexts.is_active(&ctx.name) { "*" } else { " " };
        let server = if ctx.server.is_empty() { "-" } else { ctx.server.as_str() };
        let server_config = ctx
            .server_config
            .as_ref()
            .map_or_else(|| "-".to_string(), |p| p.display().to_string());
        println!(
            "{:2} {:20} {:32} {:28} {}",
            marker,
            ctx.name,
            server,
            ctx.user().unwrap_or("-"),
            server_config
        );
    }
    Ok(())
}

pub fn use_context(name: &str, client_config_path: &Path) -> Result<()> {
    let mut contexts = Contexts::load(client_config_path)?;
    contexts.switch_to(name)?;
    contexts.save()?;
    println!("Switched to context \"{}\".", name);
    Ok(())
}

pub fn set(name: &str, server: Option<&str>, client_config_path: &Path) -> Result<()> {
    let mut contexts = Contexts::load(client_config_path)?;
    let ctx = contexts.edit(name)?;
    if let Some(s) = server {
        ctx.server = s.to_string();
    }
    contexts.save()?;
    println!("Context \"{}\" updated.", name);
    Ok(())
}

/// Delete a context (doesn't delete the server config file).
pub fn delete(name: &str, client_config_path: &Path) -> Result<()> {
    let mut contexts = Contexts::load(client_config_path)?;
    if contexts.remove(name).is_none() {
        anyhow::bail!("Context \"{}\" not found.", name);
    }
    contexts.save()?;
    println!("Context \"{}\" deleted.", name);
    Ok(())
}
