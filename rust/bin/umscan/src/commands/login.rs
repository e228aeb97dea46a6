//! Login / logout commands.

use std::path::Path;

use anyhow::Result;

use crate::commands::client::Api;
use crate::config::{Contexts, Session};

/// Sign in to the current context's server and keep the token.
pub fn login(email: &str, password: &str, client_config_path: &Path) -> Result<()> {
    let mut contexts = Contexts::load(client_config_path)?;
    let mut ctx = contexts.active()?.clone();
    ctx.session = None;

    let api = Api::new(&ctx)?;
    let body = serde_json::json!({
        "email": email,
        "password": password,
    });
    let data = api
        .send(api.post("/auth/login").json(&body))
        .map_err(|e| anyhow::anyhow!("Login failed: {}", e))?;
    let token = data["access_token"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("No access_token in response"))?;

    let session = Session {
        user: email.trim().to_lowercase(),
        token: token.to_string(),
    };
    ctx.session = Some(session.clone());
    let authed = Api::new(&ctx)?;
    let me = authed.send(authed.get("/auth/me"))?;

    contexts.sign_in(&ctx.name, session)?;
    contexts.save()?;

    println!(
        "Logged in as {} ({}).",
        me["name"].as_str().unwrap_or(email),
        me["role"].as_str().unwrap_or("?")
    );
    if let Some(home) = me["home"].as_str() {
        println!("Home: {}", home);
    }
    println!("Token saved to context \"{}\".", ctx.name);
    Ok(())
}

/// Logout: clear the token from the current context.
pub fn logout(client_config_path: &Path) -> Result<()> {
    let mut contexts = Contexts::load(client_config_path)?;
    let name = contexts.sign_out()?;
    contexts.save()?;
    println!("Logged out from context \"{}\".", name);
    Ok(())
}
