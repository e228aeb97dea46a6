//! Notebook batch commands.

use std::path::Path;

use anyhow::Result;
use reqwest::Method;

use crate::commands::client::Api;
use crate::commands::resource::print_message;
use crate::config::Contexts;

/// Create `prefix + zero-padded(i)` for every `i` in `start..=end`.
pub fn batch_create(
    unit: &str,
    prefix: &str,
    start: u32,
    end: u32,
    client_config_path: &Path,
) -> Result<()> {
    if start > end {
        anyhow::bail!("--start ({}) must not be greater than --end ({}).", start, end);
    }
    let contexts = Contexts::load(client_config_path)?;
    let api = Api::new(contexts.active()?)?;

    let body = serde_json::json!({
        "unitId": unit,
        "prefix": prefix,
        "start": start,
        "end": end,
    });
    let result = api.send(api.post("/inventory/v1/notebooks/batch").json(&body))?;
    print_message(&result, "notebooks created.");
    Ok(())
}

/// Delete every notebook of a unit.
pub fn batch_delete(unit: &str, client_config_path: &Path) -> Result<()> {
    let contexts = Contexts::load(client_config_path)?;
    let api = Api::new(contexts.active()?)?;
    let path = format!("/inventory/v1/units/{}/notebooks", unit);
    let result = api.send(api.request(Method::DELETE, &path))?;
    print_message(&result, "notebooks deleted.");
    Ok(())
}
