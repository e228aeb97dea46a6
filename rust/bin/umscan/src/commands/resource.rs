//! Generic resource CRUD commands.
//!
//! `umscan get units`, `umscan create notebook`, etc.
//! Translates resource names to REST API paths.

use std::path::Path;

use anyhow::Result;
use reqwest::Method;

use crate::commands::client::Api;
use crate::config::Contexts;

/// A resource the CLI knows how to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub singular: &'static str,
    pub path: &'static str,
    /// Method used by `update`.
    pub update: &'static str,
    /// Columns for table output.
    pub columns: &'static [&'static str],
}

/// Map a singular/plural resource name to its API path.
pub fn resource(name: &str) -> Result<Resource> {
    let r = match name.to_lowercase().as_str() {
        "user" | "users" => Resource {
            singular: "user",
            path: "/auth/users",
            update: "PUT",
            columns: &["id", "name", "email", "role"],
        },
        "project" | "projects" => Resource {
            singular: "project",
            path: "/inventory/v1/projects",
            update: "PATCH",
            columns: &["id", "name", "createdAt"],
        },
        "unit" | "units" | "um" | "ums" => Resource {
            singular: "unit",
            path: "/inventory/v1/units",
            update: "PUT",
            columns: &["id", "name", "projectId", "expectedDeviceCount"],
        },
        "notebook" | "notebooks" | "nb" => Resource {
            singular: "notebook",
            path: "/inventory/v1/notebooks",
            update: "PUT",
            columns: &["id", "unitId", "createdAt"],
        },
        _ => anyhow::bail!(
            "Unknown resource type: {} (expected users, projects, units or notebooks)",
            name
        ),
    };
    Ok(r)
}

fn current_api(client_config_path: &Path) -> Result<Api> {
    let contexts = Contexts::load(client_config_path)?;
    Api::new(contexts.active()?)
}

/// Query options for `get`.
#[derive(Debug, Default)]
pub struct ListOptions {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub query: Option<String>,
    pub unit: Option<String>,
}

impl ListOptions {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(l) = self.limit {
            pairs.push(("limit", l.to_string()));
        }
        if let Some(o) = self.offset {
            pairs.push(("offset", o.to_string()));
        }
        if let Some(q) = &self.query {
            pairs.push(("q", q.clone()));
        }
        if let Some(u) = &self.unit {
            pairs.push(("unitId", u.clone()));
        }
        pairs
    }
}

/// GET a resource (list or get by ID).
pub fn get(
    name: &str,
    id: Option<&str>,
    output_json: bool,
    opts: &ListOptions,
    client_config_path: &Path,
) -> Result<()> {
    let api = current_api(client_config_path)?;

    let body = match name.to_lowercase().as_str() {
        "summary" => api.send(api.get("/inventory/v1/summary"))?,
        "me" => api.send(api.get("/auth/me"))?,
        "grouped" => api.send(api.get("/inventory/v1/notebooks/grouped"))?,
        _ => {
            let r = resource(name)?;
            match id {
                Some(id) => api.send(api.get(&format!("{}/{}", r.path, id)))?,
                None => {
                    let body = api.send(api.get(r.path).query(&opts.pairs()))?;
                    if !output_json {
                        print_list(r.columns, &body);
                        return Ok(());
                    }
                    body
                }
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn print_list(columns: &[&str], body: &serde_json::Value) {
    let empty = Vec::new();
    let items = body["items"].as_array().unwrap_or(&empty);
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| columns.iter().map(|c| cell(&item[*c])).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| rows.iter().map(|r| r[i].len()).chain([c.len()]).max().unwrap_or(0))
        .collect();

    let line = |cells: Vec<String>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:w$}", c, w = *w))
            .collect();
        println!("{}", padded.join("  ").trim_end());
    };
    line(columns.iter().map(|c| c.to_uppercase()).collect());
    for row in rows {
        line(row);
    }
    println!("({} of {})", items.len(), body["total"].as_u64().unwrap_or(items.len() as u64));
}

fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn create(name: &str, json_body: &str, client_config_path: &Path) -> Result<()> {
    let r = resource(name)?;
    let api = current_api(client_config_path)?;
    let body: serde_json::Value =
        serde_json::from_str(json_body).map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))?;

    let result = api.send(api.post(r.path).json(&body))?;
    print_message(&result, &format!("{} created.", r.singular));
    Ok(())
}

/// Update a resource with the method its API uses.
pub fn update(name: &str, id: &str, json_body: &str, client_config_path: &Path) -> Result<()> {
    let r = resource(name)?;
    let api = current_api(client_config_path)?;
    let body: serde_json::Value =
        serde_json::from_str(json_body).map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))?;
    let method = Method::from_bytes(r.update.as_bytes())?;

    let result = api.send(api.request(method, &format!("{}/{}", r.path, id)).json(&body))?;
    print_message(&result, &format!("{} {} updated.", r.singular, id));
    Ok(())
}

pub fn delete(name: &str, id: &str, client_config_path: &Path) -> Result<()> {
    let r = resource(name)?;
    let api = current_api(client_config_path)?;
    let result = api.send(api.request(Method::DELETE, &format!("{}/{}", r.path, id)))?;
    print_message(&result, &format!("{} {} deleted.", r.singular, id));
    Ok(())
}

pub(crate) fn print_message(result: &serde_json::Value, fallback: &str) {
    match result["message"].as_str() {
        Some(msg) => println!("{}", msg),
        None => println!("{}", fallback),
    }
    if let Some(id) = result["id"].as_str() {
        println!("id: {}", id);
    }
}

/// Check server health and who we are signed in as.
pub fn status(client_config_path: &Path) -> Result<()> {
    let contexts = Contexts::load(client_config_path)?;
    let ctx = contexts.active()?;

    println!("Context:   {}", ctx.name);
    println!("Server:    {}", if ctx.server.is_empty() { "-" } else { &ctx.server });

    if ctx.server.is_empty() {
        println!("Status:    no server configured");
        return Ok(());
    }

    let api = Api::new(ctx)?;
    match api.send(api.get("/health")) {
        Ok(_) => println!("Status:    connected"),
        Err(e) => {
            println!("Status:    disconnected ({})", e);
            return Ok(());
        }
    }

    if ctx.token().is_none() {
        println!("User:      not logged in");
    } else {
        match api.send(api.get("/auth/me")) {
            Ok(me) => println!(
                "User:      {} ({})",
                me["email"].as_str().unwrap_or("-"),
                me["role"].as_str().unwrap_or("-")
            ),
            Err(_) => println!("User:      session expired, run `umscan login`"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_names_map_to_paths() {
        assert_eq!(resource("Units").unwrap().path, "/inventory/v1/units");
        assert_eq!(resource("um").unwrap().singular, "unit");
        assert_eq!(resource("project").unwrap().update, "PATCH");
        assert_eq!(resource("notebooks").unwrap().update, "PUT");
        assert_eq!(resource("users").unwrap().path, "/auth/users");
        assert!(resource("devices").is_err());
    }

    #[test]
    fn list_options_become_query_pairs() {
        let opts = ListOptions {
            limit: Some(10),
            unit: Some("u1".into()),
            ..Default::default()
        };
        assert_eq!(
            opts.pairs(),
            vec![("limit", "10".to_string()), ("unitId", "u1".to_string())]
        );
    }

    #[test]
    fn cells_render_plainly() {
        assert_eq!(cell(&serde_json::json!("NB01")), "NB01");
        assert_eq!(cell(&serde_json::json!(3)), "3");
        assert_eq!(cell(&serde_json::Value::Null), "-");
    }
}
