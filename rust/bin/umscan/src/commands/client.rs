//! Blocking HTTP client bound to a context.

use anyhow::Result;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;

use crate::config::Context;

pub struct Api {
    client: Client,
    base_url: String,
}

impl Api {
    pub fn new(ctx: &Context) -> Result<Self> {
        if ctx.server.is_empty() {
            anyhow::bail!(
                "No server URL set for context \"{}\". Run `umscan context set {} --server <url>`.",
                ctx.name,
                ctx.name
            );
        }

        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = ctx.token() {
            let val = format!("Bearer {}", token);
            headers.insert(
                reqwest::header::AUTHORIZATION,
                reqwest::header::HeaderValue::from_str(&val)?,
            );
        }

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            base_url: ctx.server.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Send and decode the JSON body, turning `{code, error}` answers into
    /// errors.
    pub fn send(&self, req: RequestBuilder) -> Result<serde_json::Value> {
        let req = req.build()?;
        let (method, url) = (req.method().clone(), req.url().clone());
        let resp = self
            .client
            .execute(req)
            .map_err(|e| anyhow::anyhow!("failed to connect to server: {}", e))?;
        let status = resp.status();
        tracing::debug!(%method, %url, %status, "response");
        let text = resp.text().unwrap_or_default();
        let body: serde_json::Value = if text.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        if !status.is_success() {
            anyhow::bail!("{}", error_message(status, &body));
        }
        Ok(body)
    }
}

fn error_message(status: StatusCode, body: &serde_json::Value) -> String {
    let error = body["error"]
        .as_str()
        .or_else(|| body.as_str())
        .unwrap_or("unknown error");
    match status {
        StatusCode::UNAUTHORIZED => format!("Not signed in ({}). Run `umscan login`.", error),
        _ => format!("Error ({}): {}", status, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_server_error() {
        let body = serde_json::json!({"code": "ALREADY_EXISTS", "error": "notebook 'NB01' already exists"});
        assert_eq!(
            error_message(StatusCode::CONFLICT, &body),
            "Error (409 Conflict): notebook 'NB01' already exists"
        );
        assert!(error_message(StatusCode::UNAUTHORIZED, &serde_json::Value::Null).contains("umscan login"));
    }

    #[test]
    fn api_needs_server_url() {
        assert!(Api::new(&Context::new("dev", "")).is_err());

        let ctx = Context::new("dev", "http://localhost:8080/");
        assert_eq!(Api::new(&ctx).unwrap().url("/health"), "http://localhost:8080/health");
    }
}
