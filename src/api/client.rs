use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, COOKIE};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{unwrap_envelope, ApiClient};
use crate::config::Credentials;
use crate::error::{InventoryError, Result};

const TICKET_PATH: &str = "/access/ticket";

enum Auth {
    Token(String),
    Ticket(String),
}

/// Blocking HTTP client for a single Proxmox VE host.
pub struct ProxmoxClient {
    http: Client,
    base_url: String,
    auth: Auth,
}

#[derive(Debug, Deserialize)]
struct TicketData {
    ticket: String,
}

impl ProxmoxClient {
    /// Build a client from credentials. Password credentials are exchanged
    /// for an auth ticket right away; API tokens are sent with every request.
    pub fn connect(credentials: &Credentials) -> Result<Self> {
        let http = Client::builder()
            .danger_accept_invalid_certs(!credentials.verify_tls)
            .build()
            .map_err(|source| InventoryError::Transport {
                path: credentials.base_url(),
                source,
            })?;
        let base_url = credentials.base_url();

        let auth = match (&credentials.token_id, &credentials.token_secret) {
            (Some(token_id), Some(secret)) => Auth::Token(format!(
                "PVEAPIToken={}!{}={}",
                credentials.user_id(),
                token_id,
                secret
            )),
            _ => {
                let password = credentials.password.as_deref().ok_or_else(|| {
                    InventoryError::Configuration("no password or API token configured".to_string())
                })?;
                let ticket = request_ticket(&http, &base_url, &credentials.user_id(), password)?;
                Auth::Ticket(format!("PVEAuthCookie={}", ticket))
            }
        };

        Ok(ProxmoxClient { http, base_url, auth })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Auth::Token(header) => request.header(AUTHORIZATION, header),
            Auth::Ticket(cookie) => request.header(COOKIE, cookie),
        }
    }
}

fn request_ticket(http: &Client, base_url: &str, user_id: &str, password: &str) -> Result<String> {
    debug!(user = user_id, "requesting auth ticket");
    let url = format!("{}{}", base_url, TICKET_PATH);
    let response = http
        .post(&url)
        .form(&[("username", user_id), ("password", password)])
        .send()
        .map_err(|source| transport(TICKET_PATH, source))?;

    let body = read_body(TICKET_PATH, response)?;
    let data = unwrap_envelope(TICKET_PATH, body)?;
    let ticket: TicketData = serde_json::from_value(data)
        .map_err(|e| InventoryError::malformed(TICKET_PATH, e.to_string()))?;
    Ok(ticket.ticket)
}

fn read_body(path: &str, response: reqwest::blocking::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(InventoryError::Api {
            path: path.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    response.json::<Value>().map_err(|source| transport(path, source))
}

fn transport(path: &str, source: reqwest::Error) -> InventoryError {
    InventoryError::Transport {
        path: path.to_string(),
        source,
    }
}

impl ApiClient for ProxmoxClient {
    fn get(&self, path: &str) -> Result<Value> {
        debug!(path, "GET");
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .authorize(self.http.get(&url))
            .send()
            .map_err(|source| transport(path, source))?;
        let body = read_body(path, response)?;
        unwrap_envelope(path, body)
    }
}
