// Transport seam: one JSON request in, status + raw body out.
//
// `ApiClient` only talks to the network through this trait so the flows
// can be exercised against a fake in tests.

use crate::error::DeskError;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
}

/// A single outgoing call. `path` is relative to the base URL.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub authorization: String,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    fn send(&self, request: &Request) -> Result<Reply, DeskError>;
}

/// Blocking HTTPS transport backed by reqwest.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, DeskError> {
        let client = Client::builder().build()?;
        Ok(HttpTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> Result<Reply, DeskError> {
        let url = format!("{}/{}", self.base_url, request.path);
        debug!(method = ?request.method, %url, "sending request");

        let builder = match request.method {
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
        };
        // `.json` also sets `Content-Type: application/json`.
        let res = builder
            .header(AUTHORIZATION, request.authorization.as_str())
            .json(&request.body)
            .send()?;

        let status = res.status().as_u16();
        let body = res.text()?;
        debug!(status, bytes = body.len(), "received reply");
        Ok(Reply { status, body })
    }
}
