// API client module: a small blocking client for the helpdesk REST API.
// It owns the session token and turns every reply into either parsed data
// or a typed `DeskError`; presenting those errors is the flow layer's job.

use crate::catalog::Catalog;
use crate::error::DeskError;
use crate::model::{InteractionPayload, NewTicketPayload, ReferenceItem};
use crate::transport::{Method, Reply, Request, Transport};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

const LOGIN_PATH: &str = "Login/autenticar";
const TICKETS_PATH: &str = "ChamadosSuporte";
const INTERACT_PATH: &str = "ChamadosSuporte/interagir";

/// Bearer credential issued at login. Set once per process.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Session(***)")
    }
}

/// Client for the helpdesk API over any [`Transport`].
pub struct ApiClient<T: Transport> {
    transport: T,
    session: Option<Session>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        ApiClient {
            transport,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Log in with the operator and environment keys. On success the raw
    /// reply body, without surrounding quotes, becomes the session token.
    pub fn authenticate(&mut self, operator_key: &str, environment_key: &str) -> Result<(), DeskError> {
        if self.session.is_some() {
            return Err(DeskError::AlreadyAuthenticated);
        }
        let request = Request {
            method: Method::Post,
            path: LOGIN_PATH.into(),
            authorization: operator_key.into(),
            body: json!({ "PublicKey": environment_key }),
        };
        let reply = self.transport.send(&request).inspect_err(|e| warn!("login failed: {e}"))?;

        if reply.status != 200 {
            warn!(status = reply.status, "login rejected");
            return Err(DeskError::Status {
                status: reply.status,
                body: reply.body,
            });
        }
        let data: Value = serde_json::from_str(&reply.body)?;
        if let Some(message) = api_error(&data) {
            warn!("login refused by API: {message}");
            return Err(DeskError::Api(message));
        }

        let token = reply.body.trim().trim_matches('"').to_string();
        info!("authenticated");
        self.session = Some(Session { token });
        Ok(())
    }

    /// Fetch one catalog. The records are the reply's `root` array, or the
    /// whole reply when it is a bare array.
    pub fn list(&self, catalog: Catalog, search: &str) -> Result<Vec<ReferenceItem>, DeskError> {
        let data = self.call(Method::Post, catalog.endpoint(), &catalog.query(search))?;
        let records = match data {
            Value::Object(mut map) if map.contains_key("root") => map.remove("root").unwrap_or(Value::Null),
            other => other,
        };
        let items: Vec<ReferenceItem> = serde_json::from_value(records)?;
        debug!(endpoint = catalog.endpoint(), count = items.len(), "listed");
        Ok(items)
    }

    /// Open a ticket, returning the identifier the server assigned.
    pub fn create_ticket(&self, payload: &NewTicketPayload) -> Result<String, DeskError> {
        let data = self.call(Method::Put, TICKETS_PATH, payload)?;
        result_text(data)
    }

    /// Append an interaction to an existing ticket.
    pub fn add_interaction(&self, payload: &InteractionPayload) -> Result<String, DeskError> {
        let data = self.call(Method::Put, INTERACT_PATH, payload)?;
        result_text(data)
    }

    fn call<B: Serialize>(&self, method: Method, path: &str, body: &B) -> Result<Value, DeskError> {
        let session = self.session.as_ref().ok_or(DeskError::NotAuthenticated)?;
        let request = Request {
            method,
            path: path.into(),
            authorization: session.token.clone(),
            body: serde_json::to_value(body)?,
        };
        let reply = self.transport.send(&request)?;
        parse_reply(reply)
    }
}

fn parse_reply(reply: Reply) -> Result<Value, DeskError> {
    if !reply.is_success() {
        return Err(DeskError::Status {
            status: reply.status,
            body: reply.body,
        });
    }
    let data: Value = serde_json::from_str(&reply.body)?;
    match api_error(&data) {
        Some(message) => Err(DeskError::Api(message)),
        None => Ok(data),
    }
}

/// The `erro` field the API uses to report failures inside a 200 reply.
fn api_error(data: &Value) -> Option<String> {
    match data.get("erro")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A 2xx reply still has to carry something; `null`, `""`, `{}` and `[]`
/// mean the server did not act on the request.
fn result_text(data: Value) -> Result<String, DeskError> {
    let empty = match &data {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    };
    if empty {
        return Err(DeskError::Api("resposta vazia".into()));
    }
    Ok(match data {
        Value::String(s) => s,
        other => other.to_string(),
    })
}
