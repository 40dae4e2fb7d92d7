//! REST backend: per-page listing and by-id detail endpoints whose JSON
//! responses wrap payloads in a `data` envelope.

use serde::Deserialize;

use crate::api::{NewUser, UserRecord, UserSource};
use crate::error::{Context, Result, simple_error};

pub struct RestSource {
    agent: ureq::Agent,
    base_url: String,
    per_page: u32,
    api_key: Option<String>,
}

impl RestSource {
    pub fn new(base_url: impl Into<String>, per_page: u32, api_key: Option<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            agent: ureq::agent(),
            base_url,
            per_page,
            api_key,
        }
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.agent.request(method, &url);
        if let Some(key) = &self.api_key {
            req = req.set("x-api-key", key);
        }
        req
    }
}

impl UserSource for RestSource {
    fn list(&self) -> Result<Vec<UserRecord>> {
        let body = self
            .request("GET", &format!("/users?per_page={}", self.per_page))
            .call()
            .with_ctx(|| format!("GET {}/users", self.base_url))?
            .into_string()
            .with_ctx(|| "read listing body".to_string())?;
        parse_listing(&body)
    }

    fn fetch(&self, id: &str) -> Result<Option<UserRecord>> {
        match self.request("GET", &format!("/users/{id}")).call() {
            Ok(resp) => {
                let body = resp
                    .into_string()
                    .with_ctx(|| format!("read body for user {id}"))?;
                parse_single(&body).map(Some)
            }
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(e) => Err(e).with_ctx(|| format!("GET {}/users/{id}", self.base_url)),
        }
    }

    fn create(&self, draft: &NewUser) -> Result<UserRecord> {
        let body = self
            .request("POST", "/users")
            .send_json(draft)
            .with_ctx(|| format!("POST {}/users", self.base_url))?
            .into_string()
            .with_ctx(|| "read create body".to_string())?;
        let id = extract_assigned_id(&body)?;
        Ok(draft.clone().with_id(id))
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.request("DELETE", &format!("/users/{id}"))
            .call()
            .with_ctx(|| format!("DELETE {}/users/{id}", self.base_url))?;
        Ok(())
    }
}

fn parse_listing(body: &str) -> Result<Vec<UserRecord>> {
    #[derive(Deserialize)]
    struct Listing {
        data: Vec<UserRecord>,
    }
    let listing: Listing =
        serde_json::from_str(body).with_ctx(|| "decode user listing".to_string())?;
    Ok(listing.data)
}

fn parse_single(body: &str) -> Result<UserRecord> {
    #[derive(Deserialize)]
    struct Single {
        data: UserRecord,
    }
    let single: Single =
        serde_json::from_str(body).with_ctx(|| "decode user record".to_string())?;
    Ok(single.data)
}

/// Pull the backend-assigned id out of a create response. The service
/// echoes the submitted fields plus bookkeeping we do not care about, so
/// only the id is read.
fn extract_assigned_id(body: &str) -> Result<String> {
    let value: serde_json::Value =
        serde_json::from_str(body).with_ctx(|| "decode create response".to_string())?;
    match value.get("id") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        _ => Err(simple_error("create response carries no id")),
    }
}
