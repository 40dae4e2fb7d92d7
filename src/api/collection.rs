//! Hosted document collection backend.
//!
//! The collection service exposes list, create and delete only; there is
//! no by-id read and no update. `fetch` is therefore derived client-side
//! by listing and picking the matching document.

use crate::api::{NewUser, UserRecord, UserSource};
use crate::error::{Context, Result};

pub struct CollectionSource {
    agent: ureq::Agent,
    collection_url: String,
    api_key: Option<String>,
}

impl CollectionSource {
    pub fn new(collection_url: impl Into<String>, api_key: Option<String>) -> Self {
        let mut collection_url = collection_url.into();
        while collection_url.ends_with('/') {
            collection_url.pop();
        }
        Self {
            agent: ureq::agent(),
            collection_url,
            api_key,
        }
    }

    fn request(&self, method: &str, suffix: &str) -> ureq::Request {
        let url = format!("{}{}", self.collection_url, suffix);
        let mut req = self.agent.request(method, &url);
        if let Some(key) = &self.api_key {
            req = req.set("x-api-key", key);
        }
        req
    }
}

impl UserSource for CollectionSource {
    fn list(&self) -> Result<Vec<UserRecord>> {
        let records: Vec<UserRecord> = self
            .request("GET", "")
            .call()
            .with_ctx(|| format!("GET {}", self.collection_url))?
            .into_json()
            .with_ctx(|| "decode collection listing".to_string())?;
        Ok(records)
    }

    fn fetch(&self, id: &str) -> Result<Option<UserRecord>> {
        // No by-id endpoint upstream; select from the listing.
        let records = self.list()?;
        Ok(records.into_iter().find(|r| r.id == id))
    }

    fn create(&self, draft: &NewUser) -> Result<UserRecord> {
        let created: UserRecord = self
            .request("POST", "")
            .send_json(draft)
            .with_ctx(|| format!("POST {}", self.collection_url))?
            .into_json()
            .with_ctx(|| "decode created document".to_string())?;
        Ok(created)
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.request("DELETE", &format!("/{id}"))
            .call()
            .with_ctx(|| format!("DELETE {}/{id}", self.collection_url))?;
        Ok(())
    }
}
