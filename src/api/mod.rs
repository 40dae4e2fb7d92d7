//! External-source layer: record types and the `UserSource` trait.
//!
//! Two deployment variants exist and exactly one is active per run:
//! a REST listing/detail API (`rest`) whose responses wrap records in a
//! `data` envelope, and a hosted document collection (`collection`) that
//! speaks plain JSON arrays. Both are reached over HTTP with `ureq`.

pub mod collection;
pub mod rest;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use collection::CollectionSource;
pub use rest::RestSource;

/// One member of the directory.
///
/// `id` is assigned by the backing service; the REST variant hands out
/// numbers, the collection variant strings, so it is normalized to a
/// `String` on the way in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar: String,
}

impl UserRecord {
    /// Display name, space-joined the way the directory shows it.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A record the user wants created; the backend assigns the id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar: String,
}

impl NewUser {
    /// Attach the id returned by the backend to form the full record.
    pub fn with_id(self, id: impl Into<String>) -> UserRecord {
        UserRecord {
            id: id.into(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            avatar: self.avatar,
        }
    }
}

/// Operations the directory needs from a backing service.
///
/// `fetch` resolves to `Ok(None)` when the id does not exist; transport
/// problems and unexpected statuses are errors. Implementations are moved
/// onto the network worker thread, hence `Send`.
pub trait UserSource: Send {
    fn list(&self) -> Result<Vec<UserRecord>>;
    fn fetch(&self, id: &str) -> Result<Option<UserRecord>>;
    fn create(&self, draft: &NewUser) -> Result<UserRecord>;
    fn delete(&self, id: &str) -> Result<()>;
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n.to_string()),
        Raw::Text(s) if !s.is_empty() => Ok(s),
        Raw::Text(_) => Err(de::Error::custom("empty record id")),
    }
}
