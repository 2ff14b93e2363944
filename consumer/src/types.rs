//! Records returned by the catalog provider.
//!
//! # Design
//! Both records are built straight from the response body with serde; there
//! is no partially-populated state. `created_on` uses a fixed
//! `%Y-%m-%dT%H:%M:%S` layout with no zone and no fractional seconds.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Wire layout of `User::created_on`.
pub const CREATED_ON_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A user as exposed by `GET /users/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub name: String,
    #[serde(with = "created_on")]
    pub created_on: NaiveDateTime,
}

/// A product as exposed by `GET /product/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub code: String,
    pub name: String,
    pub id: i64,
}

mod created_on {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::CREATED_ON_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(CREATED_ON_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, CREATED_ON_FORMAT)
            .map_err(|e| de::Error::custom(format!("invalid created_on {raw:?}: {e}")))
    }
}
