//! Response bodies with type matchers.
//!
//! A `Matchable` is an example JSON document in which some nodes are marked
//! `like`: the provider only has to return a value of the same JSON type
//! there, not the same value. The mock replays the example verbatim; the pact
//! file records one `{"match": "type"}` rule per marked path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of a pact `matchingRules` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingRule {
    #[serde(rename = "match")]
    pub kind: String,
}

impl MatchingRule {
    pub fn by_type() -> Self {
        Self {
            kind: "type".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Matchable {
    Exact(Value),
    Like(Box<Matchable>),
    Object(BTreeMap<String, Matchable>),
    Array(Vec<Matchable>),
}

impl Matchable {
    /// Match by JSON type, using `example` as the replayed value.
    pub fn like(example: impl Into<Matchable>) -> Self {
        Matchable::Like(Box::new(example.into()))
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Matchable)>) -> Self {
        Matchable::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// The concrete document the mock sends back.
    pub fn example(&self) -> Value {
        match self {
            Matchable::Exact(value) => value.clone(),
            Matchable::Like(inner) => inner.example(),
            Matchable::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.example()))
                    .collect::<Map<_, _>>(),
            ),
            Matchable::Array(items) => Value::Array(items.iter().map(Matchable::example).collect()),
        }
    }

    /// Matching rules keyed by JSON path, rooted at `$.body`.
    pub fn matching_rules(&self) -> BTreeMap<String, MatchingRule> {
        let mut rules = BTreeMap::new();
        self.collect_rules("$.body".to_string(), &mut rules);
        rules
    }

    fn collect_rules(&self, path: String, rules: &mut BTreeMap<String, MatchingRule>) {
        match self {
            Matchable::Exact(_) => {}
            Matchable::Like(inner) => {
                inner.collect_rules(path.clone(), rules);
                rules.insert(path, MatchingRule::by_type());
            }
            Matchable::Object(fields) => {
                for (key, value) in fields {
                    value.collect_rules(field_path(&path, key), rules);
                }
            }
            Matchable::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    item.collect_rules(format!("{path}[{i}]"), rules);
                }
            }
        }
    }
}

fn field_path(parent: &str, key: &str) -> String {
    let plain = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        format!("{parent}.{key}")
    } else {
        format!("{parent}['{key}']")
    }
}

impl From<Value> for Matchable {
    fn from(value: Value) -> Self {
        Matchable::Exact(value)
    }
}

impl From<&str> for Matchable {
    fn from(value: &str) -> Self {
        Matchable::Exact(Value::from(value))
    }
}

impl From<String> for Matchable {
    fn from(value: String) -> Self {
        Matchable::Exact(Value::from(value))
    }
}

impl From<i64> for Matchable {
    fn from(value: i64) -> Self {
        Matchable::Exact(Value::from(value))
    }
}

impl From<bool> for Matchable {
    fn from(value: bool) -> Self {
        Matchable::Exact(Value::from(value))
    }
}
