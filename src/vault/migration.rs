//! Normalization of older vault payload shapes into the keyed map.
//!
//! Early vaults stored a flat JSON list:
//!
//! ```text
//! [{"service": "GitHub", "username": "octo", "password": "..."}]
//! ```
//!
//! The current shape is an object keyed by the lowercased service name:
//!
//! ```text
//! {"github": {"service_name": "GitHub", "username": "octo", "password": "..."}}
//! ```
//!
//! Migration is pure: it takes the decrypted JSON value and reports whether
//! anything changed, leaving file I/O to the repository.

use serde_json::{Map, Value};

use super::credential::service_key;

/// Result of running a migrator over a decrypted payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    pub data: Value,
    /// `true` when `data` differs from the input and should be re-saved.
    pub changed: bool,
}

/// A versioned transform applied to the payload once at load time.
///
/// Implementations must be idempotent: feeding their own output back in
/// returns `changed == false`.
pub trait DataMigrator {
    fn migrate(&self, data: Value) -> Migration;
}

/// Converts the legacy list shape, keyed entries missing a display name,
/// and keyed entries stored under a non-canonical key into the current
/// keyed map.
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyListMigrator;

impl DataMigrator for LegacyListMigrator {
    fn migrate(&self, data: Value) -> Migration {
        match data {
            Value::Array(items) => Migration {
                data: Value::Object(migrate_list(items)),
                changed: true,
            },
            Value::Object(map) => {
                let (map, changed) = normalize_keyed(map);
                Migration {
                    data: Value::Object(map),
                    changed,
                }
            }
            other => Migration {
                data: other,
                changed: false,
            },
        }
    }
}

fn migrate_list(items: Vec<Value>) -> Map<String, Value> {
    let mut out = Map::new();

    for item in items {
        let Value::Object(mut record) = item else {
            continue;
        };

        let name = match record.remove("service") {
            Some(Value::String(name)) => Some(name),
            _ => match record.get("service_name") {
                Some(Value::String(name)) => Some(name.clone()),
                _ => None,
            },
        };
        let Some(name) = name else {
            continue;
        };
        if !has_string(&record, "username") || !has_string(&record, "password") {
            continue;
        }

        record.insert("service_name".into(), Value::String(name.clone()));
        out.insert(service_key(&name), Value::Object(record));
    }

    out
}

fn normalize_keyed(map: Map<String, Value>) -> (Map<String, Value>, bool) {
    let mut out = Map::new();
    let mut changed = false;

    for (key, record) in map {
        let mut fields = match record {
            Value::Object(fields) => fields,
            other => {
                out.entry(key).or_insert(other);
                continue;
            }
        };

        if !has_string(&fields, "service_name") {
            fields.insert("service_name".into(), Value::String(key.clone()));
            changed = true;
        }
        let canonical = match fields.get("service_name") {
            Some(Value::String(name)) => service_key(name),
            _ => key.clone(),
        };
        let record = Value::Object(fields);

        if canonical == key {
            out.insert(key, record);
        } else {
            changed = true;
            out.entry(canonical).or_insert(record);
        }
    }

    (out, changed)
}

fn has_string(record: &Map<String, Value>, field: &str) -> bool {
    matches!(record.get(field), Some(Value::String(_)))
}
