//! # Persistence Collaborator
//!
//! The external platform that owns record storage, modelled as the
//! [`Store`] trait. The trait mirrors the platform's operations one to one:
//! collections of stringly-typed records, a controlled vocabulary per field
//! definition, and a shop-level ordering state of raw JSON strings.
//!
//! Writes return a [`WriteOutcome`] rather than an error when the platform
//! rejects content: validation failures are data (`user_errors`), transport
//! failures are `Err`. The cascade orchestrator depends on that split.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryStore`]: in-memory state behind a mutex, used by tests and as
//!   a scratch backend.
//! - [`JsonFileStore`]: the same state persisted to a JSON file after every
//!   mutation, the backend the CLI runs against.
//!
//! Neither implementation offers cross-record transactions or optimistic
//! locking; concurrent writers race and the last write wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, UserError};

/// Ordering-state key for the category display order.
pub const CATEGORY_ORDER_KEY: &str = "category_order";
/// Ordering-state key for the per-category ingredient display order.
pub const INGREDIENT_ORDER_KEY: &str = "ingredient_order";

/// A raw record as the platform returns it: an id plus string field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub fields: HashMap<String, String>,
}

impl Record {
    /// A field value, empty when absent. Field values are always strings;
    /// composite values are JSON within the string (see [`crate::codec`]).
    pub fn field(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }
}

/// Result of a write operation against the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Id of the affected record, when the write succeeded.
    pub id: Option<String>,
    /// Validation errors; non-empty means the write was rejected.
    pub user_errors: Vec<UserError>,
}

impl WriteOutcome {
    pub fn ok(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            user_errors: Vec::new(),
        }
    }

    pub fn rejected(user_errors: Vec<UserError>) -> Self {
        Self {
            id: None,
            user_errors,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.user_errors.is_empty()
    }
}

/// The shop ordering state as stored: raw JSON strings, decoded by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderingState {
    pub category_order: String,
    pub ingredient_order: String,
}

/// Operations the persistence platform offers.
///
/// Signatures only; the wire format is the platform's concern. `Send +
/// Sync` because the cascade fans record updates out across threads.
pub trait Store: Send + Sync {
    fn read_collection(&self, record_type: &str) -> Result<Vec<Record>>;

    /// The controlled vocabulary attached to a field definition.
    fn read_field_definition(&self, record_type: &str, field_key: &str) -> Result<Vec<String>>;

    /// Replace a field definition's vocabulary. Content problems come back
    /// as `user_errors`, not as `Err`.
    fn write_field_definition(
        &self,
        record_type: &str,
        field_key: &str,
        choices: &[String],
    ) -> Result<WriteOutcome>;

    fn create_record(&self, record_type: &str, fields: &[(String, String)])
        -> Result<WriteOutcome>;

    fn update_record(
        &self,
        record_type: &str,
        id: &str,
        fields: &[(String, String)],
    ) -> Result<WriteOutcome>;

    fn delete_record(&self, record_type: &str, id: &str) -> Result<WriteOutcome>;

    fn read_ordering_state(&self) -> Result<OrderingState>;

    /// Write ordering-state entries as `(key, value_json)` pairs.
    fn write_ordering_state(&self, entries: &[(String, String)]) -> Result<WriteOutcome>;
}

/// Validate a vocabulary before accepting it: entries must be non-blank and
/// unique. This is the platform-side validation the cascade's step 1 can
/// trip over.
fn validate_choices(field_key: &str, choices: &[String]) -> Vec<UserError> {
    let mut errors = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for choice in choices {
        if choice.trim().is_empty() {
            errors.push(UserError {
                field: Some(field_key.to_string()),
                message: "Options must not be blank".to_string(),
            });
        } else if !seen.insert(choice.as_str()) {
            errors.push(UserError {
                field: Some(field_key.to_string()),
                message: format!("Duplicate option '{}'", choice),
            });
        }
    }
    errors
}

/// Shared mutable state for the bundled store implementations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    collections: HashMap<String, Vec<Record>>,
    /// record type → field key → choices
    definitions: HashMap<String, HashMap<String, Vec<String>>>,
    ordering: HashMap<String, String>,
    next_id: u64,
}

impl StoreState {
    fn read_collection(&self, record_type: &str) -> Vec<Record> {
        self.collections.get(record_type).cloned().unwrap_or_default()
    }

    fn read_field_definition(&self, record_type: &str, field_key: &str) -> Vec<String> {
        self.definitions
            .get(record_type)
            .and_then(|fields| fields.get(field_key))
            .cloned()
            .unwrap_or_default()
    }

    fn write_field_definition(
        &mut self,
        record_type: &str,
        field_key: &str,
        choices: &[String],
    ) -> WriteOutcome {
        let errors = validate_choices(field_key, choices);
        if !errors.is_empty() {
            return WriteOutcome::rejected(errors);
        }
        self.definitions
            .entry(record_type.to_string())
            .or_default()
            .insert(field_key.to_string(), choices.to_vec());
        WriteOutcome::ok(format!("{}.{}", record_type, field_key))
    }

    fn create_record(&mut self, record_type: &str, fields: &[(String, String)]) -> WriteOutcome {
        self.next_id += 1;
        let id = format!("{}-{}", record_type, self.next_id);
        let record = Record {
            id: id.clone(),
            fields: fields.iter().cloned().collect(),
        };
        self.collections
            .entry(record_type.to_string())
            .or_default()
            .push(record);
        WriteOutcome::ok(id)
    }

    fn update_record(
        &mut self,
        record_type: &str,
        id: &str,
        fields: &[(String, String)],
    ) -> Result<WriteOutcome> {
        let records = self
            .collections
            .get_mut(record_type)
            .ok_or_else(|| Error::RecordNotFound {
                record_type: record_type.to_string(),
                id: id.to_string(),
            })?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::RecordNotFound {
                record_type: record_type.to_string(),
                id: id.to_string(),
            })?;
        for (key, value) in fields {
            record.fields.insert(key.clone(), value.clone());
        }
        Ok(WriteOutcome::ok(id))
    }

    fn delete_record(&mut self, record_type: &str, id: &str) -> Result<WriteOutcome> {
        let records = self
            .collections
            .get_mut(record_type)
            .ok_or_else(|| Error::RecordNotFound {
                record_type: record_type.to_string(),
                id: id.to_string(),
            })?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(Error::RecordNotFound {
                record_type: record_type.to_string(),
                id: id.to_string(),
            });
        }
        Ok(WriteOutcome::ok(id))
    }

    fn read_ordering_state(&self) -> OrderingState {
        OrderingState {
            category_order: self
                .ordering
                .get(CATEGORY_ORDER_KEY)
                .cloned()
                .unwrap_or_default(),
            ingredient_order: self
                .ordering
                .get(INGREDIENT_ORDER_KEY)
                .cloned()
                .unwrap_or_default(),
        }
    }

    fn write_ordering_state(&mut self, entries: &[(String, String)]) -> WriteOutcome {
        for (key, value_json) in entries {
            self.ordering.insert(key.clone(), value_json.clone());
        }
        WriteOutcome::ok("ordering")
    }
}

/// In-memory store for tests and scratch runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
    /// Record ids whose updates fail at transport level. Lets tests
    /// exercise the cascade's partial-failure path.
    unwritable_ids: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `update_record` for `id` fail with a
    /// transport error.
    pub fn poison_updates_for(&self, id: impl Into<String>) {
        self.unwritable_ids.lock().unwrap().push(id.into());
    }
}

impl Store for MemoryStore {
    fn read_collection(&self, record_type: &str) -> Result<Vec<Record>> {
        Ok(self.state.lock().unwrap().read_collection(record_type))
    }

    fn read_field_definition(&self, record_type: &str, field_key: &str) -> Result<Vec<String>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .read_field_definition(record_type, field_key))
    }

    fn write_field_definition(
        &self,
        record_type: &str,
        field_key: &str,
        choices: &[String],
    ) -> Result<WriteOutcome> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .write_field_definition(record_type, field_key, choices))
    }

    fn create_record(
        &self,
        record_type: &str,
        fields: &[(String, String)],
    ) -> Result<WriteOutcome> {
        Ok(self.state.lock().unwrap().create_record(record_type, fields))
    }

    fn update_record(
        &self,
        record_type: &str,
        id: &str,
        fields: &[(String, String)],
    ) -> Result<WriteOutcome> {
        if self.unwritable_ids.lock().unwrap().iter().any(|u| u == id) {
            return Err(Error::Store {
                operation: "update_record".to_string(),
                message: format!("simulated transport failure for {}", id),
            });
        }
        self.state.lock().unwrap().update_record(record_type, id, fields)
    }

    fn delete_record(&self, record_type: &str, id: &str) -> Result<WriteOutcome> {
        self.state.lock().unwrap().delete_record(record_type, id)
    }

    fn read_ordering_state(&self) -> Result<OrderingState> {
        Ok(self.state.lock().unwrap().read_ordering_state())
    }

    fn write_ordering_state(&self, entries: &[(String, String)]) -> Result<WriteOutcome> {
        Ok(self.state.lock().unwrap().write_ordering_state(entries))
    }
}

/// File-backed store: the full state as one JSON document, rewritten after
/// every mutation. Suitable for a single shop's catalog, which is small.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonFileStore {
    /// Open a store at `path`, creating empty state if the file is absent.
    ///
    /// A present but malformed state file is a transport error, not a
    /// decode-to-default: silently starting empty would discard the shop's
    /// catalog on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|err| Error::Store {
                operation: "open".to_string(),
                message: format!("state file {} is not valid JSON: {}", path.display(), err),
            })?
        } else {
            StoreState::default()
        };
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Default store location under the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("bowl-builder").join("store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, state: &StoreState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(state).map_err(|err| Error::Serialization {
            message: err.to_string(),
        })?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn read_collection(&self, record_type: &str) -> Result<Vec<Record>> {
        Ok(self.state.lock().unwrap().read_collection(record_type))
    }

    fn read_field_definition(&self, record_type: &str, field_key: &str) -> Result<Vec<String>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .read_field_definition(record_type, field_key))
    }

    fn write_field_definition(
        &self,
        record_type: &str,
        field_key: &str,
        choices: &[String],
    ) -> Result<WriteOutcome> {
        let mut state = self.state.lock().unwrap();
        let outcome = state.write_field_definition(record_type, field_key, choices);
        if outcome.is_ok() {
            self.persist(&state)?;
        }
        Ok(outcome)
    }

    fn create_record(
        &self,
        record_type: &str,
        fields: &[(String, String)],
    ) -> Result<WriteOutcome> {
        let mut state = self.state.lock().unwrap();
        let outcome = state.create_record(record_type, fields);
        self.persist(&state)?;
        Ok(outcome)
    }

    fn update_record(
        &self,
        record_type: &str,
        id: &str,
        fields: &[(String, String)],
    ) -> Result<WriteOutcome> {
        let mut state = self.state.lock().unwrap();
        let outcome = state.update_record(record_type, id, fields)?;
        self.persist(&state)?;
        Ok(outcome)
    }

    fn delete_record(&self, record_type: &str, id: &str) -> Result<WriteOutcome> {
        let mut state = self.state.lock().unwrap();
        let outcome = state.delete_record(record_type, id)?;
        self.persist(&state)?;
        Ok(outcome)
    }

    fn read_ordering_state(&self) -> Result<OrderingState> {
        Ok(self.state.lock().unwrap().read_ordering_state())
    }

    fn write_ordering_state(&self, entries: &[(String, String)]) -> Result<WriteOutcome> {
        let mut state = self.state.lock().unwrap();
        let outcome = state.write_ordering_state(entries);
        self.persist(&state)?;
        Ok(outcome)
    }
}
