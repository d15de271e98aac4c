//! Live configuration storage.
//!
//! # Responsibilities
//! - Publish the live configuration to concurrent readers
//! - Decode candidates into isolated fresh instances
//! - Run the validate-then-commit pipeline shared by every writer
//!
//! # Design Decisions
//! - Readers load an `Arc<T>` snapshot from an `ArcSwap`; no read lock
//! - Commits serialize on a mutex and swap in a fully built value
//! - `update` runs against a private clone, so a failed commit leaves no trace

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use serde_json::Value;

use super::error::EndpointError;
use super::live::LiveConfig;

/// Holder of the single live configuration value.
pub struct ConfigStore<T> {
    live: ArcSwap<T>,
    commit: Mutex<()>,
}

impl<T: LiveConfig> ConfigStore<T> {
    /// Create a store publishing `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            live: ArcSwap::from_pointee(initial),
            commit: Mutex::new(()),
        }
    }

    /// Snapshot of the current configuration.
    pub fn current(&self) -> Arc<T> {
        self.live.load_full()
    }

    /// JSON encoding of the current configuration.
    pub fn to_json(&self) -> Result<Vec<u8>, EndpointError> {
        let snapshot = self.live.load();
        serde_json::to_vec(&**snapshot).map_err(EndpointError::SerializeConfig)
    }

    /// Decode a request body into a fresh instance.
    ///
    /// When the configuration provides a template through
    /// [`LiveConfig::create_new`], the body is laid over it so absent fields
    /// keep the template's values.
    pub fn decode(&self, body: &[u8]) -> Result<T, EndpointError> {
        let template = self.live.load().create_new();
        match template {
            None => serde_json::from_slice(body).map_err(EndpointError::Decode),
            Some(template) => {
                let patch: Value = serde_json::from_slice(body).map_err(EndpointError::Decode)?;
                let mut target =
                    serde_json::to_value(&template).map_err(EndpointError::SerializeConfig)?;
                overlay(&mut target, patch);
                serde_json::from_value(target).map_err(EndpointError::Decode)
            }
        }
    }

    /// Validate `candidate` and commit it.
    pub fn submit(&self, candidate: T) -> Result<(), EndpointError> {
        candidate
            .validate()
            .map_err(|e| EndpointError::Validation(e.to_string()))?;
        self.commit(candidate)
    }

    /// Decode, validate and commit a JSON body.
    pub fn submit_json(&self, body: &[u8]) -> Result<(), EndpointError> {
        let candidate = self.decode(body)?;
        self.submit(candidate)
    }

    fn commit(&self, candidate: T) -> Result<(), EndpointError> {
        // Guards no data, so a poisoned lock is still usable.
        let _guard = self.commit.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next = T::clone(&self.live.load());
        next.update(candidate)
            .map_err(|e| EndpointError::Update(e.to_string()))?;
        self.live.store(Arc::new(next));
        Ok(())
    }
}

/// Recursively lay `patch` over `target`.
///
/// Objects merge key by key; any other value replaces what was there.
fn overlay(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        // `null` for a nested struct keeps the template's value.
        (Value::Object(_), Value::Null) => {}
        (target, patch) => *target = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
    struct Limits {
        port: u16,
        workers: u32,
    }

    impl LiveConfig for Limits {
        type Error = String;

        fn validate(&self) -> Result<(), String> {
            if self.port < 1024 {
                return Err(format!("port {} is below 1024", self.port));
            }
            Ok(())
        }

        fn update(&mut self, candidate: Self) -> Result<(), String> {
            if candidate.workers == 0 {
                return Err("workers cannot drop to zero".into());
            }
            *self = candidate;
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
    struct Templated {
        name: String,
        limits: Limits,
    }

    impl LiveConfig for Templated {
        type Error = String;

        fn validate(&self) -> Result<(), String> {
            self.limits.validate()
        }

        fn update(&mut self, candidate: Self) -> Result<(), String> {
            *self = candidate;
            Ok(())
        }

        fn create_new(&self) -> Option<Self> {
            Some(Templated {
                name: "default".into(),
                limits: Limits { port: 8080, workers: 4 },
            })
        }
    }

    fn store() -> ConfigStore<Limits> {
        ConfigStore::new(Limits { port: 8080, workers: 4 })
    }

    #[test]
    fn test_submit_json_commits_valid_candidate() {
        let store = store();
        store.submit_json(br#"{"port":9090,"workers":8}"#).unwrap();
        assert_eq!(*store.current(), Limits { port: 9090, workers: 8 });
    }

    #[test]
    fn test_decode_failure_leaves_live_value() {
        let store = store();
        let before = store.to_json().unwrap();

        let err = store.submit_json(br#"{"port":"#).unwrap_err();
        assert!(matches!(err, EndpointError::Decode(_)));
        assert_eq!(store.to_json().unwrap(), before);
    }

    #[test]
    fn test_missing_field_without_template_is_decode_error() {
        let store = store();
        let err = store.submit_json(br#"{"port":9090}"#).unwrap_err();
        assert!(matches!(err, EndpointError::Decode(_)));
    }

    #[test]
    fn test_validation_failure_leaves_live_value() {
        let store = store();
        let err = store.submit(Limits { port: 80, workers: 4 }).unwrap_err();
        assert!(matches!(err, EndpointError::Validation(_)));
        assert_eq!(store.current().port, 8080);
    }

    #[test]
    fn test_failed_update_is_not_published() {
        let store = store();
        let err = store.submit(Limits { port: 9090, workers: 0 }).unwrap_err();
        assert!(matches!(err, EndpointError::Update(_)));
        assert_eq!(*store.current(), Limits { port: 8080, workers: 4 });
    }

    #[test]
    fn test_snapshot_survives_later_commit() {
        let store = store();
        let before = store.current();
        store.submit(Limits { port: 9443, workers: 2 }).unwrap();
        assert_eq!(before.port, 8080);
        assert_eq!(store.current().port, 9443);
    }

    #[test]
    fn test_template_fills_absent_fields() {
        let store = ConfigStore::new(Templated {
            name: "live".into(),
            limits: Limits { port: 9000, workers: 16 },
        });

        store.submit_json(br#"{"limits":{"port":9443}}"#).unwrap();
        let current = store.current();
        assert_eq!(current.name, "default");
        assert_eq!(current.limits, Limits { port: 9443, workers: 4 });
    }

    #[test]
    fn test_overlay_merges_objects_and_replaces_scalars() {
        let mut target = json!({"a": {"b": 1, "c": [1, 2]}, "d": "x"});
        overlay(&mut target, json!({"a": {"c": [3]}, "e": true}));
        assert_eq!(target, json!({"a": {"b": 1, "c": [3]}, "d": "x", "e": true}));
    }

    #[test]
    fn test_null_section_keeps_template() {
        let store = ConfigStore::new(Templated {
            name: "live".into(),
            limits: Limits { port: 9000, workers: 16 },
        });

        store.submit_json(br#"{"name":"edge","limits":null}"#).unwrap();
        let current = store.current();
        assert_eq!(current.name, "edge");
        assert_eq!(current.limits, Limits { port: 8080, workers: 4 });
    }

    #[test]
    fn test_overlay_skips_null_over_object() {
        let mut target = json!({"a": {"b": 1}, "c": 2});
        overlay(&mut target, json!({"a": null, "c": null}));
        assert_eq!(target, json!({"a": {"b": 1}, "c": null}));
    }
}
