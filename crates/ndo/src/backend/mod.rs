//! Backend trait and implementations for the orchestrator REST API.
//!
//! The primary implementation is [`http::HttpBackend`], which logs in and
//! talks HTTPS. Paths are relative to the API base, e.g.
//! `templates/summaries`.
//!
//! # Testing
//!
//! Use [`MockBackend`] for testing without network access:
//!
//! ```
//! use ndo::backend::{Backend, MockBackend};
//! use serde_json::json;
//!
//! let mock = MockBackend::new();
//! mock.set_response("templates/summaries", json!([]));
//!
//! let summaries = mock.get("templates/summaries").unwrap();
//! assert_eq!(summaries, json!([]));
//! ```

pub mod http;

use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Backend trait for API calls.
pub trait Backend: Send + Sync {
    /// GET `path` and decode the JSON body.
    fn get(&self, path: &str) -> Result<Value>;

    /// PATCH `path` with a JSON body and decode the JSON response.
    fn patch(&self, path: &str, body: &Value) -> Result<Value>;
}

/// Mock backend for testing without network access.
///
/// GET returns whatever was configured for the path. PATCH is recorded and
/// answered with the configured response for the path, if any, or an empty
/// object.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    responses: Arc<Mutex<HashMap<String, Value>>>,
    patches: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockBackend {
    /// Create a new empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response for a path.
    pub fn set_response(&self, path: impl Into<String>, body: Value) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(path.into(), body);
    }

    /// Every PATCH received so far, in order.
    #[must_use]
    pub fn patches(&self) -> Vec<(String, Value)> {
        self.patches.lock().unwrap().clone()
    }
}

impl Backend for MockBackend {
    fn get(&self, path: &str) -> Result<Value> {
        let responses = self.responses.lock().unwrap();
        responses
            .get(path)
            .cloned()
            .ok_or_else(|| Error::http(format!("HTTP 404 for {}", path), Some(404)))
    }

    fn patch(&self, path: &str, body: &Value) -> Result<Value> {
        self.patches
            .lock()
            .unwrap()
            .push((path.to_string(), body.clone()));
        let responses = self.responses.lock().unwrap();
        Ok(responses
            .get(path)
            .cloned()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new())))
    }
}
