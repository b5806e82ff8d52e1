use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{SecretBlob, SecretFetcher, parse_blob};
use crate::error::{ResolveError, Result};

/// In-memory [`SecretFetcher`] for tests.
///
/// Payloads are stored as raw strings and parsed on fetch, so malformed
/// JSON behaves exactly as it would coming back from AWS. Every fetch is
/// recorded, letting tests assert on call counts and deduplication.
#[derive(Default)]
pub struct MemoryFetcher {
    parameters: HashMap<String, String>,
    secrets: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a raw parameter payload under `name`.
    pub fn with_parameter(mut self, name: &str, raw: &str) -> Self {
        self.parameters.insert(name.to_string(), raw.to_string());
        self
    }

    /// Registers a raw secret payload under `name`.
    pub fn with_secret(mut self, name: &str, raw: &str) -> Self {
        self.secrets.insert(name.to_string(), raw.to_string());
        self
    }

    /// Every fetch so far, in order, rendered as `parameter:<name>` or
    /// `secret:<name>@<region>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn not_found(store: &'static str, name: &str) -> ResolveError {
        ResolveError::Fetch {
            store,
            name: name.to_string(),
            message: "not found".to_string(),
        }
    }
}

#[async_trait]
impl SecretFetcher for MemoryFetcher {
    async fn fetch_parameter(&self, name: &str) -> Result<SecretBlob> {
        self.record(format!("parameter:{name}"));
        let raw = self
            .parameters
            .get(name)
            .ok_or_else(|| Self::not_found("memory parameter store", name))?;
        parse_blob(name, raw)
    }

    async fn fetch_secret(&self, name: &str, region: &str) -> Result<SecretBlob> {
        self.record(format!("secret:{name}@{region}"));
        let raw = self
            .secrets
            .get(name)
            .ok_or_else(|| Self::not_found("memory secrets manager", name))?;
        parse_blob(name, raw)
    }
}
