//! End-to-end recovery: raw model text → extracted literal → parsed value
//! → schema-conformant result.
//!
//! Extraction and parsing can fail (`NoJsonFound`, `MalformedJson`);
//! normalization never does. Failures are terminal for the request — any
//! retry of the upstream generative call is caller policy, not ours.

use std::path::PathBuf;

use serde_json::Value;
use tracing::warn;

use crate::extract::{self, ExtractError};
use crate::normalize::SchemaDescriptor;

/// Runs the full recovery pipeline for one raw model response.
pub fn recover(schema: &SchemaDescriptor, raw: &str) -> Result<Value, ExtractError> {
    let literal = extract::extract_with(raw, schema.preference())?;
    let value = extract::parse(literal)?;
    Ok(schema.normalize(value))
}

/// Side channel invoked when recovery fails. Observers must not panic and
/// must not assume the raw text contains any JSON.
pub trait FailureObserver: Send + Sync {
    fn on_failure(&self, raw: &str, error: &ExtractError);
}

/// Like [`recover`], but reports the offending raw text to `observer` when
/// extraction or parsing fails. The observer never runs on success.
pub fn recover_observed(
    schema: &SchemaDescriptor,
    raw: &str,
    observer: &dyn FailureObserver,
) -> Result<Value, ExtractError> {
    recover(schema, raw).map_err(|e| {
        observer.on_failure(raw, &e);
        e
    })
}

/// Writes failing raw responses to a directory for offline diagnosis.
/// Dump errors are logged and swallowed — diagnostics must not mask the
/// original failure.
pub struct DumpToDir {
    dir: PathBuf,
}

impl DumpToDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FailureObserver for DumpToDir {
    fn on_failure(&self, raw: &str, error: &ExtractError) {
        let name = format!(
            "failure-{}-{}.txt",
            chrono::Utc::now().format("%Y%m%dT%H%M%SZ"),
            uuid::Uuid::new_v4()
        );
        let path = self.dir.join(name);
        if let Err(io_err) = std::fs::write(&path, raw) {
            warn!(
                "failed to dump model output to {} ({io_err}); original error: {error}",
                path.display()
            );
        }
    }
}
