use crate::model::LogEntry;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::trace;

/// Append-only JSON-lines file recording every accepted push request.
///
/// The file is opened and closed around each append, the lock makes the
/// open-write-close sequence exclusive across workers so lines never
/// interleave.
#[derive(Debug)]
pub struct RequestLog {
    path:   PathBuf,
    writer: Mutex<()>,
}

impl RequestLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), writer: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub async fn append(&self, entry: &LogEntry) -> Result<()> {
        let mut line = serde_json::to_vec(entry)
            .context("Failed to serialize the request log entry")?;
        line.push(b'\n');

        let _writer = self.writer.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| {
                format!("Failed to open the request log {:?}", self.path)
            })?;
        file.write_all(&line).await.with_context(|| {
            format!("Failed to append to the request log {:?}", self.path)
        })?;
        file.flush().await.with_context(|| {
            format!("Failed to flush the request log {:?}", self.path)
        })?;

        trace!("Appended {} bytes to {:?}", line.len(), self.path);
        Ok(())
    }
}
