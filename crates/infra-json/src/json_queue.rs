// JSON File MessageQueue Implementation

use crate::document::{decode, encode};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use timemachine_core::domain::{DomainError, Message};
use timemachine_core::error::{AppError, Result};
use timemachine_core::port::MessageQueue;
use tokio::sync::Mutex;
use tracing::{debug, info};

fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> AppError {
    AppError::Storage(format!("{} {}: {}", action, path.display(), err))
}

/// Durable FIFO queue backed by a single JSON document
///
/// Every mutation serializes the would-be queue, writes it to a sibling
/// temporary file, renames it over the document, and only then updates the
/// in-memory copy. A failed write leaves both copies as they were.
///
/// Mutations run on their own task, so a caller that is dropped mid-write
/// (a timeout, a closed RPC connection) cannot leave disk and memory apart.
pub struct JsonFileQueue {
    state: Arc<QueueState>,
}

struct QueueState {
    path: PathBuf,
    messages: Mutex<VecDeque<Message>>,
}

impl JsonFileQueue {
    /// Load the queue from `path`, creating an empty document if absent
    ///
    /// # Errors
    /// `AppError::Storage` if the document exists but cannot be read or
    /// parsed, or if the initial empty document cannot be written.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let messages = match tokio::fs::read(&path).await {
            Ok(bytes) => decode(&bytes).map_err(|e| storage_error("corrupt messages file", &path, e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "Messages file not found, creating empty queue");
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| storage_error("error creating directory for", &path, e))?;
                }
                write_atomically(&path, encode(std::iter::empty::<&Message>())?).await?;
                Vec::new()
            }
            Err(e) => return Err(storage_error("error reading messages file", &path, e)),
        };

        info!(
            path = %path.display(),
            messages = messages.len(),
            "Message queue initialized"
        );

        Ok(Self {
            state: Arc::new(QueueState {
                path,
                messages: Mutex::new(messages.into()),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.state.path
    }
}

impl QueueState {
    async fn add(&self, message: Message) -> Result<()> {
        let mut messages = self.messages.lock().await;

        let bytes = encode(messages.iter().chain(std::iter::once(&message)))?;
        write_atomically(&self.path, bytes).await?;
        messages.push_back(message);

        debug!(queue_length = messages.len(), "Message appended");
        Ok(())
    }

    async fn pop(&self) -> Result<Message> {
        let mut messages = self.messages.lock().await;

        if messages.is_empty() {
            return Err(DomainError::EmptyQueue.into());
        }

        let bytes = encode(messages.iter().skip(1))?;
        write_atomically(&self.path, bytes).await?;
        let head = messages
            .pop_front()
            .ok_or(AppError::Domain(DomainError::EmptyQueue))?;

        debug!(queue_length = messages.len(), "Message popped");
        Ok(head)
    }
}

#[async_trait]
impl MessageQueue for JsonFileQueue {
    async fn add(&self, message: Message) -> Result<()> {
        let state = Arc::clone(&self.state);
        tokio::spawn(async move { state.add(message).await })
            .await
            .map_err(|e| AppError::Internal(format!("queue add task failed: {}", e)))?
    }

    async fn pop(&self) -> Result<Message> {
        let state = Arc::clone(&self.state);
        tokio::spawn(async move { state.pop().await })
            .await
            .map_err(|e| AppError::Internal(format!("queue pop task failed: {}", e)))?
    }

    async fn is_empty(&self) -> bool {
        self.state.messages.lock().await.is_empty()
    }

    async fn len(&self) -> usize {
        self.state.messages.lock().await.len()
    }

    async fn snapshot(&self) -> Vec<Message> {
        self.state.messages.lock().await.iter().cloned().collect()
    }
}

/// Replace `path` with `bytes` in one step (temp file + fsync + rename)
///
/// The temp file is removed again if any step fails.
async fn write_atomically(path: &Path, bytes: Vec<u8>) -> Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let tmp = temp_path(&path);
        let result = replace_file(&tmp, &path, &bytes);
        if result.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        result
    })
    .await
    .map_err(|e| AppError::Internal(format!("write task failed: {}", e)))?
}

fn replace_file(tmp: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(tmp).map_err(|e| storage_error("error creating", tmp, e))?;
    file.write_all(bytes)
        .map_err(|e| storage_error("error writing", tmp, e))?;
    file.sync_all()
        .map_err(|e| storage_error("error syncing", tmp, e))?;
    drop(file);

    std::fs::rename(tmp, path).map_err(|e| storage_error("error replacing", path, e))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("messages.json"));
    name.push(".tmp");
    path.with_file_name(name)
}
