use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to store artifact {name}: {source}")]
    WriteFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Sink for confirmation documents captured after checkout
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist a document under the given name; returns a reference
    /// (path, URI) the caller can hand back to the user.
    async fn store(&self, name: &str, bytes: &[u8]) -> Result<String, ArtifactError>;
}

/// In-memory artifact store for tests and rehearsal runs
#[derive(Default)]
pub struct MemoryArtifactStore {
    artifacts: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of all stored artifacts, in no particular order
    pub async fn names(&self) -> Vec<String> {
        self.artifacts.lock().await.keys().cloned().collect()
    }

    pub async fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.artifacts.lock().await.get(name).cloned()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn store(&self, name: &str, bytes: &[u8]) -> Result<String, ArtifactError> {
        self.artifacts
            .lock()
            .await
            .insert(name.to_string(), bytes.to_vec());
        Ok(format!("memory://{name}"))
    }
}
