use async_trait::async_trait;
use procura_core::{ArtifactError, ArtifactStore};
use std::path::PathBuf;

/// Writes confirmation documents to a local directory.
/// Names are `{po_number}-{confirmation}.pdf`; a run reusing a name
/// overwrites the earlier document.
pub struct LocalArtifactStore {
    dir: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn store(&self, name: &str, bytes: &[u8]) -> Result<String, ArtifactError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ArtifactError::WriteFailed {
                name: name.to_string(),
                source,
            })?;

        let path = self.dir.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| ArtifactError::WriteFailed {
                name: name.to_string(),
                source,
            })?;

        tracing::info!(path = %path.display(), "confirmation artifact stored");
        Ok(path.to_string_lossy().into_owned())
    }
}
