//! Filesystem blob store

use crate::blob::{BlobError, BlobKind, BlobStore, StoredBlob};
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::path::PathBuf;
use tokio::fs;

/// Blob store writing to a local directory tree
///
/// Photos land under `<root>/photos/`, PDFs under `<root>/pdfs/`. The public
/// URL is the configured base prefix plus the relative path, so the same
/// tree can be served statically.
#[derive(Clone, Debug)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base: String,
}

impl LocalBlobStore {
    /// Create a store rooted at `root`, publishing URLs under `public_base`
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Unique filename: epoch millis + `-` + 9-digit random + extension
    fn unique_name(extension: &str) -> String {
        let millis = Utc::now().timestamp_millis();
        let random: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        format!("{}-{}{}", millis, random, extension)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(
        &self,
        kind: BlobKind,
        content: &[u8],
        extension: &str,
    ) -> Result<StoredBlob, BlobError> {
        let dir = self.root.join(kind.subdir());
        fs::create_dir_all(&dir).await?;

        let filename = Self::unique_name(extension);
        let path = dir.join(&filename);
        fs::write(&path, content).await?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "stored blob");

        Ok(StoredBlob {
            public_url: format!("{}/{}/{}", self.public_base, kind.subdir(), filename),
            internal_path: path.to_string_lossy().into_owned(),
        })
    }

    async fn delete(&self, internal_path: &str) -> Result<(), BlobError> {
        fs::remove_file(internal_path).await?;
        Ok(())
    }
}
