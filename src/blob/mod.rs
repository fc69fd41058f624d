//! Blob store for uploaded photos and generated PDFs
//!
//! A blob store persists raw bytes and hands back an addressable locator
//! pair: a public URL for clients and an internal path the service keeps to
//! itself. Content-type and size policy is the caller's job; the store only
//! moves bytes.

use async_trait::async_trait;

pub mod local;

pub use local::LocalBlobStore;

/// Kind of blob being stored; selects the storage subdirectory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    Photo,
    Pdf,
}

impl BlobKind {
    /// Subdirectory for this kind of blob
    pub fn subdir(&self) -> &'static str {
        match self {
            BlobKind::Photo => "photos",
            BlobKind::Pdf => "pdfs",
        }
    }
}

/// Locator pair returned by a successful store operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Public locator, safe to serialize to clients
    pub public_url: String,
    /// Internal storage locator, never exposed externally
    pub internal_path: String,
}

/// Errors raised by blob store backends
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("blob I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Service trait for blob persistence
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist content and return its locator pair
    ///
    /// `extension` includes the leading dot (e.g. `.png`). Filenames are
    /// made unique with a timestamp+random suffix; there is no content
    /// deduplication.
    async fn store(
        &self,
        kind: BlobKind,
        content: &[u8],
        extension: &str,
    ) -> Result<StoredBlob, BlobError>;

    /// Remove a previously stored blob by its internal path
    async fn delete(&self, internal_path: &str) -> Result<(), BlobError>;
}
