//! Filesystem attachment store.
//!
//! One optional uploaded blob per article or robot row, written under a
//! per-kind directory with a millisecond-timestamp prefix and referenced by
//! the stored relative path (`/uploads/<kind>/<file>`). Blobs are served
//! statically; the store only puts and deletes.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

/// Which record type an attachment belongs to; doubles as the subdirectory
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Articles,
    Robots,
}

impl AttachmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Articles => "articles",
            AttachmentKind::Robots => "robots",
        }
    }
}

#[derive(Clone)]
pub struct AttachmentStore {
    root: PathBuf,
}

impl AttachmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the per-kind subdirectories. Called once at startup.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for kind in [AttachmentKind::Articles, AttachmentKind::Robots] {
            std::fs::create_dir_all(self.root.join(kind.as_str()))?;
        }
        Ok(())
    }

    /// Persist an uploaded blob and return its public relative path.
    ///
    /// The stored name is the original file name, sanitized, prefixed with
    /// the current epoch milliseconds to keep concurrent uploads of the same
    /// name from colliding.
    pub async fn put(
        &self,
        kind: AttachmentKind,
        original_name: &str,
        bytes: &[u8],
    ) -> std::io::Result<String> {
        let file_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(original_name)
        );
        let target = self.root.join(kind.as_str()).join(&file_name);
        tokio::fs::write(&target, bytes).await?;

        debug!("Stored attachment {}", target.display());
        Ok(format!("/uploads/{}/{}", kind.as_str(), file_name))
    }

    /// Remove the blob behind a stored relative path. A missing blob is not
    /// an error; a path that does not point inside the store is rejected.
    pub async fn delete(&self, relative_path: &str) -> std::io::Result<()> {
        let Some(suffix) = relative_path.strip_prefix("/uploads/") else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "attachment path outside the uploads directory",
            ));
        };
        if suffix.split('/').any(|part| part == ".." || part.is_empty()) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "attachment path outside the uploads directory",
            ));
        }

        let target = self.root.join(suffix);
        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                debug!("Removed attachment {}", target.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Keep file names to a safe character set; everything else becomes `_`.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_prefixes_timestamp_and_returns_public_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path());
        store.ensure_dirs().unwrap();

        let path = store
            .put(AttachmentKind::Articles, "wiring notes.pdf", b"pdf-bytes")
            .await
            .unwrap();

        assert!(path.starts_with("/uploads/articles/"));
        assert!(path.ends_with("-wiring_notes.pdf"));

        let on_disk = dir.path().join(path.strip_prefix("/uploads/").unwrap());
        assert_eq!(std::fs::read(on_disk).unwrap(), b"pdf-bytes");
    }

    #[tokio::test]
    async fn delete_removes_blob_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path());
        store.ensure_dirs().unwrap();

        let path = store
            .put(AttachmentKind::Robots, "chassis.step", b"cad")
            .await
            .unwrap();
        store.delete(&path).await.unwrap();

        let on_disk = dir.path().join(path.strip_prefix("/uploads/").unwrap());
        assert!(!on_disk.exists());

        // Second delete is a no-op, not an error
        store.delete(&path).await.unwrap();
    }

    #[tokio::test]
    async fn delete_rejects_paths_outside_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path());

        assert!(store.delete("/etc/passwd").await.is_err());
        assert!(store.delete("/uploads/../secret").await.is_err());
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_file_name("final rank (2025).png"), "final_rank__2025_.png");
        assert_eq!(sanitize_file_name(""), "upload");
    }
}
