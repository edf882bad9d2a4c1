//! Uploads: stores user files (profile photos, journal media) on disk.

pub mod handlers;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUpload {
    pub file_name: String,
    pub original_name: String,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` under a collision-free name derived from `original_name`.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<StoredUpload> {
        tokio::fs::create_dir_all(&self.root).await?;
        let file_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(original_name));
        tokio::fs::write(self.root.join(&file_name), bytes).await?;
        info!("Stored upload {file_name} ({} bytes)", bytes.len());
        Ok(StoredUpload {
            file_name,
            original_name: original_name.to_string(),
            size: bytes.len(),
        })
    }
}

/// Keeps the last path component and replaces anything outside
/// `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories_and_odd_chars() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\me.png"), "me.png");
        assert_eq!(sanitize_file_name("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name(".."), "upload");
        assert_eq!(sanitize_file_name(""), "upload");
    }

    #[tokio::test]
    async fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(dir.path().join("uploads"));
        let stored = uploads.save("avatar.png", b"png-bytes").await.unwrap();

        assert!(stored.file_name.ends_with("-avatar.png"));
        assert_eq!(stored.size, 9);
        let written = std::fs::read(uploads.root().join(&stored.file_name)).unwrap();
        assert_eq!(written, b"png-bytes");
    }
}
