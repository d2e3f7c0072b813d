//! Storage for uploaded film images

use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// URL prefix the upload directory is served under
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Directory uploaded files are written to
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maximum accepted request body size for uploads
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Write `bytes` under a fresh random name
    ///
    /// The file is removed again when the returned guard is dropped without
    /// [`PendingUpload::keep`] being called.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> io::Result<PendingUpload> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let file_name = match original_name.and_then(file_extension) {
            Some(ext) => format!("{}.{}", Uuid::new_v4().simple(), ext),
            None => Uuid::new_v4().simple().to_string(),
        };

        let pending = PendingUpload {
            path: self.dir.join(&file_name),
            public_path: format!("{}/{}", PUBLIC_PREFIX, file_name),
            kept: false,
        };

        tokio::fs::write(&pending.path, bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), pending.path.display());
        Ok(pending)
    }
}

/// Lower-cased extension of a client file name, if it is a plain short one
fn file_extension(name: &str) -> Option<String> {
    static EXTENSION_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EXTENSION_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9]{1,8}$").expect("Failed to compile extension regex"));

    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| regex.is_match(ext))
        .map(str::to_ascii_lowercase)
}

/// A written upload that is deleted on drop unless kept
#[derive(Debug)]
pub struct PendingUpload {
    path: PathBuf,
    public_path: String,
    kept: bool,
}

impl PendingUpload {
    /// Location of the file on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path under which the file is served
    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    /// Keep the file on disk
    pub fn keep(mut self) {
        self.kept = true;
        info!("Stored upload {}", self.path.display());
    }
}

impl Drop for PendingUpload {
    fn drop(&mut self) {
        if self.kept {
            return;
        }

        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Discarded upload {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to discard upload {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> UploadStore {
        UploadStore::new(
            std::env::temp_dir().join(format!("uploads-{}", Uuid::new_v4())),
            1024,
        )
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("poster.PNG").as_deref(), Some("png"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension("evil.p/ng"), None);
        assert_eq!(file_extension("weird.ext-with-dash"), None);
    }

    #[tokio::test]
    async fn test_dropped_upload_is_removed() {
        let uploads = store();
        let pending = uploads.save(Some("poster.png"), b"png-bytes").await.unwrap();
        let path = pending.path().to_path_buf();

        assert!(path.exists());
        assert!(pending.public_path().starts_with("/uploads/"));
        assert!(pending.public_path().ends_with(".png"));

        drop(pending);
        assert!(!path.exists());

        std::fs::remove_dir_all(uploads.dir()).unwrap();
    }

    #[tokio::test]
    async fn test_kept_upload_survives() {
        let uploads = store();
        let pending = uploads.save(None, b"raw").await.unwrap();
        let path = pending.path().to_path_buf();
        let public_path = pending.public_path().to_string();

        pending.keep();

        assert_eq!(std::fs::read(&path).unwrap(), b"raw");
        assert_eq!(
            public_path,
            format!("/uploads/{}", path.file_name().unwrap().to_str().unwrap())
        );

        std::fs::remove_dir_all(uploads.dir()).unwrap();
    }
}
