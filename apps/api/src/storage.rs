//! Filesystem storage for uploaded resumes and job descriptions.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::extractor::DocumentKind;
use crate::errors::AppError;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A stored file read back for download.
#[derive(Debug)]
pub struct StoredFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    resume_dir: PathBuf,
    jd_dir: PathBuf,
}

impl FileStore {
    pub fn new(resume_dir: impl Into<PathBuf>, jd_dir: impl Into<PathBuf>) -> Self {
        Self {
            resume_dir: resume_dir.into(),
            jd_dir: jd_dir.into(),
        }
    }

    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.resume_dir).await?;
        tokio::fs::create_dir_all(&self.jd_dir).await?;
        info!(
            "File storage ready: resumes={} jds={}",
            self.resume_dir.display(),
            self.jd_dir.display()
        );
        Ok(())
    }

    /// Deterministic resume name: sanitized email plus the document extension.
    pub fn resume_file_name(email: &str, kind: DocumentKind) -> String {
        format!("{}.{}", sanitize_filename::sanitize(email), kind.extension())
    }

    pub fn resume_path(&self, file_name: &str) -> PathBuf {
        self.resume_dir.join(file_name)
    }

    pub fn jd_path(&self, file_name: &str) -> PathBuf {
        self.jd_dir.join(file_name)
    }

    /// Writes a resume, refusing to overwrite an existing file.
    pub async fn save_resume(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
        let path = self.resume_path(file_name);
        match write_new(&path, bytes).await {
            Ok(()) => Ok(path),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(AppError::Validation(
                "A resume for this email has already been submitted".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes a throwaway copy of an upload for one-off analysis. The caller
    /// removes it with `remove_file`.
    pub async fn save_scratch(&self, kind: DocumentKind, bytes: &[u8]) -> Result<PathBuf, AppError> {
        let path = self
            .resume_dir
            .join(format!("scratch-{}.{}", Uuid::new_v4(), kind.extension()));
        write_new(&path, bytes).await?;
        Ok(path)
    }

    /// Writes a job description under a timestamp-prefixed name and returns that name.
    pub async fn save_jd(&self, original_name: &str, bytes: &[u8]) -> Result<String, AppError> {
        let mut base = sanitize_filename::sanitize(original_name);
        if base.is_empty() {
            base = "job_description.pdf".to_string();
        }
        let file_name = format!("{}_{}", Utc::now().format("%Y%m%d%H%M%S%3f"), base);
        write_new(&self.jd_path(&file_name), bytes).await?;
        Ok(file_name)
    }

    pub async fn read_resume(&self, requested: &str) -> Result<StoredFile, AppError> {
        read_stored(&self.resume_dir, requested).await
    }

    pub async fn read_jd(&self, requested: &str) -> Result<StoredFile, AppError> {
        read_stored(&self.jd_dir, requested).await
    }

    /// Deletes a stored file; a file that is already gone is not an error.
    pub async fn remove_file(path: &Path) -> std::io::Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("File already missing: {}", path.display());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

async fn write_new(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}

async fn read_stored(dir: &Path, requested: &str) -> Result<StoredFile, AppError> {
    // Only bare, already-sanitized names resolve; anything else cannot name a stored file.
    let sanitized = sanitize_filename::sanitize(requested);
    if sanitized.is_empty() || sanitized != requested {
        return Err(AppError::NotFound(format!("File {requested} not found")));
    }

    let path = dir.join(&sanitized);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(StoredFile {
            bytes,
            content_type: DocumentKind::from_path(&path)
                .map(DocumentKind::content_type)
                .unwrap_or(FALLBACK_CONTENT_TYPE),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(AppError::NotFound(format!("File {requested} not found")))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> FileStore {
        FileStore::new(dir.join("resumes"), dir.join("jds"))
    }

    #[test]
    fn test_resume_file_name_is_derived_from_email() {
        assert_eq!(
            FileStore::resume_file_name("a@x.com", DocumentKind::Pdf),
            "a@x.com.pdf"
        );
        assert_eq!(
            FileStore::resume_file_name("../../etc/passwd", DocumentKind::Docx),
            "....etcpasswd.docx"
        );
    }

    #[tokio::test]
    async fn test_save_and_read_resume() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.ensure_dirs().await.unwrap();

        let path = store.save_resume("a@x.com.pdf", b"%PDF-1.4").await.unwrap();
        assert!(path.ends_with("resumes/a@x.com.pdf"));

        let stored = store.read_resume("a@x.com.pdf").await.unwrap();
        assert_eq!(stored.bytes, b"%PDF-1.4");
        assert_eq!(stored.content_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_save_resume_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.ensure_dirs().await.unwrap();

        store.save_resume("a@x.com.pdf", b"first").await.unwrap();
        let second = store.save_resume("a@x.com.pdf", b"second").await;
        assert!(matches!(second, Err(AppError::Validation(_))));

        let stored = store.read_resume("a@x.com.pdf").await.unwrap();
        assert_eq!(stored.bytes, b"first");
    }

    #[tokio::test]
    async fn test_read_rejects_traversal_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.ensure_dirs().await.unwrap();

        assert!(matches!(
            store.read_resume("../jds/x.pdf").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.read_resume("nobody.pdf").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_save_jd_prefixes_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.ensure_dirs().await.unwrap();

        let name = store.save_jd("Data Engineer.pdf", b"jd").await.unwrap();
        assert!(name.ends_with("_Data Engineer.pdf"));
        assert_eq!(store.read_jd(&name).await.unwrap().bytes, b"jd");
    }

    #[tokio::test]
    async fn test_scratch_files_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.ensure_dirs().await.unwrap();

        let a = store.save_scratch(DocumentKind::Pdf, b"one").await.unwrap();
        let b = store.save_scratch(DocumentKind::Pdf, b"two").await.unwrap();
        assert_ne!(a, b);
        assert!(a.extension().is_some_and(|e| e == "pdf"));

        FileStore::remove_file(&a).await.unwrap();
        assert!(!a.exists());
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::remove_file(&dir.path().join("gone.pdf"))
            .await
            .unwrap();
    }
}
