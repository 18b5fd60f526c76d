//! Upload and generated-audio file handling.
//!
//! Uploads live for one request and are removed when their guard drops.
//! Generated audio is kept in the output directory indefinitely.

use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AudioNaming;

/// Reduce a client-supplied name to a safe final path component
pub fn sanitize_file_name(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = last
        .trim_start_matches('.')
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Lowercased extension without the dot
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create an empty temp file named after the upload plus a request id
    pub async fn create(&self, original_name: &str) -> io::Result<TempUpload> {
        let file_name = format!("temp_{}_{}", Uuid::new_v4().simple(), sanitize_file_name(original_name));
        let path = self.dir.join(file_name);
        let file = tokio::fs::File::create(&path).await?;
        debug!("Created upload file {}", path.display());

        Ok(TempUpload {
            path,
            file: Some(file),
            written: 0,
        })
    }
}

/// Request-scoped upload. The file is deleted when this value drops.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    file: Option<tokio::fs::File>,
    written: usize,
}

impl TempUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.written
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "upload already finished"))?;
        file.write_all(chunk).await?;
        self.written += chunk.len();
        Ok(())
    }

    /// Flush and close the handle so readers see the full file
    pub async fn finish(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await?;
        }
        Ok(())
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        self.file.take();
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed upload file {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove upload file {}: {}", self.path.display(), e),
        }
    }
}

/// Output directory for synthesized MP3 files
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
    naming: AudioNaming,
    prefix: String,
}

impl AudioStore {
    pub fn new(dir: impl Into<PathBuf>, naming: AudioNaming, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            naming,
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn generated_name(&self, text: &str, language: &str) -> String {
        let id = match self.naming {
            AudioNaming::Uuid => Uuid::new_v4(),
            AudioNaming::Content => {
                let key = format!("{}\u{0}{}", language, text);
                Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
            }
        };
        format!("{}_{}.mp3", self.prefix, id.simple())
    }

    /// Sanitize a caller-chosen name and force the `.mp3` extension
    pub fn normalize_name(name: &str) -> String {
        let name = sanitize_file_name(name);
        if name.to_lowercase().ends_with(".mp3") {
            name
        } else {
            format!("{}.mp3", name)
        }
    }

    /// Write `audio` under `file_name`, replacing any existing file.
    /// Readers see either the old file or the complete new one.
    pub async fn write(&self, file_name: &str, audio: &[u8]) -> io::Result<PathBuf> {
        let path = self.dir.join(file_name);
        // Dot-prefixed so `resolve` never serves a partial file
        let part = self
            .dir
            .join(format!(".{}.{}.part", file_name, Uuid::new_v4().simple()));

        let written = async {
            tokio::fs::write(&part, audio).await?;
            tokio::fs::rename(&part, &path).await
        }
        .await;
        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&part).await {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!("Failed to remove partial file {}: {}", part.display(), cleanup);
                }
            }
            return Err(e);
        }
        Ok(path)
    }

    /// Path for a requested file name, or None if it could escape the directory
    pub fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        let unsafe_name = file_name.is_empty()
            || file_name.starts_with('.')
            || file_name.contains(['/', '\\'])
            || file_name.contains("..");
        if unsafe_name {
            None
        } else {
            Some(self.dir.join(file_name))
        }
    }

    pub fn url_for(file_name: &str) -> String {
        format!("/audio/{}", file_name)
    }
}
