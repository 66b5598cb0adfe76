//! Content sources for picture uploads.

use std::path::Path;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};

use crate::error::ApiError;

/// Bytes to upload plus the metadata the upload PUT needs.
#[async_trait]
pub trait BinaryContent: Send {
    fn readable(&self) -> bool;

    fn seekable(&self) -> bool;

    /// Current read position in bytes.
    fn position(&self) -> u64;

    /// Total length in bytes.
    fn length(&self) -> u64;

    fn content_type(&self) -> &str;

    /// Move back to the first byte. Only called when `seekable` is true.
    async fn rewind(&mut self) -> Result<(), ApiError>;

    /// Read everything from the current position to the end.
    async fn read_all(&mut self) -> Result<Vec<u8>, ApiError>;
}

/// In-memory content.
#[derive(Debug, Clone)]
pub struct BytesContent {
    data: Vec<u8>,
    position: usize,
    content_type: String,
}

impl BytesContent {
    pub fn new(data: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            position: 0,
            content_type: content_type.into(),
        }
    }

    /// Advance the read position, as a partial read by the caller would.
    pub fn skip(&mut self, n: usize) {
        self.position = (self.position + n).min(self.data.len());
    }
}

#[async_trait]
impl BinaryContent for BytesContent {
    fn readable(&self) -> bool {
        true
    }

    fn seekable(&self) -> bool {
        true
    }

    fn position(&self) -> u64 {
        self.position as u64
    }

    fn length(&self) -> u64 {
        self.data.len() as u64
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    async fn rewind(&mut self) -> Result<(), ApiError> {
        self.position = 0;
        Ok(())
    }

    async fn read_all(&mut self) -> Result<Vec<u8>, ApiError> {
        let bytes = self.data[self.position..].to_vec();
        self.position = self.data.len();
        Ok(bytes)
    }
}

/// Content read from a file on disk.
#[derive(Debug)]
pub struct FileContent {
    file: File,
    length: u64,
    position: u64,
    content_type: String,
}

impl FileContent {
    /// Open `path`, guessing the content type from its extension.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let content_type = guess_content_type(path);
        Self::open_with_type(path, content_type).await
    }

    pub async fn open_with_type(
        path: impl AsRef<Path>,
        content_type: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let file = File::open(path).await.map_err(|e| {
            ApiError::configuration(format!("cannot open {}: {e}", path.display()))
        })?;
        let metadata = file.metadata().await.map_err(content_error)?;
        if !metadata.is_file() {
            return Err(ApiError::configuration(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        Ok(Self {
            file,
            length: metadata.len(),
            position: 0,
            content_type: content_type.into(),
        })
    }
}

#[async_trait]
impl BinaryContent for FileContent {
    fn readable(&self) -> bool {
        true
    }

    fn seekable(&self) -> bool {
        true
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn length(&self) -> u64 {
        self.length
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    async fn rewind(&mut self) -> Result<(), ApiError> {
        self.file
            .seek(SeekFrom::Start(0))
            .await
            .map_err(content_error)?;
        self.position = 0;
        Ok(())
    }

    async fn read_all(&mut self) -> Result<Vec<u8>, ApiError> {
        let mut bytes = Vec::with_capacity(self.length.saturating_sub(self.position) as usize);
        self.file
            .read_to_end(&mut bytes)
            .await
            .map_err(content_error)?;
        self.position += bytes.len() as u64;
        Ok(bytes)
    }
}

/// Read or seek failure on the caller's content.
fn content_error(err: std::io::Error) -> ApiError {
    ApiError::configuration(format!("cannot read upload content: {err}"))
}

fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bytes_content_reads_from_position() {
        let mut content = BytesContent::new(b"hello world".to_vec(), "text/plain");
        content.skip(6);
        assert_eq!(content.position(), 6);
        assert_eq!(content.read_all().await.unwrap(), b"world");
        assert_eq!(content.position(), 11);

        content.rewind().await.unwrap();
        assert_eq!(content.read_all().await.unwrap(), b"hello world");
    }

    #[test]
    fn skip_is_clamped() {
        let mut content = BytesContent::new(vec![1, 2], "image/png");
        content.skip(10);
        assert_eq!(content.position(), 2);
    }

    #[test]
    fn content_type_from_extension() {
        assert_eq!(guess_content_type(Path::new("thumb.JPG")), "image/jpeg");
        assert_eq!(guess_content_type(Path::new("thumb.png")), "image/png");
        assert_eq!(guess_content_type(Path::new("thumb")), "application/octet-stream");
    }

    #[tokio::test]
    async fn file_content_round_trip() {
        let path = std::env::temp_dir().join(format!("vimeo-core-upload-{}.png", std::process::id()));
        tokio::fs::write(&path, b"\x89PNG fake").await.unwrap();

        let mut content = FileContent::open(&path).await.unwrap();
        assert_eq!(content.content_type(), "image/png");
        assert_eq!(content.length(), 9);

        let first = content.read_all().await.unwrap();
        assert_eq!(first.len(), 9);
        assert_eq!(content.position(), 9);

        content.rewind().await.unwrap();
        assert_eq!(content.read_all().await.unwrap(), first);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_configuration_error() {
        let err = FileContent::open("/definitely/not/here.png").await.unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[tokio::test]
    async fn local_read_failure_is_configuration_error() {
        // Reading a directory handle fails with EISDIR.
        let mut content = FileContent {
            file: File::open(std::env::temp_dir()).await.unwrap(),
            length: 0,
            position: 0,
            content_type: "image/png".to_string(),
        };
        let err = content.read_all().await.unwrap_err();
        assert!(matches!(err, ApiError::Configuration(ref m) if m.contains("upload content")));
        assert_eq!(content.position(), 0);
    }
}
