//! Domain types for the two flows.
//!
//! These are the validated shapes the rest of the crate works with. The
//! loosely-typed JSON the backend sends lives in [`crate::api::wire`] and is
//! converted into these types at the HTTP boundary.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::organ::Organ;

/// An image file picked for identification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("{0} is not an image file")]
    UnsupportedType(String),
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Image MIME type for a file extension, `None` for anything that is not an image.
pub fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => return None,
    };
    Some(mime)
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw.trim()).into_owned())
}

impl ImageUpload {
    pub fn from_bytes(file_name: &str, bytes: Vec<u8>) -> Result<Self, ImageError> {
        let mime = image_mime(Path::new(file_name))
            .ok_or_else(|| ImageError::UnsupportedType(file_name.to_string()))?;
        Ok(Self {
            file_name: file_name.to_string(),
            mime,
            bytes,
        })
    }

    pub async fn from_path(raw: &str) -> Result<Self, ImageError> {
        let path = expand_home(raw);
        let display = path.display().to_string();
        if image_mime(&path).is_none() {
            return Err(ImageError::UnsupportedType(display));
        }

        let bytes = tokio::fs::read(&path).await.map_err(|source| ImageError::Io {
            path: display.clone(),
            source,
        })?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.jpg");
        Self::from_bytes(file_name, bytes)
    }

    pub fn size_label(&self) -> String {
        let len = self.bytes.len();
        if len >= 1024 * 1024 {
            format!("{:.1} MB", len as f64 / (1024.0 * 1024.0))
        } else if len >= 1024 {
            format!("{:.1} KB", len as f64 / 1024.0)
        } else {
            format!("{} B", len)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifyRequest {
    pub image: ImageUpload,
    pub organ: Organ,
}

/// Medicinal data the backend attaches to an identification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub medicinal_uses: Vec<String>,
    pub contraindications: Vec<String>,
    pub common_name: Option<String>,
    pub notes: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentifyResult {
    pub scientific_name: Option<String>,
    pub confidence: Option<f64>,
    pub common_names: Vec<String>,
    pub enrichment: Option<Enrichment>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub raw_provider: Option<String>,
    /// Set when the backend found no candidate ("No match found").
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    /// `None` when the message is blank after trimming.
    pub fn new(message: &str) -> Option<Self> {
        if message.trim().is_empty() {
            None
        } else {
            Some(Self {
                message: message.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResult {
    pub answer: String,
    pub disclaimer: String,
    pub lang: Option<String>,
}

/// Response of the backend root endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendStatus {
    pub ok: bool,
    pub service: Option<String>,
    pub mock: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(image_mime(Path::new("tulsi.JPG")), Some("image/jpeg"));
        assert_eq!(image_mime(Path::new("a/b/neem.webp")), Some("image/webp"));
        assert_eq!(image_mime(Path::new("notes.txt")), None);
        assert_eq!(image_mime(Path::new("no_extension")), None);
    }

    #[test]
    fn rejects_non_images() {
        let err = ImageUpload::from_bytes("plants.csv", vec![1, 2]).unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedType(_)));
    }

    #[tokio::test]
    async fn reads_image_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let upload = ImageUpload::from_path(path.to_str().unwrap()).await.unwrap();
        assert_eq!(upload.file_name, "leaf.png");
        assert_eq!(upload.mime, "image/png");
        assert_eq!(upload.bytes.len(), 4);
        assert_eq!(upload.size_label(), "4 B");
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let err = ImageUpload::from_path("/definitely/not/here.jpg").await.unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.jpg"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home(" ~/plants/neem.jpg "), home.join("plants/neem.jpg"));
        assert_eq!(expand_home("/tmp/neem.jpg"), PathBuf::from("/tmp/neem.jpg"));
    }

    #[test]
    fn blank_chat_message_is_not_a_request() {
        assert!(ChatRequest::new("   \n\t").is_none());
        assert_eq!(ChatRequest::new(" cough ").unwrap().message, " cough ");
    }
}
