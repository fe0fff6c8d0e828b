//! Zip packaging of generated images for the "download all" action.

use crate::error::{Result, StudioError};
use crate::models::{image_file_name, GeneratedImage};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

pub const ARCHIVE_FILE_NAME: &str = "imagen4-studio-images.zip";

/// An encoded archive ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveBlob {
    pub bytes: Vec<u8>,
    pub file_name: &'static str,
}

impl ArchiveBlob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name);
        std::fs::write(&path, &self.bytes)?;
        log::info!("Saved archive ({} bytes) to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

#[derive(Debug, Error)]
enum ArchiveFault {
    #[error("image {0} has no data URI payload")]
    MissingPayload(usize),
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encodes `data_uris` into a zip, one `imagen4-studio-<n>.png` entry per
/// image in input order. Each entry holds the base64-decoded text after the
/// URI's first comma.
fn encode_data_uris(data_uris: &[String]) -> std::result::Result<Vec<u8>, ArchiveFault> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (index, uri) in data_uris.iter().enumerate() {
        let (_, payload) = uri
            .split_once(',')
            .ok_or(ArchiveFault::MissingPayload(index + 1))?;
        let bytes = STANDARD.decode(payload.as_bytes())?;

        writer.start_file(image_file_name(index), options)?;
        writer.write_all(&bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Builds the archive on the blocking pool.
///
/// An empty image list encodes nothing and yields `Ok(None)`. Any failure is
/// reported as the generic archive error; the detail only goes to the log.
pub async fn build_archive(images: &[GeneratedImage]) -> Result<Option<ArchiveBlob>> {
    if images.is_empty() {
        log::debug!("No images to archive");
        return Ok(None);
    }

    let data_uris: Vec<String> = images.iter().map(|img| img.data_uri().to_string()).collect();
    let count = data_uris.len();

    let encoded = tokio::task::spawn_blocking(move || encode_data_uris(&data_uris))
        .await
        .map_err(|e| {
            log::error!("Archive task failed: {}", e);
            StudioError::archive_failed()
        })?;

    match encoded {
        Ok(bytes) => {
            log::debug!("Encoded {} image(s) into {} archive bytes", count, bytes.len());
            Ok(Some(ArchiveBlob {
                bytes,
                file_name: ARCHIVE_FILE_NAME,
            }))
        }
        Err(e) => {
            log::error!("Error creating zip file: {}", e);
            Err(StudioError::archive_failed())
        }
    }
}
