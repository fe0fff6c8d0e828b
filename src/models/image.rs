use crate::error::{Result, StudioError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// File name a single image is downloaded under. `index` is zero-based.
pub fn image_file_name(index: usize) -> String {
    format!("imagen4-studio-{}.png", index + 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedImage {
    #[serde(skip)]
    raw_bytes: Vec<u8>,
    encoded: String,
    data_uri: String,
}

/// Images from one generation, in the order the service returned them.
pub type GenerationResult = Vec<GeneratedImage>;

impl GeneratedImage {
    /// Wraps a base64 payload returned by the service.
    pub fn from_base64(encoded: impl Into<String>) -> Result<Self> {
        let encoded = encoded.into();
        let raw_bytes = STANDARD.decode(encoded.as_bytes()).map_err(|e| {
            StudioError::ExternalService(format!("failed to decode image payload: {}", e))
        })?;
        let data_uri = format!("{}{}", DATA_URI_PREFIX, encoded);

        Ok(Self {
            raw_bytes,
            encoded,
            data_uri,
        })
    }

    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// Writes the image into `dir` under its download name.
    pub fn save(&self, dir: &Path, index: usize) -> Result<PathBuf> {
        let path = dir.join(image_file_name(index));
        std::fs::write(&path, &self.raw_bytes)?;
        log::info!("Saved image {} to {}", index + 1, path.display());
        Ok(path)
    }
}
