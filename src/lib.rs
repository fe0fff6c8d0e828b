//! Imagen Studio: prompt in, images out.
//!
//! ```no_run
//! use imagen_studio::{ImagenClient, ImagenConfig, Studio};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> imagen_studio::Result<()> {
//!     let client = ImagenClient::new(ImagenConfig::from_env());
//!     let mut studio = Studio::new(Arc::new(client));
//!     studio.set_prompt("a red fox");
//!     studio.submit().await?;
//!     if let Some(archive) = studio.download_all().await? {
//!         archive.save(std::path::Path::new("."))?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod imagen;
pub mod logger;
pub mod models;
pub mod studio;

pub use config::{ImagenConfig, StudioConfig};
pub use error::{Result, StudioError};
pub use imagen::{ImageService, ImagenClient};
pub use models::*;
pub use studio::{
    build_archive, classify, ArchiveBlob, ErrorPresentation, Orchestrator, ResultArea,
    SessionState, Studio, SubmitOutcome,
};
