use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables checked for the API credential, in order.
const API_KEY_VARS: [&str; 3] = ["API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"];

#[derive(Debug, Clone)]
pub struct ImagenConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub imagen: ImagenConfig,
    pub output_dir: PathBuf,
    pub debug: bool,
}

impl Default for ImagenConfig {
    fn default() -> Self {
        ImagenConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ImagenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|name| env::var(name).ok())
            .find(|value| !value.trim().is_empty());
        let base_url = env::var("IMAGEN_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        ImagenConfig { api_key, base_url }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            imagen: ImagenConfig::default(),
            output_dir: PathBuf::from("."),
            debug: false,
        }
    }
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let output_dir = env::var("IMAGEN_OUTPUT_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let debug = env::var("IMAGEN_DEBUG")
            .ok()
            .map_or(false, |val| val == "true" || val == "1");

        StudioConfig {
            imagen: ImagenConfig::from_env(),
            output_dir,
            debug,
        }
    }

    pub fn with_imagen(mut self, config: ImagenConfig) -> Self {
        self.imagen = config;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StudioConfig::new();
        assert_eq!(config.imagen.base_url, DEFAULT_BASE_URL);
        assert!(config.imagen.api_key.is_none());
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(!config.debug);
    }

    #[test]
    fn test_builders() {
        let config = StudioConfig::new()
            .with_imagen(
                ImagenConfig::new()
                    .with_api_key("test-key")
                    .with_base_url("http://localhost:9000"),
            )
            .with_output_dir("/tmp/out")
            .with_debug(true);

        assert_eq!(config.imagen.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.imagen.base_url, "http://localhost:9000");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert!(config.debug);
    }
}
