use crate::error::{Result, StudioError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImagenModel {
    #[default]
    #[serde(rename = "imagen-4.0-fast-generate-001")]
    Fast,
    #[serde(rename = "imagen-4.0-generate-001")]
    Standard,
    #[serde(rename = "imagen-4.0-ultra-generate-001")]
    Ultra,
}

impl ImagenModel {
    pub const ALL: [ImagenModel; 3] = [ImagenModel::Fast, ImagenModel::Standard, ImagenModel::Ultra];

    /// API model identifier.
    pub fn id(&self) -> &'static str {
        match self {
            ImagenModel::Fast => "imagen-4.0-fast-generate-001",
            ImagenModel::Standard => "imagen-4.0-generate-001",
            ImagenModel::Ultra => "imagen-4.0-ultra-generate-001",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ImagenModel::Fast => "Imagen 4 Fast",
            ImagenModel::Standard => "Imagen 4",
            ImagenModel::Ultra => "Imagen 4 Ultra",
        }
    }
}

impl fmt::Display for ImagenModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "9:16")]
    Portrait9x16,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Landscape16x9,
        AspectRatio::Landscape4x3,
        AspectRatio::Portrait3x4,
        AspectRatio::Portrait9x16,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Portrait9x16 => "9:16",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ratio| ratio.as_str() == value.trim())
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether people may be depicted in generated images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonGeneration {
    #[default]
    AllowAll,
    AllowAdult,
    DontAllow,
}

impl PersonGeneration {
    pub const ALL: [PersonGeneration; 3] = [
        PersonGeneration::AllowAll,
        PersonGeneration::AllowAdult,
        PersonGeneration::DontAllow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonGeneration::AllowAll => "ALLOW_ALL",
            PersonGeneration::AllowAdult => "ALLOW_ADULT",
            PersonGeneration::DontAllow => "DONT_ALLOW",
        }
    }

    /// Value the predict endpoint expects in `parameters.personGeneration`.
    pub fn api_value(&self) -> &'static str {
        match self {
            PersonGeneration::AllowAll => "allow_all",
            PersonGeneration::AllowAdult => "allow_adult",
            PersonGeneration::DontAllow => "dont_allow",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PersonGeneration::AllowAll => "Allow All",
            PersonGeneration::AllowAdult => "Allow Adults",
            PersonGeneration::DontAllow => "Don't Allow",
        }
    }
}

impl fmt::Display for PersonGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of images per call, always within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageCount(u8);

impl ImageCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    /// Clamps any edited value into range.
    pub fn clamped(value: i64) -> Self {
        ImageCount(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for ImageCount {
    fn default() -> Self {
        ImageCount(2)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: ImagenModel,
    pub image_count: ImageCount,
    pub aspect_ratio: AspectRatio,
    pub person_generation: PersonGeneration,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: ImagenModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_image_count(mut self, count: i64) -> Self {
        self.image_count = ImageCount::clamped(count);
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    pub fn with_person_generation(mut self, policy: PersonGeneration) -> Self {
        self.person_generation = policy;
        self
    }

    /// A request may only be issued with a non-empty prompt.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.is_empty() {
            return Err(StudioError::empty_prompt());
        }
        Ok(())
    }

    /// Applies one settings edit.
    pub fn apply(&mut self, field: ConfigField) {
        match field {
            ConfigField::Model(model) => self.model = model,
            ConfigField::ImageCount(count) => self.image_count = ImageCount::clamped(count),
            ConfigField::AspectRatio(ratio) => self.aspect_ratio = ratio,
            ConfigField::PersonGeneration(policy) => self.person_generation = policy,
        }
    }
}

/// A single edit made through the settings overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Model(ImagenModel),
    /// Raw edited value; clamped when applied.
    ImageCount(i64),
    AspectRatio(AspectRatio),
    PersonGeneration(PersonGeneration),
}
