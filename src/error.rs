use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("cannot sample from an empty choice list")]
    EmptyChoices,
    #[error("requested image is larger than the {} pixel limit", crate::generate::MAX_PIXELS)]
    TooLarge,
    #[error("failed to encode image\n{0}")]
    EncodeError(#[from] image::ImageError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChoiceError {
    #[error("at least one color choice is required")]
    Empty,
    #[error("unknown color '{0}'")]
    UnknownColor(String),
    #[error("weight for '{name}' must be a positive number, got {weight}")]
    NonPositiveWeight { name: String, weight: f64 },
}

#[derive(Error, Debug)]
pub enum PresetError {
    #[error("could not parse preset file\n{0}")]
    JsonError(#[from] serde_json::Error),
    #[error("could not parse preset file\n{0}")]
    RonError(#[from] ron::error::SpannedError),
    #[error("could not parse preset file\n{0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("failed to read preset file\n{0}")]
    FileReadError(#[from] std::io::Error),
    #[error("preset file does not have valid extension (must be .json, .ron or .yaml)")]
    ExtensionError,
}
