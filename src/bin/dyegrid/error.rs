use thiserror::Error;

use dyegrid::{ChoiceError, GenerateError, PresetError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    PresetError(#[from] PresetError),
    #[error("invalid preset choices, {0}")]
    ChoiceError(#[from] ChoiceError),
    #[error("{0}")]
    GenerateError(#[from] GenerateError),
    #[error("failed to save image\n{0}")]
    ImageSaveError(#[from] image::ImageError),
    #[error("server error\n{0}")]
    ServerError(#[from] std::io::Error),
}
