use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Please upload a valid image.")]
    InvalidUpload,

    /// The reason is kept for logs; callers only ever see "Invalid image".
    #[error("Invalid image")]
    InvalidImage { reason: String },

    #[error("{set} landmark set has {len} points, index {index} is out of range")]
    MissingLandmark {
        set: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),

    #[error("Detector failed: {0}")]
    Detector(String),

    #[error("Detector output could not be parsed: {0}")]
    DetectorOutput(#[from] serde_json::Error),

    #[error("Image encoding failed: {0}")]
    ImageEncode(#[from] image::ImageError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, Error>;
