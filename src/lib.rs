//! # percent-style
//!
//! Turns one photograph into styling attributes and curated recommendations.
//!
//! This crate provides:
//! - **Pixel statistics**: average color, brightness, contrast and sharpness
//! - **Landmark geometry**: face proportions and body widths from detector landmarks
//! - **Attribute classification**: face shape, body type, skin tone and type,
//!   undertone, hair texture and type
//! - **Recommendations**: makeup shades, dress colors, jewellery, dress styles,
//!   skincare, haircare and hairstyles for the detected attributes
//!
//! ## Pipeline
//!
//! 1. Decode the uploaded image (failure: "Invalid image", no detector runs)
//! 2. Run the face and pose landmark detectors (zero or one set each)
//! 3. Extract pixel statistics and landmark geometry
//! 4. Classify every attribute with fixed rule ladders
//! 5. Look up recommendations for each label, with a fallback for unknown labels
//!
//! A missing face or body is not an error: the affected attributes read
//! "Not detected" and their recommendations fall back to generic lists.
//!
//! ## Quick Start
//!
//! ```rust
//! use percent_style::{Analyzer, DisabledLandmarker, RgbImage};
//!
//! let image = RgbImage::from_pixel(100, 100, image::Rgb([200, 200, 200]));
//! let analyzer = Analyzer::new(DisabledLandmarker, DisabledLandmarker);
//! let result = analyzer.analyze(&image).unwrap();
//!
//! assert_eq!(result.skin_tone, "Fair");
//! assert_eq!(result.undertone, "Neutral");
//! assert_eq!(result.face_type, "Not detected");
//! ```
//!
//! ## Custom Detectors
//!
//! Implement [`FaceLandmarker`] and [`PoseLandmarker`] for your own models.
//! Face sets use MediaPipe Face Mesh numbering and pose sets MediaPipe Pose
//! numbering (see [`geometry::face_indices`] and [`geometry::pose_indices`]).
//!
//! ```rust
//! use percent_style::{FaceLandmarker, LandmarkSet, RgbImage, Result};
//!
//! struct MyFaceModel { /* ... */ }
//!
//! impl FaceLandmarker for MyFaceModel {
//!     fn detect_face(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>> {
//!         // Run the model; Ok(None) when no face is found.
//!         Ok(None)
//!     }
//! }
//! ```

pub mod classify;
mod config;
pub mod detect;
mod error;
mod features;
pub mod geometry;
mod logging;
mod pipeline;
pub mod pixels;
pub mod recommend;
#[cfg(feature = "server")]
pub mod server;
mod types;
pub mod upload;

pub use classify::{
    AttributeLabels, BodyType, FaceShape, HairTexture, HairType, SkinTone, SkinType, Undertone,
    NOT_DETECTED,
};
pub use config::{Config, LoggingConfig, ServerConfig};
pub use detect::{
    BoxedAnalyzer, BudgetedBackend, CommandLandmarker, DetectorBackend, DetectorFactory,
    DisabledLandmarker, FaceLandmarker, PoseLandmarker,
};
pub use error::{Error, Result};
pub use features::FeatureVector;
pub use geometry::{BodyGeometry, FaceGeometry};
pub use image::RgbImage;
pub use logging::init_tracing;
pub use pipeline::{decode_image, AnalysisResponse, AnalysisResult, Analyzer};
pub use pixels::{ChannelMeans, PixelStats};
pub use recommend::{MakeupShades, RecommendationSet};
pub use types::{LandmarkSet, Point};
