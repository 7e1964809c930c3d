use image::RgbImage;
use serde::Serialize;

use crate::error::Result;
use crate::geometry::{BodyGeometry, FaceGeometry};
use crate::pixels::PixelStats;
use crate::types::LandmarkSet;

/// Everything the classifiers look at, computed fresh for one image.
///
/// `face` and `body` are `None` exactly when the matching detector found
/// nothing; a malformed landmark set is an error, never a `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub pixels: PixelStats,
    pub face: Option<FaceGeometry>,
    pub body: Option<BodyGeometry>,
}

impl FeatureVector {
    pub fn extract(
        image: &RgbImage,
        face: Option<&LandmarkSet>,
        body: Option<&LandmarkSet>,
    ) -> Result<Self> {
        Ok(Self {
            pixels: PixelStats::from_image(image),
            face: face.map(FaceGeometry::from_landmarks).transpose()?,
            body: body.map(BodyGeometry::from_landmarks).transpose()?,
        })
    }
}
