//! Orchestrates one analysis: decode, detect, extract, classify, recommend.
//!
//! Non-detection is not an error: a missing face or body only turns the
//! affected labels into "Not detected". Every other failure ends the
//! analysis and is reported as a single `{"error": ...}` record; no partial
//! result is ever returned.

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageReader, RgbImage};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::AttributeLabels;
use crate::detect::{FaceLandmarker, PoseLandmarker};
use crate::error::{Error, Result};
use crate::features::FeatureVector;
use crate::recommend::{MakeupShades, RecommendationSet};

/// Decode an uploaded file's bytes into an RGB image.
///
/// The EXIF orientation, when present, is applied so detectors see the
/// photo upright.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    let invalid = |e: image::ImageError| Error::InvalidImage {
        reason: e.to_string(),
    };

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| Error::InvalidImage {
            reason: e.to_string(),
        })?;
    let mut decoder = reader.into_decoder().map_err(invalid)?;
    let orientation = decoder.orientation().map_err(invalid)?;
    let mut image = DynamicImage::from_decoder(decoder).map_err(invalid)?;
    image.apply_orientation(orientation);

    if image.width() == 0 || image.height() == 0 {
        return Err(Error::InvalidImage {
            reason: "image has no pixels".to_string(),
        });
    }
    Ok(image.to_rgb8())
}

/// The externally visible outcome of a successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub face_type: &'static str,
    pub body_type: &'static str,
    pub hair_texture: &'static str,
    pub hair_type: &'static str,
    pub skin_tone: &'static str,
    pub skin_type: &'static str,
    pub undertone: &'static str,
    pub makeup_shades: &'static MakeupShades,
    pub recommendations: RecommendationSet,
}

impl AnalysisResult {
    pub fn new(labels: &AttributeLabels, recommendations: RecommendationSet) -> Self {
        Self {
            face_type: labels.face_type_label(),
            body_type: labels.body_type_label(),
            hair_texture: labels.hair_texture.as_str(),
            hair_type: labels.hair_type.as_str(),
            skin_tone: labels.skin_tone.as_str(),
            skin_type: labels.skin_type.as_str(),
            undertone: labels.undertone.as_str(),
            makeup_shades: recommendations.makeup,
            recommendations,
        }
    }
}

/// Either a full result or a single error message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Success(AnalysisResult),
    Failure { error: String },
}

impl AnalysisResponse {
    pub fn failure(error: impl ToString) -> Self {
        AnalysisResponse::Failure {
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResponse::Success(_))
    }
}

impl From<Result<AnalysisResult>> for AnalysisResponse {
    fn from(result: Result<AnalysisResult>) -> Self {
        match result {
            Ok(r) => AnalysisResponse::Success(r),
            Err(e) => AnalysisResponse::failure(e),
        }
    }
}

/// One analysis worth of detectors.
///
/// Consumed by [`Analyzer::analyze`] so detector state never carries over
/// from one image to the next.
pub struct Analyzer<F, P> {
    face: F,
    pose: P,
}

impl<F: FaceLandmarker, P: PoseLandmarker> Analyzer<F, P> {
    pub fn new(face: F, pose: P) -> Self {
        Self { face, pose }
    }

    /// Analyze an encoded image. Decoding failures short-circuit before
    /// either detector runs.
    pub fn analyze_bytes(self, bytes: &[u8]) -> Result<AnalysisResult> {
        let image = decode_image(bytes)?;
        self.analyze(&image)
    }

    /// Analyze an already decoded image.
    pub fn analyze(mut self, image: &RgbImage) -> Result<AnalysisResult> {
        let face = self.face.detect_face(image)?;
        let body = self.pose.detect_pose(image)?;

        let features = FeatureVector::extract(image, face.as_ref(), body.as_ref())?;
        debug!(?features, "extracted features");

        let labels = AttributeLabels::classify(&features);
        let result = AnalysisResult::new(&labels, RecommendationSet::for_labels(&labels));
        info!(
            face_type = result.face_type,
            body_type = result.body_type,
            skin_tone = result.skin_tone,
            undertone = result.undertone,
            "analysis complete"
        );
        Ok(result)
    }

    /// Analyze encoded bytes and fold any failure into the error record.
    pub fn run(self, bytes: &[u8]) -> AnalysisResponse {
        let result = self.analyze_bytes(bytes);
        if let Err(e) = &result {
            warn!(error = %e, detail = ?e, "analysis failed");
        }
        result.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::DisabledLandmarker;
    use image::codecs::jpeg::JpegEncoder;
    use image::{ImageFormat, Rgb};

    fn png_bytes(image: &RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn decode_rejects_garbage() {
        match decode_image(b"definitely not an image") {
            Err(e @ Error::InvalidImage { .. }) => assert_eq!(e.to_string(), "Invalid image"),
            other => panic!("expected InvalidImage, got {:?}", other),
        }
    }

    /// Splice an APP1 EXIF segment carrying only an Orientation tag right
    /// after the JPEG SOI marker.
    fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"MM\x00\x2a\x00\x00\x00\x08");
        tiff.extend_from_slice(&1u16.to_be_bytes());
        tiff.extend_from_slice(&0x0112u16.to_be_bytes());
        tiff.extend_from_slice(&3u16.to_be_bytes());
        tiff.extend_from_slice(&1u32.to_be_bytes());
        tiff.extend_from_slice(&orientation.to_be_bytes());
        tiff.extend_from_slice(&[0, 0]);
        tiff.extend_from_slice(&0u32.to_be_bytes());

        let len = (2 + 6 + tiff.len()) as u16;
        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xff, 0xe1]);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(b"Exif\x00\x00");
        out.extend_from_slice(&tiff);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn decode_applies_exif_orientation() {
        let img = RgbImage::from_pixel(40, 20, Rgb([120, 90, 60]));
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, 90)
            .encode_image(&img)
            .unwrap();

        let plain = decode_image(&jpeg).unwrap();
        assert_eq!(plain.dimensions(), (40, 20));

        // 6 = rotate 90 degrees clockwise to display upright.
        let rotated = decode_image(&with_exif_orientation(&jpeg, 6)).unwrap();
        assert_eq!(rotated.dimensions(), (20, 40));
    }

    #[test]
    fn failure_serializes_as_single_error_key() {
        let response = AnalysisResponse::failure("Invalid image");
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value, serde_json::json!({ "error": "Invalid image" }));
        assert!(!response.is_success());
    }

    #[test]
    fn success_has_every_key() {
        let img = RgbImage::from_pixel(100, 100, Rgb([200, 200, 200]));
        let analyzer = Analyzer::new(DisabledLandmarker, DisabledLandmarker);
        let response = analyzer.run(&png_bytes(&img));
        let value = serde_json::to_value(&response).unwrap();

        for key in [
            "face_type",
            "body_type",
            "hair_texture",
            "hair_type",
            "skin_tone",
            "skin_type",
            "undertone",
            "makeup_shades",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        for key in [
            "makeup",
            "dress_colors",
            "jewellery",
            "dress_style",
            "skincare",
            "haircare",
            "hairstyle",
        ] {
            assert!(value["recommendations"].get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["makeup_shades"], value["recommendations"]["makeup"]);
    }
}
