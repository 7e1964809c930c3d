//! Normalized distance measurements from face and body landmark sets.
//!
//! All inputs are in normalized [0,1] image coordinates, so every width and
//! length here is a fraction of the image size, not pixels.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::LandmarkSet;

/// MediaPipe Face Mesh landmark indices.
pub mod face_indices {
    /// Top of forehead (hairline)
    pub const FOREHEAD_TOP: usize = 10;
    /// Chin center
    pub const CHIN: usize = 152;
    /// Left cheekbone (widest point)
    pub const LEFT_CHEEK: usize = 234;
    /// Right cheekbone
    pub const RIGHT_CHEEK: usize = 454;
    /// Left jaw edge
    pub const LEFT_JAW: usize = 172;
    /// Right jaw edge
    pub const RIGHT_JAW: usize = 397;
    /// Left forehead, above the brow
    pub const LEFT_FOREHEAD: usize = 108;
    /// Right forehead, above the brow
    pub const RIGHT_FOREHEAD: usize = 338;
}

/// MediaPipe Pose landmark indices.
pub mod pose_indices {
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_ELBOW: usize = 13;
    pub const RIGHT_ELBOW: usize = 14;
    pub const LEFT_HIP: usize = 23;
    pub const RIGHT_HIP: usize = 24;
}

/// Elbow span scale used as the waist estimate.
///
/// Pose models have no waist landmark, so this is a fixed heuristic rather
/// than a measurement.
pub const WAIST_PROXY_FACTOR: f64 = 0.6;

/// Face proportions used for face shape classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaceGeometry {
    /// Vertical forehead-top to chin distance.
    pub face_length: f64,
    /// Horizontal cheek to cheek distance.
    pub face_width: f64,
    /// `face_length / face_width`
    pub length_to_width_ratio: f64,
    pub jaw_width: f64,
    pub forehead_width: f64,
}

impl FaceGeometry {
    /// Measure a face mesh.
    ///
    /// Fails if the set is too short for any anchor or the cheeks coincide.
    pub fn from_landmarks(landmarks: &LandmarkSet) -> Result<Self> {
        use face_indices::*;

        let chin = landmarks.require("face", CHIN)?;
        let forehead = landmarks.require("face", FOREHEAD_TOP)?;
        let left_cheek = landmarks.require("face", LEFT_CHEEK)?;
        let right_cheek = landmarks.require("face", RIGHT_CHEEK)?;

        let face_length = forehead.dy(&chin);
        let face_width = right_cheek.dx(&left_cheek);
        if face_width == 0.0 {
            return Err(Error::DegenerateGeometry("face width is zero"));
        }

        let jaw_width = landmarks
            .require("face", LEFT_JAW)?
            .dx(&landmarks.require("face", RIGHT_JAW)?);
        let forehead_width = landmarks
            .require("face", LEFT_FOREHEAD)?
            .dx(&landmarks.require("face", RIGHT_FOREHEAD)?);

        Ok(Self {
            face_length,
            face_width,
            length_to_width_ratio: face_length / face_width,
            jaw_width,
            forehead_width,
        })
    }
}

/// Body widths used for body type classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyGeometry {
    pub shoulder_width: f64,
    pub hip_width: f64,
    /// `WAIST_PROXY_FACTOR` times the elbow span.
    pub waist_proxy: f64,
}

impl BodyGeometry {
    /// Measure a pose skeleton. Fails if any required joint is missing.
    pub fn from_landmarks(landmarks: &LandmarkSet) -> Result<Self> {
        use pose_indices::*;

        let shoulder_width = landmarks
            .require("body", LEFT_SHOULDER)?
            .dx(&landmarks.require("body", RIGHT_SHOULDER)?);
        let hip_width = landmarks
            .require("body", LEFT_HIP)?
            .dx(&landmarks.require("body", RIGHT_HIP)?);
        let elbow_span = landmarks
            .require("body", LEFT_ELBOW)?
            .dx(&landmarks.require("body", RIGHT_ELBOW)?);

        Ok(Self {
            shoulder_width,
            hip_width,
            waist_proxy: elbow_span * WAIST_PROXY_FACTOR,
        })
    }
}
