use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 2D landmark in normalized [0,1] image coordinates.
///
/// Detectors may report extra fields (depth, visibility); they are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Absolute horizontal distance to another point.
    pub fn dx(&self, other: &Point) -> f64 {
        (f64::from(self.x) - f64::from(other.x)).abs()
    }

    /// Absolute vertical distance to another point.
    pub fn dy(&self, other: &Point) -> f64 {
        (f64::from(self.y) - f64::from(other.y)).abs()
    }
}

/// An ordered set of landmarks produced by a single detector run.
///
/// Indices follow the detector's own numbering (MediaPipe Face Mesh for
/// faces, MediaPipe Pose for bodies).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    pub points: Vec<Point>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn num_landmarks(&self) -> usize {
        self.points.len()
    }

    /// Look up a landmark, reporting which set was too short on failure.
    pub fn require(&self, set: &'static str, index: usize) -> Result<Point> {
        self.points
            .get(index)
            .copied()
            .ok_or(Error::MissingLandmark {
                set,
                index,
                len: self.points.len(),
            })
    }
}

impl std::ops::Index<usize> for LandmarkSet {
    type Output = Point;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}

impl std::ops::IndexMut<usize> for LandmarkSet {
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.points[idx]
    }
}
