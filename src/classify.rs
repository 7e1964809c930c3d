//! Fixed rule ladders mapping extracted features to categorical labels.
//!
//! Every classifier is a pure function of one or two features. Ladders are
//! evaluated top to bottom and the first matching arm wins; several arms
//! overlap, so the order of the `match` arms is part of the rule.

use serde::Serialize;

use crate::features::FeatureVector;
use crate::geometry::{BodyGeometry, FaceGeometry};
use crate::pixels::ChannelMeans;

/// Label reported for face shape and body type when no landmarks were found.
pub const NOT_DETECTED: &str = "Not detected";

macro_rules! labels {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labels! {
    /// Skin depth from overall brightness.
    SkinTone { Fair => "Fair", Medium => "Medium", Dark => "Dark" }
}

labels! {
    /// Color temperature of the average image color.
    Undertone { Warm => "Warm", Cool => "Cool", Neutral => "Neutral" }
}

labels! {
    FaceShape {
        Heart => "Heart",
        Long => "Long",
        Triangle => "Triangle",
        Rectangle => "Rectangle",
        Oval => "Oval",
        Round => "Round",
        Diamond => "Diamond",
        Square => "Square",
    }
}

labels! {
    BodyType {
        InvertedTriangle => "Inverted Triangle",
        Pear => "Pear",
        Apple => "Apple",
        Rectangle => "Rectangle",
        Hourglass => "Hourglass",
    }
}

labels! {
    HairTexture { Straight => "Straight", Wavy => "Wavy", Curly => "Curly" }
}

labels! {
    SkinType { Dry => "Dry", Normal => "Normal", Combination => "Combination", Oily => "Oily" }
}

labels! {
    HairType { Oily => "Oily", Dry => "Dry", Normal => "Normal" }
}

/// Minimum channel lead (0-255 scale) for a warm or cool undertone.
const UNDERTONE_MARGIN: f64 = 20.0;

pub fn skin_tone(brightness: f64) -> SkinTone {
    match brightness {
        b if b > 180.0 => SkinTone::Fair,
        b if b > 130.0 => SkinTone::Medium,
        _ => SkinTone::Dark,
    }
}

pub fn undertone(color: &ChannelMeans) -> Undertone {
    let ChannelMeans { blue, green, red } = *color;
    if red - green > UNDERTONE_MARGIN && red - blue > UNDERTONE_MARGIN {
        Undertone::Warm
    } else if blue - red > UNDERTONE_MARGIN && blue - green > UNDERTONE_MARGIN {
        Undertone::Cool
    } else {
        Undertone::Neutral
    }
}

pub fn face_shape(face: &FaceGeometry) -> FaceShape {
    let forehead = face.forehead_width;
    let jaw = face.jaw_width;

    match face.length_to_width_ratio {
        r if r > 1.5 => {
            if forehead > jaw {
                FaceShape::Heart
            } else {
                FaceShape::Long
            }
        }
        r if r > 1.3 => {
            if forehead < jaw {
                FaceShape::Triangle
            } else if (forehead - jaw).abs() < 0.05 {
                FaceShape::Rectangle
            } else {
                FaceShape::Oval
            }
        }
        r if r < 1.1 => {
            if (forehead - jaw).abs() < 0.02 {
                FaceShape::Round
            } else {
                FaceShape::Diamond
            }
        }
        _ => FaceShape::Square,
    }
}

pub fn body_type(body: &BodyGeometry) -> BodyType {
    let BodyGeometry {
        shoulder_width: shoulder,
        hip_width: hip,
        waist_proxy: waist,
    } = *body;

    match () {
        _ if shoulder > hip * 1.2 => BodyType::InvertedTriangle,
        _ if hip > shoulder * 1.2 => BodyType::Pear,
        _ if waist > shoulder && waist > hip => BodyType::Apple,
        _ if (shoulder - hip).abs() < 0.05 => BodyType::Rectangle,
        _ => BodyType::Hourglass,
    }
}

pub fn hair_texture(sharpness: f64) -> HairTexture {
    match sharpness {
        s if s < 40.0 => HairTexture::Straight,
        s if s < 80.0 => HairTexture::Wavy,
        _ => HairTexture::Curly,
    }
}

pub fn skin_type(contrast: f64) -> SkinType {
    match contrast {
        c if c < 25.0 => SkinType::Dry,
        c if c < 50.0 => SkinType::Normal,
        c if c < 70.0 => SkinType::Combination,
        _ => SkinType::Oily,
    }
}

pub fn hair_type(gray_mean: f64) -> HairType {
    match gray_mean {
        g if g > 160.0 => HairType::Oily,
        g if g < 80.0 => HairType::Dry,
        _ => HairType::Normal,
    }
}

/// One label per attribute. `None` means the prerequisite landmarks were
/// absent and is always reported as [`NOT_DETECTED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLabels {
    pub face_shape: Option<FaceShape>,
    pub body_type: Option<BodyType>,
    pub skin_tone: SkinTone,
    pub skin_type: SkinType,
    pub undertone: Undertone,
    pub hair_texture: HairTexture,
    pub hair_type: HairType,
}

impl AttributeLabels {
    pub fn classify(features: &FeatureVector) -> Self {
        let px = &features.pixels;
        Self {
            face_shape: features.face.as_ref().map(face_shape),
            body_type: features.body.as_ref().map(body_type),
            skin_tone: skin_tone(px.brightness),
            skin_type: skin_type(px.contrast),
            undertone: undertone(&px.mean_color),
            hair_texture: hair_texture(px.sharpness),
            hair_type: hair_type(px.gray_mean),
        }
    }

    pub fn face_type_label(&self) -> &'static str {
        self.face_shape.map_or(NOT_DETECTED, |s| s.as_str())
    }

    pub fn body_type_label(&self) -> &'static str {
        self.body_type.map_or(NOT_DETECTED, |b| b.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(ratio: f64, forehead_width: f64, jaw_width: f64) -> FaceGeometry {
        FaceGeometry {
            face_length: ratio,
            face_width: 1.0,
            length_to_width_ratio: ratio,
            jaw_width,
            forehead_width,
        }
    }

    fn body(shoulder_width: f64, hip_width: f64, waist_proxy: f64) -> BodyGeometry {
        BodyGeometry {
            shoulder_width,
            hip_width,
            waist_proxy,
        }
    }

    fn bgr(blue: f64, green: f64, red: f64) -> ChannelMeans {
        ChannelMeans { blue, green, red }
    }

    #[test]
    fn skin_tone_partition() {
        assert_eq!(skin_tone(255.0), SkinTone::Fair);
        assert_eq!(skin_tone(180.01), SkinTone::Fair);
        assert_eq!(skin_tone(180.0), SkinTone::Medium);
        assert_eq!(skin_tone(130.01), SkinTone::Medium);
        assert_eq!(skin_tone(130.0), SkinTone::Dark);
        assert_eq!(skin_tone(0.0), SkinTone::Dark);

        // Exhaustive and disjoint over the whole 8-bit range.
        for tenth in 0..=2550 {
            let b = f64::from(tenth) / 10.0;
            let expected = if b > 180.0 {
                SkinTone::Fair
            } else if b > 130.0 {
                SkinTone::Medium
            } else {
                SkinTone::Dark
            };
            assert_eq!(skin_tone(b), expected, "brightness {}", b);
        }
    }

    #[test]
    fn undertone_directions() {
        assert_eq!(undertone(&bgr(100.0, 120.0, 150.0)), Undertone::Warm);
        assert_eq!(undertone(&bgr(150.0, 120.0, 100.0)), Undertone::Cool);
        assert_eq!(undertone(&bgr(200.0, 200.0, 200.0)), Undertone::Neutral);
        // Only one channel gap over the margin.
        assert_eq!(undertone(&bgr(100.0, 140.0, 150.0)), Undertone::Neutral);
        // Exactly at the margin is not enough.
        assert_eq!(undertone(&bgr(100.0, 100.0, 120.0)), Undertone::Neutral);
    }

    #[test]
    fn undertone_is_total() {
        for b in (0..=255).step_by(15) {
            for g in (0..=255).step_by(15) {
                for r in (0..=255).step_by(15) {
                    let color = bgr(f64::from(b), f64::from(g), f64::from(r));
                    let first = undertone(&color);
                    assert!(Undertone::ALL.contains(&first));
                    assert_eq!(first, undertone(&color));
                }
            }
        }
    }

    #[test]
    fn face_shape_ladder() {
        assert_eq!(face_shape(&face(1.6, 0.3, 0.2)), FaceShape::Heart);
        assert_eq!(face_shape(&face(1.6, 0.2, 0.3)), FaceShape::Long);
        assert_eq!(face_shape(&face(1.6, 0.2, 0.2)), FaceShape::Long);

        assert_eq!(face_shape(&face(1.5, 0.2, 0.3)), FaceShape::Triangle);
        assert_eq!(face_shape(&face(1.4, 0.32, 0.3)), FaceShape::Rectangle);
        assert_eq!(face_shape(&face(1.4, 0.4, 0.3)), FaceShape::Oval);

        assert_eq!(face_shape(&face(1.0, 0.31, 0.3)), FaceShape::Round);
        assert_eq!(face_shape(&face(1.0, 0.4, 0.3)), FaceShape::Diamond);

        assert_eq!(face_shape(&face(1.1, 0.3, 0.3)), FaceShape::Square);
        assert_eq!(face_shape(&face(1.2, 0.5, 0.1)), FaceShape::Square);
        assert_eq!(face_shape(&face(1.3, 0.3, 0.3)), FaceShape::Square);
    }

    #[test]
    fn body_type_priority() {
        // Inverted triangle wins even though the waist exceeds both widths.
        assert_eq!(body_type(&body(0.30, 0.20, 0.54)), BodyType::InvertedTriangle);
        assert_eq!(body_type(&body(0.20, 0.30, 0.54)), BodyType::Pear);
        assert_eq!(body_type(&body(0.30, 0.28, 0.40)), BodyType::Apple);
        assert_eq!(body_type(&body(0.30, 0.28, 0.10)), BodyType::Rectangle);
        assert_eq!(body_type(&body(0.355, 0.30, 0.10)), BodyType::Hourglass);
    }

    #[test]
    fn threshold_boundaries_go_up() {
        assert_eq!(hair_texture(39.9), HairTexture::Straight);
        assert_eq!(hair_texture(40.0), HairTexture::Wavy);
        assert_eq!(hair_texture(80.0), HairTexture::Curly);

        assert_eq!(skin_type(24.9), SkinType::Dry);
        assert_eq!(skin_type(25.0), SkinType::Normal);
        assert_eq!(skin_type(50.0), SkinType::Combination);
        assert_eq!(skin_type(70.0), SkinType::Oily);

        assert_eq!(hair_type(160.0), HairType::Normal);
        assert_eq!(hair_type(160.5), HairType::Oily);
        assert_eq!(hair_type(80.0), HairType::Normal);
        assert_eq!(hair_type(79.9), HairType::Dry);
    }

    #[test]
    fn missing_geometry_reads_not_detected() {
        let labels = AttributeLabels {
            face_shape: None,
            body_type: None,
            skin_tone: SkinTone::Fair,
            skin_type: SkinType::Dry,
            undertone: Undertone::Neutral,
            hair_texture: HairTexture::Straight,
            hair_type: HairType::Oily,
        };

        assert_eq!(labels.face_type_label(), NOT_DETECTED);
        assert_eq!(labels.body_type_label(), NOT_DETECTED);
        assert_eq!(BodyType::InvertedTriangle.to_string(), "Inverted Triangle");
    }
}
