//! Curated recommendation tables keyed by attribute label.
//!
//! Tables are keyed by the label text rather than the label enums so that
//! any string, including [`NOT_DETECTED`](crate::classify::NOT_DETECTED) and
//! labels the classifier never emits, resolves to a non-empty list through
//! the table's fallback.

use serde::Serialize;

use crate::classify::AttributeLabels;

pub type Tips = &'static [&'static str];

/// Makeup shade groups for one undertone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MakeupShades {
    pub lipstick: Tips,
    pub foundation: Tips,
    pub concealer: Tips,
    pub blush: Tips,
    pub contour: Tips,
    pub eyeshadow: Tips,
}

impl MakeupShades {
    /// All six groups in serialization order.
    pub fn groups(&self) -> [(&'static str, Tips); 6] {
        [
            ("Lipstick", self.lipstick),
            ("Foundation", self.foundation),
            ("Concealer", self.concealer),
            ("Blush", self.blush),
            ("Contour", self.contour),
            ("Eyeshadow", self.eyeshadow),
        ]
    }
}

static WARM_MAKEUP: MakeupShades = MakeupShades {
    lipstick: &["Peach", "Coral", "Terracotta", "Warm Nude"],
    foundation: &["Golden Beige", "Warm Honey", "Caramel Glow"],
    concealer: &["Yellow Undertone", "Golden Neutral"],
    blush: &["Apricot", "Peach", "Coral"],
    contour: &["Golden Brown", "Warm Bronze"],
    eyeshadow: &["Gold", "Copper", "Bronze", "Champagne"],
};

static COOL_MAKEUP: MakeupShades = MakeupShades {
    lipstick: &["Rose", "Berry", "Mauve", "Pink Nude"],
    foundation: &["Rosy Beige", "Cool Ivory", "Soft Almond"],
    concealer: &["Pink Undertone", "Porcelain Cool"],
    blush: &["Rosy Pink", "Soft Plum", "Berry"],
    contour: &["Ash Brown", "Cool Taupe"],
    eyeshadow: &["Silver", "Lilac", "Cool Brown", "Icy Blue"],
};

static NEUTRAL_MAKEUP: MakeupShades = MakeupShades {
    lipstick: &["Soft Pink", "Nude", "Rosewood"],
    foundation: &["Neutral Beige", "Honey Sand", "Light Tan"],
    concealer: &["Neutral Undertone", "Beige Neutral"],
    blush: &["Neutral Pink", "Peachy Nude"],
    contour: &["Neutral Brown", "Soft Bronze"],
    eyeshadow: &["Champagne", "Rose Gold", "Soft Brown", "Taupe"],
};

/// Unknown undertones get the neutral palette.
pub fn makeup_shades(undertone: &str) -> &'static MakeupShades {
    match undertone {
        "Warm" => &WARM_MAKEUP,
        "Cool" => &COOL_MAKEUP,
        _ => &NEUTRAL_MAKEUP,
    }
}

pub fn dress_colors(undertone: &str) -> Tips {
    match undertone {
        "Warm" => &["Coral", "Olive", "Gold", "Rust"],
        "Cool" => &["Lavender", "Blue", "Emerald", "Silver"],
        "Neutral" => &["Beige", "Gray", "Cream", "Soft pastels"],
        _ => &["Beige", "Soft pink"],
    }
}

pub fn jewellery(undertone: &str) -> Tips {
    match undertone {
        "Warm" => &["Gold", "Bronze", "Copper"],
        "Cool" => &["Silver", "Platinum", "Pearl"],
        "Neutral" => &["Rose gold", "Mixed metals"],
        _ => &["Gold"],
    }
}

pub fn dress_styles(body_type: &str) -> Tips {
    match body_type {
        "Inverted Triangle" => &["A-line dresses", "V-neck tops", "Flared skirts"],
        "Pear" => &["Off-shoulder tops", "Wide-leg pants", "Fit and flare dresses"],
        "Rectangle" => &["Peplum tops", "Belted dresses", "Layered outfits"],
        "Hourglass" => &["Bodycon dresses", "Wrap tops", "High-waist skirts"],
        "Apple" => &["Empire waist dresses", "Flowy tops", "Straight-cut pants"],
        "Not detected" => &["Classic styles that suit all shapes"],
        _ => &["Casual classic fits"],
    }
}

pub fn skincare_tips(skin_type: &str) -> Tips {
    match skin_type {
        "Dry" => &[
            "Use hydrating cleanser and rich moisturizer.",
            "Avoid hot water; use lukewarm.",
            "Apply facial oil before sleeping.",
        ],
        "Oily" => &[
            "Use salicylic acid or clay-based cleanser.",
            "Moisturize with oil-free gel.",
            "Blot excess oil during the day.",
        ],
        "Combination" => &[
            "Use gentle cleanser and hydrate dry areas.",
            "Toner on T-zone to control oil.",
            "Weekly exfoliation helps balance skin.",
        ],
        "Normal" => &[
            "Stick to gentle cleanser and SPF daily.",
            "Use light moisturizer.",
            "Exfoliate 1–2 times weekly.",
        ],
        // Not produced by the contrast classifier; kept for callers
        // supplying their own skin type.
        "Sensitive" => &[
            "Avoid fragrance-based products.",
            "Use calming aloe or chamomile toner.",
            "Do patch tests before new products.",
        ],
        _ => &["Maintain basic skin hydration."],
    }
}

pub fn haircare_tips(hair_type: &str) -> Tips {
    match hair_type {
        "Dry" => &[
            "Apply coconut or argan oil weekly.",
            "Avoid heat styling tools.",
            "Use moisturizing shampoo.",
        ],
        "Oily" => &[
            "Shampoo regularly with clarifying formula.",
            "Avoid heavy conditioners on scalp.",
            "Rinse thoroughly to prevent buildup.",
        ],
        "Normal" => &[
            "Use mild shampoo and conditioner.",
            "Trim regularly for healthy ends.",
            "Protect from sun exposure.",
        ],
        _ => &["Maintain scalp cleanliness."],
    }
}

pub fn hairstyles(face_shape: &str) -> Tips {
    match face_shape {
        "Oval" => &["Long waves", "Bob cut", "Side-swept bangs"],
        "Round" => &["Layered cut", "High ponytail", "Long straight hair"],
        "Square" => &["Soft curls", "Feathered layers", "Side fringe"],
        "Heart" => &["Chin-length bob", "Textured lob", "Wavy fringe"],
        "Diamond" => &["Side part waves", "Chin-length bob", "Soft layers"],
        "Triangle" => &["Curly top volume", "Layered side bangs", "Rounded bob"],
        "Rectangle" => &["Wavy lob", "Soft curls", "Layered ends"],
        "Long" => &["Curtain bangs", "Soft waves", "Long layered cut"],
        _ => &["Classic layered style"],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecommendationSet {
    pub makeup: &'static MakeupShades,
    pub dress_colors: Tips,
    pub jewellery: Tips,
    pub dress_style: Tips,
    pub skincare: Tips,
    pub haircare: Tips,
    pub hairstyle: Tips,
}

impl RecommendationSet {
    pub fn for_labels(labels: &AttributeLabels) -> Self {
        let undertone = labels.undertone.as_str();
        Self {
            makeup: makeup_shades(undertone),
            dress_colors: dress_colors(undertone),
            jewellery: jewellery(undertone),
            dress_style: dress_styles(labels.body_type_label()),
            skincare: skincare_tips(labels.skin_type.as_str()),
            haircare: haircare_tips(labels.hair_type.as_str()),
            hairstyle: hairstyles(labels.face_type_label()),
        }
    }
}
