//! Shape classification from contour features.
//!
//! Detectors extract a handful of features from each contour (polygon vertex
//! count, bounding aspect ratio, colour at the centroid) and hand them to
//! [`classify`] to decide the [`EntityTag`].
//!
//! # Example
//!
//! ```
//! use skirmish_core::classify::{classify, Bgr, ShapeFeatures};
//! use skirmish_core::entity::EntityTag;
//!
//! let features = ShapeFeatures::new(4, 1.0, Bgr::new(105, 232, 255));
//! assert_eq!(classify(&features), EntityTag::Square);
//!
//! let blue_pentagon = ShapeFeatures::new(5, 1.0, Bgr::new(250, 141, 120));
//! assert_eq!(classify(&blue_pentagon), EntityTag::Pentagon);
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::EntityTag;

/// Squared colour distance under which a colour-only match is accepted.
pub const COLOUR_MATCH_THRESHOLD: u32 = 500;

/// Accepted aspect ratio band for squares.
pub const SQUARE_ASPECT_RANGE: (f64, f64) = (0.95, 1.05);

/// A colour in blue, green, red channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bgr {
    /// Blue channel
    pub b: u8,
    /// Green channel
    pub g: u8,
    /// Red channel
    pub r: u8,
}

impl Bgr {
    /// Create a colour from its channels.
    #[must_use]
    pub const fn new(b: u8, g: u8, r: u8) -> Self {
        Self { b, g, r }
    }

    /// Sum of squared channel differences.
    #[must_use]
    pub fn squared_distance(self, other: Bgr) -> u32 {
        let channel = |a: u8, b: u8| {
            let d = u32::from(a.abs_diff(b));
            d * d
        };
        channel(self.b, other.b) + channel(self.g, other.g) + channel(self.r, other.r)
    }
}

/// Reference colours of the arena's entities, in lookup order.
pub const REFERENCE_COLOURS: [(EntityTag, Bgr); 5] = [
    (EntityTag::Ally, Bgr::new(225, 178, 43)),
    (EntityTag::Enemy, Bgr::new(84, 78, 241)),
    (EntityTag::Pentagon, Bgr::new(251, 140, 118)),
    (EntityTag::Square, Bgr::new(105, 232, 255)),
    (EntityTag::Triangle, Bgr::new(119, 117, 243)),
];

/// Reference colour for `tag`, if it has one.
#[must_use]
pub fn reference_colour(tag: EntityTag) -> Option<Bgr> {
    REFERENCE_COLOURS
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, c)| *c)
}

/// Features extracted from one contour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeFeatures {
    /// Vertex count of the simplified polygon
    pub vertices: usize,
    /// Bounding box width over height
    pub aspect_ratio: f64,
    /// Colour sampled at the centroid
    pub colour: Bgr,
}

impl ShapeFeatures {
    /// Bundle extracted features.
    #[must_use]
    pub const fn new(vertices: usize, aspect_ratio: f64, colour: Bgr) -> Self {
        Self {
            vertices,
            aspect_ratio,
            colour,
        }
    }
}

/// Closest tag among `candidates` by colour. Ties go to the earlier candidate.
fn nearest(candidates: &[EntityTag], colour: Bgr) -> Option<(EntityTag, u32)> {
    candidates
        .iter()
        .filter_map(|&tag| reference_colour(tag).map(|c| (tag, c.squared_distance(colour))))
        .fold(None, |best, (tag, dist)| match best {
            Some((_, best_dist)) if best_dist <= dist => best,
            _ => Some((tag, dist)),
        })
}

/// Classify a contour.
///
/// - 3 vertices: triangle
/// - 4 vertices: square when the aspect ratio is close to 1, otherwise unknown
/// - 5 vertices: pentagon, enemy or ally, whichever colour is closest
/// - anything else: the closest reference colour if it is close enough
#[must_use]
pub fn classify(features: &ShapeFeatures) -> EntityTag {
    match features.vertices {
        3 => EntityTag::Triangle,
        4 => {
            let (low, high) = SQUARE_ASPECT_RANGE;
            if (low..=high).contains(&features.aspect_ratio) {
                EntityTag::Square
            } else {
                EntityTag::Unknown
            }
        }
        5 => nearest(
            &[EntityTag::Pentagon, EntityTag::Enemy, EntityTag::Ally],
            features.colour,
        )
        .map_or(EntityTag::Unknown, |(tag, _)| tag),
        _ => classify_by_colour(features.colour).unwrap_or(EntityTag::Unknown),
    }
}

/// The reference tag closest to `colour`, if within [`COLOUR_MATCH_THRESHOLD`].
#[must_use]
pub fn classify_by_colour(colour: Bgr) -> Option<EntityTag> {
    let tags: Vec<EntityTag> = REFERENCE_COLOURS.iter().map(|(t, _)| *t).collect();
    nearest(&tags, colour)
        .filter(|(_, dist)| *dist < COLOUR_MATCH_THRESHOLD)
        .map(|(tag, _)| tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod colour_tests {
        use super::*;

        #[test]
        fn squared_distance() {
            let a = Bgr::new(10, 20, 30);
            let b = Bgr::new(13, 16, 30);
            assert_eq!(a.squared_distance(b), 25);
            assert_eq!(b.squared_distance(a), 25);
        }

        #[test]
        fn extreme_distance_fits() {
            let d = Bgr::new(0, 0, 0).squared_distance(Bgr::new(255, 255, 255));
            assert_eq!(d, 3 * 255 * 255);
        }

        #[test]
        fn reference_lookup() {
            assert_eq!(reference_colour(EntityTag::Enemy), Some(Bgr::new(84, 78, 241)));
            assert_eq!(reference_colour(EntityTag::Player), None);
        }
    }

    mod rule_tests {
        use super::*;

        #[test]
        fn triangle_by_vertices() {
            let f = ShapeFeatures::new(3, 2.0, Bgr::default());
            assert_eq!(classify(&f), EntityTag::Triangle);
        }

        #[test]
        fn square_needs_aspect() {
            assert_eq!(classify(&ShapeFeatures::new(4, 0.95, Bgr::default())), EntityTag::Square);
            assert_eq!(classify(&ShapeFeatures::new(4, 1.05, Bgr::default())), EntityTag::Square);
            assert_eq!(classify(&ShapeFeatures::new(4, 1.5, Bgr::default())), EntityTag::Unknown);
        }

        #[test]
        fn pentagon_family_by_colour() {
            let enemy = ShapeFeatures::new(5, 1.0, Bgr::new(80, 80, 240));
            assert_eq!(classify(&enemy), EntityTag::Enemy);
            let ally = ShapeFeatures::new(5, 1.0, Bgr::new(220, 180, 40));
            assert_eq!(classify(&ally), EntityTag::Ally);
            // Far from everything still picks the nearest of the three.
            let odd = ShapeFeatures::new(5, 1.0, Bgr::new(0, 255, 0));
            assert_ne!(classify(&odd), EntityTag::Unknown);
        }

        #[test]
        fn colour_fallback_returns_closest() {
            let circle = ShapeFeatures::new(8, 1.0, Bgr::new(106, 230, 255));
            assert_eq!(classify(&circle), EntityTag::Square);

            let triangle_ish = ShapeFeatures::new(7, 1.0, Bgr::new(119, 117, 243));
            assert_eq!(classify(&triangle_ish), EntityTag::Triangle);
        }

        #[test]
        fn colour_fallback_threshold() {
            // 22^2 = 484 is inside, 23^2 = 529 is not.
            let near = Bgr::new(105 + 22, 232, 255);
            let far = Bgr::new(105 + 23, 232, 255);
            assert_eq!(classify_by_colour(near), Some(EntityTag::Square));
            assert_eq!(classify_by_colour(far), None);
            assert_eq!(classify(&ShapeFeatures::new(0, 0.0, far)), EntityTag::Unknown);
        }
    }
}
