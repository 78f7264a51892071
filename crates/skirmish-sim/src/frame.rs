//! Rendered arena frames.
//!
//! A [`SceneFrame`] is what the synthetic "screen" shows: a list of sprites
//! with the features a contour detector would extract from real pixels.

use planar::{BBox, Extent};
use serde::{Deserialize, Serialize};
use skirmish_core::classify::{Bgr, ShapeFeatures};
use skirmish_core::perception::Frame;

/// One visible object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    /// Screen box in frame coordinates
    pub bbox: BBox,
    /// Fill colour
    pub colour: Bgr,
    /// Polygon vertex count (8 for round objects)
    pub vertices: usize,
}

impl Sprite {
    /// Features a detector would extract from this sprite.
    #[must_use]
    pub fn features(&self) -> ShapeFeatures {
        let aspect_ratio = if self.bbox.height() > 0.0 {
            self.bbox.width() / self.bbox.height()
        } else {
            0.0
        };
        ShapeFeatures::new(self.vertices, aspect_ratio, self.colour)
    }
}

/// A captured arena image, or a crop of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFrame {
    index: u64,
    size: Extent,
    sprites: Vec<Sprite>,
}

impl SceneFrame {
    /// Create a frame.
    #[must_use]
    pub fn new(index: u64, size: Extent, sprites: Vec<Sprite>) -> Self {
        Self { index, size, sprites }
    }

    /// Scene frame counter at capture time.
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.index
    }

    /// Visible sprites in frame coordinates.
    #[must_use]
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }
}

impl Frame for SceneFrame {
    fn size(&self) -> Extent {
        self.size
    }

    /// Sprites cut by the crop edge are clipped, which changes their aspect
    /// ratio the same way a partially visible contour would.
    fn crop(&self, region: &BBox) -> Self {
        let offset = -region.origin();
        let sprites = self
            .sprites
            .iter()
            .filter_map(|sprite| {
                let clipped = sprite.bbox.intersection(region)?;
                Some(Sprite {
                    bbox: clipped.translated(offset),
                    ..*sprite
                })
            })
            .collect();
        Self {
            index: self.index,
            size: region.extent(),
            sprites,
        }
    }
}
