//! Texture atlas layout.
//!
//! Every registered source image is packed into one shared texture so a frame
//! can be drawn with a single batched call. Decoding and uploading the pixels
//! belong to the render backend; this module only decides where each image
//! goes and translates source rectangles into atlas space.

use ahash::AHashMap;
use glam::IVec2;

use crate::core::error::{EngineError, Result};
use crate::core::types::Rect;

/// A region within a texture atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasRegion {
    /// Top-left corner in the atlas, in pixels.
    pub offset: IVec2,
    /// Size of the source image, in pixels.
    pub size: IVec2,
}

impl AtlasRegion {
    pub const fn new(offset: IVec2, size: IVec2) -> Self {
        Self { offset, size }
    }

    pub fn rect(&self) -> Rect {
        Rect::with_size(self.offset, self.size)
    }
}

/// Placement of all source images inside the shared atlas.
#[derive(Clone, Debug)]
pub struct AtlasLayout {
    size: IVec2,
    regions: AHashMap<String, AtlasRegion>,
}

impl AtlasLayout {
    /// Create an empty layout of the given atlas size.
    pub fn new(size: IVec2) -> Self {
        Self {
            size,
            regions: AHashMap::new(),
        }
    }

    /// Shelf-pack images left to right, starting a new row below the tallest
    /// image so far when the current row is full. Images are placed in the
    /// order given.
    pub fn pack<'a>(
        size: IVec2,
        images: impl IntoIterator<Item = (&'a str, IVec2)>,
    ) -> Result<Self> {
        let mut layout = Self::new(size);
        let mut cursor = IVec2::ZERO;
        let mut row_bottom = 0;
        for (key, image) in images {
            if layout.regions.contains_key(key) {
                return Err(EngineError::DuplicateImageKey(key.to_string()));
            }
            if image.x >= size.x {
                return Err(EngineError::ImageTooWide {
                    key: key.to_string(),
                    width: image.x,
                    max: size.x,
                });
            }
            if cursor.x + image.x >= size.x {
                cursor = IVec2::new(0, row_bottom);
            }
            let bottom = cursor.y + image.y;
            if bottom >= size.y {
                return Err(EngineError::AtlasOverflow(key.to_string()));
            }
            row_bottom = row_bottom.max(bottom);
            tracing::debug!(
                "placing {:?} at ({}, {})-({}, {})",
                key,
                cursor.x,
                cursor.y,
                cursor.x + image.x,
                cursor.y + image.y
            );
            layout.add_region(key, AtlasRegion::new(cursor, image));
            cursor.x += image.x;
        }
        Ok(layout)
    }

    /// Add a region at an explicit position (for atlases packed elsewhere).
    pub fn add_region(&mut self, key: impl Into<String>, region: AtlasRegion) {
        self.regions.insert(key.into(), region);
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn region(&self, key: &str) -> Option<&AtlasRegion> {
        self.regions.get(key)
    }

    /// Translate an image-relative source rectangle into atlas space.
    pub fn resolve_src(&self, key: &str, src: Rect) -> Result<Rect> {
        self.region(key)
            .map(|r| src.translate(r.offset))
            .ok_or_else(|| EngineError::UnknownImageKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_shelves() {
        let layout = AtlasLayout::pack(
            IVec2::new(100, 100),
            [
                ("a", IVec2::new(40, 10)),
                ("b", IVec2::new(40, 20)),
                ("c", IVec2::new(30, 5)),
                ("d", IVec2::new(10, 10)),
            ],
        )
        .unwrap();

        assert_eq!(layout.region("a").unwrap().offset, IVec2::new(0, 0));
        assert_eq!(layout.region("b").unwrap().offset, IVec2::new(40, 0));
        // 80 + 30 would reach the edge: new row under the tallest so far.
        assert_eq!(layout.region("c").unwrap().offset, IVec2::new(0, 20));
        assert_eq!(layout.region("d").unwrap().offset, IVec2::new(30, 20));
    }

    #[test]
    fn test_pack_errors() {
        let size = IVec2::new(64, 64);

        let err = AtlasLayout::pack(size, [("wide", IVec2::new(64, 1))]).unwrap_err();
        assert!(matches!(err, EngineError::ImageTooWide { width: 64, max: 64, .. }));

        let err = AtlasLayout::pack(
            size,
            [("top", IVec2::new(60, 40)), ("bottom", IVec2::new(60, 30))],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::AtlasOverflow(k) if k == "bottom"));

        let err = AtlasLayout::pack(size, [("x", IVec2::ONE), ("x", IVec2::ONE)]).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateImageKey(_)));
    }

    #[test]
    fn test_resolve_src() {
        let mut layout = AtlasLayout::new(IVec2::new(128, 128));
        layout.add_region("tiles", AtlasRegion::new(IVec2::new(32, 16), IVec2::new(64, 64)));

        assert_eq!(
            layout.resolve_src("tiles", Rect::from_coords(16, 0, 32, 16)).unwrap(),
            Rect::from_coords(48, 16, 64, 32)
        );
        assert!(matches!(
            layout.resolve_src("missing", Rect::ZERO),
            Err(EngineError::UnknownImageKey(_))
        ));
    }
}
