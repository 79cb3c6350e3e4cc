//! Bitmap fonts.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::core::types::{ImageKey, Rect};

/// Placement of one glyph in the font image and on the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharInfo {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_advance: i32,
}

impl CharInfo {
    pub fn src(&self) -> Rect {
        Rect::from_coords(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Destination of the glyph drawn with its pen at `pen`.
    pub fn dst(&self, pen: IVec2) -> Rect {
        let ul = pen + IVec2::new(self.x_offset, self.y_offset);
        Rect::with_size(ul, IVec2::new(self.width, self.height))
    }
}

/// A typeface drawn from one atlas image.
pub trait Font {
    fn image_key(&self) -> ImageKey;

    /// Image with the colours swapped, used for pressed buttons.
    fn inverse_image_key(&self) -> Option<ImageKey> {
        None
    }

    /// Metrics of `c`, or `None` if the font has no glyph for it.
    fn char_info(&self, c: char) -> Option<CharInfo>;

    fn line_height(&self) -> i32;

    /// Extra vertical shift applied to every glyph.
    fn y_offset(&self) -> i32 {
        0
    }
}

/// Fixed-grid font: glyphs for a contiguous range of characters laid out
/// row-major in equal cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonoFont {
    pub key: ImageKey,
    #[serde(default)]
    pub inverse_key: Option<ImageKey>,
    pub cell: IVec2,
    /// Glyph cells per row in the image.
    pub columns: u32,
    #[serde(default = "MonoFont::default_first")]
    pub first: char,
    pub count: u32,
    pub line_height: i32,
}

impl MonoFont {
    fn default_first() -> char {
        ' '
    }

    /// Printable ASCII from the space character.
    pub fn ascii(key: &str, cell: IVec2, columns: u32) -> Self {
        Self {
            key: key.into(),
            inverse_key: None,
            cell,
            columns,
            first: ' ',
            count: 95,
            line_height: cell.y,
        }
    }
}

impl Font for MonoFont {
    fn image_key(&self) -> ImageKey {
        self.key.clone()
    }

    fn inverse_image_key(&self) -> Option<ImageKey> {
        self.inverse_key.clone()
    }

    fn char_info(&self, c: char) -> Option<CharInfo> {
        let i = (c as u32).checked_sub(self.first as u32)?;
        if i >= self.count || self.columns == 0 {
            return None;
        }
        Some(CharInfo {
            x: (i % self.columns) as i32 * self.cell.x,
            y: (i / self.columns) as i32 * self.cell.y,
            width: self.cell.x,
            height: self.cell.y,
            x_offset: 0,
            y_offset: 0,
            x_advance: self.cell.x,
        })
    }

    fn line_height(&self) -> i32 {
        self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_font_grid() {
        let font = MonoFont::ascii("font", IVec2::new(6, 8), 16);

        let a = font.char_info('A').unwrap();
        // 'A' is 33 past ' ': row 2, column 1.
        assert_eq!(a.src(), Rect::from_coords(6, 16, 12, 24));
        assert_eq!(a.x_advance, 6);
        assert_eq!(a.dst(IVec2::new(10, 3)), Rect::from_coords(10, 3, 16, 11));
    }

    #[test]
    fn test_mono_font_out_of_range() {
        let font = MonoFont::ascii("font", IVec2::new(6, 8), 16);
        assert!(font.char_info('\t').is_none());
        assert!(font.char_info('é').is_none());
        assert!(font.char_info('~').is_some());
    }
}
