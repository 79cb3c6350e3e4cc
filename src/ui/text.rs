//! Word-wrapped text with a typewriter reveal.

use std::cell::Cell;
use std::rc::Rc;

use glam::IVec2;

use crate::core::types::{ImageKey, Rect};
use crate::scene::part::{Part, PartRef};
use crate::scene::view::{ViewId, ViewTree};
use crate::ui::font::Font;

/// A laid-out glyph: the character and its pen position within the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub c: char,
    pub pen: IVec2,
}

/// Lay out `text` in lines no wider than `width`.
///
/// A word that runs to or past `width` moves to the next line, unless it
/// already starts a line. Spaces and newlines produce no glyphs. Returns the
/// glyphs and the overall size: `width` by the height of the lines used.
pub fn layout(text: &str, width: i32, font: &dyn Font) -> (Vec<Glyph>, IVec2) {
    let advance = |c: char| font.char_info(c).map_or(0, |ci| ci.x_advance);
    let line_height = font.line_height();

    let mut glyphs: Vec<Glyph> = Vec::with_capacity(text.len());
    let mut pen = IVec2::ZERO;
    let mut word_start = 0;

    let wrap = |glyphs: &mut Vec<Glyph>, pen: &mut IVec2, word_start: usize| {
        let starts_line = glyphs.get(word_start).map_or(true, |g| g.pen.x == 0);
        if pen.x < width || starts_line {
            return;
        }
        pen.x = 0;
        pen.y += line_height;
        for g in &mut glyphs[word_start..] {
            g.pen = *pen;
            pen.x += advance(g.c);
        }
    };

    for c in text.chars() {
        match c {
            '\n' => {
                pen.x = 0;
                pen.y += line_height;
                word_start = glyphs.len();
            }
            ' ' => {
                wrap(&mut glyphs, &mut pen, word_start);
                word_start = glyphs.len();
                pen.x += advance(c);
            }
            _ => {
                glyphs.push(Glyph { c, pen });
                pen.x += advance(c);
            }
        }
    }
    wrap(&mut glyphs, &mut pen, word_start);

    (glyphs, IVec2::new(width, pen.y + line_height))
}

/// Draw part for one character. Hidden until revealed.
#[derive(Debug)]
pub struct CharPart {
    view: ViewId,
    key: ImageKey,
    inverse_key: Option<ImageKey>,
    inverted: Rc<Cell<bool>>,
    src: Rect,
    dst: Rect,
    shown: Cell<bool>,
}

impl Part for CharPart {
    fn container(&self) -> Option<ViewId> {
        Some(self.view)
    }

    fn image_key(&self) -> ImageKey {
        match (&self.inverse_key, self.inverted.get()) {
            (Some(k), true) => k.clone(),
            _ => self.key.clone(),
        }
    }

    fn src(&self) -> Rect {
        self.src
    }

    fn dst(&self) -> Rect {
        self.dst
    }

    fn fixed(&self) -> bool {
        true
    }

    fn visible(&self, views: &ViewTree) -> bool {
        self.shown.get() && views.visible(self.view).unwrap_or(false)
    }
}

/// A block of HUD text in its own view.
#[derive(Debug)]
pub struct Text {
    view: ViewId,
    chars: Vec<Rc<CharPart>>,
    inverted: Rc<Cell<bool>>,
    next: usize,
    size: IVec2,
    /// Right edge of the widest line.
    used_width: i32,
}

impl Text {
    /// Lay out `text` at `pos` under `parent`, `dz` above it. All characters
    /// start hidden.
    pub fn new(
        views: &mut ViewTree,
        parent: ViewId,
        text: &str,
        width: i32,
        pos: IVec2,
        font: &dyn Font,
        dz: i32,
    ) -> Self {
        let (glyphs, size) = layout(text, width, font);
        let view = views.insert_with_bounds(Some(parent), Rect::with_size(pos, size));
        views.set_z(view, dz);

        let key = font.image_key();
        let inverse_key = font.inverse_image_key();
        let inverted = Rc::new(Cell::new(false));
        let pen_shift = IVec2::new(0, font.y_offset());
        let chars = glyphs
            .iter()
            .filter_map(|g| {
                let ci = font.char_info(g.c)?;
                Some(Rc::new(CharPart {
                    view,
                    key: key.clone(),
                    inverse_key: inverse_key.clone(),
                    inverted: inverted.clone(),
                    src: ci.src(),
                    dst: ci.dst(g.pen + pen_shift),
                    shown: Cell::new(false),
                }))
            })
            .collect::<Vec<_>>();
        let used_width = chars.iter().map(|c| c.dst.dr.x).max().unwrap_or(0);

        Self {
            view,
            chars,
            inverted,
            next: 0,
            size,
            used_width,
        }
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    /// Size actually covered by glyphs: the widest line by the line count.
    pub fn extent(&self) -> IVec2 {
        IVec2::new(self.used_width, self.size.y)
    }

    pub fn set_position(&self, views: &mut ViewTree, pos: IVec2) {
        views.set_position(self.view, pos);
    }

    /// Number of drawable characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn revealed(&self) -> usize {
        self.next.min(self.chars.len())
    }

    pub fn parts(&self) -> Vec<PartRef> {
        self.chars.iter().map(|c| c.clone() as PartRef).collect()
    }

    /// Show the next hidden character.
    pub fn advance(&mut self) {
        if let Some(c) = self.chars.get(self.next) {
            c.shown.set(true);
        }
        self.next += 1;
    }

    pub fn reveal_all(&mut self) {
        for c in &self.chars[self.revealed()..] {
            c.shown.set(true);
        }
        self.next = self.next.max(self.chars.len());
    }

    pub fn is_complete(&self) -> bool {
        self.next >= self.chars.len()
    }

    /// Draw with the font's inverse image, if it has one.
    pub fn set_inverted(&self, inverted: bool) {
        self.inverted.set(inverted);
    }

    pub fn dispose(&self, views: &mut ViewTree) {
        views.dispose(self.view);
    }
}
