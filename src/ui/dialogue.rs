//! Blocking dialogue shown at the bottom of the screen.

use std::fmt;
use std::rc::Rc;

use glam::IVec2;

use crate::core::types::Rect;
use crate::game::input::{Event, EventKind};
use crate::scene::part::{PartRef, StaticPart};
use crate::scene::view::{ViewId, ViewTree};
use crate::sprites::sheet::Sheet;
use crate::ui::bubble::{Bubble, BubbleKeys};
use crate::ui::font::Font;
use crate::ui::text::Text;

/// Z of dialogue above the rest of the HUD.
const DIALOGUE_Z: i32 = 10;

/// One line of dialogue: the words and an optional speaker portrait.
#[derive(Debug, Clone)]
pub struct DialogueLine {
    /// Portrait sheet and frame.
    pub avatar: Option<(Rc<Sheet>, usize)>,
    pub text: String,
}

impl DialogueLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            avatar: None,
            text: text.into(),
        }
    }

    pub fn with_avatar(mut self, sheet: Rc<Sheet>, frame: usize) -> Self {
        self.avatar = Some((sheet, frame));
        self
    }
}

/// A line being shown: bubble, portrait and typewriter text.
pub struct DialogueDisplay {
    view: ViewId,
    bubble: Bubble,
    avatar: Option<PartRef>,
    text: Text,
    complete: bool,
    frame: u64,
}

impl fmt::Debug for DialogueDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogueDisplay")
            .field("view", &self.view)
            .field("bubble", &self.bubble)
            .field("avatar", &self.avatar.as_ref().map(|p| p.image_key()))
            .field("text", &self.text)
            .field("complete", &self.complete)
            .field("frame", &self.frame)
            .finish()
    }
}

impl DialogueDisplay {
    /// Lay out `line` across the bottom of a camera of `cam_size`.
    pub fn new(
        views: &mut ViewTree,
        hud: ViewId,
        line: &DialogueLine,
        cam_size: IVec2,
        font: &dyn Font,
        keys: Rc<BubbleKeys>,
    ) -> Self {
        let view = views.insert_with_bounds(Some(hud), Rect::with_size(IVec2::ZERO, cam_size));
        views.set_z(view, DIALOGUE_Z);

        let bubble_bounds = Rect::with_size(
            IVec2::new(10, cam_size.y - 80),
            IVec2::new(cam_size.x - 20, 70),
        );
        let bubble = Bubble::new(views, view, bubble_bounds, keys, -1);

        let mut text_pos = IVec2::new(20, cam_size.y - 75);
        let avatar = line.avatar.as_ref().map(|(sheet, frame)| {
            text_pos.x += sheet.frame_size.x + 5;
            Rc::new(StaticPart {
                view,
                key: sheet.key.clone(),
                src: sheet.frame_src(*frame),
                dst: Rect::with_size(IVec2::new(15, cam_size.y - 78), sheet.frame_size),
                fixed: true,
            }) as PartRef
        });
        let text = Text::new(
            views,
            view,
            &line.text,
            cam_size.x - text_pos.x - 20,
            text_pos,
            font,
            0,
        );

        Self {
            view,
            bubble,
            avatar,
            text,
            complete: false,
            frame: 0,
        }
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn text(&self) -> &Text {
        &self.text
    }

    /// Ticks this line has been shown.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn parts(&self) -> Vec<PartRef> {
        let mut parts = self.bubble.parts();
        parts.extend(self.avatar.iter().cloned());
        parts.extend(self.text.parts());
        parts
    }

    /// Advance one tick. A click finishes the text, or dismisses the line if
    /// it is already finished. Otherwise two more characters appear.
    ///
    /// Returns true when the line should be dismissed.
    pub fn update(&mut self, event: &Event) -> bool {
        if event.kind == EventKind::Up {
            if self.complete {
                return true;
            }
            self.complete = true;
            self.text.reveal_all();
        }
        if !self.complete {
            self.text.advance();
            self.text.advance();
            self.complete = self.text.is_complete();
        }
        self.frame += 1;
        false
    }

    /// Retire everything the display put in the scene.
    pub fn dispose(&self, views: &mut ViewTree) {
        views.dispose(self.view);
    }
}
