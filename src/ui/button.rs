//! Clickable buttons.

use std::fmt;
use std::rc::Rc;

use glam::IVec2;

use crate::core::types::Rect;
use crate::game::input::{Event, EventKind};
use crate::scene::part::PartRef;
use crate::scene::view::{ViewId, ViewTree};
use crate::ui::bubble::{Bubble, BubbleKeys, BUBBLE_PART_SIZE};
use crate::ui::font::Font;
use crate::ui::text::Text;

/// A bubble with a centred label that runs an action when clicked.
pub struct Button {
    bubble: Bubble,
    text: Text,
    action: Box<dyn FnMut()>,
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("bubble", &self.bubble)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

impl Button {
    pub fn new(
        views: &mut ViewTree,
        parent: ViewId,
        label: &str,
        bounds: Rect,
        font: &dyn Font,
        keys: Rc<BubbleKeys>,
        action: impl FnMut() + 'static,
    ) -> Self {
        let bubble = Bubble::new(views, parent, bounds, keys, 1);
        let inner = bounds.size() - IVec2::splat(BUBBLE_PART_SIZE * 2);
        let text = Text::new(views, bubble.view(), label, inner.x, IVec2::ZERO, font, 1);
        // Centre within the inset area, nudged up and left by a pixel.
        let pos = IVec2::splat(BUBBLE_PART_SIZE) + (inner - text.extent()) / 2 - IVec2::ONE;
        text.set_position(views, pos);

        let mut button = Self {
            bubble,
            text,
            action: Box::new(action),
        };
        button.text.reveal_all();
        button
    }

    pub fn view(&self) -> ViewId {
        self.bubble.view()
    }

    pub fn pressed(&self) -> bool {
        self.bubble.pressed()
    }

    fn set_pressed(&self, pressed: bool) {
        self.bubble.set_pressed(pressed);
        self.text.set_inverted(pressed);
    }

    /// Press on mouse down inside, fire on mouse up inside. Anything outside
    /// releases the button. Returns true if the action ran.
    pub fn handle(&mut self, views: &ViewTree, event: &Event) -> bool {
        let inside = views
            .bounds(self.bubble.view())
            .is_some_and(|b| b.contains(event.screen_pos));
        if !inside {
            self.set_pressed(false);
            return false;
        }
        match event.kind {
            EventKind::Down => {
                self.set_pressed(true);
                false
            }
            EventKind::Up => {
                self.set_pressed(false);
                (self.action)();
                true
            }
            EventKind::Move | EventKind::None => false,
        }
    }

    pub fn parts(&self) -> Vec<PartRef> {
        let mut parts = self.bubble.parts();
        parts.extend(self.text.parts());
        parts
    }

    pub fn dispose(&self, views: &mut ViewTree) {
        self.bubble.dispose(views);
    }
}
