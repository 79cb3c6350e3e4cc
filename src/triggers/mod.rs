//! Scripted triggers
//!
//! A trigger fires at most once (unless it repeats) when its activation
//! predicate holds, every trigger it depends on has fired, and, for
//! tile-keyed triggers, the player has just stepped onto one of its tiles.
//! Triggers are evaluated in declaration order and one fires per tick.

use std::fmt;

use ahash::AHashMap;
use glam::IVec2;

use crate::core::error::{EngineError, Result};
use crate::core::types::Frame;
use crate::ui::dialogue::DialogueLine;

/// Activation predicate over the model frame counter.
pub type ActivePredicate = Box<dyn Fn(Frame) -> bool>;

/// Callback run when a trigger fires.
pub type FireAction = Box<dyn FnMut(Frame)>;

/// One scripted event.
pub struct Trigger {
    pub name: String,
    /// Tiles that arm the trigger. Empty means global: checked every tick.
    pub tiles: Vec<IVec2>,
    /// Names of triggers that must have fired first.
    pub depends: Vec<String>,
    /// Dialogue queued when the trigger fires.
    pub dialogues: Vec<DialogueLine>,
    /// Stay eligible after firing.
    pub repeat: bool,
    active: Option<ActivePredicate>,
    fire: Option<FireAction>,
    fired: bool,
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("name", &self.name)
            .field("tiles", &self.tiles)
            .field("depends", &self.depends)
            .field("dialogues", &self.dialogues.len())
            .field("repeat", &self.repeat)
            .field("fired", &self.fired)
            .finish()
    }
}

impl Trigger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tiles: Vec::new(),
            depends: Vec::new(),
            dialogues: Vec::new(),
            repeat: false,
            active: None,
            fire: None,
            fired: false,
        }
    }

    pub fn on_tiles(mut self, tiles: impl IntoIterator<Item = IVec2>) -> Self {
        self.tiles.extend(tiles);
        self
    }

    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends.push(name.into());
        self
    }

    pub fn with_dialogue(mut self, lines: impl IntoIterator<Item = DialogueLine>) -> Self {
        self.dialogues.extend(lines);
        self
    }

    pub fn active_when(mut self, pred: impl Fn(Frame) -> bool + 'static) -> Self {
        self.active = Some(Box::new(pred));
        self
    }

    pub fn on_fire(mut self, action: impl FnMut(Frame) + 'static) -> Self {
        self.fire = Some(Box::new(action));
        self
    }

    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }

    pub fn fired(&self) -> bool {
        self.fired
    }

    fn is_active(&self, frame: Frame) -> bool {
        self.active.as_ref().map_or(true, |p| p(frame))
    }

    fn armed_by(&self, entered_tile: Option<IVec2>) -> bool {
        if self.tiles.is_empty() {
            return true;
        }
        entered_tile.is_some_and(|t| self.tiles.contains(&t))
    }
}

/// What happened when a trigger fired.
#[derive(Debug, Clone)]
pub struct Fired {
    pub name: String,
    pub dialogues: Vec<DialogueLine>,
    /// The entered tile that armed a tile-keyed trigger; `None` for global ones.
    pub tile: Option<IVec2>,
}

/// All triggers of a game, in declaration order.
#[derive(Debug, Default)]
pub struct TriggerSet {
    triggers: Vec<Trigger>,
    index: AHashMap<String, usize>,
}

impl TriggerSet {
    /// Names must be unique. Dependencies on unknown names are allowed but
    /// can never be satisfied.
    pub fn new(triggers: Vec<Trigger>) -> Result<Self> {
        let mut index = AHashMap::with_capacity(triggers.len());
        for (i, t) in triggers.iter().enumerate() {
            if index.insert(t.name.clone(), i).is_some() {
                return Err(EngineError::DuplicateTrigger(t.name.clone()));
            }
        }
        for t in &triggers {
            for dep in t.depends.iter().filter(|d| !index.contains_key(*d)) {
                tracing::warn!(trigger = %t.name, depends = %dep, "trigger depends on unknown trigger");
            }
        }
        Ok(Self { triggers, index })
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Trigger> {
        self.index.get(name).map(|&i| &self.triggers[i])
    }

    pub fn fired(&self, name: &str) -> bool {
        self.get(name).is_some_and(Trigger::fired)
    }

    /// Put a fired trigger back into the unfired state.
    pub fn reset(&mut self, name: &str) -> bool {
        match self.index.get(name) {
            Some(&i) => {
                self.triggers[i].fired = false;
                true
            }
            None => false,
        }
    }

    fn eligible(&self, t: &Trigger, frame: Frame, entered_tile: Option<IVec2>) -> bool {
        (!t.fired || t.repeat)
            && t.armed_by(entered_tile)
            && t.is_active(frame)
            && t.depends.iter().all(|d| self.fired(d))
    }

    /// Fire the first eligible trigger, if any.
    ///
    /// `entered_tile` is the tile the player stepped onto this tick, if it
    /// changed; tile-keyed triggers are only considered then.
    pub fn evaluate(&mut self, frame: Frame, entered_tile: Option<IVec2>) -> Option<Fired> {
        let i = self
            .triggers
            .iter()
            .position(|t| self.eligible(t, frame, entered_tile))?;
        let t = &mut self.triggers[i];
        tracing::debug!(trigger = %t.name, dialogues = t.dialogues.len(), frame, "firing trigger");
        if let Some(fire) = t.fire.as_mut() {
            fire(frame);
        }
        t.fired = true;
        Some(Fired {
            name: t.name.clone(),
            dialogues: t.dialogues.clone(),
            tile: if t.tiles.is_empty() { None } else { entered_tile },
        })
    }
}
