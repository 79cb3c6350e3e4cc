//! The engine context: everything a running game owns, and the frame loop.

use std::collections::VecDeque;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use glam::IVec2;

use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{Frame, Rect};
use crate::game::input::{Event, InputState, RawInput};
use crate::game::unit::{Unit, UnitContext};
use crate::navigation::Navigator;
use crate::renderer::atlas::AtlasLayout;
use crate::renderer::batch::RenderBackend;
use crate::renderer::metrics::FrameMetrics;
use crate::scene::Scene;
use crate::terrain::level::{Level, LevelData};
use crate::terrain::obstacles::LevelGraphs;
use crate::triggers::{Trigger, TriggerSet};
use crate::ui::bubble::BubbleKeys;
use crate::ui::dialogue::{DialogueDisplay, DialogueLine};
use crate::ui::font::Font;

/// Content handed to [`Engine::load`].
pub struct GameSetup {
    pub level: LevelData,
    /// Every source image and its size, in atlas packing order.
    pub images: Vec<(String, IVec2)>,
    pub font: Box<dyn Font>,
    pub bubble_keys: BubbleKeys,
    pub player: Box<dyn Unit>,
    pub triggers: Vec<Trigger>,
}

/// A loaded game.
pub struct Engine {
    config: EngineConfig,
    atlas: AtlasLayout,
    level: Level,
    graphs: LevelGraphs,
    navigator: Navigator,
    scene: Scene,
    triggers: TriggerSet,
    font: Box<dyn Font>,
    bubble_keys: Rc<BubbleKeys>,
    player: Box<dyn Unit>,
    input: InputState,
    dialogue_queue: VecDeque<DialogueLine>,
    dialogue: Option<DialogueDisplay>,
    last_tile: Option<IVec2>,
    /// Tile entered but not yet claimed by a tile-keyed trigger.
    entered_tile: Option<IVec2>,
    render_frame: u64,
    game_frame: Frame,
    metrics: FrameMetrics,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("triggers", &self.triggers)
            .field("dialogue", &self.dialogue)
            .field("render_frame", &self.render_frame)
            .field("game_frame", &self.game_frame)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Pack the atlas, build the level and its graphs, and populate the scene.
    ///
    /// Any content error (bad level, unknown image, atlas overflow) aborts here.
    pub fn load(config: EngineConfig, setup: GameSetup) -> Result<Self> {
        config.validate()?;
        let GameSetup {
            level,
            images,
            font,
            bubble_keys,
            mut player,
            triggers,
        } = setup;

        let atlas = AtlasLayout::pack(
            config.atlas_size(),
            images.iter().map(|(k, size)| (k.as_str(), *size)),
        )?;
        tracing::debug!(images = atlas.len(), "packed atlas");

        let level = level.build()?;
        check_keys(&atlas, &level, &*font, &bubble_keys)?;

        let world_size = level.terrain.world_size();
        let cam_size = if config.level_preview {
            world_size
        } else {
            config.viewport.size()
        };
        let mut scene = Scene::new(cam_size, world_size);

        let world = scene.world();
        let views = scene.views_mut();
        let mut parts = level.terrain.tile_parts(views, world);
        parts.extend(level.terrain.block_parts(views, world));
        parts.extend(level.doodads.iter().map(|d| d.part(views, world)));
        parts.extend(player.attach(views, world));
        scene.add_parts(parts);

        let graphs = level.graphs(player.footprint(), cam_size);
        tracing::info!(
            obstacles = graphs.obstacles.edge_count(),
            paths = graphs.paths.edge_count(),
            "level graphs ready"
        );
        if let Some(path) = &config.dump_graphs {
            graphs.dump(path)?;
        }
        let navigator = Navigator::from(graphs.clone());

        let triggers = if config.level_preview {
            tracing::info!("level preview: triggers disabled");
            TriggerSet::default()
        } else {
            TriggerSet::new(triggers)?
        };

        let mut engine = Self {
            config,
            atlas,
            level,
            graphs,
            navigator,
            scene,
            triggers,
            font,
            bubble_keys: Rc::new(bubble_keys),
            player,
            input: InputState::new(),
            dialogue_queue: VecDeque::new(),
            dialogue: None,
            last_tile: None,
            entered_tile: None,
            render_frame: 0,
            game_frame: 0,
            metrics: FrameMetrics::new(),
        };
        engine.focus_camera();
        engine.scene.update();
        // Unknown keys among the parts on screen surface now, not mid-game.
        engine.scene.draw(&engine.atlas)?;
        tracing::info!(
            title = %engine.config.title,
            cam = %cam_size,
            world = %world_size,
            "engine loaded"
        );
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn atlas(&self) -> &AtlasLayout {
        &self.atlas
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn graphs(&self) -> &LevelGraphs {
        &self.graphs
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn triggers(&self) -> &TriggerSet {
        &self.triggers
    }

    pub fn player(&self) -> &dyn Unit {
        &*self.player
    }

    pub fn player_pos(&self) -> IVec2 {
        self.player.pos(self.scene.views())
    }

    pub fn dialogue(&self) -> Option<&DialogueDisplay> {
        self.dialogue.as_ref()
    }

    /// Model ticks that advanced the game (not counting dialogue ticks).
    pub fn game_frame(&self) -> Frame {
        self.game_frame
    }

    pub fn render_frame(&self) -> u64 {
        self.render_frame
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    /// Write the level graphs as JSON.
    pub fn dump_graphs(&self, path: &Path) -> Result<()> {
        self.graphs.dump(path)
    }

    /// Run one rendered frame. Every `frames_per_update` frames the model
    /// ticks first. Draws exactly one batch.
    pub fn frame(&mut self, raw: RawInput, backend: &mut dyn RenderBackend) -> Result<()> {
        self.metrics.begin_frame();
        if self.render_frame % u64::from(self.config.frames_per_update) == 0 {
            self.tick(raw);
        }
        self.render_frame += 1;

        let commands = self.scene.draw(&self.atlas)?;
        backend.draw_batch(&commands)?;
        self.metrics.end_frame(commands.len());
        Ok(())
    }

    /// One model tick: input, then triggers, then dialogue or the player,
    /// then the camera, then the scene.
    fn tick(&mut self, raw: RawInput) {
        let event = self.input.sample(raw, self.scene.camera_pos());

        match self.dialogue.as_mut() {
            Some(d) => {
                if d.update(&event) {
                    d.dispose(self.scene.views_mut());
                    self.dialogue = None;
                    self.open_next_dialogue();
                }
            }
            None => {
                self.check_triggers();
                if self.dialogue.is_none() {
                    self.game_frame += 1;
                    self.update_player(&event);
                }
            }
        }

        self.focus_camera();
        self.scene.update();
        self.metrics.record_tick();
    }

    /// Fire at most one trigger and start its dialogue.
    ///
    /// A newly entered tile stays pending while global triggers win the
    /// tick, until a tile-keyed trigger claims it or a pass fires nothing.
    fn check_triggers(&mut self) {
        let tile = self.level.terrain.tile_at(self.player_pos());
        if self.last_tile != Some(tile) {
            self.last_tile = Some(tile);
            self.entered_tile = Some(tile);
        }

        let Some(fired) = self.triggers.evaluate(self.game_frame, self.entered_tile) else {
            self.entered_tile = None;
            return;
        };
        if fired.tile.is_some() {
            self.entered_tile = None;
        }
        self.player.go_idle();
        self.dialogue_queue = fired.dialogues.into();
        self.open_next_dialogue();
    }

    fn open_next_dialogue(&mut self) {
        let Some(line) = self.dialogue_queue.pop_front() else {
            return;
        };
        let hud = self.scene.hud();
        let cam_size = self.scene.cam_size();
        let display = DialogueDisplay::new(
            self.scene.views_mut(),
            hud,
            &line,
            cam_size,
            &*self.font,
            self.bubble_keys.clone(),
        );
        self.scene.add_parts(display.parts());
        self.dialogue = Some(display);
    }

    fn update_player(&mut self, event: &Event) {
        let limit = Rect::with_size(self.scene.camera_pos(), self.scene.cam_size());
        let mut ctx = UnitContext {
            views: self.scene.views_mut(),
            navigator: &self.navigator,
            limit,
            frame: self.game_frame,
        };
        self.player.update(&mut ctx, event);
    }

    fn focus_camera(&mut self) {
        let p = self.player_pos();
        self.scene.camera_focus(p);
    }
}

/// Every image the level, font and bubbles name must be in the atlas.
fn check_keys(atlas: &AtlasLayout, level: &Level, font: &dyn Font, bubble: &BubbleKeys) -> Result<()> {
    let font_key = font.image_key();
    let inverse_key = font.inverse_image_key();
    let mut keys: Vec<&str> = vec![&*bubble.normal, &*bubble.pressed, &*font_key];
    keys.extend(inverse_key.as_deref());
    keys.push(&*level.terrain.tileset().key);
    keys.extend(level.terrain.block_layer().map(|b| &*b.tileset.key));
    keys.extend(level.sheets.values().map(|s| &*s.key));
    match keys.into_iter().find(|k| atlas.region(k).is_none()) {
        Some(k) => Err(EngineError::UnknownImageKey(k.to_string())),
        None => Ok(()),
    }
}
