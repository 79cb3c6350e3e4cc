//! Integration tests for the scene compositor
//!
//! These tests put terrain, sprites and HUD text into one scene and check
//! what comes out of `Scene::update`/`Scene::draw`:
//! - Z order: tiles below sprites, sprites by Y, HUD above the world
//! - Culling against a scrolling camera
//! - Animated parts reflecting the current frame

use std::rc::Rc;

use glam::IVec2;

use mosaic_engine::core::types::{ImageKey, Rect};
use mosaic_engine::renderer::AtlasLayout;
use mosaic_engine::scene::Scene;
use mosaic_engine::sprites::{basic_frame_infos, Playback, Sheet, Sprite};
use mosaic_engine::terrain::{Terrain, TileInfo, Tileset};
use mosaic_engine::ui::{MonoFont, Text};

fn sheet(key: &str, frames: usize) -> Rc<Sheet> {
    Rc::new(Sheet {
        key: key.into(),
        columns: 0,
        frame_size: IVec2::new(8, 8),
        frames: basic_frame_infos(frames, 1, IVec2::new(4, 7)),
        playback: Playback::Loop,
    })
}

fn atlas() -> AtlasLayout {
    AtlasLayout::pack(
        IVec2::new(256, 256),
        [
            ("tiles", IVec2::new(16, 16)),
            ("a", IVec2::new(16, 8)),
            ("b", IVec2::new(16, 8)),
            ("font", IVec2::new(64, 36)),
        ],
    )
    .unwrap()
}

fn terrain(size: i32) -> Terrain {
    Terrain::new(
        Tileset {
            key: "tiles".into(),
            columns: 1,
        },
        16,
        IVec2::splat(size),
        vec![0; (size * size) as usize],
        vec![TileInfo {
            name: "grass".into(),
            block: false,
        }],
        None,
    )
    .unwrap()
}

fn keys(scene: &Scene) -> Vec<ImageKey> {
    scene.displayed().iter().map(|p| p.image_key()).collect()
}

#[test]
fn test_sprites_reorder_when_moved() {
    let mut scene = Scene::new(IVec2::new(100, 100), IVec2::new(200, 200));
    let world = scene.world();
    let a = Sprite::new(scene.views_mut(), world, sheet("a", 1), IVec2::new(50, 60));
    let mut b = Sprite::new(scene.views_mut(), world, sheet("b", 1), IVec2::new(50, 40));
    scene.add_parts([a.part(), b.part()]);

    scene.update();
    assert_eq!(keys(&scene), vec![ImageKey::from("b"), ImageKey::from("a")]);

    b.set_pos(scene.views_mut(), IVec2::new(50, 80));
    scene.update();
    assert_eq!(keys(&scene), vec![ImageKey::from("a"), ImageKey::from("b")]);
}

#[test]
fn test_tiles_culled_to_camera() {
    let mut scene = Scene::new(IVec2::new(100, 100), IVec2::new(320, 320));
    let world = scene.world();
    let parts = terrain(20).tile_parts(scene.views_mut(), world);
    assert_eq!(parts.len(), 400);
    scene.add_parts(parts);

    scene.update();
    // Seven tiles per axis overlap [0, 100).
    assert_eq!(scene.displayed().len(), 49);

    scene.camera_focus(IVec2::new(160, 160));
    scene.update();
    // Camera at (110, 110): tiles 6..=13 overlap [110, 210).
    assert_eq!(scene.camera_pos(), IVec2::new(110, 110));
    assert_eq!(scene.displayed().len(), 64);

    let cmds = scene.draw(&atlas()).unwrap();
    assert!(cmds.iter().all(|c| c.dst.overlaps(&Rect::from_coords(0, 0, 100, 100))));
}

#[test]
fn test_hud_text_ignores_camera() {
    let mut scene = Scene::new(IVec2::new(100, 100), IVec2::new(320, 320));
    let world = scene.world();
    let hud = scene.hud();
    let tiles = terrain(20).tile_parts(scene.views_mut(), world);
    scene.add_parts(tiles);
    let font = MonoFont::ascii("font", IVec2::new(4, 6), 16);
    let mut text = Text::new(scene.views_mut(), hud, "ok", 80, IVec2::new(10, 10), &font, 0);
    text.reveal_all();
    scene.add_parts(text.parts());

    scene.update();
    let before = scene.draw(&atlas()).unwrap();
    scene.camera_focus(IVec2::new(200, 200));
    scene.update();
    let after = scene.draw(&atlas()).unwrap();

    let text_cmds = |cmds: &[mosaic_engine::renderer::DrawCommand]| {
        cmds.iter()
            .filter(|c| &*c.key == "font")
            .map(|c| c.dst)
            .collect::<Vec<_>>()
    };
    assert_eq!(text_cmds(&before), vec![Rect::from_coords(10, 10, 14, 16), Rect::from_coords(14, 10, 18, 16)]);
    assert_eq!(text_cmds(&before), text_cmds(&after));
    // HUD comes last.
    assert_eq!(&*after.last().unwrap().key, "font");
}

#[test]
fn test_animation_changes_source_rect() {
    let mut scene = Scene::new(IVec2::new(100, 100), IVec2::new(100, 100));
    let world = scene.world();
    let mut s = Sprite::new(scene.views_mut(), world, sheet("a", 2), IVec2::new(20, 20));
    scene.add_part(s.part());
    let atlas = atlas();

    s.update();
    scene.update();
    let first = scene.draw(&atlas).unwrap()[0].src;
    s.update();
    scene.update();
    let second = scene.draw(&atlas).unwrap()[0].src;

    // "a" is packed at (16, 0), frames are 8px wide.
    assert_eq!(first, Rect::from_coords(16, 0, 24, 8));
    assert_eq!(second, Rect::from_coords(24, 0, 32, 8));
}

#[test]
fn test_disposed_sprite_leaves_scene() {
    let mut scene = Scene::new(IVec2::new(100, 100), IVec2::new(100, 100));
    let world = scene.world();
    let s = Sprite::new(scene.views_mut(), world, sheet("a", 1), IVec2::new(20, 20));
    scene.add_part(s.part());
    scene.update();
    assert_eq!(scene.displayed().len(), 1);

    s.dispose(scene.views_mut());
    scene.update();

    assert!(scene.displayed().is_empty());
    assert_eq!(scene.part_counts(), (0, 0));
}
