//! Mosaic - headless runner
//!
//! Loads a level, runs the engine loop for a number of frames against a
//! recording backend and reports what was drawn. Useful for checking level
//! content and for dumping the generated navigation graphs.

use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use glam::IVec2;

use mosaic_engine::core::config::EngineConfig;
use mosaic_engine::core::error::{EngineError, Result};
use mosaic_engine::core::types::Rect;
use mosaic_engine::game::{Engine, GameSetup, RawInput, Walker};
use mosaic_engine::renderer::RecordingBackend;
use mosaic_engine::terrain::LevelData;
use mosaic_engine::triggers::Trigger;
use mosaic_engine::ui::{BubbleKeys, DialogueLine, MonoFont, BUBBLE_PART_SIZE};

const DEMO_LEVEL: &str = include_str!("../data/demo_level.json");

/// Mosaic - run a level headless
#[derive(Parser, Debug)]
#[command(name = "mosaic")]
#[command(about = "Run a Mosaic level headless and report what was drawn")]
struct Args {
    /// Engine config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level file (JSON); the bundled demo level if absent
    #[arg(long)]
    level: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, short = 'd')]
    debug: bool,

    /// Render frames per model update
    #[arg(long)]
    frames_per_update: Option<u32>,

    /// Frames to run
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Write the generated obstacle/path graphs to this file
    #[arg(long)]
    dump_graphs: Option<PathBuf>,

    /// Show the whole map with triggers disabled
    #[arg(long)]
    preview: bool,

    /// Click this screen position once the intro is dismissed
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    click: Option<Vec<i32>>,
}

fn main() {
    let args = Args::parse();

    let directive = if args.debug {
        "mosaic_engine=debug"
    } else {
        "mosaic_engine=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::INFO.into()),
            ),
        )
        .init();

    if let Err(e) = run(args) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    config.debug |= args.debug;
    config.level_preview |= args.preview;
    if let Some(n) = args.frames_per_update {
        config.frames_per_update = n;
    }
    if args.dump_graphs.is_some() {
        config.dump_graphs = args.dump_graphs.clone();
    }

    let level = match &args.level {
        Some(path) => LevelData::from_file(path)?,
        None => LevelData::from_json_str(DEMO_LEVEL)?,
    };
    let setup = demo_setup(level)?;
    let mut engine = Engine::load(config, setup)?;

    let mut backend = RecordingBackend::new();
    let click = args.click.as_deref().and_then(|c| match c {
        [x, y] => Some(IVec2::new(*x, *y)),
        _ => None,
    });
    let fpu = u64::from(engine.config().frames_per_update);
    let mut click_frames = 0;
    for frame in 0..args.frames {
        let raw = match (engine.dialogue(), click) {
            // Click through dialogue twice a second.
            (Some(_), _) => RawInput {
                cursor: IVec2::ZERO,
                pressed: frame % 30 < fpu,
            },
            // Then press and release on the target once.
            (None, Some(cursor)) if click_frames < 2 * fpu => {
                click_frames += 1;
                RawInput {
                    cursor,
                    pressed: click_frames <= fpu,
                }
            }
            _ => RawInput::default(),
        };
        engine.frame(raw, &mut backend)?;
    }

    let metrics = engine.metrics();
    tracing::info!(
        frames = metrics.frames,
        ticks = metrics.ticks,
        batches = backend.batches(),
        parts = metrics.parts_drawn,
        avg_ms = metrics.avg_frame_time_ms(),
        max_ms = metrics.max_frame_time_ms(),
        player = %engine.player_pos(),
        "run complete"
    );
    Ok(())
}

/// Player, font, triggers and image manifest for a level.
///
/// Image sizes are derived from the level's own layout, standing in for an
/// asset loader that would read them from the image files.
fn demo_setup(level: LevelData) -> Result<GameSetup> {
    let hero = level
        .sheets
        .get("hero")
        .cloned()
        .ok_or_else(|| EngineError::InvalidLevel("level has no \"hero\" sheet".into()))?;
    let faces = level.sheets.get("faces").cloned().map(Rc::new);
    let font = MonoFont::ascii("font", IVec2::new(6, 8), 16);
    let bubble_keys = BubbleKeys {
        normal: "bubble".into(),
        pressed: "bubble-pressed".into(),
    };

    let mut images = image_manifest(&level);
    images.push(("font".into(), font.cell * IVec2::new(16, 6)));
    images.push((bubble_keys.normal.to_string(), IVec2::splat(BUBBLE_PART_SIZE * 3)));
    images.push((bubble_keys.pressed.to_string(), IVec2::splat(BUBBLE_PART_SIZE * 3)));

    let greet = |text: &str| match &faces {
        Some(sheet) => DialogueLine::new(text).with_avatar(sheet.clone(), 0),
        None => DialogueLine::new(text),
    };
    let triggers = vec![
        Trigger::new("intro").with_dialogue([
            greet("Welcome to the meadow. Click anywhere to walk there."),
            greet("Water and rocks are in the way; the path goes around them."),
        ]),
        Trigger::new("pond")
            .depends_on("intro")
            .on_tiles((3..=8).map(|y| IVec2::new(7, y)))
            .with_dialogue([DialogueLine::new("The pond is too deep to wade through.")]),
    ];

    let player = Walker::new(
        Rc::new(hero),
        IVec2::new(40, 40),
        Rect::from_coords(-4, -2, 4, 2),
        2,
    );

    Ok(GameSetup {
        level,
        images,
        font: Box::new(font),
        bubble_keys,
        player: Box::new(player),
        triggers,
    })
}

fn image_manifest(level: &LevelData) -> Vec<(String, IVec2)> {
    let grid = |columns: usize, count: usize, cell: IVec2| {
        let columns = if columns == 0 { count.max(1) } else { columns };
        let rows = count.div_ceil(columns).max(1);
        cell * IVec2::new(columns.min(count.max(1)) as i32, rows as i32)
    };
    let ts = level.tile_size;
    let mut images = vec![(
        level.tileset.key.to_string(),
        grid(level.tileset.columns, level.tile_infos.len(), IVec2::splat(ts)),
    )];
    if let Some(blocks) = &level.blocks {
        images.push((
            blocks.tileset.key.to_string(),
            grid(blocks.tileset.columns, blocks.infos.len(), IVec2::new(ts, ts + blocks.height)),
        ));
    }
    let mut sheets: Vec<_> = level.sheets.values().collect();
    sheets.sort_by(|a, b| a.key.cmp(&b.key));
    for sheet in sheets {
        images.push((
            sheet.key.to_string(),
            grid(sheet.columns, sheet.frame_count(), sheet.frame_size),
        ));
    }
    images
}
