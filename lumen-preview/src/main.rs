//! lumen-preview - render a text script through the Lumen layout to a PNG.
//!
//! Script format: words separated by whitespace, `word|ruby` for a ruby
//! annotation, one output line per input line (blank lines add an empty
//! line).

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lumen::{Color, FontManager, Layout, LayoutConfig, Surface};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lumen-preview", about = "Lay out a text script and save it as a PNG")]
struct Args {
    /// Text script to lay out.
    script: PathBuf,

    /// Output image path.
    #[arg(short, long, default_value = "preview.png")]
    output: PathBuf,

    /// JSON layout config; defaults apply to anything it leaves out.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra font files to load before rendering.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Reveal only this many tokens (typewriter frame); everything if unset.
    #[arg(long)]
    reveal: Option<usize>,

    /// Canvas background as #rrggbb or #rrggbbaa.
    #[arg(long, default_value = "#000000")]
    background: Color,

    /// Margin around the text, in pixels.
    #[arg(long, default_value_t = 8)]
    margin: i32,
}

fn main() -> anyhow::Result<()> {
    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => LayoutConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => LayoutConfig::default(),
    };

    let fonts = FontManager::new();
    for path in &args.fonts {
        fonts
            .load_font_file(path)
            .with_context(|| format!("loading font {}", path.display()))?;
    }

    let script = std::fs::read_to_string(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;

    let mut layout = Layout::from_manager(config, &fonts)?;
    reserve_script(&mut layout, &script);

    match args.reveal {
        Some(n) => {
            for _ in 0..n {
                if !layout.show_next() {
                    break;
                }
            }
        }
        None => {
            layout.complete();
        }
    }
    tracing::info!(
        "Laid out {} tokens in {} rows, {} revealed",
        layout.token_count(),
        layout.row_count(),
        layout.revealed()
    );

    let margin = args.margin.max(0);
    let width = layout.width() as i32 + margin * 2;
    let height = layout.height() as i32 + margin * 2;
    let mut canvas = Surface::new(width.max(1), height.max(1))?;
    canvas.clear(args.background);
    layout.draw_on(&mut canvas, margin, margin, 255);

    canvas
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    tracing::info!("Wrote {}x{} preview to {:?}", width, height, args.output);

    fonts.shutdown();
    Ok(())
}

/// Reserve every word of `script`, skipping (with a warning) any that fail
/// to render.
fn reserve_script(layout: &mut Layout, script: &str) {
    for line in script.lines() {
        let mut first = true;
        for item in line.split_whitespace() {
            if !first {
                if let Err(e) = layout.reserve_word(" ", "") {
                    tracing::warn!("Skipping space: {}", e);
                }
            }
            first = false;

            let (word, ruby) = item.split_once('|').unwrap_or((item, ""));
            if let Err(e) = layout.reserve_word(word, ruby) {
                tracing::warn!("Skipping {:?}: {}", item, e);
            }
        }
        layout.reserve_new_line();
    }
}
