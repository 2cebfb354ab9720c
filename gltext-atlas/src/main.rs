mod cli;
mod preview;

use std::{fs::File, io::Write};

use clap::Parser;
use color_eyre::eyre::eyre;
use colored::Colorize;
use gltext_atlas::{AtlasBuilder, CosmicRasterizer};
use gltext_data::FontAtlasData;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> color_eyre::Result<()> {
    // panic hook
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // parse command line arguments
    let cli = Cli::parse();

    // handle --list-fonts flag
    if cli.list_fonts {
        println!("Discovering fonts...");
        Cli::display_font_list(&Cli::discover_fonts());
        return Ok(());
    }

    // validate CLI arguments
    cli.validate().map_err(|e| eyre!(e))?;

    // select font; numeric selections need the same listing as --list-fonts
    let needs_listing = cli.font.as_deref().is_some_and(|f| f.parse::<usize>().is_ok());
    let available_fonts = if needs_listing { Cli::discover_fonts() } else { Vec::new() };
    let font_name = cli.font_name(&available_fonts).map_err(|e| eyre!(e))?;

    // print configuration summary
    cli.print_summary(&font_name);

    let mut rasterizer = CosmicRasterizer::from_system(&font_name, cli.size)?;
    let atlas = AtlasBuilder::new(cli.padding()).build(&mut rasterizer)?;

    save(&atlas, &cli.output)?;

    if cli.preview {
        print!("{}", preview::render_atlas(&atlas));
    }

    let layout = &atlas.layout;
    println!("\n{}", "Bitmap font generated!".green());
    println!("Font: {} @ {}px", atlas.font_name, atlas.font_size);
    println!("Texture size: {}x{}", layout.texture_size, layout.texture_size);
    println!("Cell size: {}x{}", layout.cell_width, layout.cell_height);
    println!("Grid: {} columns x {} rows", layout.columns, layout.rows);
    println!(
        "Line metrics: height {:.2}, ascent {:.2}, descent {:.2}",
        atlas.line_metrics.height, atlas.line_metrics.ascent, atlas.line_metrics.descent
    );
    println!("Total glyph count: {}", atlas.glyphs.len());

    Ok(())
}

/// Writes the atlas in its binary format to `path`.
fn save(atlas: &FontAtlasData, path: &str) -> color_eyre::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(&atlas.to_binary())?;

    Ok(())
}
